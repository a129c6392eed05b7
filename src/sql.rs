// Loading of the pre-written SQL answer.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// Body of the submission call. Only built from non-empty, trimmed text.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SqlPayload {
    #[serde(rename = "finalQuery")]
    final_query: String,
}

impl SqlPayload {
    /// Trim `raw`; `None` if nothing is left.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(SqlPayload {
            final_query: trimmed.to_string(),
        })
    }

    pub fn final_query(&self) -> &str {
        &self.final_query
    }

    /// At most `max_chars` characters of the query, cut on a char boundary.
    pub fn preview(&self, max_chars: usize) -> &str {
        match self.final_query.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.final_query[..idx],
            None => &self.final_query,
        }
    }
}

/// Read the whole file as UTF-8 and wrap it in a payload.
pub fn load_final_sql(path: &Path) -> Result<SqlPayload> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read final SQL file {}", path.display()))?;
    SqlPayload::new(&text).with_context(|| {
        format!(
            "{} is empty. Put the final SQL query in it before submitting",
            path.display()
        )
    })
}
