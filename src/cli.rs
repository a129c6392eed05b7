// Command-line arguments of the `bfhl-submit` binary.

use std::path::PathBuf;

use clap::Parser;

use crate::config::PartialSettings;

/// Register with the hiring gateway and submit the final SQL answer.
#[derive(Parser, Debug)]
#[command(name = "bfhl-submit", version, about, long_about = None)]
pub struct Cli {
    /// Config file (defaults to ./bfhl.toml, then ~/.bfhl/bfhl.toml).
    #[arg(short, long, env = "BFHL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Candidate name.
    #[arg(long, env = "BFHL_NAME")]
    pub name: Option<String>,

    /// Registration number; its last two digits pick the question.
    #[arg(long, env = "BFHL_REG_NO")]
    pub reg_no: Option<String>,

    /// Candidate email.
    #[arg(long, env = "BFHL_EMAIL")]
    pub email: Option<String>,

    /// File holding the final SQL query.
    #[arg(long = "sql", env = "BFHL_FINAL_SQL_PATH")]
    pub final_sql_path: Option<PathBuf>,

    /// Override the generateWebhook endpoint.
    #[arg(long, env = "BFHL_GENERATE_URL")]
    pub generate_url: Option<String>,

    /// Override the webhook used when registration returns none.
    #[arg(long, env = "BFHL_FALLBACK_URL")]
    pub fallback_url: Option<String>,

    /// Prompt for identity values that are not configured.
    #[arg(short, long)]
    pub interactive: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Values given on the command line or through the environment.
    pub fn overrides(&self) -> PartialSettings {
        PartialSettings {
            name: self.name.clone(),
            reg_no: self.reg_no.clone(),
            email: self.email.clone(),
            final_sql_path: self.final_sql_path.clone(),
            generate_url: self.generate_url.clone(),
            fallback_url: self.fallback_url.clone(),
        }
    }

    /// `tracing` filter directive for the requested verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info,bfhl_submit=debug",
            _ => "trace",
        }
    }
}
