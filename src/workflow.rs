// The registration and submission run.
//
// `execute` performs the whole sequence: register, classify the
// registration number, load the SQL, pick the target and submit. The
// submission itself is `submit_with_retry`, an explicit loop over
// `AuthScheme::ATTEMPT_ORDER` that stops at the first success.

use anyhow::{Context, Result};

use crate::api::{ApiClient, AuthScheme, Submitter};
use crate::classify::question_link_for_reg_no;
use crate::config::Settings;
use crate::sql::{load_final_sql, SqlPayload};
use crate::ui;

/// Characters of the SQL echoed to the console.
const SQL_PREVIEW_CHARS: usize = 200;

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// URL the SQL was posted to.
    pub target: String,
    /// Header format of the accepted attempt.
    pub scheme: AuthScheme,
    /// Number of POSTs made, 1 or 2.
    pub attempts: usize,
    /// Raw response body of the accepted attempt.
    pub response: String,
}

/// Run the full flow against the endpoints in `settings`.
pub fn execute(settings: &Settings) -> Result<Submission> {
    let api = ApiClient::new()?;

    println!("Calling generateWebhook...");
    let spinner = ui::spinner("Registering...");
    let registration = api.generate_webhook(&settings.endpoints.generate_webhook, &settings.identity);
    spinner.finish_and_clear();
    let registration = registration.context("Registration with generateWebhook failed")?;

    println!(
        "Question link to open based on regNo: {}",
        question_link_for_reg_no(&settings.identity.reg_no)
    );
    println!(
        "Received webhook: {}",
        registration.webhook.as_deref().unwrap_or("null")
    );
    println!(
        "Received accessToken: {}",
        ui::token_status(registration.access_token.as_deref())
    );

    let payload = load_final_sql(&settings.final_sql_path)?;
    println!(
        "Final SQL loaded (first {} chars): {}",
        SQL_PREVIEW_CHARS,
        payload.preview(SQL_PREVIEW_CHARS)
    );

    let target = registration.target_or(&settings.endpoints.fallback_webhook);
    if !registration.has_webhook() {
        println!("Webhook is empty, falling back to {}", target);
    }

    let spinner = ui::spinner("Submitting...");
    let submission = submit_with_retry(
        &api,
        target,
        registration.access_token.as_deref(),
        &payload,
        |line| ui::print_above(&spinner, line),
    );
    spinner.finish_and_clear();
    let submission = submission?;

    println!("Flow complete.");
    Ok(submission)
}

/// Post `payload` to `target` once per header format in
/// [`AuthScheme::ATTEMPT_ORDER`] until one succeeds. The error of the last
/// attempt is returned when all of them fail.
///
/// Console lines go through `report` so the caller can print them around
/// a running spinner.
pub fn submit_with_retry<S, R>(
    submitter: &S,
    target: &str,
    token: Option<&str>,
    payload: &SqlPayload,
    mut report: R,
) -> Result<Submission>
where
    S: Submitter + ?Sized,
    R: FnMut(&str),
{
    let last = AuthScheme::ATTEMPT_ORDER.len();
    let mut last_err = None;
    for (idx, scheme) in AuthScheme::ATTEMPT_ORDER.into_iter().enumerate() {
        let attempt = idx + 1;
        tracing::info!(target_url = target, attempt, ?scheme, "submitting final SQL");

        match submitter.submit(target, &scheme.authorization(token), payload) {
            Ok(response) => {
                match scheme {
                    AuthScheme::Raw => report(&format!("Submission response: {}", response)),
                    AuthScheme::Bearer => {
                        report(&format!("Submission response (with Bearer): {}", response))
                    }
                }
                return Ok(Submission {
                    target: target.to_string(),
                    scheme,
                    attempts: attempt,
                    response,
                });
            }
            Err(err) => {
                tracing::info!(attempt, error = %err, "submission attempt failed");
                if attempt < last {
                    report(&format!(
                        "Raw token submit failed (will retry with 'Bearer ' prefix). Error: {:#}",
                        err
                    ));
                }
                last_err = Some(err);
            }
        }
    }

    let err = last_err.unwrap_or_else(|| anyhow::anyhow!("no submission attempt was made"));
    Err(err.context(format!(
        "Submission to {} failed after {} attempts",
        target, last
    )))
}
