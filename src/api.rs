// API client module: a small blocking HTTP client for the hiring
// assessment gateway. One call registers the candidate and hands back a
// webhook plus access token, the other posts the final SQL to that webhook.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};

use crate::sql::SqlPayload;

/// Registration endpoint of the hiring gateway.
pub const GENERATE_WEBHOOK_URL: &str =
    "https://bfhldevapigw.healthrx.co.in/hiring/generateWebhook/JAVA";

/// Submission target used when registration hands back no webhook.
pub const FALLBACK_WEBHOOK_URL: &str =
    "https://bfhldevapigw.healthrx.co.in/hiring/testWebhook/JAVA";

/// Candidate identity posted to the registration endpoint. Field names
/// follow the gateway's JSON contract.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    #[serde(rename = "regNo")]
    pub reg_no: String,
    pub email: String,
}

/// Registration response. Either field may be missing or `null`.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookResponse {
    #[serde(default)]
    pub webhook: Option<String>,
    #[serde(default, rename = "accessToken")]
    pub access_token: Option<String>,
}

impl WebhookResponse {
    /// Whether the gateway sent a non-blank webhook.
    pub fn has_webhook(&self) -> bool {
        self.webhook.as_deref().is_some_and(|url| !url.trim().is_empty())
    }

    /// The webhook to submit to, or `fallback` when the gateway sent none.
    pub fn target_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.webhook.as_deref() {
            Some(url) if self.has_webhook() => url.trim(),
            _ => fallback,
        }
    }
}

/// How the access token is rendered into the `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// The token exactly as the gateway returned it.
    Raw,
    /// `Bearer <token>`.
    Bearer,
}

impl AuthScheme {
    /// Header formats tried by a submission, in order.
    pub const ATTEMPT_ORDER: [AuthScheme; 2] = [AuthScheme::Raw, AuthScheme::Bearer];

    /// Header value for `token`. A missing token is sent as an empty value.
    pub fn authorization(self, token: Option<&str>) -> String {
        match (self, token) {
            (_, None) => String::new(),
            (AuthScheme::Raw, Some(t)) => t.to_string(),
            (AuthScheme::Bearer, Some(t)) => format!("Bearer {}", t),
        }
    }
}

/// One submission attempt: POST the payload to `url` with the given
/// `Authorization` value and return the response body on a 2xx status.
///
/// The workflow's retry loop only talks to this trait, so it can be driven
/// without a network in tests.
pub trait Submitter {
    fn submit(&self, url: &str, authorization: &str, payload: &SqlPayload) -> Result<String>;
}

/// Blocking client shared by both calls of the workflow.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    /// Build a client with reqwest's default timeouts.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient { client })
    }

    /// POST the identity to the registration endpoint and parse the
    /// webhook/token pair. An error status, an empty body or a JSON `null`
    /// all mean there is nothing to continue with.
    pub fn generate_webhook(&self, url: &str, identity: &Identity) -> Result<WebhookResponse> {
        tracing::debug!(url, reg_no = %identity.reg_no, "calling generateWebhook");
        let res = self
            .client
            .post(url)
            .json(identity)
            .send()
            .context("Failed to send generateWebhook request")?;
        let status = res.status();
        tracing::debug!(%status, "generateWebhook responded");
        if !status.is_success() {
            let txt = res.text().unwrap_or_default();
            anyhow::bail!("generateWebhook failed: {} - {}", status, txt);
        }

        let body = res.text().context("Reading generateWebhook response body")?;
        if body.trim().is_empty() {
            anyhow::bail!("No response from generateWebhook");
        }
        let parsed: Option<WebhookResponse> =
            serde_json::from_str(&body).context("Parsing generateWebhook response json")?;
        parsed.context("No response from generateWebhook")
    }
}

impl Submitter for ApiClient {
    fn submit(&self, url: &str, authorization: &str, payload: &SqlPayload) -> Result<String> {
        let res = self
            .client
            .post(url)
            .header(AUTHORIZATION, authorization)
            .json(payload)
            .send()
            .context("Failed to send submission request")?;
        let status = res.status();
        tracing::debug!(url, %status, "submission responded");
        if !status.is_success() {
            let txt = res.text().unwrap_or_default();
            anyhow::bail!("Submission failed: {} - {}", status, txt);
        }
        res.text().context("Reading submission response body")
    }
}
