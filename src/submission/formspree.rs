//! HTTP collaborator for the Formspree form backend.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::debug;

use super::{FieldIssue, SubmissionCollaborator, SubmissionFailure, SubmissionRequest};
use crate::config::Config;

pub const DEFAULT_ENDPOINT_BASE: &str = "https://formspree.io/f";

pub struct FormspreeClient {
    http: Client,
    endpoint_base: String,
}

impl FormspreeClient {
    pub fn new(endpoint_base: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint_base: endpoint_base.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Self::new(config.endpoint_base.clone(), config.request_timeout())
    }

    pub fn endpoint_for(&self, form_id: &str) -> String {
        format!("{}/{}", self.endpoint_base.trim_end_matches('/'), form_id)
    }
}

impl SubmissionCollaborator for FormspreeClient {
    fn submit(&mut self, request: &SubmissionRequest) -> Result<(), SubmissionFailure> {
        let url = self.endpoint_for(&request.form_id);
        debug!(%url, "posting submission");

        let response = self
            .http
            .post(&url)
            .header(ACCEPT, "application/json")
            .json(&request.fields)
            .send()
            .map_err(|err| SubmissionFailure::network(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().unwrap_or_default();
        Err(interpret_error_body(status.as_u16(), &body))
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    #[serde(default)]
    field: Option<String>,
    #[serde(default)]
    code: Option<String>,
    message: String,
}

/// Turns a non-2xx response into a failure, keeping any per-field errors.
pub(crate) fn interpret_error_body(status: u16, body: &str) -> SubmissionFailure {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) if !parsed.errors.is_empty() || parsed.error.is_some() => {
            let message = parsed
                .error
                .or_else(|| parsed.errors.first().map(|entry| entry.message.clone()))
                .unwrap_or_else(|| format!("submission rejected with status {status}"));
            let issues = parsed
                .errors
                .into_iter()
                .map(|entry| FieldIssue {
                    field: entry.field,
                    code: entry.code,
                    message: entry.message,
                })
                .collect();
            SubmissionFailure::rejected(message, issues)
        }
        _ => SubmissionFailure::unexpected(format!("form backend answered with status {status}")),
    }
}
