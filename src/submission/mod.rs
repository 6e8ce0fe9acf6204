//! Everything around the single call to the external form backend.

pub mod formspree;
pub mod lifecycle;

use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::info;

use crate::form::{FieldKey, FormRecord};

pub use formspree::FormspreeClient;
pub use lifecycle::{
    BeginOutcome, ConfigurationError, FinishOutcome, PendingSubmission, SubmissionConfig,
    SubmissionManager, SubmissionStatus, SubmissionTicket,
};

/// Payload handed to a [`SubmissionCollaborator`].
///
/// Built from the [`FormRecord`] only, so decoy and challenge inputs can
/// never leak into it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionRequest {
    #[serde(skip)]
    pub form_id: String,
    pub fields: Map<String, Value>,
}

impl SubmissionRequest {
    pub fn from_record(form_id: impl Into<String>, record: &FormRecord) -> Self {
        Self {
            form_id: form_id.into(),
            fields: record.to_payload(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// The request never produced a response.
    Network,
    /// The backend answered and refused the submission.
    Rejected,
    /// The backend answered with something unrecognised.
    Unexpected,
}

/// Field-level complaint reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub field: Option<String>,
    pub code: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SubmissionFailure {
    pub kind: FailureKind,
    pub message: String,
    pub field_errors: Vec<FieldIssue>,
}

impl SubmissionFailure {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Network,
            message: message.into(),
            field_errors: Vec::new(),
        }
    }

    pub fn rejected(message: impl Into<String>, field_errors: Vec<FieldIssue>) -> Self {
        Self {
            kind: FailureKind::Rejected,
            message: message.into(),
            field_errors,
        }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Unexpected,
            message: message.into(),
            field_errors: Vec::new(),
        }
    }

    /// Issues whose `field` names one of ours, keyed by [`FieldKey`].
    pub fn issues_by_field(&self) -> Vec<(FieldKey, &FieldIssue)> {
        self.field_errors
            .iter()
            .filter_map(|issue| {
                let key = issue.field.as_deref()?.parse::<FieldKey>().ok()?;
                Some((key, issue))
            })
            .collect()
    }
}

/// The external backend that receives a finished request.
pub trait SubmissionCollaborator {
    fn submit(&mut self, request: &SubmissionRequest) -> Result<(), SubmissionFailure>;
}

impl<F> SubmissionCollaborator for F
where
    F: FnMut(&SubmissionRequest) -> Result<(), SubmissionFailure>,
{
    fn submit(&mut self, request: &SubmissionRequest) -> Result<(), SubmissionFailure> {
        self(request)
    }
}

/// Prints the payload instead of sending it and always succeeds.
pub struct DryRunCollaborator<W: Write> {
    out: W,
    sent: usize,
}

impl DryRunCollaborator<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> DryRunCollaborator<W> {
    pub fn new(out: W) -> Self {
        Self { out, sent: 0 }
    }

    pub fn sent(&self) -> usize {
        self.sent
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SubmissionCollaborator for DryRunCollaborator<W> {
    fn submit(&mut self, request: &SubmissionRequest) -> Result<(), SubmissionFailure> {
        let body = serde_json::to_string_pretty(&request.fields)
            .map_err(|err| SubmissionFailure::unexpected(err.to_string()))?;
        writeln!(self.out, "Dry run: would submit to form `{}`", request.form_id)
            .and_then(|_| writeln!(self.out, "{body}"))
            .map_err(|err| SubmissionFailure::unexpected(err.to_string()))?;
        self.sent += 1;
        info!(form_id = %request.form_id, "dry-run submission recorded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> FormRecord {
        let mut record = FormRecord::new();
        record.set_text(FieldKey::FirstName, "Jane").unwrap();
        record.set_text(FieldKey::LastName, "Doe").unwrap();
        record.set_text(FieldKey::Email, "jane@example.com").unwrap();
        record.set_text(FieldKey::ServiceType, "painting").unwrap();
        record.set_consent(true);
        record
    }

    #[test]
    fn payload_snapshot() {
        let request = SubmissionRequest::from_record("xgvyjlzg", &sample_record());
        let sorted: std::collections::BTreeMap<_, _> = request.fields.into_iter().collect();
        let body = serde_json::to_string_pretty(&sorted).unwrap();
        insta::assert_snapshot!(body, @r###"
        {
          "address": "",
          "budget": "",
          "consent": true,
          "email": "jane@example.com",
          "firstName": "Jane",
          "hearAbout": "",
          "lastName": "Doe",
          "phone": "",
          "projectDescription": "",
          "serviceType": "painting",
          "timeline": ""
        }
        "###);
    }

    #[test]
    fn maps_known_issue_fields() {
        let failure = SubmissionFailure::rejected(
            "Validation errors",
            vec![
                FieldIssue {
                    field: Some("email".into()),
                    code: Some("TYPE_EMAIL".into()),
                    message: "should be an email".into(),
                },
                FieldIssue {
                    field: Some("_gotcha".into()),
                    code: None,
                    message: "ignored".into(),
                },
                FieldIssue {
                    field: None,
                    code: None,
                    message: "form is disabled".into(),
                },
            ],
        );
        let mapped = failure.issues_by_field();
        assert_eq!(mapped.len(), 1);
        assert_eq!(mapped[0].0, FieldKey::Email);
        assert_eq!(mapped[0].1.message, "should be an email");
    }

    #[test]
    fn dry_run_writes_payload() {
        let mut collaborator = DryRunCollaborator::new(Vec::new());
        let request = SubmissionRequest::from_record("form-1", &sample_record());
        collaborator.submit(&request).unwrap();
        assert_eq!(collaborator.sent(), 1);
        let written = String::from_utf8(collaborator.into_inner()).unwrap();
        assert!(written.starts_with("Dry run: would submit to form `form-1`"));
        assert!(written.contains("\"firstName\": \"Jane\""));
    }

    #[test]
    fn closures_act_as_collaborators() {
        let mut calls = 0;
        let mut collaborator = |_: &SubmissionRequest| -> Result<(), SubmissionFailure> {
            calls += 1;
            Err(SubmissionFailure::network("offline"))
        };
        let request = SubmissionRequest::from_record("form-1", &FormRecord::new());
        let err = collaborator.submit(&request).unwrap_err();
        assert_eq!(err.kind, FailureKind::Network);
        drop(collaborator);
        assert_eq!(calls, 1);
    }
}
