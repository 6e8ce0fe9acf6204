use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::form::FormRecord;

use super::{SubmissionCollaborator, SubmissionFailure, SubmissionRequest};

/// Explicit endpoint configuration for the [`SubmissionManager`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmissionConfig {
    form_id: Option<String>,
}

impl SubmissionConfig {
    /// Blank identifiers count as unconfigured.
    pub fn new(form_id: impl Into<String>) -> Self {
        let form_id = form_id.into().trim().to_string();
        Self {
            form_id: (!form_id.is_empty()).then_some(form_id),
        }
    }

    pub fn unconfigured() -> Self {
        Self::default()
    }

    pub fn form_id(&self) -> Option<&str> {
        self.form_id.as_deref()
    }

    pub fn is_configured(&self) -> bool {
        self.form_id.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no form endpoint identifier is configured")]
pub struct ConfigurationError;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed(SubmissionFailure),
}

impl SubmissionStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, SubmissionStatus::Pending)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SubmissionStatus::Idle => "idle",
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Succeeded => "succeeded",
            SubmissionStatus::Failed(_) => "failed",
        }
    }
}

/// Identifies one in-flight request. A response is only applied when it
/// comes back with the ticket that is currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionTicket {
    id: Uuid,
    epoch: u64,
}

impl SubmissionTicket {
    pub fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    pub ticket: SubmissionTicket,
    pub request: SubmissionRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BeginOutcome {
    Started(PendingSubmission),
    /// A request is already in flight; nothing was issued.
    AlreadyPending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishOutcome {
    Succeeded,
    Failed(SubmissionFailure),
    /// The ticket is not the one in flight (abandoned or duplicated).
    Stale,
}

/// Status machine around the external call:
/// `Idle | Succeeded | Failed -> Pending -> Succeeded | Failed`.
#[derive(Debug)]
pub struct SubmissionManager {
    config: SubmissionConfig,
    status: SubmissionStatus,
    in_flight: Option<SubmissionTicket>,
    epoch: u64,
}

impl SubmissionManager {
    pub fn new(config: SubmissionConfig) -> Self {
        if !config.is_configured() {
            warn!("submission manager created without a form identifier");
        }
        Self {
            config,
            status: SubmissionStatus::Idle,
            in_flight: None,
            epoch: 0,
        }
    }

    pub fn config(&self) -> &SubmissionConfig {
        &self.config
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }

    pub fn begin(&mut self, record: &FormRecord) -> Result<BeginOutcome, ConfigurationError> {
        if self.is_pending() {
            return Ok(BeginOutcome::AlreadyPending);
        }
        let Some(form_id) = self.config.form_id() else {
            error!("refusing to submit: no form identifier configured");
            return Err(ConfigurationError);
        };

        let ticket = SubmissionTicket {
            id: Uuid::new_v4(),
            epoch: self.epoch,
        };
        let request = SubmissionRequest::from_record(form_id, record);
        self.in_flight = Some(ticket);
        self.status = SubmissionStatus::Pending;
        info!(ticket = %ticket.id, form_id, "submission started");
        Ok(BeginOutcome::Started(PendingSubmission { ticket, request }))
    }

    pub fn finish(
        &mut self,
        ticket: SubmissionTicket,
        result: Result<(), SubmissionFailure>,
    ) -> FinishOutcome {
        if self.in_flight != Some(ticket) || ticket.epoch != self.epoch {
            warn!(ticket = %ticket.id, "discarding response for a submission that is no longer in flight");
            return FinishOutcome::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(()) => {
                info!(ticket = %ticket.id, "submission succeeded");
                self.status = SubmissionStatus::Succeeded;
                FinishOutcome::Succeeded
            }
            Err(failure) => {
                warn!(ticket = %ticket.id, kind = ?failure.kind, %failure, "submission failed");
                self.status = SubmissionStatus::Failed(failure.clone());
                FinishOutcome::Failed(failure)
            }
        }
    }

    /// Forgets the in-flight request so that its response is discarded.
    pub fn abandon(&mut self) {
        self.epoch += 1;
        self.in_flight = None;
        self.status = SubmissionStatus::Idle;
    }

    /// Begin, one collaborator call, finish. `None` when a request was
    /// already in flight.
    pub fn submit_with<C>(
        &mut self,
        record: &FormRecord,
        collaborator: &mut C,
    ) -> Result<Option<FinishOutcome>, ConfigurationError>
    where
        C: SubmissionCollaborator + ?Sized,
    {
        match self.begin(record)? {
            BeginOutcome::AlreadyPending => Ok(None),
            BeginOutcome::Started(pending) => {
                let result = collaborator.submit(&pending.request);
                Ok(Some(self.finish(pending.ticket, result)))
            }
        }
    }
}
