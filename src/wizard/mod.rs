//! The quote request wizard: one parametrised state machine driving any
//! [`WizardDescriptor`].
//!
//! A [`QuoteWizard`] owns the form values, step position, anti-spam state and
//! submission status for a single session. Front ends feed it user events
//! (`set_field`, `next`, `previous`, `jump_to`, `submit`) and render whatever
//! it exposes (`current_step`, `field_error`, `banner`, `acknowledgment`).
//!
//! Submitting is split into [`QuoteWizard::begin_submit`] and
//! [`QuoteWizard::complete_submit`] so asynchronous front ends can await the
//! backend in between; [`QuoteWizard::submit`] does both for synchronous
//! callers.

pub mod navigation;
pub mod presets;
pub mod steps;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::antispam::{AntiSpamGuard, ChallengeState};
use crate::errors::{WizardError, SUBMISSION_FAILED_MESSAGE, UNAVAILABLE_MESSAGE};
use crate::form::catalog;
use crate::form::{FieldKey, FieldValue, FormRecord, ValidationErrors};
use crate::submission::{
    BeginOutcome, FinishOutcome, PendingSubmission, SubmissionCollaborator, SubmissionConfig,
    SubmissionFailure, SubmissionManager, SubmissionStatus, SubmissionTicket,
};

pub use navigation::{Direction, NavigationError, NavigationState, StepController};
pub use steps::{DescriptorError, FieldRule, StepDefinition, WizardDescriptor};

/// Inline, dismissible message shown above the submit action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    ChallengeFailed(String),
    SubmissionFailed(String),
    Unavailable(String),
}

impl Banner {
    pub fn message(&self) -> &str {
        match self {
            Banner::ChallengeFailed(message)
            | Banner::SubmissionFailed(message)
            | Banner::Unavailable(message) => message,
        }
    }
}

/// Confirmation produced by a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Acknowledgment {
    pub first_name: Option<String>,
    pub service: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl Acknowledgment {
    fn capture(record: &FormRecord) -> Self {
        let first_name = record
            .text(FieldKey::FirstName)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        let service = record
            .text(FieldKey::ServiceType)
            .and_then(|value| catalog::label_for(catalog::SERVICES, value.trim()))
            .map(str::to_string);
        Self {
            first_name,
            service,
            submitted_at: Utc::now(),
        }
    }

    pub fn title(&self) -> &'static str {
        "Request Submitted Successfully!"
    }

    pub fn message(&self) -> String {
        match &self.first_name {
            Some(name) => {
                let service = self
                    .service
                    .as_deref()
                    .map(str::to_lowercase)
                    .unwrap_or_else(|| "quote".to_string());
                format!(
                    "Thank you, {name}! We've received your {service} request and will contact you within 24 hours."
                )
            }
            None => "Thank you for your inquiry. Our team will review your request and respond promptly."
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BeginSubmit {
    /// Send `request` to the backend, then call
    /// [`QuoteWizard::complete_submit`] with the ticket.
    Dispatch(PendingSubmission),
    /// Honeypot hit. Show nothing.
    Discarded,
    AlreadyPending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted(Acknowledgment),
    /// Dropped without contacting the backend; nothing should be shown.
    Discarded,
    AlreadyPending,
}

pub struct QuoteWizard {
    descriptor: WizardDescriptor,
    record: FormRecord,
    controller: StepController,
    guard: AntiSpamGuard,
    submissions: SubmissionManager,
    honeypot: String,
    answer: String,
    field_errors: BTreeMap<FieldKey, String>,
    banner: Option<Banner>,
    acknowledgment: Option<Acknowledgment>,
}

impl QuoteWizard {
    pub fn new(descriptor: WizardDescriptor, config: SubmissionConfig) -> Self {
        Self::with_guard(descriptor, config, AntiSpamGuard::new())
    }

    pub fn with_guard(
        descriptor: WizardDescriptor,
        config: SubmissionConfig,
        guard: AntiSpamGuard,
    ) -> Self {
        let controller = StepController::new(descriptor.len());
        Self {
            descriptor,
            record: FormRecord::new(),
            controller,
            guard,
            submissions: SubmissionManager::new(config),
            honeypot: String::new(),
            answer: String::new(),
            field_errors: BTreeMap::new(),
            banner: None,
            acknowledgment: None,
        }
    }

    pub fn descriptor(&self) -> &WizardDescriptor {
        &self.descriptor
    }

    pub fn record(&self) -> &FormRecord {
        &self.record
    }

    pub fn navigation(&self) -> NavigationState {
        self.controller.state()
    }

    pub fn controller(&self) -> &StepController {
        &self.controller
    }

    pub fn current_step(&self) -> &StepDefinition {
        // The controller is built from the descriptor and never leaves 1..=len.
        &self.descriptor.steps()[self.controller.current() - 1]
    }

    pub fn status(&self) -> &SubmissionStatus {
        self.submissions.status()
    }

    pub fn is_configured(&self) -> bool {
        self.submissions.config().is_configured()
    }

    pub fn challenge(&self) -> &ChallengeState {
        self.guard.challenge()
    }

    pub fn honeypot(&self) -> &str {
        &self.honeypot
    }

    pub fn challenge_answer(&self) -> &str {
        &self.answer
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    pub fn field_error(&self, key: FieldKey) -> Option<&str> {
        self.field_errors.get(&key).map(String::as_str)
    }

    pub fn field_errors(&self) -> &BTreeMap<FieldKey, String> {
        &self.field_errors
    }

    pub fn acknowledgment(&self) -> Option<&Acknowledgment> {
        self.acknowledgment.as_ref()
    }

    pub fn dismiss_acknowledgment(&mut self) {
        self.acknowledgment = None;
    }

    pub fn set_field(&mut self, key: FieldKey, value: FieldValue) -> Result<(), WizardError> {
        self.record.set_field(key, value)?;
        self.field_errors.remove(&key);
        Ok(())
    }

    /// Stores text input, canonicalising choice labels to option values.
    pub fn set_text(&mut self, key: FieldKey, text: &str) -> Result<(), WizardError> {
        let value = match self.descriptor.rule_for(key) {
            Some(rule) => rule.normalize(text),
            None => text.to_string(),
        };
        self.set_field(key, FieldValue::Text(value))
    }

    pub fn set_consent(&mut self, consent: bool) {
        self.record.set_consent(consent);
        self.field_errors.remove(&FieldKey::Consent);
    }

    pub fn set_honeypot(&mut self, value: impl Into<String>) {
        self.honeypot = value.into();
    }

    pub fn set_challenge_answer(&mut self, value: impl Into<String>) {
        self.answer = value.into();
    }

    /// User-requested redraw of the arithmetic prompt.
    pub fn refresh_challenge(&mut self) -> &ChallengeState {
        self.answer.clear();
        self.guard.new_challenge()
    }

    /// Validates the visible step, then moves forward. Returns whether the
    /// step changed (`false` on the last step).
    pub fn next(&mut self) -> Result<bool, WizardError> {
        if let Err(errors) = self.current_step().validate(&self.record) {
            self.record_field_errors(&errors);
            return Err(errors.into());
        }
        let cleared: Vec<FieldKey> = self
            .current_step()
            .fields()
            .iter()
            .map(|rule| rule.key)
            .collect();
        for key in cleared {
            self.field_errors.remove(&key);
        }
        Ok(self.controller.advance())
    }

    pub fn previous(&mut self) -> bool {
        self.controller.retreat()
    }

    pub fn jump_to(&mut self, step: usize) -> Result<bool, WizardError> {
        Ok(self.controller.jump_to(step)?)
    }

    pub fn begin_submit(&mut self) -> Result<BeginSubmit, WizardError> {
        if self.submissions.is_pending() {
            return Ok(BeginSubmit::AlreadyPending);
        }
        self.banner = None;

        if self.guard.check_honeypot(&self.honeypot).is_err() {
            warn!("Potential bot detected via honeypot; discarding submission");
            return Ok(BeginSubmit::Discarded);
        }

        if !self.submissions.config().is_configured() {
            self.banner = Some(Banner::Unavailable(UNAVAILABLE_MESSAGE.to_string()));
            return Err(crate::submission::ConfigurationError.into());
        }

        if let Err(errors) = self.descriptor.validate_all(&self.record) {
            self.record_field_errors(&errors);
            return Err(errors.into());
        }
        self.field_errors.clear();

        if let Err(err) = self.guard.check_challenge(&self.answer) {
            self.banner = Some(Banner::ChallengeFailed(err.to_string()));
            self.refresh_challenge();
            return Err(err.into());
        }

        match self.submissions.begin(&self.record)? {
            BeginOutcome::Started(pending) => Ok(BeginSubmit::Dispatch(pending)),
            BeginOutcome::AlreadyPending => Ok(BeginSubmit::AlreadyPending),
        }
    }

    /// Applies the backend's answer. `Ok(None)` means the response belonged
    /// to a session that was torn down or already settled and was ignored.
    pub fn complete_submit(
        &mut self,
        ticket: SubmissionTicket,
        result: Result<(), SubmissionFailure>,
    ) -> Result<Option<Acknowledgment>, WizardError> {
        match self.submissions.finish(ticket, result) {
            FinishOutcome::Succeeded => {
                let acknowledgment = Acknowledgment::capture(&self.record);
                info!(first_name = ?acknowledgment.first_name, "quote request submitted");
                self.clear_session();
                self.acknowledgment = Some(acknowledgment.clone());
                Ok(Some(acknowledgment))
            }
            FinishOutcome::Failed(failure) => {
                for (key, issue) in failure.issues_by_field() {
                    self.field_errors.insert(key, issue.message.clone());
                }
                self.banner = Some(Banner::SubmissionFailed(
                    SUBMISSION_FAILED_MESSAGE.to_string(),
                ));
                self.refresh_challenge();
                Err(failure.into())
            }
            FinishOutcome::Stale => Ok(None),
        }
    }

    /// Runs the whole submission against `collaborator`.
    pub fn submit<C>(&mut self, collaborator: &mut C) -> Result<SubmitOutcome, WizardError>
    where
        C: SubmissionCollaborator + ?Sized,
    {
        match self.begin_submit()? {
            BeginSubmit::Discarded => Ok(SubmitOutcome::Discarded),
            BeginSubmit::AlreadyPending => Ok(SubmitOutcome::AlreadyPending),
            BeginSubmit::Dispatch(pending) => {
                let result = collaborator.submit(&pending.request);
                match self.complete_submit(pending.ticket, result)? {
                    Some(acknowledgment) => Ok(SubmitOutcome::Submitted(acknowledgment)),
                    None => Ok(SubmitOutcome::Discarded),
                }
            }
        }
    }

    /// Ends the session: any in-flight response will be ignored and every
    /// piece of state returns to its defaults.
    pub fn teardown(&mut self) {
        self.submissions.abandon();
        self.clear_session();
        self.acknowledgment = None;
    }

    fn clear_session(&mut self) {
        self.record.reset();
        self.controller.reset();
        self.honeypot.clear();
        self.field_errors.clear();
        self.banner = None;
        self.refresh_challenge();
    }

    fn record_field_errors(&mut self, errors: &ValidationErrors) {
        for error in errors.iter() {
            self.field_errors.insert(error.field, error.message.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wizard() -> QuoteWizard {
        QuoteWizard::with_guard(
            presets::quote_request().unwrap(),
            SubmissionConfig::new("test-form"),
            AntiSpamGuard::with_seed(11),
        )
    }

    #[test]
    fn acknowledgment_personalises_message() {
        let mut record = FormRecord::new();
        record.set_text(FieldKey::FirstName, "Jane").unwrap();
        record.set_text(FieldKey::ServiceType, "painting").unwrap();
        let ack = Acknowledgment::capture(&record);
        assert_eq!(
            ack.message(),
            "Thank you, Jane! We've received your interior and exterior painting request and will contact you within 24 hours."
        );

        record.set_text(FieldKey::ServiceType, "").unwrap();
        assert!(Acknowledgment::capture(&record).message().contains("your quote request"));

        let anonymous = Acknowledgment::capture(&FormRecord::new());
        assert!(anonymous.message().starts_with("Thank you for your inquiry."));
    }

    #[test]
    fn next_blocks_on_missing_required_fields() {
        let mut wizard = wizard();
        wizard.set_text(FieldKey::FirstName, "Jane").unwrap();
        let err = wizard.next().unwrap_err();
        match err {
            WizardError::Validation(errors) => assert_eq!(
                errors.fields(),
                vec![FieldKey::LastName, FieldKey::Email, FieldKey::Phone, FieldKey::Address]
            ),
            other => panic!("Unexpected error: {:?}", other),
        }
        assert_eq!(wizard.navigation().current, 1);
        assert_eq!(wizard.field_error(FieldKey::Email), Some("Email address is required"));

        wizard.set_text(FieldKey::Email, "jane@example.com").unwrap();
        assert_eq!(wizard.field_error(FieldKey::Email), None);
    }

    #[test]
    fn set_text_canonicalises_choice_labels() {
        let mut wizard = wizard();
        wizard.set_text(FieldKey::Timeline, "Within 1 month").unwrap();
        assert_eq!(wizard.record().text(FieldKey::Timeline), Some("1-month"));
    }

    #[test]
    fn set_field_rejects_wrong_shape() {
        let mut wizard = wizard();
        let err = wizard
            .set_field(FieldKey::Consent, FieldValue::from("true"))
            .unwrap_err();
        assert!(matches!(err, WizardError::FieldType(_)));
    }

    #[test]
    fn refresh_clears_answer_and_redraws() {
        let mut wizard = wizard();
        let before = wizard.challenge().generation();
        wizard.set_challenge_answer("4");
        wizard.refresh_challenge();
        assert_eq!(wizard.challenge_answer(), "");
        assert_eq!(wizard.challenge().generation(), before + 1);
    }

    #[test]
    fn unconfigured_wizard_refuses_before_validation() {
        let mut wizard = QuoteWizard::new(
            presets::contact_form().unwrap(),
            SubmissionConfig::unconfigured(),
        );
        assert!(!wizard.is_configured());
        let err = wizard.begin_submit().unwrap_err();
        assert!(matches!(err, WizardError::Configuration(_)));
        assert_eq!(wizard.banner().map(Banner::message), Some(UNAVAILABLE_MESSAGE));
        assert!(wizard.field_errors().is_empty());
        assert_eq!(wizard.status(), &SubmissionStatus::Idle);
    }
}
