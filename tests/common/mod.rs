#![allow(dead_code)]

use quote_wizard::antispam::AntiSpamGuard;
use quote_wizard::form::FieldKey;
use quote_wizard::submission::{
    SubmissionCollaborator, SubmissionConfig, SubmissionFailure, SubmissionRequest,
};
use quote_wizard::wizard::{presets, QuoteWizard};

pub const SEED: u64 = 7;

/// Records every request it receives and answers with a scripted result.
pub struct CountingCollaborator {
    pub requests: Vec<SubmissionRequest>,
    response: Result<(), SubmissionFailure>,
}

impl CountingCollaborator {
    pub fn succeeding() -> Self {
        Self {
            requests: Vec::new(),
            response: Ok(()),
        }
    }

    pub fn failing(failure: SubmissionFailure) -> Self {
        Self {
            requests: Vec::new(),
            response: Err(failure),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.len()
    }
}

impl SubmissionCollaborator for CountingCollaborator {
    fn submit(&mut self, request: &SubmissionRequest) -> Result<(), SubmissionFailure> {
        self.requests.push(request.clone());
        self.response.clone()
    }
}

pub fn quote_wizard() -> QuoteWizard {
    QuoteWizard::with_guard(
        presets::quote_request().expect("preset is valid"),
        SubmissionConfig::new("xgvyjlzg"),
        AntiSpamGuard::with_seed(SEED),
    )
}

pub fn fill_contact(wizard: &mut QuoteWizard) {
    wizard.set_text(FieldKey::FirstName, "Jane").unwrap();
    wizard.set_text(FieldKey::LastName, "Doe").unwrap();
    wizard.set_text(FieldKey::Email, "jane@example.com").unwrap();
    wizard.set_text(FieldKey::Phone, "(555) 123-4567").unwrap();
    wizard.set_text(FieldKey::Address, "12 Main St").unwrap();
}

pub fn fill_project(wizard: &mut QuoteWizard) {
    wizard.set_text(FieldKey::ServiceType, "plumbing").unwrap();
    wizard
        .set_text(FieldKey::ProjectDescription, "Replace the kitchen sink and faucet.")
        .unwrap();
    wizard.set_text(FieldKey::Budget, "<5k").unwrap();
    wizard.set_text(FieldKey::Timeline, "asap").unwrap();
}

pub fn fill_final(wizard: &mut QuoteWizard) {
    wizard.set_text(FieldKey::HearAbout, "google").unwrap();
    wizard.set_consent(true);
}

/// Walks all three steps with valid data, ending on the last step.
pub fn complete_all_steps(wizard: &mut QuoteWizard) {
    fill_contact(wizard);
    assert!(wizard.next().unwrap());
    fill_project(wizard);
    assert!(wizard.next().unwrap());
    fill_final(wizard);
}

pub fn correct_answer(wizard: &QuoteWizard) -> String {
    wizard.challenge().answer().to_string()
}
