use thiserror::Error;

use crate::antispam::ChallengeError;
use crate::form::{FieldTypeError, ValidationErrors};
use crate::submission::{ConfigurationError, SubmissionFailure};
use crate::wizard::{DescriptorError, NavigationError};

pub const SUBMISSION_FAILED_MESSAGE: &str =
    "There was an error submitting your form. Please try again.";
pub const UNAVAILABLE_MESSAGE: &str =
    "Unable to submit right now. Please contact us directly.";

/// Error type that captures every wizard failure a caller must handle.
#[derive(Debug, Error)]
pub enum WizardError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Challenge(#[from] ChallengeError),
    #[error(transparent)]
    Submission(#[from] SubmissionFailure),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
    #[error(transparent)]
    FieldType(#[from] FieldTypeError),
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
}

impl WizardError {
    /// Inline banner text for the error, if it gets one. Validation failures
    /// are shown next to their fields instead.
    pub fn banner(&self) -> Option<String> {
        match self {
            WizardError::Challenge(err) => Some(err.to_string()),
            WizardError::Submission(_) => Some(SUBMISSION_FAILED_MESSAGE.to_string()),
            WizardError::Configuration(_) => Some(UNAVAILABLE_MESSAGE.to_string()),
            WizardError::Validation(_)
            | WizardError::Navigation(_)
            | WizardError::FieldType(_)
            | WizardError::Descriptor(_) => None,
        }
    }

    /// Retrying cannot help with these.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            WizardError::Configuration(_) | WizardError::Descriptor(_)
        )
    }
}
