//! Ready-made wizard layouts used by the site.

use crate::form::catalog::{BUDGETS, REFERRAL_SOURCES, SERVICES, TIMELINES};
use crate::form::{FieldKey, Validator};

use super::steps::{DescriptorError, FieldRule, StepDefinition, WizardDescriptor};

const NAME_MAX: usize = 50;
const PHONE_MAX: usize = 30;
const ADDRESS_MAX: usize = 200;
const DESCRIPTION_MIN: usize = 10;
const DESCRIPTION_MAX: usize = 1000;

fn name_rule(key: FieldKey) -> FieldRule {
    FieldRule::new(key)
        .required()
        .with_validator(Validator::MaxLength(NAME_MAX))
}

fn email_rule() -> FieldRule {
    FieldRule::new(FieldKey::Email)
        .required()
        .with_validator(Validator::Email)
}

fn description_rule() -> FieldRule {
    FieldRule::new(FieldKey::ProjectDescription)
        .required()
        .with_validator(Validator::MinLength(DESCRIPTION_MIN))
        .with_validator(Validator::MaxLength(DESCRIPTION_MAX))
        .with_help("Tell us about your project requirements, timeline, and any specific details.")
}

fn choice_rule(key: FieldKey, options: &'static [crate::form::CatalogOption]) -> FieldRule {
    FieldRule::new(key).with_validator(Validator::OneOf(options))
}

/// Three-step request page: contact details, project, final confirmation.
pub fn quote_request() -> Result<WizardDescriptor, DescriptorError> {
    WizardDescriptor::builder("quote-request")
        .step(
            StepDefinition::new("Contact Information")
                .field(name_rule(FieldKey::FirstName))
                .field(name_rule(FieldKey::LastName))
                .field(email_rule())
                .field(
                    FieldRule::new(FieldKey::Phone)
                        .required()
                        .with_validator(Validator::MaxLength(PHONE_MAX)),
                )
                .field(
                    FieldRule::new(FieldKey::Address)
                        .required()
                        .with_validator(Validator::MaxLength(ADDRESS_MAX)),
                ),
        )
        .step(
            StepDefinition::new("Project Details")
                .field(choice_rule(FieldKey::ServiceType, SERVICES).required())
                .field(description_rule())
                .field(choice_rule(FieldKey::Budget, BUDGETS))
                .field(choice_rule(FieldKey::Timeline, TIMELINES)),
        )
        .step(
            StepDefinition::new("Final Steps")
                .field(choice_rule(FieldKey::HearAbout, REFERRAL_SOURCES))
                .field(
                    FieldRule::new(FieldKey::Consent)
                        .required()
                        .with_label("Consent to be contacted regarding this inquiry"),
                ),
        )
        .build()
}

/// Single-screen contact form carrying the same fields as the request page
/// minus the referral question.
pub fn contact_form() -> Result<WizardDescriptor, DescriptorError> {
    WizardDescriptor::builder("contact")
        .step(
            StepDefinition::new("Request a Quote")
                .field(name_rule(FieldKey::FirstName))
                .field(name_rule(FieldKey::LastName))
                .field(email_rule())
                .field(
                    FieldRule::new(FieldKey::Phone)
                        .required()
                        .with_validator(Validator::MaxLength(PHONE_MAX)),
                )
                .field(
                    FieldRule::new(FieldKey::Address)
                        .with_label("Project location")
                        .with_validator(Validator::MaxLength(ADDRESS_MAX)),
                )
                .field(choice_rule(FieldKey::ServiceType, SERVICES))
                .field(choice_rule(FieldKey::Budget, BUDGETS))
                .field(choice_rule(FieldKey::Timeline, TIMELINES))
                .field(description_rule().with_label("Project details"))
                .field(FieldRule::new(FieldKey::Consent)),
        )
        .build()
}
