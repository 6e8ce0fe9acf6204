use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::catalog::{self, CatalogOption};
use super::schema::{FieldKey, FieldValue};

static EMAIL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Single rule failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

type ValidatorCallback = dyn Fn(&FieldValue) -> Result<(), String> + Send + Sync;

/// Built-in validation helpers.
///
/// Apart from [`Validator::Required`], every rule accepts a blank value so
/// that optional fields can stay empty.
#[derive(Clone)]
pub enum Validator {
    Required,
    Email,
    MinLength(usize),
    MaxLength(usize),
    OneOf(&'static [CatalogOption]),
    Custom(Arc<ValidatorCallback>),
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validator::Required => f.write_str("Required"),
            Validator::Email => f.write_str("Email"),
            Validator::MinLength(min) => write!(f, "MinLength({min})"),
            Validator::MaxLength(max) => write!(f, "MaxLength({max})"),
            Validator::OneOf(options) => write!(f, "OneOf({} options)", options.len()),
            Validator::Custom(_) => f.write_str("Custom"),
        }
    }
}

impl Validator {
    pub fn custom<F>(check: F) -> Self
    where
        F: Fn(&FieldValue) -> Result<(), String> + Send + Sync + 'static,
    {
        Validator::Custom(Arc::new(check))
    }

    pub fn validate(&self, label: &str, value: &FieldValue) -> Result<(), ValidationError> {
        if let Validator::Required = self {
            return if value.is_blank() {
                Err(ValidationError::new(format!("{label} is required")))
            } else {
                Ok(())
            };
        }
        if let Validator::Custom(check) = self {
            return check(value).map_err(ValidationError::new);
        }

        let Some(text) = value.as_text().map(str::trim) else {
            return Ok(());
        };
        if text.is_empty() {
            return Ok(());
        }
        let length = text.chars().count();

        match self {
            Validator::Email if !EMAIL_SHAPE.is_match(text) => {
                Err(ValidationError::new("Please enter a valid email address"))
            }
            Validator::MinLength(min) if length < *min => Err(ValidationError::new(format!(
                "{label} must be at least {min} characters"
            ))),
            Validator::MaxLength(max) if length > *max => Err(ValidationError::new(format!(
                "{label} must be less than {max} characters"
            ))),
            Validator::OneOf(options) if !options.iter().any(|option| option.value == text) => {
                let values: Vec<_> = options.iter().map(|option| option.value).collect();
                Err(ValidationError::new(format!(
                    "Select a valid {} (options: {})",
                    label.to_lowercase(),
                    values.join(", ")
                )))
            }
            _ => Ok(()),
        }
    }

    /// Options behind a choice rule, used by front ends to render menus.
    pub fn choices(&self) -> Option<&'static [CatalogOption]> {
        match self {
            Validator::OneOf(options) => Some(*options),
            _ => None,
        }
    }

    /// Maps free-form input onto the canonical option value when the rule is
    /// a choice; other rules return the input unchanged.
    pub fn normalize(&self, input: &str) -> String {
        match self {
            Validator::OneOf(options) => catalog::find(options, input)
                .map(|option| option.value.to_string())
                .unwrap_or_else(|| input.trim().to_string()),
            _ => input.to_string(),
        }
    }
}

/// A failing field together with the message to show next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FieldKey,
    pub message: String,
}

/// All field failures found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Error)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.errors.iter().map(|err| err.field.wire_name()).collect();
        write!(f, "please check the following fields: {}", names.join(", "))
    }
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: FieldKey, error: ValidationError) {
        self.errors.push(FieldError {
            field,
            message: error.message,
        });
    }

    pub fn extend(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    pub fn fields(&self) -> Vec<FieldKey> {
        self.errors.iter().map(|err| err.field).collect()
    }

    pub fn message_for(&self, field: FieldKey) -> Option<&str> {
        self.errors
            .iter()
            .find(|err| err.field == field)
            .map(|err| err.message.as_str())
    }

    /// `Ok(())` when nothing failed.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::catalog::BUDGETS;

    fn text(value: &str) -> FieldValue {
        FieldValue::from(value)
    }

    #[test]
    fn required_rejects_blank_text_and_unchecked_flags() {
        let rule = Validator::Required;
        assert_eq!(
            rule.validate("First name", &text("   ")).unwrap_err().message,
            "First name is required"
        );
        assert!(rule.validate("Consent", &FieldValue::from(false)).is_err());
        assert!(rule.validate("Consent", &FieldValue::from(true)).is_ok());
    }

    #[test]
    fn email_shape() {
        let rule = Validator::Email;
        assert!(rule.validate("Email", &text("jane@example.com")).is_ok());
        assert!(rule.validate("Email", &text("")).is_ok());
        for bad in ["jane", "jane@example", "ja ne@example.com", "@example.com"] {
            assert!(rule.validate("Email", &text(bad)).is_err(), "{bad} should fail");
        }
    }

    #[test]
    fn length_bounds_count_characters() {
        assert!(Validator::MaxLength(3).validate("Name", &text("Zoë")).is_ok());
        assert!(Validator::MaxLength(3).validate("Name", &text("Zoës")).is_err());
        assert!(Validator::MinLength(10).validate("Details", &text("too short")).is_err());
        assert!(Validator::MinLength(10).validate("Details", &text("")).is_ok());
    }

    #[test]
    fn max_length_message_names_the_limit() {
        let long = text(&"a".repeat(51));
        let err = Validator::MaxLength(50).validate("First name", &long).unwrap_err();
        assert_eq!(err.message, "First name must be less than 50 characters");
    }

    #[test]
    fn one_of_accepts_catalog_values_only() {
        let rule = Validator::OneOf(BUDGETS);
        assert!(rule.validate("Budget", &text("15k-30k")).is_ok());
        let err = rule.validate("Budget", &text("lots")).unwrap_err();
        assert!(err.message.starts_with("Select a valid budget"));
        assert_eq!(rule.normalize("Over $30,000"), ">30k");
        assert_eq!(rule.normalize("lots"), "lots");
    }

    #[test]
    fn custom_rules_run_on_any_value() {
        let rule = Validator::custom(|value| match value.as_text() {
            Some(t) if t.starts_with('+') => Ok(()),
            _ => Err("Use international format".into()),
        });
        assert!(rule.validate("Phone", &text("+13175550100")).is_ok());
        assert_eq!(
            rule.validate("Phone", &text("")).unwrap_err().message,
            "Use international format"
        );
    }

    #[test]
    fn collects_field_errors() {
        let mut errors = ValidationErrors::new();
        errors.push(FieldKey::Email, ValidationError::new("bad email"));
        errors.push(FieldKey::Phone, ValidationError::new("Phone number is required"));
        assert_eq!(errors.fields(), vec![FieldKey::Email, FieldKey::Phone]);
        assert_eq!(errors.message_for(FieldKey::Email), Some("bad email"));
        assert_eq!(
            errors.to_string(),
            "please check the following fields: email, phone"
        );
        assert!(errors.into_result().is_err());
        assert!(ValidationErrors::new().into_result().is_ok());
    }
}
