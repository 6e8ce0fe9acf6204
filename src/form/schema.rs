use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every field the quote request collects. The set is closed: values outside
/// this enumeration can never reach a [`FormRecord`](super::FormRecord).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKey {
    FirstName,
    LastName,
    Email,
    Phone,
    Address,
    ServiceType,
    ProjectDescription,
    Budget,
    Timeline,
    HearAbout,
    Consent,
}

impl FieldKey {
    pub const COUNT: usize = 11;

    pub const ALL: [FieldKey; FieldKey::COUNT] = [
        FieldKey::FirstName,
        FieldKey::LastName,
        FieldKey::Email,
        FieldKey::Phone,
        FieldKey::Address,
        FieldKey::ServiceType,
        FieldKey::ProjectDescription,
        FieldKey::Budget,
        FieldKey::Timeline,
        FieldKey::HearAbout,
        FieldKey::Consent,
    ];

    /// Position of the key inside [`FieldKey::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Name used in the submission payload.
    pub fn wire_name(self) -> &'static str {
        match self {
            FieldKey::FirstName => "firstName",
            FieldKey::LastName => "lastName",
            FieldKey::Email => "email",
            FieldKey::Phone => "phone",
            FieldKey::Address => "address",
            FieldKey::ServiceType => "serviceType",
            FieldKey::ProjectDescription => "projectDescription",
            FieldKey::Budget => "budget",
            FieldKey::Timeline => "timeline",
            FieldKey::HearAbout => "hearAbout",
            FieldKey::Consent => "consent",
        }
    }

    pub fn snake_name(self) -> &'static str {
        match self {
            FieldKey::FirstName => "first_name",
            FieldKey::LastName => "last_name",
            FieldKey::Email => "email",
            FieldKey::Phone => "phone",
            FieldKey::Address => "address",
            FieldKey::ServiceType => "service_type",
            FieldKey::ProjectDescription => "project_description",
            FieldKey::Budget => "budget",
            FieldKey::Timeline => "timeline",
            FieldKey::HearAbout => "hear_about",
            FieldKey::Consent => "consent",
        }
    }

    /// Default human-facing label.
    pub fn label(self) -> &'static str {
        match self {
            FieldKey::FirstName => "First name",
            FieldKey::LastName => "Last name",
            FieldKey::Email => "Email address",
            FieldKey::Phone => "Phone number",
            FieldKey::Address => "Project address",
            FieldKey::ServiceType => "Service type",
            FieldKey::ProjectDescription => "Project description",
            FieldKey::Budget => "Estimated budget",
            FieldKey::Timeline => "Desired timeline",
            FieldKey::HearAbout => "How did you hear about us?",
            FieldKey::Consent => "Consent to be contacted",
        }
    }

    pub fn kind(self) -> ValueKind {
        match self {
            FieldKey::Consent => ValueKind::Flag,
            _ => ValueKind::Text,
        }
    }

    pub fn default_value(self) -> FieldValue {
        match self.kind() {
            ValueKind::Text => FieldValue::Text(String::new()),
            ValueKind::Flag => FieldValue::Flag(false),
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown field `{0}`")]
pub struct UnknownFieldError(pub String);

impl FromStr for FieldKey {
    type Err = UnknownFieldError;

    /// Accepts the wire name (`firstName`) or the snake-case name
    /// (`first_name`), ignoring ASCII case.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let needle = input.trim();
        FieldKey::ALL
            .iter()
            .copied()
            .find(|key| {
                key.wire_name().eq_ignore_ascii_case(needle)
                    || key.snake_name().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| UnknownFieldError(needle.to_string()))
    }
}

/// Shape of a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    Text,
    Flag,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Text => f.write_str("text"),
            ValueKind::Flag => f.write_str("boolean"),
        }
    }
}

/// A single stored value. Serializes as a bare JSON string or boolean.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

impl FieldValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            FieldValue::Text(_) => ValueKind::Text,
            FieldValue::Flag(_) => ValueKind::Flag,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::Flag(_) => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(flag) => Some(*flag),
            FieldValue::Text(_) => None,
        }
    }

    /// Empty (after trimming) text, or an unchecked flag.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Flag(flag) => !flag,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

/// Raised when a value of the wrong shape is assigned to a field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field `{field}` holds {expected} values, got {found}")]
pub struct FieldTypeError {
    pub field: FieldKey,
    pub expected: ValueKind,
    pub found: ValueKind,
}
