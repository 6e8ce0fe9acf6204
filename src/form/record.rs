use serde_json::{Map, Value};

use super::schema::{FieldKey, FieldTypeError, FieldValue};

/// Single source of truth for every value the wizard collects.
///
/// Storage is a fixed array indexed by [`FieldKey`], so a record can never
/// gain or lose a field after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRecord {
    values: [FieldValue; FieldKey::COUNT],
}

impl Default for FormRecord {
    fn default() -> Self {
        Self {
            values: FieldKey::ALL.map(FieldKey::default_value),
        }
    }
}

impl FormRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces exactly one value. The value must match the field's shape.
    pub fn set_field(&mut self, key: FieldKey, value: FieldValue) -> Result<(), FieldTypeError> {
        if value.kind() != key.kind() {
            return Err(FieldTypeError {
                field: key,
                expected: key.kind(),
                found: value.kind(),
            });
        }
        self.values[key.index()] = value;
        Ok(())
    }

    pub fn set_text(&mut self, key: FieldKey, text: impl Into<String>) -> Result<(), FieldTypeError> {
        self.set_field(key, FieldValue::Text(text.into()))
    }

    pub fn set_consent(&mut self, consent: bool) {
        self.values[FieldKey::Consent.index()] = FieldValue::Flag(consent);
    }

    pub fn get(&self, key: FieldKey) -> &FieldValue {
        &self.values[key.index()]
    }

    /// Text content of a text field; `None` for the consent flag.
    pub fn text(&self, key: FieldKey) -> Option<&str> {
        self.get(key).as_text()
    }

    pub fn consent(&self) -> bool {
        self.get(FieldKey::Consent).as_flag().unwrap_or(false)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &FieldValue)> + '_ {
        FieldKey::ALL.iter().copied().zip(self.values.iter())
    }

    /// Wire-named JSON object of every field.
    pub fn to_payload(&self) -> Map<String, Value> {
        self.iter()
            .map(|(key, value)| {
                let json = match value {
                    FieldValue::Text(text) => Value::String(text.trim().to_string()),
                    FieldValue::Flag(flag) => Value::Bool(*flag),
                };
                (key.wire_name().to_string(), json)
            })
            .collect()
    }
}
