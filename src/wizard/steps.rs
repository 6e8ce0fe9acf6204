use std::collections::BTreeSet;

use thiserror::Error;

use crate::form::{
    CatalogOption, FieldKey, FieldValue, FormRecord, ValidationError, ValidationErrors, Validator,
};

/// Declarative description of a single field inside a step.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub key: FieldKey,
    pub label: &'static str,
    pub required: bool,
    pub help: Option<&'static str>,
    pub validators: Vec<Validator>,
}

impl FieldRule {
    pub fn new(key: FieldKey) -> Self {
        Self {
            key,
            label: key.label(),
            required: false,
            help: None,
            validators: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    pub fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// Required-ness first, then each validator in order; first failure wins.
    pub fn check(&self, value: &FieldValue) -> Result<(), ValidationError> {
        if self.required {
            Validator::Required.validate(self.label, value)?;
        }
        for validator in &self.validators {
            validator.validate(self.label, value)?;
        }
        Ok(())
    }

    /// Tightest `MaxLength` limit on the field, if any.
    pub fn max_length(&self) -> Option<usize> {
        self.validators
            .iter()
            .filter_map(|validator| match validator {
                Validator::MaxLength(max) => Some(*max),
                _ => None,
            })
            .min()
    }

    pub fn choices(&self) -> Option<&'static [CatalogOption]> {
        self.validators.iter().find_map(Validator::choices)
    }

    /// Canonicalizes raw input before it is stored, e.g. mapping a choice
    /// label onto its option value.
    pub fn normalize(&self, input: &str) -> String {
        self.validators
            .iter()
            .fold(input.to_string(), |current, validator| validator.normalize(&current))
    }
}

/// One screen's worth of fields.
#[derive(Debug, Clone)]
pub struct StepDefinition {
    position: usize,
    title: &'static str,
    fields: Vec<FieldRule>,
}

impl StepDefinition {
    /// The position is assigned when the step is added to a descriptor.
    pub fn new(title: &'static str) -> Self {
        Self {
            position: 0,
            title,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, rule: FieldRule) -> Self {
        self.fields.push(rule);
        self
    }

    /// 1-based.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn fields(&self) -> &[FieldRule] {
        &self.fields
    }

    pub fn collects(&self, key: FieldKey) -> bool {
        self.fields.iter().any(|rule| rule.key == key)
    }

    pub fn required_fields(&self) -> Vec<FieldKey> {
        self.fields
            .iter()
            .filter(|rule| rule.required)
            .map(|rule| rule.key)
            .collect()
    }

    pub fn validate(&self, record: &FormRecord) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for rule in &self.fields {
            if let Err(err) = rule.check(record.get(rule.key)) {
                errors.push(rule.key, err);
            }
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("wizard `{0}` has no steps")]
    NoSteps(&'static str),
    #[error("field `{field}` is collected by more than one step")]
    DuplicateField { field: FieldKey },
}

/// Ordered steps for one wizard flavour.
#[derive(Debug, Clone)]
pub struct WizardDescriptor {
    name: &'static str,
    steps: Vec<StepDefinition>,
}

impl WizardDescriptor {
    pub fn builder(name: &'static str) -> WizardDescriptorBuilder {
        WizardDescriptorBuilder {
            name,
            steps: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    /// Looks a step up by its 1-based position.
    pub fn step(&self, position: usize) -> Option<&StepDefinition> {
        position
            .checked_sub(1)
            .and_then(|index| self.steps.get(index))
    }

    pub fn rule_for(&self, key: FieldKey) -> Option<&FieldRule> {
        self.steps
            .iter()
            .flat_map(|step| step.fields.iter())
            .find(|rule| rule.key == key)
    }

    pub fn step_of(&self, key: FieldKey) -> Option<usize> {
        self.steps
            .iter()
            .find(|step| step.collects(key))
            .map(|step| step.position)
    }

    /// Validates every step, including ones the user never opened.
    pub fn validate_all(&self, record: &FormRecord) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for step in &self.steps {
            if let Err(step_errors) = step.validate(record) {
                errors.extend(step_errors);
            }
        }
        errors.into_result()
    }
}

pub struct WizardDescriptorBuilder {
    name: &'static str,
    steps: Vec<StepDefinition>,
}

impl WizardDescriptorBuilder {
    pub fn step(mut self, step: StepDefinition) -> Self {
        self.steps.push(step);
        self
    }

    pub fn build(self) -> Result<WizardDescriptor, DescriptorError> {
        if self.steps.is_empty() {
            return Err(DescriptorError::NoSteps(self.name));
        }

        let mut seen = BTreeSet::new();
        for rule in self.steps.iter().flat_map(|step| step.fields.iter()) {
            if !seen.insert(rule.key) {
                return Err(DescriptorError::DuplicateField { field: rule.key });
            }
        }

        let steps = self
            .steps
            .into_iter()
            .enumerate()
            .map(|(index, mut step)| {
                step.position = index + 1;
                step
            })
            .collect();

        Ok(WizardDescriptor {
            name: self.name,
            steps,
        })
    }
}
