//! Forms shown by the setup wizard.
//!
//! A [`Form`] describes one wizard step: a closed set of choices plus
//! optional text and boolean fields. Whatever renders it (the terminal
//! prompt in `cli`, or any other front-end) submits a [`FormInput`], which
//! is validated against the form before the wizard looks at it.

use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// Raw user input keyed by field name.
pub type FormInput = Map<String, Value>;

/// Error keys attached to a rendered form.
pub mod reason {
    /// Required field left empty.
    pub const REQUIRED: &str = "required";
    /// Value outside the presented enumeration.
    pub const INVALID_CHOICE: &str = "invalid_choice";
    /// Value of the wrong type.
    pub const INVALID_INPUT: &str = "invalid_input";
    /// Field not part of the form.
    pub const EXTRA_KEY: &str = "extra_key";
    /// The enumeration has nothing to choose from.
    pub const EMPTY_LIST: &str = "empty_list";
}

/// Key under which form-wide errors are reported.
pub const BASE_ERROR: &str = "base";

/// Closed enumeration of labels, each mapped to an opaque id.
///
/// Labels keep the order they were first inserted in. Inserting a label
/// twice keeps its position and replaces its id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChoiceSet {
    labels: Vec<String>,
    ids: HashMap<String, String>,
}

impl ChoiceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a choice; an existing label is overwritten.
    pub fn insert(&mut self, label: impl Into<String>, id: impl Into<String>) {
        let label = label.into();
        if self.ids.insert(label.clone(), id.into()).is_none() {
            self.labels.push(label);
        }
    }

    /// Id paired with a label.
    pub fn resolve(&self, label: &str) -> Option<&str> {
        self.ids.get(label).map(String::as_str)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.ids.contains_key(label)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<L: Into<String>, I: Into<String>> FromIterator<(L, I)> for ChoiceSet {
    fn from_iter<T: IntoIterator<Item = (L, I)>>(iter: T) -> Self {
        let mut choices = Self::new();
        for (label, id) in iter {
            choices.insert(label, id);
        }
        choices
    }
}

/// Kind of a form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// One of a closed set of labels.
    Select { options: Vec<String> },
    /// Free text.
    Text,
    /// Yes/no.
    Boolean,
}

/// A single form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub key: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl Field {
    pub fn select(key: &'static str, choices: &ChoiceSet, required: bool) -> Self {
        Self {
            key,
            kind: FieldKind::Select {
                options: choices.labels().to_vec(),
            },
            required,
        }
    }

    pub fn text(key: &'static str) -> Self {
        Self {
            key,
            kind: FieldKind::Text,
            required: false,
        }
    }

    pub fn boolean(key: &'static str) -> Self {
        Self {
            key,
            kind: FieldKind::Boolean,
            required: false,
        }
    }

    fn check(&self, value: &Value) -> Result<()> {
        let valid = match (&self.kind, value) {
            (FieldKind::Select { options }, Value::String(label)) => {
                if !options.contains(label) {
                    return Err(Error::validation(self.key, reason::INVALID_CHOICE));
                }
                true
            }
            (FieldKind::Text, Value::String(_)) => true,
            (FieldKind::Boolean, Value::Bool(_)) => true,
            _ => false,
        };

        if valid {
            Ok(())
        } else {
            Err(Error::validation(self.key, reason::INVALID_INPUT))
        }
    }
}

/// A wizard step as it should be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Form {
    /// Id of the step this form belongs to.
    pub step_id: &'static str,
    pub fields: Vec<Field>,
    /// Errors keyed by field name, or [`BASE_ERROR`] for form-wide ones.
    pub errors: BTreeMap<String, String>,
}

impl Form {
    pub fn new(step_id: &'static str, fields: Vec<Field>) -> Self {
        Self {
            step_id,
            fields,
            errors: BTreeMap::new(),
        }
    }

    /// Attach an error to a field.
    pub fn with_error(mut self, field: impl Into<String>, reason: impl Into<String>) -> Self {
        self.errors.insert(field.into(), reason.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.key == key)
    }

    /// Validate input against this form.
    ///
    /// Null values count as absent and are dropped from the returned input.
    /// Fails with [`Error::Validation`] on the first offending field.
    pub fn validate(&self, input: FormInput) -> Result<FormInput> {
        let input: FormInput = input
            .into_iter()
            .filter(|(_, value)| !value.is_null())
            .collect();

        if let Some(key) = input.keys().find(|key| self.field(key).is_none()) {
            return Err(Error::validation(key.as_str(), reason::EXTRA_KEY));
        }

        for field in &self.fields {
            match input.get(field.key) {
                Some(value) => field.check(value)?,
                None if field.required => {
                    return Err(Error::validation(field.key, reason::REQUIRED));
                }
                None => {}
            }
        }

        Ok(input)
    }
}
