//! Request validation errors, keyed by field name.

use std::collections::BTreeMap;

use super::error_code::{self, ConduitErrorCode};

/// Field-level validation failures. Messages follow the binding-tag style
/// clients already parse: `{key: required}`, `{min: 8}`, `{max: 255}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("validation failed:{}", render(.fields))]
pub struct ValidationError {
    fields: BTreeMap<String, String>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the first failure for `field`; later failures for the same
    /// field are dropped.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn into_fields(self) -> BTreeMap<String, String> {
        self.fields
    }

    /// `Ok(())` when nothing was recorded, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn render(fields: &BTreeMap<String, String>) -> String {
    fields
        .iter()
        .map(|(field, message)| format!(" {field}={message}"))
        .collect()
}

impl ConduitErrorCode for ValidationError {
    fn error_code(&self) -> &'static str {
        error_code::VALIDATION_FAILED
    }
}
