//! Rejection types for field normalization and record assembly.

use cmm_model::Field;
use thiserror::Error;

/// A single field value that did not match its accepted grammar or vocabulary.
///
/// The reason is written for the end user and includes an example of valid
/// input, so a caller can turn it straight into a clarifying question.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field} '{value}': {reason}")]
pub struct FieldRejection {
    pub field: Field,
    pub value: String,
    pub reason: String,
}

impl FieldRejection {
    pub fn new(field: Field, value: &str, reason: impl Into<String>) -> Self {
        Self {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// The record was not assembled because one or more fields were rejected.
///
/// Holds every rejection found in the pass, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("record rejected: {}", summarize(.rejections))]
pub struct AssemblyError {
    pub rejections: Vec<FieldRejection>,
}

impl AssemblyError {
    pub fn new(rejections: Vec<FieldRejection>) -> Self {
        Self { rejections }
    }

    /// Fields that were rejected.
    pub fn fields(&self) -> Vec<Field> {
        self.rejections.iter().map(|rejection| rejection.field).collect()
    }

    /// Whether a specific field was among the rejections.
    pub fn rejected(&self, field: Field) -> bool {
        self.rejections.iter().any(|rejection| rejection.field == field)
    }
}

fn summarize(rejections: &[FieldRejection]) -> String {
    rejections
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_display() {
        let rejection = FieldRejection::new(Field::Flow, "sideways", "use 'in', 'out' or '-'");
        assert_eq!(
            rejection.to_string(),
            "invalid flow 'sideways': use 'in', 'out' or '-'"
        );
    }

    #[test]
    fn test_assembly_error_lists_all_fields() {
        let error = AssemblyError::new(vec![
            FieldRejection::new(Field::Process, "move", "x"),
            FieldRejection::new(Field::Dimension, "100X100X6", "y"),
        ]);
        assert_eq!(error.fields(), vec![Field::Process, Field::Dimension]);
        assert!(error.rejected(Field::Dimension));
        assert!(!error.rejected(Field::Family));
        assert_eq!(
            error.to_string(),
            "record rejected: invalid process 'move': x; invalid dimension '100X100X6': y"
        );
    }
}
