use thiserror::Error;

use strata_core::PipelineError;

use crate::namespaced::{NAMESPACE_MAX_LEN, NAMESPACE_MIN_LEN};

/// Errors raised while validating field values against a record schema.
///
/// All of these reject the pending mutation before it reaches storage and
/// are recoverable by caller correction.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A namespace string is empty or outside the allowed length bounds.
    #[error(
        "namespace length {length} outside [{NAMESPACE_MIN_LEN}, {NAMESPACE_MAX_LEN}]"
    )]
    NamespaceLength {
        /// Byte length of the offending namespace.
        length: usize,
    },

    /// A payload did not parse as JSON.
    #[error("invalid json payload")]
    InvalidJson(#[source] serde_json::Error),

    /// A required field was not set.
    #[error("missing required field '{field}'")]
    MissingRequired {
        /// Name of the missing field.
        field: String,
    },

    /// A text field violated its declared length bounds.
    #[error("field '{field}' length {length} outside [{min}, {max}]")]
    LengthOutOfRange {
        /// Name of the offending field.
        field: String,
        /// Byte length of the value.
        length: usize,
        /// Declared minimum (0 when unbounded).
        min: usize,
        /// Declared maximum (`usize::MAX` when unbounded).
        max: usize,
    },
}

impl From<SchemaError> for PipelineError {
    fn from(err: SchemaError) -> Self {
        PipelineError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_pipeline_validation_error() {
        let err: PipelineError = SchemaError::NamespaceLength { length: 2 }.into();
        assert!(matches!(err, PipelineError::Validation(_)));
        assert_eq!(err.to_string(), "validation error: namespace length 2 outside [5, 64]");
    }
}
