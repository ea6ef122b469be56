//! Error types for the schema mutation engine.

use stratadb_commons::{ColumnName, CommonError, ValueType};
use thiserror::Error;

/// Validation failure for a single `apply` call.
///
/// Every variant is fatal to its call and surfaced before any side effect;
/// an engine must never partially apply a schema change. Registry/log I/O
/// failures never appear here; the audit side-channel downgrades them to
/// best-effort outcomes instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// The operation is structurally illegal for this table (drop of a key
    /// part, add to a compact table, unknown column, ...).
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// An alter would narrow or cross type families.
    #[error("cannot change {column} from type {old} to type {new}: types are incompatible")]
    TypeIncompatible {
        column: ColumnName,
        old: ValueType,
        new: ValueType,
    },

    /// A rename batch covers only part of a legacy table's unaliased key
    /// components.
    #[error("ambiguous rename: {0}")]
    AmbiguousRename(String),

    /// A storage option failed its legality rules.
    #[error("invalid table options: {0}")]
    InvalidOptions(String),
}

impl From<CommonError> for SchemaError {
    fn from(err: CommonError) -> Self {
        SchemaError::InvalidOperation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_incompatible_names_both_types() {
        let err = SchemaError::TypeIncompatible {
            column: ColumnName::new("body"),
            old: ValueType::Text,
            new: ValueType::Int,
        };
        let msg = err.to_string();
        assert!(msg.contains("body"));
        assert!(msg.contains("text"));
        assert!(msg.contains("int"));
    }

    #[test]
    fn test_common_error_folds_into_invalid_operation() {
        let err: SchemaError = CommonError::invalid_input("component index 9").into();
        assert!(matches!(err, SchemaError::InvalidOperation(_)));
    }
}
