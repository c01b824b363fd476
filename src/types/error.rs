use thiserror::Error;

/// Errors raised while walking a tree against a [`Record`](super::Record).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("invalid operand format: '{value}'")]
    MalformedOperand { value: String },

    #[error("field '{field}' not found in data")]
    MissingField { field: String },

    #[error("unsupported operator: '{operator}'")]
    UnsupportedOperator { operator: String },

    #[error("cannot compare field '{field}' ({found}) with {literal} ({expected}) using '{operator}'")]
    TypeMismatch {
        field: String,
        operator: String,
        literal: String,
        found: &'static str,
        expected: &'static str,
    },
}
