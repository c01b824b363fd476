use thiserror::Error;

use crate::LogicalOp;

/// Errors produced when parsing a rule string.
///
/// Each variant is a distinct, stable failure kind so callers can match on
/// the cause rather than the message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("rule contains no tokens")]
    EmptyRule,

    #[error("invalid logical operator: {0}")]
    InvalidLogicalOperator(String),

    #[error("invalid operator: {0}")]
    InvalidOperator(String),

    #[error("invalid rule format: missing operator")]
    MissingOperator,

    #[error("invalid rule format: mismatched parentheses")]
    MismatchedParentheses,

    #[error("invalid comparison format: {0}")]
    InvalidComparison(String),

    #[error("invalid comparison format: missing operator or value")]
    IncompleteComparison,

    #[error("invalid operator in comparison: {0}")]
    InvalidComparisonOperator(String),

    #[error("invalid comparison format: missing value")]
    MissingValue,

    #[error("missing operand after {0}")]
    MissingOperand(LogicalOp),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ParseError::InvalidLogicalOperator("XOR".into());
        assert_eq!(err.to_string(), "invalid logical operator: XOR");
    }

    #[test]
    fn comparison_errors_name_the_token() {
        assert_eq!(
            ParseError::InvalidComparison("weight".into()).to_string(),
            "invalid comparison format: weight"
        );
        assert_eq!(
            ParseError::InvalidComparisonOperator(">>".into()).to_string(),
            "invalid operator in comparison: >>"
        );
    }

    #[test]
    fn missing_operand_names_the_connective() {
        let err = ParseError::MissingOperand(LogicalOp::And);
        assert_eq!(err.to_string(), "missing operand after AND");
    }
}
