use tracing::debug;

use crate::{EvalError, Node, NodeKind, Record, RelOp, Value};

/// Evaluate a tree against a record.
///
/// Both children of every operator are evaluated before the connective is
/// applied; there is no short-circuiting, so an error anywhere in the tree
/// surfaces regardless of which branch decides the outcome.
///
/// # Errors
///
/// Returns [`EvalError`] if an operand is malformed, names a field missing
/// from the record, uses an unsupported relational operator, or orders
/// values of incompatible types.
pub fn evaluate(node: &Node, record: &Record) -> Result<bool, EvalError> {
    match node.kind() {
        NodeKind::Operand(text) => eval_operand(text, record),
        NodeKind::Operator { op, left, right } => {
            let left_result = evaluate(left, record)?;
            let right_result = evaluate(right, record)?;
            let result = op.apply(left_result, right_result);
            debug!(%op, left = left_result, right = right_result, result, "evaluated operator");
            Ok(result)
        }
    }
}

/// Split `"<field> <relop> <literal>"`. The literal is the remainder of the
/// text, so quoted literals containing spaces stay whole.
fn split_operand(text: &str) -> Option<(&str, &str, &str)> {
    let (field, rest) = text.trim().split_once(char::is_whitespace)?;
    let (operator, literal) = rest.trim_start().split_once(char::is_whitespace)?;
    Some((field, operator, literal.trim_start()))
}

fn eval_operand(text: &str, record: &Record) -> Result<bool, EvalError> {
    let (field, operator, literal) =
        split_operand(text).ok_or_else(|| EvalError::MalformedOperand {
            value: text.to_owned(),
        })?;

    let expected = Value::from_literal(literal);
    let actual = record.get(field).ok_or_else(|| EvalError::MissingField {
        field: field.to_owned(),
    })?;
    let op: RelOp = operator
        .parse()
        .map_err(|()| EvalError::UnsupportedOperator {
            operator: operator.to_owned(),
        })?;

    let result = match actual.compare(op, &expected) {
        Some(result) => result,
        // Equality across types is simply false; NaN orders as false.
        None if op == RelOp::Eq || (actual.is_number() && expected.is_number()) => false,
        None => {
            return Err(EvalError::TypeMismatch {
                field: field.to_owned(),
                operator: operator.to_owned(),
                literal: literal.to_owned(),
                found: actual.type_name(),
                expected: expected.type_name(),
            });
        }
    };
    debug!(field, %op, %actual, %expected, result, "evaluated operand");
    Ok(result)
}
