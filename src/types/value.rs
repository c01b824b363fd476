use std::cmp::Ordering;
use std::fmt;

use super::node::RelOp;

/// Values held by a [`Record`](super::Record) or produced from a comparison literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A boolean value.
    Bool(bool),
    /// A UTF-8 string.
    String(String),
}

impl Value {
    /// Coerce the literal part of a comparison.
    ///
    /// Integers win over floats; anything that is neither becomes a string
    /// with one layer of matching `'` or `"` quotes removed.
    #[must_use]
    pub fn from_literal(literal: &str) -> Value {
        if let Ok(i) = literal.parse::<i64>() {
            return Value::Int(i);
        }
        if let Ok(f) = literal.parse::<f64>() {
            return Value::Float(f);
        }
        Value::String(strip_quotes(literal).to_owned())
    }

    /// Compare this value to another using the given operator.
    /// Returns `None` for incompatible types.
    #[must_use]
    pub fn compare(&self, op: RelOp, other: &Value) -> Option<bool> {
        let ord = self.partial_cmp_value(other)?;
        Some(match op {
            RelOp::Eq => ord == Ordering::Equal,
            RelOp::Gt => ord == Ordering::Greater,
            RelOp::Lt => ord == Ordering::Less,
        })
    }

    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Name of the variant, for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::String(_) => "string",
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn partial_cmp_value(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

fn strip_quotes(literal: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = literal
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    literal
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "'{v}'"),
        }
    }
}
