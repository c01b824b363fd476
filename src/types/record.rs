use std::collections::HashMap;

use thiserror::Error;

use super::Value;

/// Errors produced while decoding a record from JSON.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("malformed record: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("record must be a JSON object")]
    NotAnObject,

    #[error("unsupported value for field '{0}': expected a number, string or boolean")]
    UnsupportedValue(String),
}

/// Data record mapping field names to [`Value`]s.
///
/// Field names are flat; there is no nested path lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    data: HashMap<String, Value>,
}

impl Record {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, returning the record for chaining.
    #[must_use]
    pub fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.insert(field, value.into());
        self
    }

    /// Insert a field (mutable reference version).
    pub fn insert(&mut self, field: &str, value: Value) {
        self.data.insert(field.to_owned(), value);
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.data.contains_key(field)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Decode a record from a JSON object such as `{"age": 35, "department": "Sales"}`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] if the input is not valid JSON, is not an
    /// object, or holds a null, array or object field value.
    pub fn from_json(input: &str) -> Result<Self, RecordError> {
        let doc: serde_json::Value = serde_json::from_str(input)?;
        let serde_json::Value::Object(map) = doc else {
            return Err(RecordError::NotAnObject);
        };

        let mut record = Record::new();
        for (field, raw) in map {
            let value = match raw {
                serde_json::Value::Bool(b) => Value::Bool(b),
                serde_json::Value::String(s) => Value::String(s),
                serde_json::Value::Number(n) => match n.as_i64() {
                    Some(i) => Value::Int(i),
                    None => match n.as_f64() {
                        Some(f) => Value::Float(f),
                        None => return Err(RecordError::UnsupportedValue(field)),
                    },
                },
                serde_json::Value::Null
                | serde_json::Value::Array(_)
                | serde_json::Value::Object(_) => {
                    return Err(RecordError::UnsupportedValue(field));
                }
            };
            record.data.insert(field, value);
        }
        Ok(record)
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            data: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
