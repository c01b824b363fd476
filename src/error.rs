use thiserror::Error;

use crate::parse::ParseError;
use crate::{EvalError, RecordError};

/// Unified error type covering parsing, record decoding, evaluation and I/O.
///
/// Returned by the [`RuleBook`](crate::RuleBook) entry points, which run
/// several stages and let callers turn any failure into a single message.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("no rule available for evaluation")]
    NoRule,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "binary-cache")]
    #[error(transparent)]
    Serialize(#[from] crate::serial::SerializeError),

    #[cfg(feature = "binary-cache")]
    #[error(transparent)]
    Deserialize(#[from] crate::serial::DeserializeError),
}
