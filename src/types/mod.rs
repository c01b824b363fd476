mod error;
mod node;
mod record;
mod value;

pub use error::EvalError;
pub use node::{LogicalOp, Node, NodeKind, RelOp};
pub use record::{Record, RecordError};
pub use value::Value;

/// Attributes a comparison may reference.
pub const ATTRIBUTES: [&str; 4] = ["age", "department", "salary", "experience"];

/// Relational operators accepted inside a comparison.
pub const RELATIONAL_OPERATORS: [&str; 3] = [">", "<", "="];

/// Logical operators joining comparisons.
pub const LOGICAL_OPERATORS: [&str; 2] = ["AND", "OR"];
