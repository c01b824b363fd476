//! Compile boolean eligibility rules such as
//! `age > 30 AND department = 'Sales'` into ASTs, merge several rules into
//! one tree, and evaluate trees against records of field values.
//!
//! ```
//! use ruleweave::{evaluate, parse_rule, Record};
//!
//! let rule = parse_rule("(age > 30 AND department = 'Sales') OR experience > 5").unwrap();
//! let record = Record::new()
//!     .set("age", 20_i64)
//!     .set("department", "HR")
//!     .set("experience", 10_i64);
//! assert!(evaluate(&rule, &record).unwrap());
//! ```

mod combine;
mod error;
mod evaluate;
pub mod parse;
mod render;
mod rulebook;
#[cfg(feature = "binary-cache")]
mod serial;
mod types;

pub use combine::{combine_by_pattern, combine_sequential, most_frequent_operator};
pub use error::RuleError;
pub use evaluate::evaluate;
pub use parse::{parse_rule, tokenize, ParseError};
pub use render::render;
pub use rulebook::{Compiled, RuleBook, Strategy};
#[cfg(feature = "binary-cache")]
pub use serial::{DeserializeError, SerializeError};
pub use types::{
    EvalError, LogicalOp, Node, NodeKind, Record, RecordError, RelOp, Value, ATTRIBUTES,
    LOGICAL_OPERATORS, RELATIONAL_OPERATORS,
};
