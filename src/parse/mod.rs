mod error;
mod lexer;
mod parser;

use tracing::trace;

use crate::Node;

pub use error::ParseError;
pub use lexer::tokenize;

/// Parse a rule string into an AST whose top node is flagged as root.
///
/// # Errors
///
/// Returns [`ParseError`] if the rule is empty, references an attribute
/// outside the whitelist, uses an unknown operator, or has unbalanced
/// parentheses.
pub fn parse_rule(input: &str) -> Result<Node, ParseError> {
    let tokens = tokenize(input);
    trace!(?tokens, "tokenized rule");
    let node = parser::Parser::new(&tokens).expression()?;
    Ok(node.into_root())
}
