use crate::types::{ATTRIBUTES, RELATIONAL_OPERATORS};
use crate::{LogicalOp, Node};

use super::ParseError;

/// Recursive-descent parser over a token slice.
///
/// The token list is never mutated; progress is tracked by `pos`, so the
/// same tokens can be parsed again by a fresh cursor.
#[derive(Debug)]
pub(crate) struct Parser<'t> {
    tokens: &'t [String],
    pos: usize,
}

impl<'t> Parser<'t> {
    pub(crate) fn new(tokens: &'t [String]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&'t str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    fn advance(&mut self) -> Option<&'t str> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    /// `expr := atom ((AND|OR) atom)*`, folded left to right.
    pub(crate) fn expression(&mut self) -> Result<Node, ParseError> {
        let mut node = self.atom()?.ok_or(ParseError::EmptyRule)?;
        while let Some(token) = self.advance() {
            let op: LogicalOp = token
                .parse()
                .map_err(|()| ParseError::InvalidLogicalOperator(token.to_owned()))?;
            let right = self.atom()?.ok_or(ParseError::MissingOperand(op))?;
            node = Node::operator(op, node, right);
        }
        Ok(node)
    }

    /// `atom := '(' atom (AND|OR) atom ')' | attribute relop literal`.
    ///
    /// Returns `None` only when the tokens are exhausted.
    fn atom(&mut self) -> Result<Option<Node>, ParseError> {
        let Some(token) = self.advance() else {
            return Ok(None);
        };

        if token == "(" {
            return self.group().map(Some);
        }

        if !ATTRIBUTES.contains(&token) {
            return Err(ParseError::InvalidComparison(token.to_owned()));
        }
        let operator = self.advance().ok_or(ParseError::IncompleteComparison)?;
        if !RELATIONAL_OPERATORS.contains(&operator) {
            return Err(ParseError::InvalidComparisonOperator(operator.to_owned()));
        }
        let literal = self.advance().ok_or(ParseError::MissingValue)?;
        Ok(Some(Node::operand(format!("{token} {operator} {literal}"))))
    }

    /// Body of a parenthesized pair; the `(` is already consumed.
    fn group(&mut self) -> Result<Node, ParseError> {
        let left = self.atom()?;
        let op_token = self.advance().ok_or(ParseError::MissingOperator)?;
        let op: LogicalOp = op_token
            .parse()
            .map_err(|()| ParseError::InvalidOperator(op_token.to_owned()))?;
        let right = self.atom()?;
        if self.peek() != Some(")") {
            return Err(ParseError::MismatchedParentheses);
        }
        self.pos += 1;
        // An absent side means the tokens ran out, which the checks above
        // already reported; this only satisfies the types.
        let (Some(left), Some(right)) = (left, right) else {
            return Err(ParseError::MismatchedParentheses);
        };
        Ok(Node::operator(op, left, right))
    }
}
