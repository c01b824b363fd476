use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    combine_by_pattern, combine_sequential, evaluate, parse_rule, render, EvalError, Node, Record,
    RuleError,
};

/// Which combination algorithm [`RuleBook::combine`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Recursive binary splitting, see [`combine_by_pattern`].
    #[default]
    Pattern,
    /// Left fold with shallow duplicate skipping, see [`combine_sequential`].
    Sequential,
}

/// A stored tree together with its rendered text.
#[derive(Debug, Clone)]
pub struct Compiled {
    tree: Arc<Node>,
    rendered: String,
}

impl Compiled {
    fn new(tree: Arc<Node>) -> Self {
        let rendered = render(Some(&tree));
        Self { tree, rendered }
    }

    #[must_use]
    pub fn tree(&self) -> &Arc<Node> {
        &self.tree
    }

    /// The fully parenthesized form of the tree.
    #[must_use]
    pub fn rendered(&self) -> &str {
        &self.rendered
    }

    /// Evaluate this tree against a record.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError`] on any evaluation failure.
    pub fn evaluate(&self, record: &Record) -> Result<bool, EvalError> {
        evaluate(&self.tree, record)
    }
}

impl fmt::Display for Compiled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

/// In-memory collection of compiled rules, in creation order.
///
/// Mirrors the entry points of a rule service: submit one rule, combine
/// several, and evaluate a record against the most recently stored tree.
/// A failed submission stores nothing. The book is never cleared
/// implicitly; call [`clear`](Self::clear) for maintenance.
///
/// # Example
///
/// ```
/// use ruleweave::{RuleBook, Strategy};
///
/// let mut book = RuleBook::new();
/// book.submit("age > 30").unwrap();
/// let combined = book
///     .combine(&["age > 30", "department = 'Sales'"], Strategy::Pattern)
///     .unwrap()
///     .unwrap();
/// assert_eq!(combined.rendered(), "(age > 30 OR department = 'Sales')");
/// assert!(book.evaluate_json(r#"{"age": 20, "department": "Sales"}"#).unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleBook {
    trees: Vec<Arc<Node>>,
}

impl RuleBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a rule and store its tree.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::Parse`] if the rule is invalid.
    pub fn submit(&mut self, rule: &str) -> Result<Compiled, RuleError> {
        let tree = Arc::new(parse_rule(rule)?);
        let compiled = Compiled::new(Arc::clone(&tree));
        info!(rule = %compiled, "stored rule");
        self.trees.push(tree);
        Ok(compiled)
    }

    /// Combine several rules into one stored tree.
    ///
    /// Entries are trimmed and blank ones ignored. Returns `Ok(None)`, and
    /// stores nothing, when no entries remain.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::Parse`] if any rule is invalid.
    pub fn combine<S: AsRef<str>>(
        &mut self,
        rules: &[S],
        strategy: Strategy,
    ) -> Result<Option<Compiled>, RuleError> {
        let rules: Vec<&str> = rules
            .iter()
            .map(|r| r.as_ref().trim())
            .filter(|r| !r.is_empty())
            .collect();

        let tree = match strategy {
            Strategy::Pattern => combine_by_pattern(&rules)?,
            Strategy::Sequential => combine_sequential(&rules)?,
        };
        let Some(tree) = tree else {
            return Ok(None);
        };

        let compiled = Compiled::new(Arc::new(tree));
        info!(?strategy, rules = rules.len(), combined = %compiled, "stored combined rule");
        self.trees.push(Arc::clone(&compiled.tree));
        Ok(Some(compiled))
    }

    /// Combine rules given one per line.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::Parse`] if any rule is invalid.
    pub fn combine_lines(
        &mut self,
        text: &str,
        strategy: Strategy,
    ) -> Result<Option<Compiled>, RuleError> {
        let lines: Vec<&str> = text.lines().collect();
        self.combine(&lines, strategy)
    }

    /// Evaluate a record against the most recently stored tree.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::NoRule`] if nothing is stored, or
    /// [`RuleError::Eval`] if evaluation fails.
    pub fn evaluate(&self, record: &Record) -> Result<bool, RuleError> {
        let tree = self.latest().ok_or(RuleError::NoRule)?;
        let result = evaluate(tree, record)?;
        debug!(rule = %tree, result, "evaluated latest rule");
        Ok(result)
    }

    /// Decode a JSON object and evaluate it against the latest tree.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::Record`] for malformed input, then the errors of
    /// [`evaluate`](Self::evaluate).
    pub fn evaluate_json(&self, json: &str) -> Result<bool, RuleError> {
        let record = Record::from_json(json)?;
        self.evaluate(&record)
    }

    /// The most recently stored tree, whether or not it is a root.
    #[must_use]
    pub fn latest(&self) -> Option<&Arc<Node>> {
        self.trees.last()
    }

    /// Every stored tree, in creation order.
    #[must_use]
    pub fn trees(&self) -> &[Arc<Node>] {
        &self.trees
    }

    /// Stored trees whose top node carries the root flag.
    pub fn roots(&self) -> impl Iterator<Item = &Arc<Node>> {
        self.trees.iter().filter(|t| t.is_root())
    }

    /// Stored trees whose top node is an operator.
    pub fn combined(&self) -> impl Iterator<Item = &Arc<Node>> {
        self.trees.iter().filter(|t| t.is_operator())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Drop every stored tree.
    pub fn clear(&mut self) {
        debug!(trees = self.trees.len(), "clearing rule book");
        self.trees.clear();
    }

    /// Read a file with one rule per line and submit each non-blank line.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::Io`] if the file cannot be read, or the first
    /// [`RuleError::Parse`] raised by a line.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, RuleError> {
        let input = std::fs::read_to_string(path)?;
        let mut book = Self::new();
        for line in input.lines().map(str::trim).filter(|l| !l.is_empty()) {
            book.submit(line)?;
        }
        Ok(book)
    }
}

#[cfg(feature = "binary-cache")]
impl RuleBook {
    /// Serialize every stored tree to a byte vector.
    ///
    /// The optional `source_text` is hashed (BLAKE3) and embedded in the
    /// payload metadata.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError`](crate::SerializeError) if encoding fails.
    pub fn to_bytes(&self, source_text: Option<&str>) -> Result<Vec<u8>, crate::SerializeError> {
        crate::serial::encode(self.trees.iter().map(|t| &**t), source_text)
    }

    /// Rebuild a rule book from bytes produced by [`to_bytes`](Self::to_bytes).
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError`](crate::DeserializeError) on format,
    /// integrity, or validation failure.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, crate::DeserializeError> {
        let trees = crate::serial::decode(bytes)?;
        debug!(trees = trees.len(), "loaded rule book from bytes");
        Ok(Self { trees })
    }

    /// Serialize the rule book and write it to a file.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError`](crate::SerializeError) on encoding or I/O
    /// failure.
    pub fn to_binary_file(
        &self,
        path: impl AsRef<std::path::Path>,
        source_text: Option<&str>,
    ) -> Result<(), crate::SerializeError> {
        let bytes = self.to_bytes(source_text)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Read a file and rebuild the rule book it contains.
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError`](crate::DeserializeError) on I/O, format,
    /// integrity, or validation failure.
    pub fn from_binary_file(
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, crate::DeserializeError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Display for RuleBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tree) in self.trees.iter().enumerate() {
            let marker = if tree.is_root() { " (root)" } else { "" };
            writeln!(f, "{i}: {tree}{marker}")?;
        }
        Ok(())
    }
}
