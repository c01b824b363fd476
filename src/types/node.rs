use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Logical connectives joining two subtrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,
    Or,
}

/// Relational operators allowed inside a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelOp {
    Gt,
    Lt,
    Eq,
}

impl LogicalOp {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
        }
    }

    /// Combine two already-computed operand results.
    #[must_use]
    pub fn apply(self, left: bool, right: bool) -> bool {
        match self {
            LogicalOp::And => left && right,
            LogicalOp::Or => left || right,
        }
    }
}

impl RelOp {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RelOp::Gt => ">",
            RelOp::Lt => "<",
            RelOp::Eq => "=",
        }
    }
}

impl FromStr for LogicalOp {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AND" => Ok(LogicalOp::And),
            "OR" => Ok(LogicalOp::Or),
            _ => Err(()),
        }
    }
}

impl FromStr for RelOp {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ">" => Ok(RelOp::Gt),
            "<" => Ok(RelOp::Lt),
            "=" => Ok(RelOp::Eq),
            _ => Err(()),
        }
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The payload of a [`Node`].
///
/// Operands carry the normalized comparison text (`"<field> <relop> <literal>"`).
/// Operators always own exactly two children; subtrees are reference-counted
/// so combining rules links existing trees instead of copying them.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Operand(String),
    Operator {
        op: LogicalOp,
        left: Arc<Node>,
        right: Arc<Node>,
    },
}

/// A single AST node.
///
/// Nodes are immutable once built. The only flag set after construction is
/// `is_root`, applied by the parser to the topmost node of a rule before the
/// node is handed out.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    kind: NodeKind,
    is_root: bool,
}

impl Node {
    /// Build a leaf from its comparison text.
    #[must_use]
    pub fn operand(value: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Operand(value.into()),
            is_root: false,
        }
    }

    /// Build an internal node joining two subtrees.
    #[must_use]
    pub fn operator(op: LogicalOp, left: impl Into<Arc<Node>>, right: impl Into<Arc<Node>>) -> Self {
        Self {
            kind: NodeKind::Operator {
                op,
                left: left.into(),
                right: right.into(),
            },
            is_root: false,
        }
    }

    #[must_use]
    pub(crate) fn into_root(mut self) -> Self {
        self.is_root = true;
        self
    }

    #[cfg(feature = "binary-cache")]
    pub(crate) fn with_root_flag(mut self, is_root: bool) -> Self {
        self.is_root = is_root;
        self
    }

    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// The node's value string: the comparison text for an operand, `AND` or
    /// `OR` for an operator.
    #[must_use]
    pub fn value(&self) -> &str {
        match &self.kind {
            NodeKind::Operand(text) => text,
            NodeKind::Operator { op, .. } => op.as_str(),
        }
    }

    #[must_use]
    pub fn left(&self) -> Option<&Arc<Node>> {
        match &self.kind {
            NodeKind::Operator { left, .. } => Some(left),
            NodeKind::Operand(_) => None,
        }
    }

    #[must_use]
    pub fn right(&self) -> Option<&Arc<Node>> {
        match &self.kind {
            NodeKind::Operator { right, .. } => Some(right),
            NodeKind::Operand(_) => None,
        }
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.is_root
    }

    #[must_use]
    pub fn is_operand(&self) -> bool {
        matches!(self.kind, NodeKind::Operand(_))
    }

    #[must_use]
    pub fn is_operator(&self) -> bool {
        matches!(self.kind, NodeKind::Operator { .. })
    }

    /// Number of comparison leaves in this tree.
    #[must_use]
    pub fn operand_count(&self) -> usize {
        match &self.kind {
            NodeKind::Operand(_) => 1,
            NodeKind::Operator { left, right, .. } => left.operand_count() + right.operand_count(),
        }
    }

    /// Height of the tree; a lone operand has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        match &self.kind {
            NodeKind::Operand(_) => 1,
            NodeKind::Operator { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NodeKind::Operand(text) => f.write_str(text),
            NodeKind::Operator { op, left, right } => write!(f, "({left} {op} {right})"),
        }
    }
}
