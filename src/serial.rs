//! Binary serialization and deserialization of rule trees.
//!
//! This module provides a stable binary format for persisting a
//! [`RuleBook`](crate::RuleBook) or a single [`Node`] tree. The format
//! consists of a 32-byte fixed header followed by a bincode-encoded payload.
//!
//! ## Wire Format
//!
//! ```text
//! Offset  Size  Field
//! 0       4     Magic bytes: b"RWAS"
//! 4       2     Format version (u16, little-endian)
//! 6       2     Engine version (u16, little-endian)
//! 8       4     Flags (u32, reserved)
//! 12      4     Payload length in bytes (u32, little-endian)
//! 16      16    BLAKE3 hash of the payload (truncated to 16 bytes)
//! 32..    var   Bincode-encoded payload
//! ```
//!
//! ## Payload
//!
//! The payload is a flat node table in bottom-up order: every operator row
//! refers to its children by row index, and those rows always come first.
//! Subtrees shared between stored trees are written once. A separate list
//! names the row at the top of each stored tree, in creation order.
//!
//! ## Versioning
//!
//! The format version in the header must match exactly. If it does not,
//! deserialization fails immediately with [`DeserializeError::IncompatibleVersion`].
//! The engine version is informational only.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{LogicalOp, Node, NodeKind};

const MAGIC: &[u8; 4] = b"RWAS";
const FORMAT_VERSION: u16 = 1;
const ENGINE_VERSION: u16 = 1;
const HEADER_SIZE: usize = 32;

/// Errors that can occur when serializing rule trees to bytes.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("failed to encode rule trees: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("I/O error during serialization: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur when deserializing rule trees from bytes.
#[derive(Debug, Error)]
pub enum DeserializeError {
    #[error("not a ruleweave binary: invalid magic bytes")]
    BadMagic,

    #[error("incompatible format version: blob is v{blob}, engine supports v{supported}")]
    IncompatibleVersion { blob: u16, supported: u16 },

    #[error("integrity check failed: BLAKE3 checksum mismatch")]
    ChecksumMismatch,

    #[error("payload length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: u32, actual: usize },

    #[error("failed to decode payload: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("I/O error during deserialization: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializedBook {
    metadata: BookMetadata,
    nodes: Vec<SerializedNode>,
    trees: Vec<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct BookMetadata {
    node_count: usize,
    tree_count: usize,
    source_digest: Option<[u8; 32]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SerializedNode {
    kind: SerializedKind,
    is_root: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum SerializedKind {
    Operand(String),
    Operator {
        op: SerializedOp,
        left: u32,
        right: u32,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
enum SerializedOp {
    And,
    Or,
}

fn serialize_op(op: LogicalOp) -> SerializedOp {
    match op {
        LogicalOp::And => SerializedOp::And,
        LogicalOp::Or => SerializedOp::Or,
    }
}

fn deserialize_op(op: SerializedOp) -> LogicalOp {
    match op {
        SerializedOp::And => LogicalOp::And,
        SerializedOp::Or => LogicalOp::Or,
    }
}

/// Builds the node table, keyed by node address so shared subtrees get a
/// single row.
#[derive(Default)]
struct TableBuilder {
    nodes: Vec<SerializedNode>,
    rows: HashMap<*const Node, u32>,
}

impl TableBuilder {
    #[allow(clippy::cast_possible_truncation)] // a table never exceeds u32::MAX rows
    fn push(&mut self, node: &Node) -> u32 {
        let key = std::ptr::from_ref(node);
        if let Some(&row) = self.rows.get(&key) {
            return row;
        }

        let kind = match node.kind() {
            NodeKind::Operand(text) => SerializedKind::Operand(text.clone()),
            NodeKind::Operator { op, left, right } => {
                let left = self.push(left);
                let right = self.push(right);
                SerializedKind::Operator {
                    op: serialize_op(*op),
                    left,
                    right,
                }
            }
        };

        let row = self.nodes.len() as u32;
        self.nodes.push(SerializedNode {
            kind,
            is_root: node.is_root(),
        });
        self.rows.insert(key, row);
        row
    }
}

fn trees_to_serialized<'a>(
    trees: impl IntoIterator<Item = &'a Node>,
    source_text: Option<&str>,
) -> SerializedBook {
    let source_digest = source_text.map(|s| *blake3::hash(s.as_bytes()).as_bytes());

    let mut table = TableBuilder::default();
    let trees: Vec<u32> = trees.into_iter().map(|t| table.push(t)).collect();

    SerializedBook {
        metadata: BookMetadata {
            node_count: table.nodes.len(),
            tree_count: trees.len(),
            source_digest,
        },
        nodes: table.nodes,
        trees,
    }
}

fn serialized_to_trees(ser: SerializedBook) -> Result<Vec<Arc<Node>>, DeserializeError> {
    validate(&ser)?;

    let mut built: Vec<Arc<Node>> = Vec::with_capacity(ser.nodes.len());
    for row in ser.nodes {
        let node = match row.kind {
            SerializedKind::Operand(text) => Node::operand(text),
            SerializedKind::Operator { op, left, right } => Node::operator(
                deserialize_op(op),
                Arc::clone(&built[left as usize]),
                Arc::clone(&built[right as usize]),
            ),
        };
        built.push(Arc::new(node.with_root_flag(row.is_root)));
    }

    Ok(ser
        .trees
        .iter()
        .map(|&row| Arc::clone(&built[row as usize]))
        .collect())
}

fn validate(ser: &SerializedBook) -> Result<(), DeserializeError> {
    let node_count = ser.nodes.len();

    if ser.metadata.node_count != node_count {
        return Err(DeserializeError::Validation(format!(
            "metadata says {} nodes but payload has {}",
            ser.metadata.node_count, node_count
        )));
    }
    if ser.metadata.tree_count != ser.trees.len() {
        return Err(DeserializeError::Validation(format!(
            "metadata says {} trees but payload has {}",
            ser.metadata.tree_count,
            ser.trees.len()
        )));
    }

    for (row, node) in ser.nodes.iter().enumerate() {
        validate_node(node, row)?;
    }

    for &tree in &ser.trees {
        if tree as usize >= node_count {
            return Err(DeserializeError::Validation(format!(
                "tree references row {tree} but only {node_count} nodes exist"
            )));
        }
    }

    Ok(())
}

fn validate_node(node: &SerializedNode, row: usize) -> Result<(), DeserializeError> {
    match &node.kind {
        SerializedKind::Operand(text) => {
            if text.split_whitespace().count() < 3 {
                return Err(DeserializeError::Validation(format!(
                    "row {row} holds malformed operand '{text}'"
                )));
            }
            Ok(())
        }
        SerializedKind::Operator { left, right, .. } => {
            for child in [*left, *right] {
                if child as usize >= row {
                    return Err(DeserializeError::Validation(format!(
                        "row {row} references row {child}, which is not built yet"
                    )));
                }
            }
            Ok(())
        }
    }
}

fn write_header(buf: &mut Vec<u8>, payload: &[u8]) {
    let hash = blake3::hash(payload);
    let hash_bytes = hash.as_bytes();

    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    buf.extend_from_slice(&ENGINE_VERSION.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes()); // flags (reserved)
    #[allow(clippy::cast_possible_truncation)] // payload will never exceed 4 GiB
    let payload_len = payload.len() as u32;
    buf.extend_from_slice(&payload_len.to_le_bytes());
    buf.extend_from_slice(&hash_bytes[..16]);
}

#[allow(clippy::cast_possible_truncation)] // HEADER_SIZE is 32, always fits in u32
fn read_header(bytes: &[u8]) -> Result<(u16, u32, [u8; 16]), DeserializeError> {
    if bytes.len() < HEADER_SIZE {
        return Err(DeserializeError::LengthMismatch {
            expected: HEADER_SIZE as u32,
            actual: bytes.len(),
        });
    }

    if &bytes[0..4] != MAGIC {
        return Err(DeserializeError::BadMagic);
    }

    let format_version = u16::from_le_bytes([bytes[4], bytes[5]]);
    // bytes[6..8] is engine_version, bytes[8..12] is flags
    let payload_len = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);

    let mut hash = [0u8; 16];
    hash.copy_from_slice(&bytes[16..32]);

    Ok((format_version, payload_len, hash))
}

pub(crate) fn encode<'a>(
    trees: impl IntoIterator<Item = &'a Node>,
    source_text: Option<&str>,
) -> Result<Vec<u8>, SerializeError> {
    let serialized = trees_to_serialized(trees, source_text);
    let payload = bincode::serde::encode_to_vec(&serialized, bincode::config::standard())?;

    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    write_header(&mut buf, &payload);
    buf.extend_from_slice(&payload);
    Ok(buf)
}

pub(crate) fn decode(bytes: &[u8]) -> Result<Vec<Arc<Node>>, DeserializeError> {
    let (format_version, payload_len, stored_hash) = read_header(bytes)?;

    if format_version != FORMAT_VERSION {
        return Err(DeserializeError::IncompatibleVersion {
            blob: format_version,
            supported: FORMAT_VERSION,
        });
    }

    let payload_start = HEADER_SIZE;
    let payload_end = payload_start + payload_len as usize;
    if bytes.len() < payload_end {
        return Err(DeserializeError::LengthMismatch {
            expected: payload_len,
            actual: bytes.len() - HEADER_SIZE,
        });
    }
    let payload = &bytes[payload_start..payload_end];

    let computed_hash = blake3::hash(payload);
    if computed_hash.as_bytes()[..16] != stored_hash {
        return Err(DeserializeError::ChecksumMismatch);
    }

    let (serialized, _): (SerializedBook, usize) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())?;

    serialized_to_trees(serialized)
}

impl Node {
    /// Serialize this tree to a byte vector.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError`] if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SerializeError> {
        encode([self], None)
    }

    /// Deserialize a tree previously produced by [`to_bytes`](Self::to_bytes).
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError`] on format, integrity, or validation
    /// failure, including a blob that holds anything but exactly one tree.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DeserializeError> {
        let mut trees = decode(bytes)?;
        if trees.len() != 1 {
            return Err(DeserializeError::Validation(format!(
                "expected a single tree, found {}",
                trees.len()
            )));
        }
        let tree = trees.remove(0);
        Ok(Arc::unwrap_or_clone(tree))
    }
}
