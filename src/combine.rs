use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::debug;

use crate::types::RELATIONAL_OPERATORS;
use crate::{parse_rule, LogicalOp, Node, ParseError};

static CONNECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(AND|OR)\b").expect("connective pattern is valid"));

/// Pick the connective used to join combined rules.
///
/// Counts standalone `AND`/`OR` words across every rule. The higher count
/// wins, a tie goes to whichever appeared first, and `OR` is the default
/// when no rule contains either.
pub fn most_frequent_operator<S: AsRef<str>>(rules: &[S]) -> LogicalOp {
    let mut and_count = 0_usize;
    let mut or_count = 0_usize;
    let mut first_seen = None;

    for rule in rules {
        for found in CONNECTIVE.find_iter(rule.as_ref()) {
            let op = match found.as_str() {
                "AND" => {
                    and_count += 1;
                    LogicalOp::And
                }
                _ => {
                    or_count += 1;
                    LogicalOp::Or
                }
            };
            first_seen.get_or_insert(op);
        }
    }

    match and_count.cmp(&or_count) {
        std::cmp::Ordering::Greater => LogicalOp::And,
        std::cmp::Ordering::Less => LogicalOp::Or,
        std::cmp::Ordering::Equal => first_seen.unwrap_or(LogicalOp::Or),
    }
}

/// Combine rules by recursive binary splitting.
///
/// Up to five rules follow fixed shapes: `[a, b]`, `[[a, b], c]`,
/// `[[a, b], [c, d]]` and `[[[a, b], c], [d, e]]`. Longer lists split at
/// `(n + 1) / 2`. Every new node uses the connective chosen from the full
/// input list. Only the parsed rules carry the root flag; the joining
/// nodes do not.
///
/// Returns `Ok(None)` for an empty list.
///
/// # Errors
///
/// Returns the first [`ParseError`] raised by a constituent rule.
pub fn combine_by_pattern<S: AsRef<str>>(rules: &[S]) -> Result<Option<Node>, ParseError> {
    if rules.is_empty() {
        return Ok(None);
    }
    let op = most_frequent_operator(rules);
    debug!(rules = rules.len(), %op, "combining rules by pattern");
    split_and_join(rules, op).map(Some)
}

fn split_and_join<S: AsRef<str>>(rules: &[S], op: LogicalOp) -> Result<Node, ParseError> {
    let split = match rules.len() {
        1 => return parse_rule(rules[0].as_ref()),
        2 => 1,
        3 | 4 => 2,
        5 => 3,
        n => (n + 1) / 2,
    };
    let (head, tail) = rules.split_at(split);
    let left = split_and_join(head, op)?;
    let right = split_and_join(tail, op)?;
    Ok(Node::operator(op, left, right))
}

/// Combine rules by folding them left to right.
///
/// Every rule is parsed first. Each later tree is joined onto the
/// accumulated tree unless its top node's value was already joined, so the
/// check only looks at the top node: two different rules whose tops are
/// both `AND` count as duplicates. The first tree's value is never recorded.
///
/// Returns `Ok(None)` for an empty list.
///
/// # Errors
///
/// Returns the first [`ParseError`] raised by a constituent rule.
pub fn combine_sequential<S: AsRef<str>>(rules: &[S]) -> Result<Option<Node>, ParseError> {
    let trees = rules
        .iter()
        .map(|rule| parse_rule(rule.as_ref()).map(Arc::new))
        .collect::<Result<Vec<_>, _>>()?;

    let mut trees = trees.into_iter();
    let Some(first) = trees.next() else {
        return Ok(None);
    };

    let op = most_frequent_operator(rules);
    debug!(rules = rules.len(), %op, "combining rules sequentially");

    let mut seen: HashSet<String> = HashSet::new();
    let mut combined = first;
    for tree in trees {
        let value = tree.value();
        if seen.contains(value) || RELATIONAL_OPERATORS.contains(&value) {
            debug!(value, "skipping duplicate rule");
            continue;
        }
        seen.insert(value.to_owned());
        combined = Arc::new(Node::operator(op, combined, tree));
    }

    Ok(Some(Arc::unwrap_or_clone(combined)))
}
