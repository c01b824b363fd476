use crate::Node;

/// Render a tree as a fully parenthesized rule string.
///
/// Every operator gets its own pair of parentheses, including the top one.
/// Parsing the output again yields the same tree, and rendering that tree
/// yields the same string. `None` renders as an empty string.
#[must_use]
pub fn render(node: Option<&Node>) -> String {
    node.map(Node::to_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_rule, LogicalOp};

    #[test]
    fn render_none_is_empty() {
        assert_eq!(render(None), "");
    }

    #[test]
    fn render_operand_is_its_value() {
        let node = Node::operand("age > 30");
        assert_eq!(render(Some(&node)), "age > 30");
    }

    #[test]
    fn render_wraps_each_operator() {
        let node = Node::operator(
            LogicalOp::Or,
            Node::operator(
                LogicalOp::And,
                Node::operand("age > 30"),
                Node::operand("department = 'Sales'"),
            ),
            Node::operand("experience > 5"),
        );
        assert_eq!(
            render(Some(&node)),
            "((age > 30 AND department = 'Sales') OR experience > 5)"
        );
    }

    #[test]
    fn render_normalizes_whitespace() {
        let node = parse_rule("  age>30   AND(salary<5 OR experience=2)").unwrap();
        assert_eq!(
            render(Some(&node)),
            "(age > 30 AND (salary < 5 OR experience = 2))"
        );
    }

    #[test]
    fn rendered_rule_parses_back() {
        let node = parse_rule("age > 30 AND department = 'Sales' OR salary > 10").unwrap();
        let text = render(Some(&node));
        let reparsed = parse_rule(&text).unwrap();
        assert_eq!(render(Some(&reparsed)), text);
    }
}
