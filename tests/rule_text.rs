use ruleweave::{
    combine_by_pattern, evaluate, most_frequent_operator, parse_rule, render, tokenize, EvalError,
    LogicalOp, ParseError, Record, RuleBook, RuleError, Strategy,
};

fn record() -> Record {
    Record::new()
        .set("age", 35_i64)
        .set("department", "Sales")
        .set("salary", 60_000_i64)
        .set("experience", 3_i64)
}

#[test]
fn parse_and_evaluate_conjunction() {
    let tree = parse_rule("age > 30 AND department = 'Sales'").unwrap();
    assert_eq!(tree.value(), "AND");
    assert!(tree.is_root());
    assert_eq!(tree.left().unwrap().value(), "age > 30");
    assert_eq!(tree.right().unwrap().value(), "department = 'Sales'");
    assert!(evaluate(&tree, &record()).unwrap());
}

#[test]
fn parenthesized_group_then_disjunction() {
    let rule = "(age > 30 AND department = 'Marketing') OR salary > 50000";
    let tree = parse_rule(rule).unwrap();
    assert_eq!(
        render(Some(&tree)),
        "((age > 30 AND department = 'Marketing') OR salary > 50000)"
    );
    assert!(evaluate(&tree, &record()).unwrap());

    let poorer = record().set("salary", 10_000_i64);
    assert!(!evaluate(&tree, &poorer).unwrap());
}

#[test]
fn mixed_connectives_fold_left() {
    let tree = parse_rule("age > 40 OR salary > 50000 AND experience > 5").unwrap();
    assert_eq!(
        tree.to_string(),
        "((age > 40 OR salary > 50000) AND experience > 5)"
    );
    // Left fold, not precedence: (false OR true) AND false.
    assert!(!evaluate(&tree, &record()).unwrap());
}

#[test]
fn tokens_ignore_spacing() {
    assert_eq!(
        tokenize("(age>30 AND salary<5)"),
        tokenize("( age > 30   AND salary < 5 )")
    );
}

#[test]
fn distinct_errors_for_malformed_rules() {
    assert_eq!(
        parse_rule("age >> 30").unwrap_err(),
        ParseError::InvalidComparisonOperator(">>".into())
    );
    assert_eq!(
        parse_rule("(age > 30 AND salary > 5").unwrap_err(),
        ParseError::MismatchedParentheses
    );
    assert_eq!(
        parse_rule("weight > 10").unwrap_err(),
        ParseError::InvalidComparison("weight".into())
    );
}

#[test]
fn error_messages_are_stable() {
    assert_eq!(
        parse_rule("weight > 10").unwrap_err().to_string(),
        "invalid comparison format: weight"
    );
    let err = evaluate(
        &parse_rule("salary > 1000").unwrap(),
        &Record::from_json(r#"{"age": 20}"#).unwrap(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        EvalError::MissingField {
            field: "salary".into()
        }
    );
}

#[test]
fn frequent_operator_examples() {
    assert_eq!(
        most_frequent_operator(&["a AND b", "c AND d", "e OR f"]),
        LogicalOp::And
    );
    assert_eq!(most_frequent_operator(&["age > 1", "age > 2"]), LogicalOp::Or);
}

#[test]
fn three_rule_pattern_shape() {
    let rules = ["age > 30", "salary > 50000", "experience > 5"];
    let tree = combine_by_pattern(&rules).unwrap().unwrap();
    assert_eq!(tree.value(), "OR");
    let left = tree.left().unwrap();
    assert_eq!(left.value(), "OR");
    assert!(left.left().unwrap().is_root());
    assert!(left.right().unwrap().is_root());
    assert!(tree.right().unwrap().is_root());
    assert!(!tree.is_root());
}

#[test]
fn rule_book_round() {
    let mut book = RuleBook::new();
    book.submit("age > 30 AND department = 'Sales'").unwrap();
    book.submit("experience > 5").unwrap();
    book.combine(
        &["age > 30 AND department = 'Sales'", "experience > 5"],
        Strategy::Sequential,
    )
    .unwrap();

    assert_eq!(book.len(), 3);
    assert_eq!(book.roots().count(), 2);
    assert!(book
        .evaluate_json(r#"{"age": 35, "department": "Sales", "experience": 6}"#)
        .unwrap());
    assert!(!book
        .evaluate_json(r#"{"age": 25, "department": "Sales", "experience": 1}"#)
        .unwrap());
}

#[test]
fn rule_book_from_file() {
    let dir = std::env::temp_dir().join("ruleweave_test_rules");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("rules.txt");
    std::fs::write(&path, "age > 30\n\n  salary > 1000  \n").unwrap();

    let book = RuleBook::from_file(&path).unwrap();
    assert_eq!(book.len(), 2);
    assert_eq!(book.latest().unwrap().value(), "salary > 1000");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn rule_book_from_missing_file() {
    let err = RuleBook::from_file("/nonexistent/ruleweave/rules.txt").unwrap_err();
    assert!(matches!(err, RuleError::Io(_)));
}
