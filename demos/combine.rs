use ruleweave::{RuleBook, Strategy};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ruleweave=debug".into()),
        )
        .init();

    let rules = "\
age > 30 AND department = 'Sales'
salary > 50000 AND experience > 5
department = 'HR' OR age < 25
";

    let mut book = RuleBook::new();
    for strategy in [Strategy::Pattern, Strategy::Sequential] {
        match book.combine_lines(rules, strategy) {
            Ok(Some(compiled)) => println!("{strategy:?}: {compiled}"),
            Ok(None) => println!("{strategy:?}: no rules given"),
            Err(err) => println!("{strategy:?}: {err}"),
        }
    }

    println!("{book}");

    let record = r#"{"age": 35, "department": "Sales", "salary": 60000, "experience": 8}"#;
    match book.evaluate_json(record) {
        Ok(result) => println!("Latest rule on {record}: {result}"),
        Err(err) => println!("Evaluation failed: {err}"),
    }
}
