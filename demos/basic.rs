use ruleweave::{evaluate, parse_rule, Record};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ruleweave=info".into()),
        )
        .init();

    let rule = parse_rule("(age > 30 AND department = 'Sales') OR experience > 5")
        .expect("failed to parse rule");

    println!("{rule}");

    let record = Record::new()
        .set("age", 25_i64)
        .set("department", "Marketing")
        .set("experience", 7_i64);

    match evaluate(&rule, &record) {
        Ok(result) => println!("Result: {result}"),
        Err(err) => println!("Evaluation failed: {err}"),
    }
}
