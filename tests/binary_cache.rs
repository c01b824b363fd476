#![cfg(feature = "binary-cache")]

use ruleweave::{DeserializeError, Node, Record, RuleBook, Strategy};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn simple_book() -> RuleBook {
    let mut book = RuleBook::new();
    book.submit("age > 30 AND department = 'Sales'").unwrap();
    book
}

fn complex_book() -> RuleBook {
    let mut book = RuleBook::new();
    book.submit("(age > 30 AND department = 'Sales') OR salary > 50000")
        .unwrap();
    book.submit("experience > 5").unwrap();
    book.combine(
        &[
            "age > 30 AND department = 'Sales'",
            "salary > 20000 OR experience > 2",
            "department = 'New York'",
            "age < 60",
            "experience = 10",
        ],
        Strategy::Pattern,
    )
    .unwrap();
    book.combine(&["age > 1", "age > 2", "age > 2"], Strategy::Sequential)
        .unwrap();
    book
}

fn eval_record() -> Record {
    Record::new()
        .set("age", 35_i64)
        .set("department", "Sales")
        .set("salary", 30_000_i64)
        .set("experience", 3_i64)
}

// ---------------------------------------------------------------------------
// Round-trips
// ---------------------------------------------------------------------------

#[test]
fn round_trip_simple() {
    let original = simple_book();
    let bytes = original.to_bytes(None).unwrap();
    let restored = RuleBook::from_bytes(&bytes).unwrap();

    assert_eq!(original.trees(), restored.trees());
    let record = eval_record();
    assert_eq!(
        original.evaluate(&record).unwrap(),
        restored.evaluate(&record).unwrap()
    );
}

#[test]
fn round_trip_with_source_digest() {
    let source = "age > 30 AND department = 'Sales'";
    let original = simple_book();
    let bytes = original.to_bytes(Some(source)).unwrap();
    let restored = RuleBook::from_bytes(&bytes).unwrap();
    assert_eq!(original.trees(), restored.trees());
}

#[test]
fn round_trip_complex() {
    let original = complex_book();
    let restored = RuleBook::from_bytes(&original.to_bytes(None).unwrap()).unwrap();

    assert_eq!(restored.len(), 4);
    assert_eq!(original.trees(), restored.trees());
    assert_eq!(restored.roots().count(), 2);
    assert_eq!(restored.combined().count(), 3);
    assert_eq!(original.to_string(), restored.to_string());

    let record = eval_record();
    for (a, b) in original.trees().iter().zip(restored.trees()) {
        assert_eq!(
            ruleweave::evaluate(a, &record),
            ruleweave::evaluate(b, &record)
        );
    }
}

#[test]
fn empty_book_round_trip() {
    let restored = RuleBook::from_bytes(&RuleBook::new().to_bytes(None).unwrap()).unwrap();
    assert!(restored.is_empty());
}

#[test]
fn single_tree_round_trip() {
    let tree = ruleweave::parse_rule("(age > 30 AND salary < 10) OR experience = 4").unwrap();
    let restored = Node::from_bytes(&tree.to_bytes().unwrap()).unwrap();
    assert_eq!(restored, tree);
    assert!(restored.is_root());
}

#[test]
fn book_blob_is_not_a_single_tree() {
    let bytes = complex_book().to_bytes(None).unwrap();
    assert!(matches!(
        Node::from_bytes(&bytes),
        Err(DeserializeError::Validation(_))
    ));
}

// ---------------------------------------------------------------------------
// Corruption: byte flip -> ChecksumMismatch
// ---------------------------------------------------------------------------

#[test]
fn corruption_byte_flip() {
    let bytes = simple_book().to_bytes(None).unwrap();
    let mut corrupted = bytes.clone();
    // Flip a byte in the payload area
    let last = corrupted.len() - 1;
    corrupted[last] ^= 0xFF;

    let err = RuleBook::from_bytes(&corrupted).unwrap_err();
    assert!(
        matches!(err, DeserializeError::ChecksumMismatch),
        "expected ChecksumMismatch, got: {err}"
    );
}

// ---------------------------------------------------------------------------
// Corruption: truncation -> LengthMismatch
// ---------------------------------------------------------------------------

#[test]
fn corruption_truncation() {
    let bytes = simple_book().to_bytes(None).unwrap();
    let truncated = &bytes[..33];

    let err = RuleBook::from_bytes(truncated).unwrap_err();
    assert!(
        matches!(err, DeserializeError::LengthMismatch { .. }),
        "expected LengthMismatch, got: {err}"
    );
}

#[test]
fn bad_magic() {
    let mut bad = simple_book().to_bytes(None).unwrap();
    bad[0..4].copy_from_slice(b"BAAD");

    let err = RuleBook::from_bytes(&bad).unwrap_err();
    assert!(
        matches!(err, DeserializeError::BadMagic),
        "expected BadMagic, got: {err}"
    );
}

#[test]
fn version_mismatch() {
    let mut bad = simple_book().to_bytes(None).unwrap();
    bad[4] = 99;
    bad[5] = 0;

    let err = RuleBook::from_bytes(&bad).unwrap_err();
    assert!(
        matches!(
            err,
            DeserializeError::IncompatibleVersion {
                blob: 99,
                supported: 1
            }
        ),
        "expected IncompatibleVersion, got: {err}"
    );
}

// ---------------------------------------------------------------------------
// File round-trip
// ---------------------------------------------------------------------------

#[test]
fn file_round_trip() {
    let dir = std::env::temp_dir().join("ruleweave_test_binary_cache");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("book.rwbin");

    let original = complex_book();
    original.to_binary_file(&path, None).unwrap();
    let restored = RuleBook::from_binary_file(&path).unwrap();
    assert_eq!(original.trees(), restored.trees());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_file_is_io_error() {
    let err = RuleBook::from_binary_file("/nonexistent/ruleweave/book.rwbin").unwrap_err();
    assert!(matches!(err, DeserializeError::Io(_)));
}
