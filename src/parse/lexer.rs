use winnow::combinator::alt;
use winnow::error::ModalResult;
use winnow::prelude::*;
use winnow::token::{any, one_of, take_till, take_while};

// -- Lexemes ----------------------------------------------------------------

fn word<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_').parse_next(input)
}

fn relop_run<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| matches!(c, '>' | '<' | '=')).parse_next(input)
}

fn paren<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    one_of(|c: char| c == '(' || c == ')')
        .take()
        .parse_next(input)
}

fn quoted<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    ('\'', take_till(0.., '\''), '\'').take().parse_next(input)
}

/// One step of the scanner: a token, or `None` for a character that starts
/// no token and is skipped.
fn lexeme<'i>(input: &mut &'i str) -> ModalResult<Option<&'i str>> {
    alt((
        word.map(Some),
        relop_run.map(Some),
        paren.map(Some),
        quoted.map(Some),
        any.value(None),
    ))
    .parse_next(input)
}

// -- Tokenizer --------------------------------------------------------------

/// Split a rule string into tokens.
///
/// Tokens are words (letters, digits, `_`, which covers `AND`/`OR`),
/// runs of `>`, `<` and `=`, parentheses, and single-quoted literals kept
/// with their quotes. Whitespace and any other character are dropped, so
/// this never fails; grammar checks belong to the parser.
#[must_use]
pub fn tokenize(input: &str) -> Vec<String> {
    let mut rest = input;
    let mut tokens = Vec::new();
    while let Ok(lexeme) = lexeme.parse_next(&mut rest) {
        if let Some(token) = lexeme {
            tokens.push(token.to_owned());
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_simple_comparison() {
        assert_eq!(tokenize("age > 30"), ["age", ">", "30"]);
    }

    #[test]
    fn tokenize_is_whitespace_insensitive() {
        assert_eq!(tokenize("age>30"), ["age", ">", "30"]);
        assert_eq!(tokenize("  age \t>\n 30  "), ["age", ">", "30"]);
    }

    #[test]
    fn tokenize_keeps_quotes_on_literals() {
        assert_eq!(
            tokenize("department = 'Sales'"),
            ["department", "=", "'Sales'"]
        );
    }

    #[test]
    fn tokenize_quoted_literal_with_space() {
        assert_eq!(
            tokenize("department = 'New York'"),
            ["department", "=", "'New York'"]
        );
    }

    #[test]
    fn tokenize_parentheses_and_keywords() {
        assert_eq!(
            tokenize("(age > 30 AND salary < 5)OR experience = 2"),
            ["(", "age", ">", "30", "AND", "salary", "<", "5", ")", "OR", "experience", "=", "2"]
        );
    }

    #[test]
    fn tokenize_groups_relop_runs() {
        assert_eq!(tokenize("age >> 30"), ["age", ">>", "30"]);
        assert_eq!(tokenize("age >= 30"), ["age", ">=", "30"]);
        assert_eq!(tokenize("age =<> 30"), ["age", "=<>", "30"]);
    }

    #[test]
    fn tokenize_drops_unrecognized_characters() {
        assert_eq!(tokenize("age > 30; !"), ["age", ">", "30"]);
        assert_eq!(tokenize("salary > 2.5"), ["salary", ">", "2", "5"]);
    }

    #[test]
    fn tokenize_unterminated_quote_drops_the_quote() {
        assert_eq!(tokenize("department = 'Sales"), ["department", "=", "Sales"]);
    }

    #[test]
    fn tokenize_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
        assert!(tokenize("!?;").is_empty());
    }

    #[test]
    fn tokenize_unicode_words() {
        assert_eq!(tokenize("department = Ventes_été"), ["department", "=", "Ventes_été"]);
    }
}
