//! Property-based tests for the lexer and parser.
//!
//! 1. **Scanning terminates** and ends in an endless EOF tail
//! 2. **Token positions never move backwards** and stay inside the input
//! 3. **Operator literals match their source text**
//! 4. **Numeric literals re-scan to the same token**
//! 5. **The parser terminates** on arbitrary token soup

use proptest::prelude::*;

use tinyc::diagnostics::ProblemHandler;
use tinyc::parser::{parse_file, Lexer, Token, TokenKind};

const OPERATORS: &[&str] = &[
    "+=", "++", "+", "-=", "--", "-", "*=", "*", "/=", "/", "^=", "^", "~", ">=", ">>", ">", "<=",
    "<<", "<", "==", "=", "!=", "!", "&&", "&", "||", "|=", "|", "(", ")", "[", "]", "{", "}", ",",
    ";", ".",
];

const FRAGMENTS: &[&str] = &[
    "namespace", "\"app\"", ";", "import", "pub", "fun", "struct", "var", "return", "main", "(",
    ")", "{", "}", "[", "]", ",", ".", "int8", "*", "+", "==", "true", "42", "=", "`x y`",
    "/* c */",
];

fn tokens_of(source: &[u8]) -> Vec<Token> {
    let mut problems = ProblemHandler::new();
    Lexer::new("prop.tl", source, &mut problems).tokenize()
}

/// Operators separated by spaces, so maximal munch cannot merge neighbours.
fn operator_soup() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(OPERATORS), 1..40).prop_map(|ops| ops.join(" "))
}

fn number_literal() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]{1,6}",
        "[1-9][0-9]{0,3}_[0-9]{3}",
        "0[xX][0-9a-fA-F]{1,6}",
        "0[oO][0-7]{1,6}",
        "0[bB][01]{1,12}",
        "[0-9]{1,4}\\.[0-9]{0,4}",
        "\\.[0-9]{1,4}",
        "[0-9]{1,3}[eE][+-]?[0-9]{1,3}",
        "0x[0-9a-f]{1,3}p[+-]?[0-9]{1,2}",
        "[0-9]{1,4}i",
        // malformed ones must round-trip too
        "0x",
        "0b[0-9]{1,4}",
        "[0-9]{1,3}__[0-9]",
        "0x[0-9a-f]{1,3}\\.[0-9a-f]{0,2}",
    ]
}

fn token_soup() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..60).prop_map(|f| f.join(" "))
}

proptest! {
    #[test]
    fn scanning_terminates_with_eof_tail(input in prop::collection::vec(any::<u8>(), 0..300)) {
        let mut problems = ProblemHandler::new();
        let mut lexer = Lexer::new("prop.tl", &input, &mut problems);

        let mut last_index = 0;
        for _ in 0..=input.len() + 1 {
            let token = lexer.next_token();
            prop_assert!(token.location.start.index >= last_index);
            prop_assert!(token.location.end.index <= input.len() + 1);
            last_index = token.location.start.index;
            if token.is(TokenKind::Eof) {
                break;
            }
        }

        for _ in 0..3 {
            let token = lexer.next_token();
            prop_assert_eq!(token.kind, TokenKind::Eof);
            prop_assert_eq!(token.location.start.index, input.len());
        }
    }

    #[test]
    fn token_positions_are_monotonic(input in "\\PC{0,300}") {
        let tokens = tokens_of(input.as_bytes());
        prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));

        for pair in tokens.windows(2) {
            prop_assert!(pair[0].location.end.index <= pair[1].location.start.index + 1);
            prop_assert!(pair[0].location.start.index < pair[1].location.start.index);
            prop_assert!(pair[0].location.start.line <= pair[1].location.start.line);
        }
    }

    #[test]
    fn operator_literals_match_source(source in operator_soup()) {
        let tokens = tokens_of(source.as_bytes());
        prop_assert_eq!(tokens.len(), source.split(' ').count() + 1);

        for token in tokens.iter().filter(|t| !t.is(TokenKind::Eof)) {
            prop_assert_eq!(&source[token.location.byte_range()], token.literal.as_str());
        }
    }

    #[test]
    fn numbers_rescan_identically(literal in number_literal()) {
        let first = tokens_of(literal.as_bytes());
        prop_assert_eq!(first.len(), 2);

        let again = tokens_of(first[0].literal.as_bytes());
        prop_assert_eq!(again[0].kind, first[0].kind);
        prop_assert_eq!(&again[0].literal, &first[0].literal);
        prop_assert_eq!(&first[0].literal, &literal);
    }

    #[test]
    fn parser_terminates(source in token_soup()) {
        let mut problems = ProblemHandler::new();
        let (unit, _) = parse_file("prop.tl", source.as_bytes(), &mut problems);
        if unit.is_none() {
            prop_assert!(!problems.ok());
        }
    }
}
