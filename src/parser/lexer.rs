//! Lexer (tokenizer) for tiny source code
//!
//! Converts a raw byte buffer into [`Token`]s, one per [`Lexer::next_token`]
//! call. The lexer never stops on bad input: every malformed construct is
//! recorded in the [`ProblemHandler`] and degrades to a best-effort token, so
//! scanning always reaches end of input. Comments are returned as
//! [`TokenKind::Comment`] tokens; the parser filters them out.

use super::token::{lookup_keyword, Token, TokenKind};
use crate::diagnostics::{
    CodePointLocation, CodeProblem, CodeRange, LineTable, ProblemCode, ProblemHandler,
};
use std::rc::Rc;
use tracing::trace;

const BYTE_ORDER_MARK: char = '\u{FEFF}';
const MAX_CODE_POINT: u32 = char::MAX as u32;

/// Streaming tokenizer over a fully materialized source buffer.
///
/// The cursor only moves forward. Once end of input is reached every further
/// call to [`next_token`](Self::next_token) returns another EOF token without
/// recording anything new.
pub struct Lexer<'a> {
    file: Rc<str>,
    source: &'a [u8],

    /// `None` past the end of the buffer
    current: Option<char>,
    current_size: usize,
    location: CodePointLocation,

    problems: &'a mut ProblemHandler,
    lines: LineTable,
}

impl<'a> Lexer<'a> {
    /// Create a lexer for `source`, labelled `file` in diagnostics.
    pub fn new(file: &str, source: &'a [u8], problems: &'a mut ProblemHandler) -> Self {
        let file: Rc<str> = Rc::from(file);
        let mut lexer = Self {
            location: CodePointLocation::start_of(Rc::clone(&file)),
            file,
            source,
            current: None,
            current_size: 0,
            problems,
            lines: LineTable::new(0),
        };

        lexer.decode();

        if lexer.current == Some(BYTE_ORDER_MARK) {
            // skipped without counting a column
            lexer.location.index += lexer.current_size;
            lexer.lines = LineTable::new(lexer.location.index);
            lexer.decode();
        }

        lexer
    }

    pub fn file(&self) -> &Rc<str> {
        &self.file
    }

    pub fn source(&self) -> &'a [u8] {
        self.source
    }

    /// Current cursor position.
    pub fn location(&self) -> &CodePointLocation {
        &self.location
    }

    pub fn problems(&self) -> &ProblemHandler {
        &*self.problems
    }

    pub fn problems_mut(&mut self) -> &mut ProblemHandler {
        &mut *self.problems
    }

    /// Line offsets recorded so far.
    pub fn line_table(&self) -> &LineTable {
        &self.lines
    }

    pub fn into_line_table(self) -> LineTable {
        self.lines
    }

    /// Scan everything up to and including the first EOF token.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.is(TokenKind::Eof);
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }

    /// Scan the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let token = match self.current {
            None => {
                self.lines.record_end(self.location.index);
                Token::new(TokenKind::Eof, "", CodeRange::one_code_point(&self.location))
            }
            Some('`') => self.wrapped_identifier(),
            Some('"') => self.string_literal(),
            Some(c) => self.operator_or_word(c),
        };

        trace!(kind = %token.kind, literal = %token.literal, at = %token.location, "token");
        token
    }

    fn operator_or_word(&mut self, c: char) -> Token {
        let next = self.peek_byte();

        match (c, next) {
            ('+', b'=') => self.double(TokenKind::PlusEq, "+="),
            ('+', b'+') => self.double(TokenKind::PlusPlus, "++"),
            ('+', _) => self.single(TokenKind::Plus, "+"),

            ('-', b'=') => self.double(TokenKind::MinusEq, "-="),
            ('-', b'-') => self.double(TokenKind::MinusMinus, "--"),
            ('-', _) => self.single(TokenKind::Minus, "-"),

            ('*', b'=') => self.double(TokenKind::MulEq, "*="),
            ('*', _) => self.single(TokenKind::Mul, "*"),

            ('/', b'=') => self.double(TokenKind::DivEq, "/="),
            ('/', b'/') => self.line_comment(),
            ('/', b'*') => self.block_comment(),
            ('/', _) => self.single(TokenKind::Div, "/"),

            ('^', b'=') => self.double(TokenKind::XorEq, "^="),
            ('^', _) => self.single(TokenKind::Xor, "^"),

            ('~', _) => self.single(TokenKind::Not, "~"),

            ('>', b'=') => self.double(TokenKind::Gte, ">="),
            ('>', b'>') => self.double(TokenKind::RShift, ">>"),
            ('>', _) => self.single(TokenKind::Gt, ">"),

            ('<', b'=') => self.double(TokenKind::Lte, "<="),
            ('<', b'<') => self.double(TokenKind::LShift, "<<"),
            ('<', _) => self.single(TokenKind::Lt, "<"),

            ('=', b'=') => self.double(TokenKind::Eq, "=="),
            ('=', _) => self.single(TokenKind::Assign, "="),

            ('!', b'=') => self.double(TokenKind::Neq, "!="),
            ('!', _) => self.single(TokenKind::Bang, "!"),

            ('&', b'&') => self.double(TokenKind::AndAnd, "&&"),
            ('&', _) => self.single(TokenKind::And, "&"),

            ('|', b'|') => self.double(TokenKind::OrOr, "||"),
            ('|', b'=') => self.double(TokenKind::OrEq, "|="),
            ('|', _) => self.single(TokenKind::Or, "|"),

            ('(', _) => self.single(TokenKind::OpenParen, "("),
            (')', _) => self.single(TokenKind::CloseParen, ")"),
            ('[', _) => self.single(TokenKind::OpenBracket, "["),
            (']', _) => self.single(TokenKind::CloseBracket, "]"),
            ('{', _) => self.single(TokenKind::OpenBrace, "{"),
            ('}', _) => self.single(TokenKind::CloseBrace, "}"),
            (',', _) => self.single(TokenKind::Comma, ","),
            (';', _) => self.single(TokenKind::Semicolon, ";"),

            ('.', next) if next.is_ascii_digit() => self.number(),
            ('.', _) => self.single(TokenKind::Dot, "."),

            (c, _) if is_identifier_start(c) => self.name(),
            (c, _) if c.is_ascii_digit() => self.number(),

            (c, _) => {
                let range = self.code_point_range();
                self.error(range.clone(), ProblemCode::UnexpectedCharacter(c));
                self.advance();
                Token::new(TokenKind::Invalid, c.to_string(), range)
            }
        }
    }

    /// A one-character token at the cursor.
    fn single(&mut self, kind: TokenKind, literal: &str) -> Token {
        let token = Token::new(kind, literal, CodeRange::one_code_point(&self.location));
        self.advance();
        token
    }

    /// A two-character token starting at the cursor.
    fn double(&mut self, kind: TokenKind, literal: &str) -> Token {
        self.advance();
        let token = Token::new(kind, literal, CodeRange::two_code_points(&self.location));
        self.advance();
        token
    }

    fn name(&mut self) -> Token {
        let start = self.location.copy();
        while self.current.is_some_and(is_identifier_continue) {
            self.advance();
        }

        let literal = self.text(start.index, self.location.index);
        let kind = match literal.as_str() {
            "true" | "false" => TokenKind::Boolean,
            word => lookup_keyword(word).unwrap_or(TokenKind::Identifier),
        };

        Token::new(kind, literal, CodeRange::new(start, self.location.copy()))
    }

    /// `` `any text` `` on a single line.
    fn wrapped_identifier(&mut self) -> Token {
        let start = self.location.copy();
        self.advance(); // opening '`'

        loop {
            match self.current {
                Some('`') => break,
                None | Some('\n') => {
                    let end = self.unterminated_end(&start);
                    let range = CodeRange::new(start.clone(), end);
                    self.error(range.clone(), ProblemCode::NotClosedWrappedIdentifier);
                    let literal = self.text(start.index, range.end.index);
                    return Token::new(TokenKind::Identifier, literal, range);
                }
                Some(_) => self.advance(),
            }
        }

        self.advance(); // closing '`'

        let literal = self.text(start.index, self.location.index);
        Token::new(TokenKind::Identifier, literal, CodeRange::new(start, self.location.copy()))
    }

    /// The literal keeps escape sequences as written; only their shape is
    /// checked.
    fn string_literal(&mut self) -> Token {
        let start = self.location.copy();
        self.advance(); // opening '"'

        loop {
            match self.current {
                Some('"') => break,
                None | Some('\n') => {
                    let end = self.unterminated_end(&start);
                    let range = CodeRange::new(start.clone(), end);
                    self.error(range.clone(), ProblemCode::NotClosedString);
                    let literal = self.text(start.index + 1, range.end.index);
                    return Token::new(TokenKind::String, literal, range);
                }
                Some('\\') => {
                    self.advance();
                    self.escape_sequence();
                }
                Some(_) => self.advance(),
            }
        }

        self.advance(); // closing '"'

        let literal = self.text(start.index + 1, self.location.index - 1);
        Token::new(TokenKind::String, literal, CodeRange::new(start, self.location.copy()))
    }

    /// Validates the escape body after a backslash. On failure the offending
    /// character is left unconsumed.
    fn escape_sequence(&mut self) -> bool {
        let (mut remaining, base, max) = match self.current {
            Some('a' | 'b' | 'f' | 'n' | 'r' | 't' | 'v' | '\\' | '"') => {
                self.advance();
                return true;
            }
            Some('0'..='7') => (3, 8, 255),
            Some('x') => {
                self.advance();
                (2, 16, 255)
            }
            Some('u') => {
                self.advance();
                (4, 16, MAX_CODE_POINT)
            }
            Some('U') => {
                self.advance();
                (8, 16, MAX_CODE_POINT)
            }
            None => {
                self.error(self.code_point_range(), ProblemCode::EscapeSequenceNotTerminated);
                return false;
            }
            Some(_) => {
                self.error(self.code_point_range(), ProblemCode::UnknownEscapeSequence);
                return false;
            }
        };

        let mut value: u32 = 0;
        while remaining > 0 {
            let digit = self.current.and_then(|c| c.to_digit(16)).unwrap_or(16);
            if digit >= base {
                let code = match self.current {
                    None => ProblemCode::EscapeSequenceNotTerminated,
                    Some(c) => ProblemCode::IllegalCharacterInEscapeSequence(c),
                };
                self.error(self.code_point_range(), code);
                return false;
            }

            value = value * base + digit;
            self.advance();
            remaining -= 1;
        }

        if value > max || (0xD800..0xE000).contains(&value) {
            self.error(self.code_point_range(), ProblemCode::EscapeSequenceIsInvalidCodePoint);
            return false;
        }

        true
    }

    fn line_comment(&mut self) -> Token {
        let start = self.location.copy();
        self.advance();
        self.advance(); // "//"

        while !matches!(self.current, None | Some('\n')) {
            self.advance();
        }

        let literal = self.text(start.index + 2, self.location.index);
        Token::new(TokenKind::Comment, literal, CodeRange::new(start, self.location.copy()))
    }

    fn block_comment(&mut self) -> Token {
        let start = self.location.copy();
        self.advance();
        self.advance(); // "/*"

        loop {
            match self.current {
                Some('*') if self.peek_byte() == b'/' => break,
                None => {
                    self.error(
                        CodeRange::one_code_point(&start),
                        ProblemCode::NotClosedMultiLineComment,
                    );
                    let literal = self.text(start.index + 2, self.location.index);
                    let range = CodeRange::new(start, self.location.copy());
                    return Token::new(TokenKind::Comment, literal, range);
                }
                Some(_) => self.advance(),
            }
        }

        self.advance();
        self.advance(); // "*/"

        let literal = self.text(start.index + 2, self.location.index - 2);
        Token::new(TokenKind::Comment, literal, CodeRange::new(start, self.location.copy()))
    }

    /// Integer, float or imaginary literal starting at a digit or at a `.`
    /// followed by a digit.
    ///
    /// Accepts the `0x`, `0o`, `0b` and legacy `0` prefixes, `_` separators,
    /// `e`/`p` exponents and an `i` suffix. Every malformation is reported and
    /// the literal is still returned.
    fn number(&mut self) -> Token {
        let start = self.location.copy();
        let mut kind = TokenKind::Invalid;

        let mut base = 10;
        let mut prefix = Prefix::None;
        let mut separators = 0u8; // bit 0: digit present, bit 1: '_' present
        let mut invalid: Option<CodePointLocation> = None;

        // integer part
        if self.current != Some('.') {
            kind = TokenKind::Int;
            if self.current == Some('0') {
                self.advance();
                match self.current.map(|c| c.to_ascii_lowercase()) {
                    Some('x') => {
                        self.advance();
                        base = 16;
                        prefix = Prefix::Hexadecimal;
                    }
                    Some('o') => {
                        self.advance();
                        base = 8;
                        prefix = Prefix::Octal;
                    }
                    Some('b') => {
                        self.advance();
                        base = 2;
                        prefix = Prefix::Binary;
                    }
                    _ => {
                        base = 8;
                        prefix = Prefix::LegacyOctal;
                        separators = 1; // the leading 0
                    }
                }
            }
            separators |= self.digits(base, &mut invalid);
        }

        // fractional part
        if self.current == Some('.') {
            kind = TokenKind::Float;
            if matches!(prefix, Prefix::Octal | Prefix::Binary) {
                self.error(
                    CodeRange::one_code_point(&self.location),
                    ProblemCode::InvalidRadixPoint(prefix.literal_name()),
                );
            }
            self.advance();
            separators |= self.digits(base, &mut invalid);
        }

        if separators & 1 == 0 {
            self.error(
                CodeRange::new(start.clone(), self.location.copy()),
                ProblemCode::HasNoDigits(prefix.literal_name()),
            );
        }

        // exponent
        let marker = self.current.filter(|c| matches!(c.to_ascii_lowercase(), 'e' | 'p'));
        if let Some(marker) = marker {
            let lower = marker.to_ascii_lowercase();
            if lower == 'e' && !matches!(prefix, Prefix::None | Prefix::LegacyOctal) {
                self.error(
                    CodeRange::one_code_point(&self.location),
                    ProblemCode::ExponentRequiresDecimalMantissa(marker),
                );
            } else if lower == 'p' && prefix != Prefix::Hexadecimal {
                self.error(
                    CodeRange::one_code_point(&self.location),
                    ProblemCode::ExponentRequiresHexadecimalMantissa(marker),
                );
            }

            self.advance();
            kind = TokenKind::Float;

            if matches!(self.current, Some('+' | '-')) {
                self.advance();
            }

            let exponent = self.digits(10, &mut None);
            separators |= exponent;

            if exponent & 1 == 0 {
                self.error(
                    CodeRange::new(start.clone(), self.location.copy()),
                    ProblemCode::ExponentHasNoDigits,
                );
            }
        } else if prefix == Prefix::Hexadecimal && kind == TokenKind::Float {
            self.error(
                CodeRange::new(start.clone(), self.location.copy()),
                ProblemCode::HexadecimalMantissaRequiresPExponent,
            );
        }

        // suffix
        if self.current == Some('i') {
            kind = TokenKind::Imaginary;
            self.advance();
        }

        let end = self.location.copy();
        let source = self.source;
        let literal = &source[start.index..end.index];

        if kind == TokenKind::Int {
            if let Some(at) = invalid {
                let digit = char::from(literal[at.index - start.index]);
                self.error(
                    CodeRange::one_code_point(&at),
                    ProblemCode::InvalidDigit {
                        digit,
                        literal: prefix.literal_name(),
                    },
                );
            }
        }

        if separators & 2 != 0 && invalid_separator(literal).is_some() {
            self.error(
                CodeRange::new(start.clone(), end.clone()),
                ProblemCode::UnderscoreMustSeparateSuccessiveDigits,
            );
        }

        let literal = self.text(start.index, end.index);
        Token::new(kind, literal, CodeRange::new(start, end))
    }

    /// Consumes a run of digits and `_`. Returns bit 0 set if a digit was
    /// seen and bit 1 set if a `_` was seen. The first digit out of range for
    /// `base` is remembered in `invalid`.
    fn digits(&mut self, base: u32, invalid: &mut Option<CodePointLocation>) -> u8 {
        let mut seen = 0;

        if base <= 10 {
            while let Some(c) = self.current.filter(|c| c.is_ascii_digit() || *c == '_') {
                if c == '_' {
                    seen |= 2;
                } else {
                    seen |= 1;
                    if c.to_digit(10).is_some_and(|d| d >= base) && invalid.is_none() {
                        *invalid = Some(self.location.copy());
                    }
                }
                self.advance();
            }
        } else {
            while let Some(c) = self.current.filter(|c| c.is_ascii_hexdigit() || *c == '_') {
                seen |= if c == '_' { 2 } else { 1 };
                self.advance();
            }
        }

        seen
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.current, Some(' ' | '\t' | '\n' | '\r')) {
            self.advance();
        }
    }

    /// Move past the current code point. No-op at end of input.
    fn advance(&mut self) {
        let Some(c) = self.current else {
            return;
        };

        if c == '\n' {
            self.lines.record_line_break(self.location.index);
            self.location.line += 1;
            self.location.column = 0;
        } else {
            self.location.column += 1;
        }

        self.location.index += self.current_size;
        self.decode();
    }

    /// Decode the code point under the cursor.
    fn decode(&mut self) {
        let index = self.location.index;
        let Some(&byte) = self.source.get(index) else {
            self.current = None;
            self.current_size = 0;
            return;
        };

        if byte == 0 {
            self.error(
                CodeRange::one_code_point(&self.location),
                ProblemCode::IllegalNullCharacter,
            );
        }

        if byte.is_ascii() {
            self.current = Some(char::from(byte));
            self.current_size = 1;
            return;
        }

        let chunk = &self.source[index..self.source.len().min(index + 4)];
        let valid = match std::str::from_utf8(chunk) {
            Ok(text) => text,
            Err(e) => std::str::from_utf8(&chunk[..e.valid_up_to()]).unwrap_or_default(),
        };

        match valid.chars().next() {
            Some(c) => {
                self.current = Some(c);
                self.current_size = c.len_utf8();
            }
            None => {
                self.error(
                    CodeRange::one_code_point(&self.location),
                    ProblemCode::IllegalUtf8Encoding,
                );
                self.current = Some(char::REPLACEMENT_CHARACTER);
                self.current_size = 1;
            }
        }
    }

    /// The raw byte after the current one, or 0. Only meaningful when the
    /// current code point is ASCII.
    fn peek_byte(&self) -> u8 {
        self.source.get(self.location.index + 1).copied().unwrap_or(0)
    }

    /// Range covering the code point under the cursor.
    fn code_point_range(&self) -> CodeRange {
        let mut end = self.location.next_byte_location();
        end.index = self.location.index + self.current_size.max(1);
        CodeRange::new(self.location.copy(), end)
    }

    /// End of an unterminated literal stopped by a line break or EOF. A CR
    /// right before the line feed is left out.
    fn unterminated_end(&self, start: &CodePointLocation) -> CodePointLocation {
        let index = self.location.index;
        if self.current == Some('\n')
            && index > start.index + 1
            && self.source[index - 1] == b'\r'
        {
            self.location.previous_byte_location()
        } else {
            self.location.copy()
        }
    }

    fn text(&self, from: usize, to: usize) -> String {
        String::from_utf8_lossy(&self.source[from..to]).into_owned()
    }

    fn error(&mut self, range: CodeRange, code: ProblemCode) {
        self.problems.add(CodeProblem::local_error(range, code));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prefix {
    None,
    Hexadecimal,
    Octal,
    LegacyOctal,
    Binary,
}

impl Prefix {
    fn literal_name(self) -> &'static str {
        match self {
            Prefix::Hexadecimal => "hexadecimal literal",
            Prefix::Octal | Prefix::LegacyOctal => "octal literal",
            Prefix::Binary => "binary literal",
            Prefix::None => "decimal literal",
        }
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || (!c.is_ascii() && c.is_alphabetic())
}

fn is_identifier_continue(c: char) -> bool {
    is_identifier_start(c) || c.is_ascii_digit()
}

/// Offset of the first `_` in `literal` that does not sit between two
/// digits. A base prefix counts as a digit.
fn invalid_separator(literal: &[u8]) -> Option<usize> {
    let mut x1 = b' ';
    let mut previous_class = b'.'; // '_', '0' (a digit) or '.' (anything else)
    let mut i = 0;

    if literal.len() >= 2 && literal[0] == b'0' {
        x1 = literal[1].to_ascii_lowercase();
        if matches!(x1, b'x' | b'o' | b'b') {
            previous_class = b'0';
            i = 2;
        }
    }

    while i < literal.len() {
        let p = previous_class;
        let d = literal[i];
        if d == b'_' {
            if p != b'0' {
                return Some(i);
            }
            previous_class = b'_';
        } else if d.is_ascii_digit() || (x1 == b'x' && d.is_ascii_hexdigit()) {
            previous_class = b'0';
        } else {
            if p == b'_' {
                return Some(i - 1);
            }
            previous_class = b'.';
        }
        i += 1;
    }

    if previous_class == b'_' {
        return Some(literal.len() - 1);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use crate::parser::token::KEYWORDS;

    fn lex(source: &str) -> (Vec<Token>, ProblemHandler) {
        let mut problems = ProblemHandler::new();
        let tokens = Lexer::new("test.tl", source.as_bytes(), &mut problems).tokenize();
        (tokens, problems)
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    fn codes(problems: &ProblemHandler) -> Vec<ProblemCode> {
        problems.problems().iter().map(|p| p.code().clone()).collect()
    }

    /// Runs the number scanner directly, bypassing identifier dispatch.
    fn scan_number(source: &str) -> (Token, ProblemHandler) {
        let mut problems = ProblemHandler::new();
        let token = Lexer::new("n.tl", source.as_bytes(), &mut problems).number();
        (token, problems)
    }

    #[test]
    fn test_simple_tokens() {
        let (tokens, problems) = lex("pub fun main() { return 0; }");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Pub,
                TokenKind::Fun,
                TokenKind::Identifier,
                TokenKind::OpenParen,
                TokenKind::CloseParen,
                TokenKind::OpenBrace,
                TokenKind::Return,
                TokenKind::Int,
                TokenKind::Semicolon,
                TokenKind::CloseBrace,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[2].literal, "main");
        assert_eq!(tokens[10].literal, "");
        assert!(problems.is_empty());
    }

    #[test]
    fn test_operators() {
        let source = "+= ++ + -= -- - *= * /= / ^= ^ ~ >= >> > <= << < == = != ! && & || |= | ( ) [ ] { } , ; .";
        let (tokens, problems) = lex(source);
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::PlusEq,
                TokenKind::PlusPlus,
                TokenKind::Plus,
                TokenKind::MinusEq,
                TokenKind::MinusMinus,
                TokenKind::Minus,
                TokenKind::MulEq,
                TokenKind::Mul,
                TokenKind::DivEq,
                TokenKind::Div,
                TokenKind::XorEq,
                TokenKind::Xor,
                TokenKind::Not,
                TokenKind::Gte,
                TokenKind::RShift,
                TokenKind::Gt,
                TokenKind::Lte,
                TokenKind::LShift,
                TokenKind::Lt,
                TokenKind::Eq,
                TokenKind::Assign,
                TokenKind::Neq,
                TokenKind::Bang,
                TokenKind::AndAnd,
                TokenKind::And,
                TokenKind::OrOr,
                TokenKind::OrEq,
                TokenKind::Or,
                TokenKind::OpenParen,
                TokenKind::CloseParen,
                TokenKind::OpenBracket,
                TokenKind::CloseBracket,
                TokenKind::OpenBrace,
                TokenKind::CloseBrace,
                TokenKind::Comma,
                TokenKind::Semicolon,
                TokenKind::Dot,
                TokenKind::Eof,
            ]
        );
        assert!(problems.is_empty());

        for token in &tokens[..tokens.len() - 1] {
            assert_eq!(&source[token.location.byte_range()], token.literal);
        }
    }

    #[test]
    fn test_positions() {
        let (tokens, _) = lex("a\n  bc\r\nd");
        assert_eq!(tokens[0].location.start.line, 1);
        assert_eq!(tokens[1].location.start.index, 4);
        assert_eq!(tokens[1].location.start.line, 2);
        assert_eq!(tokens[1].location.start.column, 2);
        assert_eq!(tokens[1].location.end.column, 4);
        assert_eq!(tokens[2].location.start.line, 3);
        assert_eq!(tokens[2].location.start.column, 0);
    }

    #[test]
    fn test_unicode_columns_count_code_points() {
        let (tokens, problems) = lex("héllo wörld");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Eof]
        );
        assert_eq!(tokens[0].literal, "héllo");
        assert_eq!(tokens[1].location.start.index, 7);
        assert_eq!(tokens[1].location.start.column, 6);
        assert!(problems.is_empty());
    }

    #[test]
    fn test_keywords_and_booleans() {
        for (index, (keyword, _)) in KEYWORDS.iter().enumerate() {
            let (tokens, _) = lex(keyword);
            assert_eq!(tokens[0].kind as u8, TokenKind::FIRST_KEYWORD as u8 + index as u8);
        }

        let (tokens, _) = lex("true false truly varx _var");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Boolean,
                TokenKind::Boolean,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments() {
        let (tokens, problems) = lex("// hi\n/* a\nb */ x /* open");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Comment,
                TokenKind::Comment,
                TokenKind::Identifier,
                TokenKind::Comment,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[0].literal, " hi");
        assert_eq!(tokens[1].literal, " a\nb ");
        assert_eq!(tokens[3].literal, " open");
        assert_eq!(codes(&problems), vec![ProblemCode::NotClosedMultiLineComment]);
        assert_eq!(problems.problems()[0].location().map(|r| r.start.index), Some(18));
    }

    #[test]
    fn test_unexpected_character() {
        let (tokens, problems) = lex("var x = @;");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Var,
                TokenKind::Identifier,
                TokenKind::Assign,
                TokenKind::Invalid,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[3].literal, "@");
        assert_eq!(codes(&problems), vec![ProblemCode::UnexpectedCharacter('@')]);
        let problem = &problems.problems()[0];
        assert_eq!(problem.severity(), Severity::Error);
        assert_eq!(problem.location().map(|r| r.start.column), Some(8));
    }

    #[test]
    fn test_illegal_bytes() {
        let mut problems = ProblemHandler::new();
        let tokens = Lexer::new("t.tl", b"a\xffb", &mut problems).tokenize();
        assert_eq!(tokens[0].literal, "a");
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
        assert!(tokens.iter().any(|t| t.literal == "b"));
        assert_eq!(problems.problems()[0].code(), &ProblemCode::IllegalUtf8Encoding);

        let mut problems = ProblemHandler::new();
        let tokens = Lexer::new("t.tl", b"\0", &mut problems).tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Invalid);
        assert_eq!(problems.problems()[0].code(), &ProblemCode::IllegalNullCharacter);
    }

    #[test]
    fn test_byte_order_mark_is_skipped() {
        let (tokens, problems) = lex("\u{FEFF}var");
        assert_eq!(tokens[0].kind, TokenKind::Var);
        assert_eq!(tokens[0].location.start.index, 3);
        assert_eq!(tokens[0].location.start.column, 0);
        assert!(problems.is_empty());
    }

    #[test]
    fn test_eof_is_repeated_without_side_effects() {
        let mut problems = ProblemHandler::new();
        let mut lexer = Lexer::new("t.tl", b"x \"open", &mut problems);
        let tokens = lexer.tokenize();
        assert_eq!(tokens.len(), 3);
        for _ in 0..3 {
            let token = lexer.next_token();
            assert_eq!(token.kind, TokenKind::Eof);
            assert_eq!(token.location.start.index, 7);
        }
        assert_eq!(lexer.line_table().line_count(), 1);
        drop(lexer);
        assert_eq!(problems.len(), 1);
    }

    #[test]
    fn test_line_table() {
        let source = b"a\nbc\n";
        let mut problems = ProblemHandler::new();
        let mut lexer = Lexer::new("t.tl", source, &mut problems);
        lexer.tokenize();
        let lines = lexer.into_line_table();
        assert_eq!(lines.line_count(), 3);
        assert_eq!(lines.line_bounds(2, source), Some(2..4));
        assert_eq!(lines.line_bounds(3, source), Some(5..5));
    }

    #[test]
    fn test_strings() {
        let (tokens, problems) = lex(r#""a\tb\x41é\U0001F600\101\"""#);
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].literal, r#"a\tb\x41é\U0001F600\101\""#);
        assert!(problems.is_empty(), "{:?}", codes(&problems));
    }

    #[test]
    fn test_malformed_escapes() {
        let cases = [
            (r#""\q""#, ProblemCode::UnknownEscapeSequence),
            (r#""\x4""#, ProblemCode::IllegalCharacterInEscapeSequence('"')),
            (r#""\uD800""#, ProblemCode::EscapeSequenceIsInvalidCodePoint),
            (r#""\777""#, ProblemCode::EscapeSequenceIsInvalidCodePoint),
            (r#""\U00110000""#, ProblemCode::EscapeSequenceIsInvalidCodePoint),
        ];

        for (source, expected) in cases {
            let (tokens, problems) = lex(source);
            assert_eq!(tokens[0].kind, TokenKind::String, "{source}");
            assert_eq!(tokens[1].kind, TokenKind::Eof, "{source}");
            assert_eq!(codes(&problems), vec![expected], "{source}");
        }

        let (_, problems) = lex("\"\\");
        assert_eq!(
            codes(&problems),
            vec![ProblemCode::EscapeSequenceNotTerminated, ProblemCode::NotClosedString]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let (tokens, problems) = lex("\"abc");
        assert_eq!(kinds(&tokens), vec![TokenKind::String, TokenKind::Eof]);
        assert_eq!(tokens[0].literal, "abc");
        assert_eq!(tokens[0].location.byte_range(), 0..4);
        assert_eq!(codes(&problems), vec![ProblemCode::NotClosedString]);

        let (tokens, _) = lex("\"ab\r\nx");
        assert_eq!(tokens[0].literal, "ab");
        assert_eq!(tokens[0].location.byte_range(), 0..3);
        assert_eq!(tokens[1].literal, "x");
    }

    #[test]
    fn test_wrapped_identifiers() {
        let (tokens, problems) = lex("`my var` `abc");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Eof]
        );
        assert_eq!(tokens[0].literal, "`my var`");
        assert_eq!(tokens[1].literal, "`abc");
        assert_eq!(codes(&problems), vec![ProblemCode::NotClosedWrappedIdentifier]);
    }

    #[test]
    fn test_valid_numbers() {
        let cases = [
            ("42", TokenKind::Int),
            ("0", TokenKind::Int),
            ("0x1F", TokenKind::Int),
            ("0o17", TokenKind::Int),
            ("0b101", TokenKind::Int),
            ("017", TokenKind::Int),
            ("1_000", TokenKind::Int),
            ("0x_ff", TokenKind::Int),
            ("1.5", TokenKind::Float),
            (".5", TokenKind::Float),
            ("0.9", TokenKind::Float),
            ("1e10", TokenKind::Float),
            ("1E+3", TokenKind::Float),
            ("0x1p-2", TokenKind::Float),
            ("2i", TokenKind::Imaginary),
            ("1.5e3i", TokenKind::Imaginary),
        ];

        for (source, kind) in cases {
            let (tokens, problems) = lex(source);
            assert_eq!(tokens.len(), 2, "{source}");
            assert_eq!(tokens[0].kind, kind, "{source}");
            assert_eq!(tokens[0].literal, source);
            assert!(problems.is_empty(), "{source}: {:?}", codes(&problems));
        }
    }

    #[test]
    fn test_malformed_numbers() {
        let cases = [
            (
                "0b102",
                ProblemCode::InvalidDigit {
                    digit: '2',
                    literal: "binary literal",
                },
            ),
            (
                "09",
                ProblemCode::InvalidDigit {
                    digit: '9',
                    literal: "octal literal",
                },
            ),
            ("0x", ProblemCode::HasNoDigits("hexadecimal literal")),
            ("0o1.2", ProblemCode::InvalidRadixPoint("octal literal")),
            ("1e", ProblemCode::ExponentHasNoDigits),
            ("0x1.8", ProblemCode::HexadecimalMantissaRequiresPExponent),
            ("1p3", ProblemCode::ExponentRequiresHexadecimalMantissa('p')),
            ("0b1e3", ProblemCode::ExponentRequiresDecimalMantissa('e')),
            ("1__000", ProblemCode::UnderscoreMustSeparateSuccessiveDigits),
            ("1000_", ProblemCode::UnderscoreMustSeparateSuccessiveDigits),
        ];

        for (source, expected) in cases {
            let (tokens, problems) = lex(source);
            assert_eq!(tokens.len(), 2, "{source}");
            assert_eq!(tokens[0].literal, source);
            assert_eq!(codes(&problems), vec![expected], "{source}");
        }
    }

    #[test]
    fn test_invalid_digit_location() {
        let (_, problems) = lex("0b1021");
        let range = problems.problems()[0].location().cloned();
        assert_eq!(range.map(|r| r.byte_range()), Some(4..5));
    }

    #[test]
    fn test_digit_separators_on_number_scanner() {
        let (token, problems) = scan_number("1_000");
        assert_eq!(token.kind, TokenKind::Int);
        assert!(problems.is_empty());

        for source in ["1__000", "_1000", "1000_"] {
            let (token, problems) = scan_number(source);
            assert_eq!(token.literal, source);
            assert_eq!(
                codes(&problems),
                vec![ProblemCode::UnderscoreMustSeparateSuccessiveDigits],
                "{source}"
            );
        }
    }

    #[test]
    fn test_invalid_separator() {
        assert_eq!(invalid_separator(b"1_000"), None);
        assert_eq!(invalid_separator(b"0x_1"), None);
        assert_eq!(invalid_separator(b"1__0"), Some(2));
        assert_eq!(invalid_separator(b"1_.5"), Some(1));
        assert_eq!(invalid_separator(b"10_"), Some(2));
    }

    #[test]
    fn test_dot_dispatch() {
        let (tokens, _) = lex("a.b .5");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Identifier,
                TokenKind::Dot,
                TokenKind::Identifier,
                TokenKind::Float,
                TokenKind::Eof,
            ]
        );
    }
}
