//! Token kinds and the keyword table

use crate::diagnostics::CodeRange;
use std::fmt;

/// All lexical categories produced by the [`Lexer`](super::lexer::Lexer).
///
/// The keywords form one contiguous block starting at
/// [`TokenKind::FIRST_KEYWORD`], in the same lexicographic order as
/// [`KEYWORDS`].
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    Eof,

    // Arithmetic
    Plus,  // +
    Minus, // -
    Mul,   // *
    Div,   // /
    Bang,  // !

    // Comparison and assignment
    Gt,     // >
    Gte,    // >=
    Lt,     // <
    Assign, // =
    Lte,    // <=
    Eq,     // ==
    Neq,    // !=

    // Bitwise
    RShift, // >>
    LShift, // <<
    Or,     // |
    And,    // &
    Xor,    // ^
    Not,    // ~

    // Logical
    OrOr,   // ||
    AndAnd, // &&

    // Compound assignment
    PlusEq,  // +=
    MinusEq, // -=
    MulEq,   // *=
    DivEq,   // /=
    XorEq,   // ^=
    OrEq,    // |=

    // Brackets
    OpenParen,    // (
    CloseParen,   // )
    OpenBracket,  // [
    CloseBracket, // ]
    OpenBrace,    // {
    CloseBrace,   // }

    // Punctuation
    Comma,     // ,
    Dot,       // .
    Semicolon, // ;

    // Increment/Decrement
    PlusPlus,   // ++
    MinusMinus, // --

    // Literals
    Identifier,
    Int,
    Float,
    Imaginary,
    String,
    Boolean,
    Comment,

    // Keywords
    Break,
    Case,
    Const,
    Continue,
    Default,
    Else,
    For,
    Fun,
    If,
    Import,
    Int16,
    Int32,
    Int64,
    Int8,
    Namespace,
    Pub,
    Return,
    Struct,
    Switch,
    Uint16,
    Uint32,
    Uint64,
    Uint8,
    Var,

    Invalid,
}

/// Keyword spellings paired with their kinds, sorted by spelling.
pub const KEYWORDS: [(&str, TokenKind); 24] = [
    ("break", TokenKind::Break),
    ("case", TokenKind::Case),
    ("const", TokenKind::Const),
    ("continue", TokenKind::Continue),
    ("default", TokenKind::Default),
    ("else", TokenKind::Else),
    ("for", TokenKind::For),
    ("fun", TokenKind::Fun),
    ("if", TokenKind::If),
    ("import", TokenKind::Import),
    ("int16", TokenKind::Int16),
    ("int32", TokenKind::Int32),
    ("int64", TokenKind::Int64),
    ("int8", TokenKind::Int8),
    ("namespace", TokenKind::Namespace),
    ("pub", TokenKind::Pub),
    ("return", TokenKind::Return),
    ("struct", TokenKind::Struct),
    ("switch", TokenKind::Switch),
    ("uint16", TokenKind::Uint16),
    ("uint32", TokenKind::Uint32),
    ("uint64", TokenKind::Uint64),
    ("uint8", TokenKind::Uint8),
    ("var", TokenKind::Var),
];

/// Looks `word` up in [`KEYWORDS`] by binary search.
pub fn lookup_keyword(word: &str) -> Option<TokenKind> {
    KEYWORDS
        .binary_search_by(|(keyword, _)| (*keyword).cmp(word))
        .ok()
        .map(|index| KEYWORDS[index].1)
}

impl TokenKind {
    pub const FIRST_KEYWORD: TokenKind = TokenKind::Break;
    pub const LAST_KEYWORD: TokenKind = TokenKind::Var;

    pub fn is_keyword(self) -> bool {
        (Self::FIRST_KEYWORD..=Self::LAST_KEYWORD).contains(&self)
    }

    /// The eight fixed-width integer type keywords.
    pub fn is_primary_type(self) -> bool {
        matches!(
            self,
            TokenKind::Int8
                | TokenKind::Int16
                | TokenKind::Int32
                | TokenKind::Int64
                | TokenKind::Uint8
                | TokenKind::Uint16
                | TokenKind::Uint32
                | TokenKind::Uint64
        )
    }

    /// Human-readable name used in diagnostics and token dumps.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Eof => "eof",
            TokenKind::Plus => "plus",
            TokenKind::Minus => "minus",
            TokenKind::Mul => "asterisk",
            TokenKind::Div => "slash",
            TokenKind::Bang => "bang",
            TokenKind::Gt => "greater than",
            TokenKind::Gte => "greater than or equal",
            TokenKind::Lt => "less than",
            TokenKind::Assign => "assign",
            TokenKind::Lte => "less than or equal",
            TokenKind::Eq => "equal",
            TokenKind::Neq => "not equal",
            TokenKind::RShift => "right shift",
            TokenKind::LShift => "left shift",
            TokenKind::Or => "or",
            TokenKind::And => "and",
            TokenKind::Xor => "xor",
            TokenKind::Not => "not",
            TokenKind::OrOr => "or or",
            TokenKind::AndAnd => "and and",
            TokenKind::PlusEq => "plus equal",
            TokenKind::MinusEq => "minus equal",
            TokenKind::MulEq => "asterisk equal",
            TokenKind::DivEq => "slash equal",
            TokenKind::XorEq => "xor equal",
            TokenKind::OrEq => "or equal",
            TokenKind::OpenParen => "open parent",
            TokenKind::CloseParen => "close parent",
            TokenKind::OpenBracket => "open bracket",
            TokenKind::CloseBracket => "close bracket",
            TokenKind::OpenBrace => "open brace",
            TokenKind::CloseBrace => "close brace",
            TokenKind::Comma => "comma",
            TokenKind::Dot => "dot",
            TokenKind::Semicolon => "semicolon",
            TokenKind::PlusPlus => "plus plus",
            TokenKind::MinusMinus => "minus minus",
            TokenKind::Identifier => "identifier",
            TokenKind::Int => "integer",
            TokenKind::Float => "float",
            TokenKind::Imaginary => "imaginary number",
            TokenKind::String => "string",
            TokenKind::Boolean => "boolean",
            TokenKind::Comment => "comment",
            TokenKind::Break => "break keyword",
            TokenKind::Case => "case keyword",
            TokenKind::Const => "const keyword",
            TokenKind::Continue => "continue keyword",
            TokenKind::Default => "default keyword",
            TokenKind::Else => "else keyword",
            TokenKind::For => "for keyword",
            TokenKind::Fun => "fun keyword",
            TokenKind::If => "if keyword",
            TokenKind::Import => "import keyword",
            TokenKind::Int16 => "int16 keyword",
            TokenKind::Int32 => "int32 keyword",
            TokenKind::Int64 => "int64 keyword",
            TokenKind::Int8 => "int8 keyword",
            TokenKind::Namespace => "namespace keyword",
            TokenKind::Pub => "pub keyword",
            TokenKind::Return => "return keyword",
            TokenKind::Struct => "struct keyword",
            TokenKind::Switch => "switch keyword",
            TokenKind::Uint16 => "uint16 keyword",
            TokenKind::Uint32 => "uint32 keyword",
            TokenKind::Uint64 => "uint64 keyword",
            TokenKind::Uint8 => "uint8 keyword",
            TokenKind::Var => "var keyword",
            TokenKind::Invalid => "invalid token",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One lexical unit. Immutable once the lexer hands it out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub location: CodeRange,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, location: CodeRange) -> Self {
        Self {
            kind,
            literal: literal.into(),
            location,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = &self.location.start;
        let end = &self.location.end;
        write!(
            f,
            "{:<22} {:<24} {}:{}-{}:{}",
            self.kind.name(),
            format!("{:?}", self.literal),
            start.line,
            start.column,
            end.line,
            end.column
        )
    }
}
