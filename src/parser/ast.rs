// AST (Abstract Syntax Tree) definitions for tiny program units

use super::token::TokenKind;
use crate::diagnostics::{CodePointLocation, CodeRange};
use std::fmt;
use std::rc::Rc;

/// Anything that covers a block of source code.
///
/// Composite nodes compute their range from their children on every call
/// instead of caching it.
pub trait Node {
    fn location(&self) -> CodeRange;
}

/// Root of a parsed file.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramUnit {
    pub file: Rc<str>,
    pub namespace: NamespaceDecl,
    pub imports: Vec<Import>,
    pub statements: Vec<TopLevelStatement>,
}

impl Node for ProgramUnit {
    fn location(&self) -> CodeRange {
        let end = self
            .statements
            .last()
            .map(Node::location)
            .or_else(|| self.imports.last().map(Node::location))
            .unwrap_or_else(|| self.namespace.location());
        self.namespace.location().to(&end)
    }
}

/// `namespace "name";`
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceDecl {
    pub name: String,
    pub location: CodeRange,
}

impl Node for NamespaceDecl {
    fn location(&self) -> CodeRange {
        self.location.clone()
    }
}

/// `import "path";`
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub path: String,
    pub location: CodeRange,
}

impl Node for Import {
    fn location(&self) -> CodeRange {
        self.location.clone()
    }
}

/// Declarations allowed directly inside a namespace
#[derive(Debug, Clone, PartialEq)]
pub enum TopLevelStatement {
    Function(FunctionDeclaration),
    Structure(StructureDeclaration),
}

impl TopLevelStatement {
    pub fn name(&self) -> &str {
        match self {
            TopLevelStatement::Function(f) => &f.name,
            TopLevelStatement::Structure(s) => &s.name,
        }
    }
}

impl Node for TopLevelStatement {
    fn location(&self) -> CodeRange {
        match self {
            TopLevelStatement::Function(f) => f.location(),
            TopLevelStatement::Structure(s) => s.location(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    /// From `pub`/`fun` through the closing `}`
    pub location: CodeRange,
    pub public: bool,
    pub name: String,
    pub arguments: Vec<FunctionArgument>,
    pub body: StatementsBlock,
}

impl Node for FunctionDeclaration {
    fn location(&self) -> CodeRange {
        self.location.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionArgument {
    pub location: CodeRange,
    pub name: String,
    pub ty: Type,
}

impl Node for FunctionArgument {
    fn location(&self) -> CodeRange {
        self.location.clone()
    }
}

/// Structure declaration. The grammar does not produce these yet.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureDeclaration {
    pub location: CodeRange,
    pub public: bool,
    pub name: String,
    pub members: Vec<StructureMember>,
    pub functions: Vec<FunctionDeclaration>,
}

impl Node for StructureDeclaration {
    fn location(&self) -> CodeRange {
        self.location.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructureMember {
    pub location: CodeRange,
    pub public: bool,
    pub readonly: bool,
    pub name: String,
    pub ty: Type,
}

impl Node for StructureMember {
    fn location(&self) -> CodeRange {
        self.location.clone()
    }
}

/// `{ ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct StatementsBlock {
    /// Location of `{`
    pub open_brace: CodePointLocation,
    pub statements: Vec<Statement>,
}

impl Node for StatementsBlock {
    fn location(&self) -> CodeRange {
        let start = CodeRange::one_code_point(&self.open_brace);
        match self.statements.last() {
            Some(last) => start.to(&last.location()),
            None => start,
        }
    }
}

/// Statements allowed inside a block
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Var(VarStatement),
    Return(ReturnStatement),
    Expression(Expression),
}

impl Node for Statement {
    fn location(&self) -> CodeRange {
        match self {
            Statement::Var(v) => v.location(),
            Statement::Return(r) => r.location(),
            Statement::Expression(e) => e.location(),
        }
    }
}

/// `var name [type] [= value]`
#[derive(Debug, Clone, PartialEq)]
pub struct VarStatement {
    /// Location of `var`
    pub keyword: CodeRange,
    pub name: Name,
    pub ty: Option<Type>,
    pub value: Option<Expression>,
}

impl Node for VarStatement {
    fn location(&self) -> CodeRange {
        let end = match (&self.value, &self.ty) {
            (Some(value), _) => value.location(),
            (None, Some(ty)) => ty.location(),
            (None, None) => self.name.location.clone(),
        };
        self.keyword.to(&end)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    /// Location of `return`
    pub keyword: CodeRange,
    pub value: Option<Expression>,
}

impl Node for ReturnStatement {
    fn location(&self) -> CodeRange {
        match &self.value {
            Some(value) => self.keyword.to(&value.location()),
            None => self.keyword.clone(),
        }
    }
}

/// Expression nodes. Every expression may also stand alone as a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Prefix(PrefixExpression),
    Infix(InfixExpression),
    Call(CallExpression),
    Index(IndexExpression),
    Name(Name),
    Boolean(BooleanLiteral),
    String(StringLiteral),
    Number(NumberLiteral),
    Array(ArrayLiteral),
    Map(MapLiteral),
}

impl Node for Expression {
    fn location(&self) -> CodeRange {
        match self {
            Expression::Prefix(e) => e.location(),
            Expression::Infix(e) => e.location(),
            Expression::Call(e) => e.location(),
            Expression::Index(e) => e.location(),
            Expression::Name(e) => e.location.clone(),
            Expression::Boolean(e) => e.location.clone(),
            Expression::String(e) => e.location.clone(),
            Expression::Number(e) => e.location.clone(),
            Expression::Array(e) => e.location.clone(),
            Expression::Map(e) => e.location.clone(),
        }
    }
}

/// Prefix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOperator {
    Not,    // !x
    Neg,    // -x
    BitNot, // ~x
}

impl PrefixOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Bang => Some(PrefixOperator::Not),
            TokenKind::Minus => Some(PrefixOperator::Neg),
            TokenKind::Not => Some(PrefixOperator::BitNot),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PrefixOperator::Not => "!",
            PrefixOperator::Neg => "-",
            PrefixOperator::BitNot => "~",
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOperator {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    // Comparison
    Eq,
    Neq,
    Lt,
    Gt,
    Lte,
    Gte,
}

impl InfixOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(InfixOperator::Add),
            TokenKind::Minus => Some(InfixOperator::Sub),
            TokenKind::Mul => Some(InfixOperator::Mul),
            TokenKind::Div => Some(InfixOperator::Div),
            TokenKind::Eq => Some(InfixOperator::Eq),
            TokenKind::Neq => Some(InfixOperator::Neq),
            TokenKind::Lt => Some(InfixOperator::Lt),
            TokenKind::Gt => Some(InfixOperator::Gt),
            TokenKind::Lte => Some(InfixOperator::Lte),
            TokenKind::Gte => Some(InfixOperator::Gte),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InfixOperator::Add => "+",
            InfixOperator::Sub => "-",
            InfixOperator::Mul => "*",
            InfixOperator::Div => "/",
            InfixOperator::Eq => "==",
            InfixOperator::Neq => "!=",
            InfixOperator::Lt => "<",
            InfixOperator::Gt => ">",
            InfixOperator::Lte => "<=",
            InfixOperator::Gte => ">=",
        }
    }
}

impl fmt::Display for PrefixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for InfixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExpression {
    /// Location of the operator
    pub start: CodePointLocation,
    pub operator: PrefixOperator,
    pub right: Box<Expression>,
}

impl Node for PrefixExpression {
    fn location(&self) -> CodeRange {
        CodeRange::new(self.start.clone(), self.right.location().end)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfixExpression {
    pub left: Box<Expression>,
    pub operator: InfixOperator,
    pub right: Box<Expression>,
}

impl Node for InfixExpression {
    fn location(&self) -> CodeRange {
        self.left.location().to(&self.right.location())
    }
}

/// `function(arguments)`
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub function: Box<Expression>,
    pub arguments: Vec<Expression>,
    /// Just past the closing `)`
    pub end: CodePointLocation,
}

impl Node for CallExpression {
    fn location(&self) -> CodeRange {
        CodeRange::new(self.function.location().start, self.end.clone())
    }
}

/// `left[index]`
#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpression {
    pub left: Box<Expression>,
    pub index: Box<Expression>,
    /// Just past the closing `]`
    pub end: CodePointLocation,
}

impl Node for IndexExpression {
    fn location(&self) -> CodeRange {
        CodeRange::new(self.left.location().start, self.end.clone())
    }
}

/// A plain or backtick-wrapped identifier, stored without backticks
#[derive(Debug, Clone, PartialEq)]
pub struct Name {
    pub name: String,
    pub location: CodeRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanLiteral {
    pub value: bool,
    pub location: CodeRange,
}

/// String literal text as written between the quotes (escapes not decoded)
#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub value: String,
    pub location: CodeRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    Int,
    Float,
    Imaginary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberLiteral {
    pub kind: NumberKind,
    pub literal: String,
    pub location: CodeRange,
}

/// `[a, b, c]`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLiteral {
    pub elements: Vec<Expression>,
    pub location: CodeRange,
}

/// Map literal. The grammar does not produce these yet.
#[derive(Debug, Clone, PartialEq)]
pub struct MapLiteral {
    pub key_type: Type,
    pub value_type: Type,
    pub pairs: Vec<(Expression, Expression)>,
    pub location: CodeRange,
}

/// Type expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Primary(PrimaryType),
    Pointer(PointerType),
    Array(ArrayType),
    Custom(CustomType),
}

impl Node for Type {
    fn location(&self) -> CodeRange {
        match self {
            Type::Primary(t) => t.location.clone(),
            Type::Pointer(t) => CodeRange::new(t.start.clone(), t.pointee.location().end),
            Type::Array(t) => CodeRange::new(t.start.clone(), t.element.location().end),
            Type::Custom(t) => t.location.clone(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primary(t) => {
                let name = t.kind.name();
                write!(f, "PrimaryType({})", name.strip_suffix(" keyword").unwrap_or(name))
            }
            Type::Pointer(t) => write!(f, "PointerType({})", t.pointee),
            Type::Array(t) => write!(f, "ArrayType({})", t.element),
            Type::Custom(t) => write!(f, "CustomType({})", t.name),
        }
    }
}

/// One of the eight fixed-width integer keywords
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryType {
    pub kind: TokenKind,
    pub location: CodeRange,
}

/// `*T`
#[derive(Debug, Clone, PartialEq)]
pub struct PointerType {
    /// Location of `*`
    pub start: CodePointLocation,
    pub pointee: Box<Type>,
}

/// `[]T`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayType {
    /// Location of `[`
    pub start: CodePointLocation,
    pub element: Box<Type>,
}

/// Dotted type path such as `io.Reader`
#[derive(Debug, Clone, PartialEq)]
pub struct CustomType {
    pub name: String,
    pub location: CodeRange,
}
