//! Declaration parsing implementation
//!
//! This module handles everything outside function bodies:
//!
//! - The mandatory `namespace "name";` header and `import "path";` lines
//! - Function declarations: `[pub] fun name(arg type, ...) { ... }`
//! - Structure declarations (recognised and skipped, not supported yet)
//! - Types: integer keywords, pointers, arrays and dotted custom names
//!
//! # Grammar
//!
//! ```text
//! program_unit ::= namespace import* top_level*
//! namespace    ::= "namespace" string ";"
//! import       ::= "import" string ";"
//! top_level    ::= "pub"? (function | structure)
//! function     ::= "fun" identifier "(" (argument ("," argument)*)? ")" block
//! argument     ::= identifier type
//! type         ::= int_keyword | "*" type | "[" "]" type | identifier ("." identifier)*
//! ```

use crate::diagnostics::{CodeRange, ProblemCode};
use crate::parser::ast::*;
use crate::parser::parse::{identifier_name, Parser};
use crate::parser::token::TokenKind;
use std::rc::Rc;
use tracing::debug;

impl<'a> Parser<'a> {
    /// Parse a whole file.
    ///
    /// Returns `None` when the namespace header is missing or malformed;
    /// problems in later declarations only drop those declarations.
    pub fn parse_program_unit(&mut self) -> Option<ProgramUnit> {
        let namespace = self.parse_namespace()?;

        let mut imports = Vec::new();
        while self.peek_is(TokenKind::Import) {
            self.advance();
            if let Some(import) = self.parse_import() {
                imports.push(import);
            }
        }

        self.advance();

        let mut statements = Vec::new();
        while !self.current_is(TokenKind::Eof) {
            if let Some(statement) = self.parse_top_level_statement() {
                statements.push(statement);
            }
            self.advance();
        }

        debug!(
            namespace = %namespace.name,
            imports = imports.len(),
            declarations = statements.len(),
            "parsed program unit"
        );

        Some(ProgramUnit {
            file: Rc::clone(&namespace.location.start.file),
            namespace,
            imports,
            statements,
        })
    }

    fn parse_namespace(&mut self) -> Option<NamespaceDecl> {
        self.expect_current(TokenKind::Namespace)?;
        let start = self.current.location.clone();

        self.expect_peek(TokenKind::String)?;
        let name = self.current.literal.clone();

        self.expect_peek(TokenKind::Semicolon)?;

        Some(NamespaceDecl {
            name,
            location: start.to(&self.current.location),
        })
    }

    fn parse_import(&mut self) -> Option<Import> {
        let start = self.current.location.clone();

        self.expect_peek(TokenKind::String)?;
        let path = self.current.literal.clone();

        self.expect_peek(TokenKind::Semicolon)?;

        Some(Import {
            path,
            location: start.to(&self.current.location),
        })
    }

    fn parse_top_level_statement(&mut self) -> Option<TopLevelStatement> {
        match self.current.kind {
            TokenKind::Pub => {
                let visibility = self.current.location.clone();
                match self.peek.kind {
                    TokenKind::Fun => {
                        self.advance();
                        self.parse_function(Some(visibility))
                            .map(TopLevelStatement::Function)
                    }
                    TokenKind::Struct => {
                        self.advance();
                        self.parse_structure(Some(visibility))
                            .map(TopLevelStatement::Structure)
                    }
                    other => {
                        let location = self.peek.location.clone();
                        self.error(location, ProblemCode::UnexpectedTokenNoExpectation(other));
                        None
                    }
                }
            }
            TokenKind::Fun => self.parse_function(None).map(TopLevelStatement::Function),
            TokenKind::Struct => self
                .parse_structure(None)
                .map(TopLevelStatement::Structure),
            _ => {
                self.skip_top_level_tokens();
                None
            }
        }
    }

    /// Skip a run of tokens that cannot start a declaration, with one warning.
    fn skip_top_level_tokens(&mut self) {
        let first = self.current.kind;
        let start = self.current.location.clone();

        while !matches!(
            self.peek.kind,
            TokenKind::Pub | TokenKind::Fun | TokenKind::Struct | TokenKind::Eof
        ) {
            self.advance();
        }

        let location = start.to(&self.current.location);
        self.warning(location, ProblemCode::SkippedTopLevelTokens(first));
    }

    fn parse_function(&mut self, visibility: Option<CodeRange>) -> Option<FunctionDeclaration> {
        let public = visibility.is_some();
        let start = visibility.unwrap_or_else(|| self.current.location.clone());

        self.expect_peek(TokenKind::Identifier)?;
        let name = identifier_name(&self.current.literal);

        self.expect_peek(TokenKind::OpenParen)?;
        let arguments = self.parse_function_arguments()?;

        self.expect_peek(TokenKind::OpenBrace)?;
        let body = self.parse_block()?;

        debug!(name = %name, public, arguments = arguments.len(), "parsed function declaration");

        Some(FunctionDeclaration {
            location: start.to(&self.current.location),
            public,
            name,
            arguments,
            body,
        })
    }

    /// `(a int8, b *T)`, starting at `(` and ending at `)`.
    fn parse_function_arguments(&mut self) -> Option<Vec<FunctionArgument>> {
        let mut arguments = Vec::new();

        if self.expect_peek_no_err(TokenKind::CloseParen) {
            return Some(arguments);
        }

        loop {
            self.expect_peek(TokenKind::Identifier)?;
            let name_location = self.current.location.clone();
            let name = identifier_name(&self.current.literal);

            self.advance();
            let ty = self.parse_type()?;

            arguments.push(FunctionArgument {
                location: name_location.to(&ty.location()),
                name,
                ty,
            });

            if !self.expect_peek_no_err(TokenKind::Comma) {
                break;
            }
        }

        self.expect_peek(TokenKind::CloseParen)?;
        Some(arguments)
    }

    /// Structure bodies are not supported yet: the declaration is reported
    /// and its balanced `{ ... }` body skipped.
    fn parse_structure(&mut self, visibility: Option<CodeRange>) -> Option<StructureDeclaration> {
        let start = visibility.unwrap_or_else(|| self.current.location.clone());
        self.expect_peek_no_err(TokenKind::Identifier);

        let location = start.to(&self.current.location);
        self.error(location, ProblemCode::UnsupportedStructureDeclaration);

        if self.expect_peek_no_err(TokenKind::OpenBrace) {
            let mut depth = 1;
            while depth > 0 && !self.peek_is(TokenKind::Eof) {
                self.advance();
                match self.current.kind {
                    TokenKind::OpenBrace => depth += 1,
                    TokenKind::CloseBrace => depth -= 1,
                    _ => {}
                }
            }
        }
        self.expect_peek_no_err(TokenKind::Semicolon);

        None
    }

    /// Parse a type starting at the current token.
    pub fn parse_type(&mut self) -> Option<Type> {
        match self.current.kind {
            kind if kind.is_primary_type() => Some(Type::Primary(PrimaryType {
                kind,
                location: self.current.location.clone(),
            })),
            TokenKind::Mul => {
                let start = self.current.location.start.clone();
                self.advance();
                let pointee = self.parse_type()?;
                Some(Type::Pointer(PointerType {
                    start,
                    pointee: Box::new(pointee),
                }))
            }
            TokenKind::OpenBracket => {
                let start = self.current.location.start.clone();
                self.expect_peek(TokenKind::CloseBracket)?;
                self.advance();
                let element = self.parse_type()?;
                Some(Type::Array(ArrayType {
                    start,
                    element: Box::new(element),
                }))
            }
            TokenKind::Identifier => {
                let start = self.current.location.clone();
                let mut name = identifier_name(&self.current.literal);

                while self.expect_peek_no_err(TokenKind::Dot) {
                    self.expect_peek(TokenKind::Identifier)?;
                    name.push('.');
                    name.push_str(&identifier_name(&self.current.literal));
                }

                Some(Type::Custom(CustomType {
                    name,
                    location: start.to(&self.current.location),
                }))
            }
            other => {
                let location = self.current.location.clone();
                self.error(location, ProblemCode::UnexpectedTokenNoExpectation(other));
                None
            }
        }
    }
}
