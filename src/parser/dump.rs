//! Text dumps of syntax trees
//!
//! Declarations dump as indented, tab-nested blocks:
//!
//! ```text
//! ProgramUnit(
//!     filepath="main.tl",
//!     namespace=Namespace(name=app),
//!     imports=[]
//! )
//! ```
//!
//! Statements, expressions and types are short enough to print on one line
//! through their `Display` impls.

use super::ast::*;
use std::fmt;

/// Multi-line rendering of a node.
///
/// The first line is not indented (the caller has already positioned it);
/// every following line is indented relative to `level` tabs and the closing
/// parenthesis sits at exactly `level` tabs.
pub trait Dump {
    fn dump(&self, level: usize) -> String;
}

fn tabs(level: usize) -> String {
    "\t".repeat(level)
}

/// `[...]` with one item per line, closing at `level` tabs.
fn dump_list<T: Dump>(items: &[T], level: usize) -> String {
    if items.is_empty() {
        return "[]".to_string();
    }

    let mut out = String::from("[\n");
    for (i, item) in items.iter().enumerate() {
        out.push_str(&tabs(level + 1));
        out.push_str(&item.dump(level + 1));
        if i + 1 != items.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str(&tabs(level));
    out.push(']');
    out
}

/// Writes a `Name(field=value, ...)` block with one field per line.
fn dump_fields(name: &str, fields: &[(&str, String)], level: usize) -> String {
    let inner = tabs(level + 1);
    let mut out = format!("{name}(\n");
    for (i, (field, value)) in fields.iter().enumerate() {
        out.push_str(&inner);
        out.push_str(field);
        out.push('=');
        out.push_str(value);
        if i + 1 != fields.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str(&tabs(level));
    out.push(')');
    out
}

impl Dump for ProgramUnit {
    fn dump(&self, level: usize) -> String {
        let inner = tabs(level + 1);
        let mut out = String::from("ProgramUnit(\n");

        out.push_str(&format!("{inner}filepath=\"{}\",\n", self.file));
        out.push_str(&format!(
            "{inner}namespace={},\n",
            self.namespace.dump(level + 1)
        ));

        out.push_str(&format!(
            "{inner}imports={}",
            dump_list(&self.imports, level + 1)
        ));

        if !self.statements.is_empty() {
            out.push_str(&format!(
                ",\n{inner}statements={}",
                dump_list(&self.statements, level + 1)
            ));
        }

        out.push('\n');
        out.push_str(&tabs(level));
        out.push(')');
        out
    }
}

impl Dump for NamespaceDecl {
    fn dump(&self, _level: usize) -> String {
        format!("Namespace(name={})", self.name)
    }
}

impl Dump for Import {
    fn dump(&self, level: usize) -> String {
        dump_fields(
            "Import",
            &[
                ("path", format!("\"{}\"", self.path)),
                ("location", self.location.dump()),
            ],
            level,
        )
    }
}

impl Dump for TopLevelStatement {
    fn dump(&self, level: usize) -> String {
        match self {
            TopLevelStatement::Function(f) => f.dump(level),
            TopLevelStatement::Structure(s) => s.dump(level),
        }
    }
}

impl Dump for FunctionDeclaration {
    fn dump(&self, level: usize) -> String {
        dump_fields(
            "FunctionDeclaration",
            &[
                ("name", self.name.clone()),
                ("public", self.public.to_string()),
                ("arguments", dump_list(&self.arguments, level + 1)),
                ("body", self.body.dump(level + 1)),
                ("location", self.location.dump()),
            ],
            level,
        )
    }
}

impl Dump for FunctionArgument {
    fn dump(&self, level: usize) -> String {
        dump_fields(
            "FunctionArgument",
            &[
                ("name", self.name.clone()),
                ("type", self.ty.to_string()),
                ("location", self.location.dump()),
            ],
            level,
        )
    }
}

impl Dump for StructureDeclaration {
    fn dump(&self, level: usize) -> String {
        dump_fields(
            "StructureDeclaration",
            &[
                ("name", self.name.clone()),
                ("public", self.public.to_string()),
                ("members", dump_list(&self.members, level + 1)),
                ("functions", dump_list(&self.functions, level + 1)),
                ("location", self.location.dump()),
            ],
            level,
        )
    }
}

impl Dump for StructureMember {
    fn dump(&self, _level: usize) -> String {
        format!(
            "StructureMember(name={}, type={}, public={}, readonly={})",
            self.name, self.ty, self.public, self.readonly
        )
    }
}

impl Dump for StatementsBlock {
    fn dump(&self, level: usize) -> String {
        dump_fields(
            "StatementsBlock",
            &[("statements", dump_list(&self.statements, level + 1))],
            level,
        )
    }
}

impl Dump for Statement {
    fn dump(&self, _level: usize) -> String {
        self.to_string()
    }
}

/// `a, b, c`
struct Joined<'a, T>(&'a [T]);

impl<T: fmt::Display> fmt::Display for Joined<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Var(var) => {
                write!(f, "VarStatement(name={}", var.name.name)?;
                if let Some(ty) = &var.ty {
                    write!(f, ", type={ty}")?;
                }
                if let Some(value) = &var.value {
                    write!(f, ", value={value}")?;
                }
                f.write_str(")")
            }
            Statement::Return(ret) => match &ret.value {
                Some(value) => write!(f, "ReturnStatement(value={value})"),
                None => f.write_str("ReturnStatement()"),
            },
            Statement::Expression(expression) => write!(f, "{expression}"),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Prefix(e) => write!(f, "PrefixExpression({}{})", e.operator, e.right),
            Expression::Infix(e) => {
                write!(f, "InfixExpression({} {} {})", e.left, e.operator, e.right)
            }
            Expression::Call(e) => {
                write!(f, "CallExpression({}, [{}])", e.function, Joined(&e.arguments))
            }
            Expression::Index(e) => write!(f, "IndexExpression({}, {})", e.left, e.index),
            Expression::Name(e) => write!(f, "Name({})", e.name),
            Expression::Boolean(e) => write!(f, "BooleanLiteral({})", e.value),
            Expression::String(e) => write!(f, "StringLiteral(\"{}\")", e.value),
            Expression::Number(e) => write!(f, "NumberLiteral({})", e.literal),
            Expression::Array(e) => write!(f, "ArrayLiteral([{}])", Joined(&e.elements)),
            Expression::Map(e) => {
                write!(f, "MapLiteral({}, {}, [", e.key_type, e.value_type)?;
                for (i, (key, value)) in e.pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("])")
            }
        }
    }
}
