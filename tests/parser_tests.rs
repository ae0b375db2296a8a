// Integration tests for the parser

use tinyc::diagnostics::{ProblemCode, ProblemHandler, Severity};
use tinyc::parser::ast::*;
use tinyc::parser::{parse_file, Parser, Precedence, TokenKind};

fn parse(source: &str) -> (Option<ProgramUnit>, ProblemHandler) {
    let mut problems = ProblemHandler::new();
    let (unit, _) = parse_file("main.tl", source.as_bytes(), &mut problems);
    (unit, problems)
}

#[test]
fn test_minimal_program_unit() {
    let (unit, problems) =
        parse(r#"namespace "app"; import "std/io"; fun main() { return true; }"#);

    assert!(problems.is_empty(), "{:?}", problems.problems());
    let unit = unit.expect("program unit");

    assert_eq!(unit.namespace.name, "app");
    let imports: Vec<&str> = unit.imports.iter().map(|i| i.path.as_str()).collect();
    assert_eq!(imports, vec!["std/io"]);
    assert_eq!(unit.statements.len(), 1);

    let TopLevelStatement::Function(main) = &unit.statements[0] else {
        panic!("expected function declaration");
    };
    assert_eq!(main.name, "main");
    assert!(main.arguments.is_empty());
    assert_eq!(main.body.statements.len(), 1);
    match &main.body.statements[0] {
        Statement::Return(ReturnStatement {
            value: Some(Expression::Boolean(literal)),
            ..
        }) => assert!(literal.value),
        other => panic!("expected `return true`, got {other:?}"),
    }
}

#[test]
fn test_unit_location_spans_declarations() {
    let source = "namespace \"app\";\n\npub fun f() {}\n";
    let (unit, _) = parse(source);
    let unit = unit.unwrap();
    assert_eq!(unit.location().byte_range(), 0..32);
    assert_eq!(&source[unit.statements[0].location().byte_range()], "pub fun f() {}");
}

#[test]
fn test_nested_type() {
    let mut problems = ProblemHandler::new();
    let ty = Parser::new("main.tl", b"*[]*int8", &mut problems).parse_type();
    assert_eq!(
        ty.map(|t| t.to_string()).as_deref(),
        Some("PointerType(ArrayType(PointerType(PrimaryType(int8))))")
    );
    assert!(problems.is_empty());
}

#[test]
fn test_missing_namespace() {
    let (unit, problems) = parse("fun main() {}");
    assert!(unit.is_none());
    assert!(!problems.ok());

    let first = &problems.problems()[0];
    assert_eq!(first.severity(), Severity::Error);
    assert_eq!(
        first.code(),
        &ProblemCode::UnexpectedToken {
            wanted: TokenKind::Namespace,
            got: TokenKind::Fun
        }
    );
}

#[test]
fn test_grouped_equality() {
    let mut problems = ProblemHandler::new();
    let expression = Parser::new("main.tl", b"(true + false) == true", &mut problems)
        .parse_expression(Precedence::Lowest);

    let Some(Expression::Infix(eq)) = expression else {
        panic!("expected infix expression");
    };
    assert_eq!(eq.operator, InfixOperator::Eq);
    assert!(matches!(*eq.right, Expression::Boolean(BooleanLiteral { value: true, .. })));

    let Expression::Infix(add) = *eq.left else {
        panic!("expected grouped addition");
    };
    assert_eq!(add.operator, InfixOperator::Add);
    assert!(matches!(*add.left, Expression::Boolean(BooleanLiteral { value: true, .. })));
    assert!(matches!(*add.right, Expression::Boolean(BooleanLiteral { value: false, .. })));
    assert!(problems.is_empty());
}

#[test]
fn test_function_body_statements() {
    let source = r#"
        namespace "app";

        // entry point
        pub fun main(args []*uint8, n int64) {
            var total int64 = n * 2 + 1;
            var buffer = [1, 2, 3];
            print(buffer[0], total);
            return;
        }
    "#;
    let (unit, problems) = parse(source);
    assert!(problems.is_empty(), "{:?}", problems.problems());

    let unit = unit.unwrap();
    let TopLevelStatement::Function(main) = &unit.statements[0] else {
        panic!("expected function declaration");
    };
    assert!(main.public);
    assert_eq!(main.arguments[0].ty.to_string(), "ArrayType(PointerType(PrimaryType(uint8)))");
    assert_eq!(main.body.statements.len(), 4);
    assert!(matches!(main.body.statements[0], Statement::Var(_)));
    assert!(matches!(
        main.body.statements[2],
        Statement::Expression(Expression::Call(ref call)) if call.arguments.len() == 2
    ));
    assert!(matches!(
        main.body.statements[3],
        Statement::Return(ReturnStatement { value: None, .. })
    ));
}

#[test]
fn test_sibling_declarations_survive_errors() {
    let source = r#"
        namespace "app";
        fun broken( { }
        fun ok() { return 1; }
    "#;
    let (unit, problems) = parse(source);
    let unit = unit.unwrap();

    assert!(!problems.ok());
    assert!(unit.statements.iter().any(|s| s.name() == "ok"));
}

#[test]
fn test_stray_top_level_tokens_warn() {
    let (unit, problems) = parse("namespace \"app\"; 1 + 2; fun f() {}");
    assert_eq!(unit.unwrap().statements.len(), 1);
    assert!(problems.ok());
    assert_eq!(problems.warning_count(), 1);
    assert_eq!(
        problems.problems()[0].code(),
        &ProblemCode::SkippedTopLevelTokens(TokenKind::Int)
    );
}

#[test]
fn test_unsupported_constructs_are_errors() {
    let (unit, problems) = parse("namespace \"app\"; struct S {} fun f() { a.b; }");
    let unit = unit.unwrap();
    assert_eq!(unit.statements.len(), 1);

    let codes: Vec<&ProblemCode> = problems.problems().iter().map(|p| p.code()).collect();
    assert_eq!(
        codes,
        vec![
            &ProblemCode::UnsupportedStructureDeclaration,
            &ProblemCode::UnsupportedMemberAccess
        ]
    );
}

#[test]
fn test_missing_expression_is_diagnosed() {
    let (_, problems) = parse("namespace \"app\"; fun f() { return * 2; }");
    assert_eq!(
        problems.problems()[0].code(),
        &ProblemCode::ExpectedExpression(TokenKind::Mul)
    );
}

#[test]
fn test_failed_statement_keeps_block_brace() {
    let source = "namespace \"a\";\nfun f() { return - }\nfun g() { return true }";
    let (unit, problems) = parse(source);
    let unit = unit.unwrap();

    let names: Vec<&str> = unit.statements.iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["f", "g"]);
    assert_eq!(
        &source[unit.statements[0].location().byte_range()],
        "fun f() { return - }"
    );

    assert_eq!(problems.len(), 1);
    assert_eq!(
        problems.problems()[0].code(),
        &ProblemCode::ExpectedExpression(TokenKind::CloseBrace)
    );
}
