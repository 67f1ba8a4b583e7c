//! Edge case tests for wispc-par

#[cfg(test)]
mod tests {
    use bumpalo::Bump;
    use wispc_lex::Lexer;
    use wispc_util::{FileId, Handler, Interner};

    use crate::ast::{Ast, Expr, LogicalOp, Type};
    use crate::Parser;

    fn parse_source<'arena>(
        source: &str,
        arena: &'arena Bump,
        interner: &mut Interner,
        handler: &mut Handler,
    ) -> Ast<'arena> {
        let tokens =
            Lexer::new(source, FileId::DUMMY).tokenize(interner, handler).expect("no fatal error");
        let mut parser = Parser::new(tokens, handler, interner, arena);
        parser.parse()
    }

    #[test]
    fn empty_source_has_no_top_level_expressions() {
        let arena = Bump::new();
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        let ast = parse_source("", &arena, &mut interner, &mut handler);
        assert!(ast.is_empty());
        assert!(!handler.has_errors());
    }

    #[test]
    fn whitespace_only() {
        let arena = Bump::new();
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        let ast = parse_source("   \n\t  \n  ", &arena, &mut interner, &mut handler);
        assert!(ast.is_empty());
    }

    #[test]
    fn arithmetic_precedence() {
        let arena = Bump::new();
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        let ast = parse_source("println 1 + 2 * 3", &arena, &mut interner, &mut handler);
        assert_eq!(ast.len(), 1);
        match ast[0] {
            Expr::Println { values, .. } => assert_eq!(values.len(), 1),
            other => panic!("expected Println, got {other:?}"),
        }
    }

    #[test]
    fn declaration_and_reassignment() {
        let arena = Bump::new();
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        let ast = parse_source(
            "a := 1 + 2 * 3\nprintln a\na = (a - 1) * (a + 1)\nprintln a",
            &arena,
            &mut interner,
            &mut handler,
        );
        assert_eq!(ast.len(), 4);
        assert!(matches!(ast[0], Expr::NewVar { .. }));
        assert!(matches!(ast[2], Expr::VarAssign { .. }));
    }

    #[test]
    fn short_circuit_and_keeps_parenthesized_operands_as_one_arg() {
        let arena = Bump::new();
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        let ast = parse_source(
            "println (1 == 2) and (1/0 == 0)",
            &arena,
            &mut interner,
            &mut handler,
        );
        assert_eq!(ast.len(), 1);
        match ast[0] {
            Expr::Println { values, .. } => {
                assert_eq!(values.len(), 1, "the whole 'and' expression is a single argument");
                assert!(matches!(values[0], Expr::Logical { op: LogicalOp::And, .. }));
            }
            other => panic!("expected Println, got {other:?}"),
        }
    }

    #[test]
    fn if_else_blocks_bound_by_indentation() {
        let arena = Bump::new();
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        let ast = parse_source(
            "x := 2\nif x > 1\n    println 3.5\nelse\n    println 0",
            &arena,
            &mut interner,
            &mut handler,
        );
        assert_eq!(ast.len(), 2);
        match ast[1] {
            Expr::IfElse { then_block, else_block, .. } => {
                match then_block {
                    Expr::Block { exprs, .. } => assert_eq!(exprs.len(), 1),
                    other => panic!("expected Block, got {other:?}"),
                }
                assert!(else_block.is_some());
            }
            other => panic!("expected IfElse, got {other:?}"),
        }
    }

    #[test]
    fn function_head_tolerates_no_parens_and_multiple_params() {
        let arena = Bump::new();
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        let ast =
            parse_source("add := a, b -> a + b", &arena, &mut interner, &mut handler);
        assert_eq!(ast.len(), 1);
        match ast[0] {
            Expr::NewVar { init, .. } => {
                assert!(matches!(init, Expr::Func { .. }));
                if let Expr::Func { params, .. } = init {
                    assert_eq!(params.len(), 2);
                }
            }
            other => panic!("expected NewVar, got {other:?}"),
        }
    }

    #[test]
    fn indentation_delimited_multi_statement_block() {
        let arena = Bump::new();
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        let ast = parse_source(
            "f := x ->\n    y := x * 2\n    y + 1\nprintln f(4)",
            &arena,
            &mut interner,
            &mut handler,
        );
        assert_eq!(ast.len(), 2);
        match ast[0] {
            Expr::NewVar { init: Expr::Func { body, .. }, .. } => match body {
                Expr::Block { exprs, .. } => assert_eq!(exprs.len(), 2),
                other => panic!("expected Block body, got {other:?}"),
            },
            other => panic!("expected NewVar(Func), got {other:?}"),
        }
    }

    #[test]
    fn missing_rparen_is_diagnosed_but_recovers() {
        let arena = Bump::new();
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        let ast = parse_source("println (1 + 2", &arena, &mut interner, &mut handler);
        assert_eq!(ast.len(), 1);
        assert!(handler.has_errors());
    }

    #[test]
    fn keyword_followed_by_punctuation_lexes_as_identifier() {
        // "if(" has no whitespace/EOF boundary after "if", so the lexer
        // yields IDENTIFIER "if" rather than the IF keyword; the parser
        // then sees a bare identifier, not an if-expression.
        let arena = Bump::new();
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        let ast = parse_source("if(x)", &arena, &mut interner, &mut handler);
        assert_eq!(ast.len(), 1);
        assert!(!matches!(ast[0], Expr::IfElse { .. }));
    }

    #[test]
    fn integer_literal_has_type_set_at_parse_time() {
        let arena = Bump::new();
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        let ast = parse_source("1", &arena, &mut interner, &mut handler);
        assert_eq!(ast[0].ty(), Type::I32);
    }
}
