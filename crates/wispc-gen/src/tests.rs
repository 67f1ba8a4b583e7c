use bumpalo::Bump;
use inkwell::context::Context;
use wispc_lex::Lexer;
use wispc_sem::TypeChecker;
use wispc_util::{FileId, Handler, Interner};

use super::CodeGenerator;

fn emit(source: &str) -> (String, Handler) {
    let arena = Bump::new();
    let mut interner = Interner::new();
    let mut handler = Handler::new();
    let tokens = Lexer::new(source, FileId::DUMMY)
        .tokenize(&mut interner, &mut handler)
        .expect("no fatal error");
    let ast = wispc_par::Parser::new(tokens, &mut handler, &interner, &arena).parse();
    TypeChecker::new(&mut handler).check_program(&ast);

    let context = Context::create();
    let mut codegen = CodeGenerator::new(&context, "test_module", &interner, &mut handler);
    codegen.run(&ast).expect("codegen must not hit an LLVM operation failure");
    (codegen.emit_ir(), handler)
}

#[test]
fn emits_a_verified_main_function() {
    let (ir, handler) = emit("println 1 + 2 * 3");
    assert!(!handler.has_errors());
    assert!(ir.contains("define i32 @main()"));
    assert!(ir.contains("declare i32 @printf"));
    assert!(ir.contains("call i32 (ptr, ...) @printf"));
}

#[test]
fn mixed_arithmetic_promotes_to_float_ir() {
    let (ir, handler) = emit("println 1 + 2.5");
    assert!(!handler.has_errors());
    assert!(ir.contains("sitofp"));
    assert!(ir.contains("fadd"));
}

#[test]
fn and_short_circuit_builds_three_blocks_and_a_phi() {
    let (ir, handler) = emit("println (1 == 2) and (3 == 3)");
    assert!(!handler.has_errors());
    assert!(ir.contains("logical.rhs:"));
    assert!(ir.contains("logical.end:"));
    assert!(ir.contains("phi i1"));
}

#[test]
fn if_else_builds_then_else_end_blocks() {
    let (ir, handler) = emit("x := 2\nif x > 1\n    println 1\nelse\n    println 0");
    assert!(!handler.has_errors());
    assert!(ir.contains("if.then:"));
    assert!(ir.contains("if.else:"));
    assert!(ir.contains("if.end:"));
}

#[test]
fn named_function_is_emitted_once_and_called_directly() {
    // Both calls share the same argument types, so only one function
    // signature is ever compiled for this Func node and it verifies clean.
    let (ir, handler) = emit("add := a, b -> a + b\nprintln add(2, 3)\nprintln add(4, 5)");
    assert!(!handler.has_errors());
    let defines = ir.matches("define i32 @add").count();
    assert_eq!(defines, 1, "a Func node must be compiled to exactly one LLVM function");
    assert!(ir.contains("call i32 @add"));
}

#[test]
fn string_literal_becomes_a_private_global() {
    let (ir, handler) = emit(r#"println "hello""#);
    assert!(!handler.has_errors());
    assert!(ir.contains("private"));
    assert!(ir.contains("c\"hello\\00\""));
}

#[test]
fn top_level_declaration_becomes_a_global_not_an_alloca() {
    let (ir, handler) = emit("a := 1 + 2\na = a * 3\nprintln a");
    assert!(!handler.has_errors());
    assert_eq!(ir.matches("alloca i32").count(), 0);
    assert!(ir.contains("global.a"));
}

#[test]
fn function_local_declaration_still_allocates_at_entry() {
    let (ir, handler) = emit("f := x ->\n    a := x + 2\n    a = a * 3\n    a\nprintln f(1)");
    assert!(!handler.has_errors());
    assert_eq!(ir.matches("alloca i32").count(), 2);
}

#[test]
fn closure_over_a_non_parameter_top_level_variable_verifies() {
    let (ir, handler) = emit("x := 5\nf := () -> x + 1\nprintln f()");
    assert!(!handler.has_errors(), "closing over a top-level variable must not fail IR verification");
    assert!(ir.contains("global.x"));
    assert!(ir.contains("define i32 @f()"));
}

#[test]
fn undefined_variable_is_diagnosed_but_does_not_abort_emission() {
    let (ir, handler) = emit("println missing");
    assert!(handler.has_errors());
    assert!(ir.contains("define i32 @main()"));
}
