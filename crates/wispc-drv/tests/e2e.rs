//! End-to-end scenarios run in-process through the driver's
//! `Session`/`Config` API rather than by spawning the compiled `wispc`
//! binary.

use std::io::Write;
use std::path::PathBuf;

use wispc_drv::{Config, Session};

fn write_program(dir: &tempfile::TempDir, name: &str, source: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(source.as_bytes()).unwrap();
    path
}

fn run(dir: &tempfile::TempDir, name: &str, source: &str) -> (String, i32) {
    let path = write_program(dir, name, source);
    let config = Config { input: path, emit: None, run: true, emit_ir: false, output: None, verbose: false };
    let mut session = Session::new(config);
    let mut out = Vec::new();
    let code = session.compile_into(&mut out).expect("no fatal error");
    (String::from_utf8(out).unwrap(), code)
}

#[test]
fn scenario_1_arithmetic_precedence() {
    let dir = tempfile::tempdir().unwrap();
    let (out, code) = run(&dir, "s1.wisp", "println 1 + 2 * 3");
    assert_eq!(out, "7\n");
    assert_eq!(code, 0);
}

#[test]
fn scenario_2_declaration_reassignment_mixed_arithmetic() {
    let dir = tempfile::tempdir().unwrap();
    let source = "a := 1 + 2 * 3\nprintln a\na = (a - 1) * (a + 1)\nprintln a";
    let (out, code) = run(&dir, "s2.wisp", source);
    assert_eq!(out, "7\n48\n");
    assert_eq!(code, 0);
}

#[test]
fn scenario_3_short_circuit_and() {
    let dir = tempfile::tempdir().unwrap();
    let (out, code) = run(&dir, "s3.wisp", "println (1 == 2) and (1/0 == 0)");
    assert_eq!(out, "0\n");
    assert_eq!(code, 0, "right operand of `and` must not raise a diagnosable division-by-zero");
}

#[test]
fn scenario_4_if_else_real_promotion() {
    let dir = tempfile::tempdir().unwrap();
    let source = "x := 2\nif x > 1\n    println 3.5\nelse\n    println 0";
    let (out, code) = run(&dir, "s4.wisp", source);
    assert_eq!(out, "3.500000\n");
    assert_eq!(code, 0);
}

#[test]
fn scenario_5_first_class_function_call_site_specialization() {
    let dir = tempfile::tempdir().unwrap();
    let source = "add := a, b -> a + b\nprintln add(2, 3)\nprintln add(2.5, 3)";
    let (out, _code) = run(&dir, "s5.wisp", source);
    assert_eq!(out, "5\n5.500000\n");
}

#[test]
fn scenario_6_indentation_delimited_block_function_body() {
    let dir = tempfile::tempdir().unwrap();
    let source = "f := x ->\n    y := x * 2\n    y + 1\nprintln f(4)";
    let (out, code) = run(&dir, "s6.wisp", source);
    assert_eq!(out, "9\n");
    assert_eq!(code, 0);
}

#[test]
fn undefined_variable_is_diagnosed_and_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let (out, code) = run(&dir, "undefined.wisp", "println missing");
    assert_eq!(out, "\n");
    assert_eq!(code, 1);
}

#[test]
fn missing_source_file_is_a_fatal_error() {
    let config = Config {
        input: PathBuf::from("/no/such/file.wisp"),
        emit: None,
        run: true,
        emit_ir: false,
        output: None,
        verbose: false,
    };
    let mut session = Session::new(config);
    let mut out = Vec::new();
    assert!(session.compile_into(&mut out).is_err());
}

#[test]
fn emit_ir_and_run_can_be_combined_in_one_invocation() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_program(&dir, "both.wisp", "println 1 + 2");
    let ir_path = dir.path().join("both.ir");
    let config = Config {
        input: path,
        emit: None,
        run: true,
        emit_ir: true,
        output: Some(ir_path.clone()),
        verbose: false,
    };
    let mut session = Session::new(config);
    let mut out = Vec::new();
    let code = session.compile_into(&mut out).unwrap();
    assert_eq!(code, 0);
    assert_eq!(String::from_utf8(out).unwrap(), "3\n");
    assert!(std::fs::read_to_string(&ir_path).unwrap().contains("define i32 @main()"));
}
