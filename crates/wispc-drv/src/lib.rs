//! wispc-drv - the compiler driver.
//!
//! Sequences lexer -> parser -> type pass, then runs whichever walkers the
//! `Config` asks for: printing an intermediate representation, running the
//! tree-walking evaluator, and/or emitting LLVM IR. `Config`/`Session` are
//! narrowed to one file per invocation (no incremental cache, no
//! multi-file linking) and widened with `tracing` spans around each pass.

use std::io;
use std::path::{Path, PathBuf};

use bumpalo::Bump;
use thiserror::Error;

use wispc_util::span::SourceMap;
use wispc_util::{FatalError, Handler, Interner};

/// Which intermediate representation to print and stop after, plus `Ir`
/// for dumping LLVM IR straight to stdout instead of `output.ir`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EmitKind {
    Tokens,
    Ast,
    Ir,
}

/// Parsed CLI options for one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub emit: Option<EmitKind>,
    pub run: bool,
    pub emit_ir: bool,
    pub output: Option<PathBuf>,
    pub verbose: bool,
}

impl Config {
    /// Path the IR artifact is written to when `emit_ir` is set and no
    /// explicit `-o` override was given (default `output.ir`).
    pub fn output_path(&self) -> &Path {
        self.output.as_deref().unwrap_or(Path::new("output.ir"))
    }
}

/// Errors that stop the driver outright rather than accumulating as
/// diagnostics: the fatal conditions from `wispc-util`, plus unrecoverable
/// LLVM backend failures.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Fatal(#[from] FatalError),

    #[error(transparent)]
    CodeGen(#[from] wispc_gen::error::CodeGenError),
}

/// Holds the state that lives for one compiler invocation: the parsed
/// configuration, the loaded source text, and the diagnostic handler every
/// pass reports into.
pub struct Session {
    pub config: Config,
    pub sources: SourceMap,
    pub handler: Handler,
    pub interner: Interner,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self { config, sources: SourceMap::new(), handler: Handler::new(), interner: Interner::new() }
    }

    /// Runs the whole pipeline for `config.input`, returning the process
    /// exit code on success (0 clean, 1 if any `Error`-level diagnostic was
    /// collected along the way) or `Err` for the small set of conditions
    /// that are fatal rather than diagnosable.
    pub fn compile(&mut self) -> Result<i32, DriverError> {
        let mut stdout = io::stdout();
        self.compile_into(&mut stdout)
    }

    /// Same pipeline as [`Session::compile`], but the evaluator writes
    /// `Println` output to `out` instead of always going to the real
    /// process stdout — lets integration tests assert on end-to-end output
    /// by calling the driver in-process (SPEC_FULL.md §8) instead of
    /// spawning the compiled binary.
    pub fn compile_into(&mut self, out: &mut dyn io::Write) -> Result<i32, DriverError> {
        let text = std::fs::read_to_string(&self.config.input).map_err(|source| {
            FatalError::CannotOpenInput { path: self.config.input.clone(), source }
        })?;
        let file_id = self.sources.add_file(self.config.input.display().to_string(), text);
        let source_text = self.sources.get(file_id).text.clone();

        let tokens = {
            let _span = tracing::debug_span!("lex").entered();
            wispc_lex::Lexer::new(&source_text, file_id)
                .tokenize(&mut self.interner, &mut self.handler)?
        };
        tracing::info!(tokens = tokens.len(), "lexed");

        if self.config.emit == Some(EmitKind::Tokens) {
            for token in &tokens {
                println!("{token:?}");
            }
            return Ok(self.finish());
        }

        let arena = Bump::new();
        let ast = {
            let _span = tracing::debug_span!("parse").entered();
            wispc_par::Parser::new(tokens, &mut self.handler, &self.interner, &arena).parse()
        };
        tracing::info!(nodes = ast.len(), "parsed");

        if self.config.emit == Some(EmitKind::Ast) {
            for node in &ast {
                println!("{node:#?}");
            }
            return Ok(self.finish());
        }

        {
            let _span = tracing::debug_span!("typecheck").entered();
            wispc_sem::TypeChecker::new(&mut self.handler).check_program(&ast);
        }

        if self.config.run {
            let _span = tracing::debug_span!("eval").entered();
            let mut evaluator = wispc_eval::Evaluator::new(&mut self.handler, &self.interner, out);
            evaluator.run(&ast);
        }

        if self.config.emit_ir || self.config.emit == Some(EmitKind::Ir) {
            let _span = tracing::debug_span!("codegen").entered();
            let context = inkwell::context::Context::create();
            let module_name =
                self.config.input.file_stem().and_then(|s| s.to_str()).unwrap_or("wisp_module");
            let mut codegen =
                wispc_gen::CodeGenerator::new(&context, module_name, &self.interner, &mut self.handler);
            codegen.run(&ast)?;

            if self.config.emit == Some(EmitKind::Ir) {
                println!("{}", codegen.emit_ir());
            } else {
                codegen.write_ir_to_file(self.config.output_path()).map_err(|e| match e {
                    wispc_gen::error::CodeGenError::Io(source) => DriverError::Fatal(
                        FatalError::CannotWriteOutput { path: self.config.output_path().to_path_buf(), source },
                    ),
                    other => DriverError::CodeGen(other),
                })?;
            }
        }

        Ok(self.finish())
    }

    /// Prints every collected diagnostic to stderr and computes the exit
    /// code.
    fn finish(&self) -> i32 {
        if self.handler.has_errors() {
            self.handler.print_all();
            1
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn config(path: &Path, run: bool, emit_ir: bool) -> Config {
        Config { input: path.to_path_buf(), emit: None, run, emit_ir, output: None, verbose: false }
    }

    fn write_source(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn compiles_clean_program_to_exit_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(&dir, "ok.wisp", "println 1 + 2 * 3");
        let mut session = Session::new(config(&path, true, false));
        let code = session.compile().unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn undefined_variable_yields_exit_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(&dir, "bad.wisp", "println missing");
        let mut session = Session::new(config(&path, true, false));
        let code = session.compile().unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn missing_input_file_is_fatal() {
        let mut session = Session::new(config(Path::new("/no/such/file.wisp"), true, false));
        assert!(session.compile().is_err());
    }

    #[test]
    fn emit_ir_writes_artifact_with_main_function() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(&dir, "ir.wisp", "println 1 + 2");
        let out_path = dir.path().join("out.ir");
        let mut cfg = config(&path, false, true);
        cfg.output = Some(out_path.clone());
        let mut session = Session::new(cfg);
        let code = session.compile().unwrap();
        assert_eq!(code, 0);
        let ir = std::fs::read_to_string(&out_path).unwrap();
        assert!(ir.contains("define i32 @main()"));
    }
}
