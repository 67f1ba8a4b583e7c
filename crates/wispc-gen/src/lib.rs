//! wispc-gen - LLVM IR emitter
//!
//! Walks the typed AST directly into an `inkwell` module — there is no
//! intermediate MIR/LIR stage: lowering goes straight from typed AST to
//! LLVM IR, so the backend's code-generation shape is applied directly to
//! `Expr` nodes rather than to a separate lowered instruction form.

pub mod error;
mod llvm;
pub mod types;
#[cfg(test)]
mod tests;

use inkwell::builder::Builder;
use inkwell::context::Context;
use inkwell::module::{Linkage, Module};
use inkwell::values::{FunctionValue, PointerValue};
use inkwell::AddressSpace;

use wispc_par::ast::Expr;
use wispc_util::diagnostic::E_GEN_VERIFY_FAILED;
use wispc_util::{FxHashMap, Handler, Interner, Symbol};

use error::{CodeGenError, Result};
use types::TypeMapper;

/// One lexical rib of codegen-time bindings: a variable's stack slot, and
/// (separately) the subset of variables that are known-monomorphic
/// functions, so `gen_call` can tell a direct call from an indirect one.
#[derive(Default)]
struct Rib<'ctx> {
    variables: FxHashMap<Symbol, PointerValue<'ctx>>,
    functions: FxHashMap<Symbol, FunctionValue<'ctx>>,
}

pub struct CodeGenerator<'ctx, 'a, 'h> {
    context: &'ctx Context,
    module: Module<'ctx>,
    builder: Builder<'ctx>,
    type_mapper: TypeMapper<'ctx>,
    interner: &'a Interner,
    handler: &'h mut Handler,

    scopes: Vec<Rib<'ctx>>,
    current_function: Option<FunctionValue<'ctx>>,
    main_fn: Option<FunctionValue<'ctx>>,

    /// Top-level declarations, keyed independently of `scopes`: a module
    /// global's pointer is valid from every function, unlike an alloca from
    /// `scopes`, which is only valid inside the function that owns it.
    globals: FxHashMap<Symbol, PointerValue<'ctx>>,

    /// A `Func` AST node is compiled to an LLVM function at most once,
    /// since call-site monomorphization gives it exactly one signature for
    /// the whole run; keyed by the node's arena address.
    compiled_funcs: FxHashMap<usize, FunctionValue<'ctx>>,
    string_globals: FxHashMap<Symbol, PointerValue<'ctx>>,
    format_globals: FxHashMap<String, PointerValue<'ctx>>,
    anon_fn_counter: u32,

    printf: FunctionValue<'ctx>,
}

impl<'ctx, 'a, 'h> CodeGenerator<'ctx, 'a, 'h> {
    pub fn new(
        context: &'ctx Context,
        module_name: &str,
        interner: &'a Interner,
        handler: &'h mut Handler,
    ) -> Self {
        let module = context.create_module(module_name);
        let builder = context.create_builder();

        let ptr_type = context.ptr_type(AddressSpace::default());
        let printf_type = context.i32_type().fn_type(&[ptr_type.into()], true);
        let printf = module.add_function("printf", printf_type, Some(Linkage::External));

        Self {
            context,
            module,
            builder,
            type_mapper: TypeMapper::new(context),
            interner,
            handler,
            scopes: Vec::new(),
            current_function: None,
            main_fn: None,
            globals: FxHashMap::default(),
            compiled_funcs: FxHashMap::default(),
            string_globals: FxHashMap::default(),
            format_globals: FxHashMap::default(),
            anon_fn_counter: 0,
            printf,
        }
    }

    /// Lowers the whole top-level program into `i32 @main()`, terminated by
    /// `ret i32 0`, then verifies every emitted function. Verification
    /// failures are reported as diagnostics rather than aborting emission.
    pub fn run(&mut self, program: &[&'a Expr<'a>]) -> Result<()> {
        let main_type = self.context.i32_type().fn_type(&[], false);
        let main_fn = self.module.add_function("main", main_type, None);
        let entry = self.context.append_basic_block(main_fn, "entry");
        self.builder.position_at_end(entry);
        self.current_function = Some(main_fn);
        self.main_fn = Some(main_fn);
        self.push_scope();

        for expr in program {
            self.gen_expr(expr)?;
        }

        self.pop_scope();
        self.builder
            .build_return(Some(&self.context.i32_type().const_int(0, false)))
            .map_err(|e| CodeGenError::LlvmOperationFailed(format!("terminating main: {e}")))?;

        self.verify_all();
        Ok(())
    }

    fn verify_all(&mut self) {
        let mut fn_opt = self.module.get_first_function();
        while let Some(f) = fn_opt {
            if !f.verify(false) {
                self.handler.error(
                    E_GEN_VERIFY_FAILED,
                    format!("function '{}' failed verification", f.get_name().to_string_lossy()),
                    wispc_util::Span::DUMMY,
                );
            }
            fn_opt = f.get_next_function();
        }
    }

    pub fn emit_ir(&self) -> String {
        self.module.print_to_string().to_string()
    }

    /// Writes the textual IR to `path` with Unix line endings —
    /// `print_to_string` already only ever emits `\n`, so no translation is
    /// needed on any platform this runs on.
    pub fn write_ir_to_file(&self, path: &std::path::Path) -> Result<()> {
        std::fs::write(path, self.emit_ir())?;
        Ok(())
    }

    fn push_scope(&mut self) {
        self.scopes.push(Rib::default());
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    fn define_variable(&mut self, name: Symbol, ptr: PointerValue<'ctx>) {
        self.scopes.last_mut().expect("at least one scope is always active").variables.insert(name, ptr);
    }

    fn define_global(&mut self, name: Symbol, ptr: PointerValue<'ctx>) {
        self.globals.insert(name, ptr);
    }

    fn define_function(&mut self, name: Symbol, f: FunctionValue<'ctx>) {
        self.scopes.last_mut().expect("at least one scope is always active").functions.insert(name, f);
    }

    /// Globals are checked first: a nested `Func` never shadows one of its
    /// own outer top-level variables with a same-named rib entry, since
    /// params and locals are defined into `scopes`, never into `globals`.
    fn lookup_variable(&self, name: Symbol) -> Option<PointerValue<'ctx>> {
        self.globals.get(&name).copied().or_else(|| {
            self.scopes.iter().rev().find_map(|rib| rib.variables.get(&name).copied())
        })
    }

    /// A `NewVar` reached while `main`'s body is being emitted directly
    /// (not from inside a nested `Func`) is a top-level declaration and
    /// becomes a module global instead of a function-local alloca.
    fn at_top_level(&self) -> bool {
        self.current_function.is_some() && self.current_function == self.main_fn
    }

    fn lookup_function(&self, name: Symbol) -> Option<FunctionValue<'ctx>> {
        self.scopes.iter().rev().find_map(|rib| rib.functions.get(&name).copied())
    }

    /// Allocates at the top of the current function's entry block rather
    /// than at the builder's current position, so every variable gets a
    /// stack slot placed at the top of the enclosing function.
    fn build_entry_alloca(
        &mut self,
        ty: inkwell::types::BasicTypeEnum<'ctx>,
        name: &str,
    ) -> Result<PointerValue<'ctx>> {
        let function = self.current_function.expect("alloca only happens inside a function body");
        let entry = function.get_first_basic_block().expect("function always has an entry block");

        let scratch = self.context.create_builder();
        match entry.get_first_instruction() {
            Some(first) => scratch.position_before(&first),
            None => scratch.position_at_end(entry),
        }
        scratch
            .build_alloca(ty, name)
            .map_err(|e| CodeGenError::LlvmOperationFailed(format!("alloca '{name}': {e}")))
    }

    fn fresh_anon_name(&mut self) -> String {
        self.anon_fn_counter += 1;
        format!("wisp_anon_fn_{}", self.anon_fn_counter)
    }
}
