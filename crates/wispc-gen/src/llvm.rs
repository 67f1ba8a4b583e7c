//! Per-expression LLVM IR lowering, split out from `lib.rs` even though both
//! are one `impl CodeGenerator` in spirit.

use inkwell::values::{BasicValue, BasicValueEnum, FunctionValue, PointerValue};
use inkwell::{FloatPredicate, IntPredicate};

use wispc_par::ast::{BinaryOp, CompareOp, Expr, LogicalOp, Type, UnaryOp};
use wispc_util::diagnostic::E_GEN_MISSING_GLOBAL;
use wispc_util::Span;

use crate::error::{CodeGenError, Result};
use crate::CodeGenerator;

/// `None` stands for a `Void`-typed result — there is no `BasicValueEnum`
/// for `void`, so absent-`else` branches and similar dead ends come through
/// as `None` rather than forcing a fabricated value.
type Val<'ctx> = Option<BasicValueEnum<'ctx>>;

impl<'ctx, 'a, 'h> CodeGenerator<'ctx, 'a, 'h> {
    pub(crate) fn gen_expr(&mut self, expr: &'a Expr<'a>) -> Result<Val<'ctx>> {
        match expr {
            Expr::Bool { value, .. } => {
                Ok(Some(self.context.bool_type().const_int(*value as u64, false).into()))
            }
            Expr::Int32 { value, .. } => {
                Ok(Some(self.context.i32_type().const_int(*value as u32 as u64, true).into()))
            }
            Expr::Real64 { value, .. } => {
                Ok(Some(self.context.f64_type().const_float(*value).into()))
            }
            Expr::Str { value, .. } => Ok(Some(self.get_or_create_string_global(*value)?.into())),

            Expr::Var { name, span, .. } => match self.lookup_variable(*name) {
                Some(ptr) => {
                    let ty = self.type_mapper.basic_type(expr.ty());
                    let loaded = self
                        .builder
                        .build_load(ty, ptr, "load_var")
                        .map_err(|e| CodeGenError::LlvmOperationFailed(format!("load var: {e}")))?;
                    Ok(Some(loaded))
                }
                None => {
                    self.handler.error(E_GEN_MISSING_GLOBAL, "undefined variable", *span);
                    Ok(None)
                }
            },

            Expr::NewVar { name, init, .. } => {
                let top_level = self.at_top_level();
                if let Expr::Func { .. } = init {
                    let f = self.gen_func(init, &self.resolve_name(*name))?;
                    self.define_function(*name, f);
                    let ptr_ty = self.type_mapper.basic_type(Type::Func);
                    let slot = if top_level {
                        self.build_global_slot(ptr_ty, &format!("global.{}", self.resolve_name(*name)))?
                    } else {
                        self.build_entry_alloca(ptr_ty, "fn_slot")?
                    };
                    self.builder
                        .build_store(slot, f.as_global_value().as_pointer_value())
                        .map_err(|e| CodeGenError::LlvmOperationFailed(format!("store fn: {e}")))?;
                    if top_level {
                        self.define_global(*name, slot);
                    } else {
                        self.define_variable(*name, slot);
                    }
                    return Ok(Some(f.as_global_value().as_pointer_value().into()));
                }
                let value = self.gen_expr(init)?;
                let ty = self.type_mapper.basic_type(init.ty());
                let slot = if top_level {
                    self.build_global_slot(ty, &format!("global.{}", self.resolve_name(*name)))?
                } else {
                    self.build_entry_alloca(ty, "var_slot")?
                };
                if let Some(v) = value {
                    self.builder
                        .build_store(slot, v)
                        .map_err(|e| CodeGenError::LlvmOperationFailed(format!("store var: {e}")))?;
                }
                if top_level {
                    self.define_global(*name, slot);
                } else {
                    self.define_variable(*name, slot);
                }
                Ok(value)
            }

            Expr::VarAssign { name, value, span, .. } => {
                let v = self.gen_expr(value)?;
                match (self.lookup_variable(*name), v) {
                    (Some(slot), Some(v)) => {
                        self.builder.build_store(slot, v).map_err(|e| {
                            CodeGenError::LlvmOperationFailed(format!("store assign: {e}"))
                        })?;
                    }
                    (None, _) => {
                        self.handler.error(
                            E_GEN_MISSING_GLOBAL,
                            "assignment to undeclared variable",
                            *span,
                        );
                    }
                    _ => {}
                }
                Ok(v)
            }

            Expr::Unary { op, operand, span, .. } => self.gen_unary(*op, operand, *span),
            Expr::Binary { op, left, right, span, .. } => self.gen_binary(*op, left, right, *span),
            Expr::Comparison { op, left, right, span, .. } => {
                self.gen_comparison(*op, left, right, *span)
            }
            Expr::Logical { op, left, right, span, .. } => self.gen_logical(*op, left, right, *span),
            Expr::IfElse { cond, then_block, else_block, .. } => {
                self.gen_if_else(cond, then_block, *else_block, expr.ty())
            }
            Expr::Block { exprs, .. } => {
                let mut last = None;
                for e in *exprs {
                    last = self.gen_expr(e)?;
                }
                Ok(last)
            }
            Expr::Func { .. } => {
                let name = self.fresh_anon_name();
                let f = self.gen_func(expr, &name)?;
                Ok(Some(f.as_global_value().as_pointer_value().into()))
            }
            Expr::Call { callee, args, span, .. } => self.gen_call(callee, args, *span, expr.ty()),
            Expr::Println { values, .. } => Ok(Some(self.gen_println(values)?.into())),
        }
    }

    fn resolve_name(&self, name: wispc_util::Symbol) -> String {
        self.interner.resolve(name).to_string()
    }

    fn gen_unary(&mut self, op: UnaryOp, operand: &'a Expr<'a>, span: Span) -> Result<Val<'ctx>> {
        let Some(v) = self.gen_expr(operand)? else { return Ok(None) };
        let result = match (op, v) {
            (UnaryOp::Plus, v) => v,
            (UnaryOp::Minus, BasicValueEnum::IntValue(i)) => self
                .builder
                .build_int_neg(i, "neg")
                .map_err(|e| CodeGenError::LlvmOperationFailed(format!("neg: {e}")))?
                .into(),
            (UnaryOp::Minus, BasicValueEnum::FloatValue(f)) => self
                .builder
                .build_float_neg(f, "fneg")
                .map_err(|e| CodeGenError::LlvmOperationFailed(format!("fneg: {e}")))?
                .into(),
            (UnaryOp::Not, BasicValueEnum::IntValue(i)) => self
                .builder
                .build_not(i, "not")
                .map_err(|e| CodeGenError::LlvmOperationFailed(format!("not: {e}")))?
                .into(),
            (_, v) => v,
        };
        let _ = span;
        Ok(Some(result))
    }

    /// If either operand is floating, the integer operand is
    /// signed-int-to-float-converted; then the floating variant of the
    /// operator is emitted; otherwise the integer variant is emitted.
    fn gen_binary(
        &mut self,
        op: BinaryOp,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
        span: Span,
    ) -> Result<Val<'ctx>> {
        let (Some(lv), Some(rv)) = (self.gen_expr(left)?, self.gen_expr(right)?) else {
            return Ok(None);
        };
        let floating = left.ty() == Type::R64 || right.ty() == Type::R64;
        if floating {
            let lf = self.to_float(lv)?;
            let rf = self.to_float(rv)?;
            let result = match op {
                BinaryOp::Add => self.builder.build_float_add(lf, rf, "fadd"),
                BinaryOp::Sub => self.builder.build_float_sub(lf, rf, "fsub"),
                BinaryOp::Mul => self.builder.build_float_mul(lf, rf, "fmul"),
                BinaryOp::Div => self.builder.build_float_div(lf, rf, "fdiv"),
            }
            .map_err(|e| CodeGenError::LlvmOperationFailed(format!("float binop: {e}")))?;
            Ok(Some(result.into()))
        } else {
            let li = lv.into_int_value();
            let ri = rv.into_int_value();
            let result = match op {
                BinaryOp::Add => self.builder.build_int_add(li, ri, "add"),
                BinaryOp::Sub => self.builder.build_int_sub(li, ri, "sub"),
                BinaryOp::Mul => self.builder.build_int_mul(li, ri, "mul"),
                BinaryOp::Div => self.builder.build_int_signed_div(li, ri, "sdiv"),
            }
            .map_err(|e| CodeGenError::LlvmOperationFailed(format!("int binop: {e}")))?;
            let _ = span;
            Ok(Some(result.into()))
        }
    }

    fn to_float(&self, v: BasicValueEnum<'ctx>) -> Result<inkwell::values::FloatValue<'ctx>> {
        match v {
            BasicValueEnum::FloatValue(f) => Ok(f),
            BasicValueEnum::IntValue(i) => self
                .builder
                .build_signed_int_to_float(i, self.context.f64_type(), "sitofp")
                .map_err(|e| CodeGenError::LlvmOperationFailed(format!("sitofp: {e}"))),
            _ => Err(CodeGenError::LlvmOperationFailed("non-numeric operand".into())),
        }
    }

    /// Comparisons use signed integer predicates for `I32`/`Bool` operands
    /// and ordered-float predicates when either side is `R64`.
    fn gen_comparison(
        &mut self,
        op: CompareOp,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
        span: Span,
    ) -> Result<Val<'ctx>> {
        let (Some(lv), Some(rv)) = (self.gen_expr(left)?, self.gen_expr(right)?) else {
            return Ok(None);
        };
        let floating = left.ty() == Type::R64 || right.ty() == Type::R64;
        let result = if floating {
            let lf = self.to_float(lv)?;
            let rf = self.to_float(rv)?;
            let pred = match op {
                CompareOp::Eq => FloatPredicate::OEQ,
                CompareOp::Ne => FloatPredicate::ONE,
                CompareOp::Lt => FloatPredicate::OLT,
                CompareOp::Le => FloatPredicate::OLE,
                CompareOp::Gt => FloatPredicate::OGT,
                CompareOp::Ge => FloatPredicate::OGE,
            };
            self.builder
                .build_float_compare(pred, lf, rf, "fcmp")
                .map_err(|e| CodeGenError::LlvmOperationFailed(format!("fcmp: {e}")))?
        } else {
            let li = lv.into_int_value();
            let ri = rv.into_int_value();
            let pred = match op {
                CompareOp::Eq => IntPredicate::EQ,
                CompareOp::Ne => IntPredicate::NE,
                CompareOp::Lt => IntPredicate::SLT,
                CompareOp::Le => IntPredicate::SLE,
                CompareOp::Gt => IntPredicate::SGT,
                CompareOp::Ge => IntPredicate::SGE,
            };
            self.builder
                .build_int_compare(pred, li, ri, "icmp")
                .map_err(|e| CodeGenError::LlvmOperationFailed(format!("icmp: {e}")))?
        };
        let _ = span;
        Ok(Some(result.into()))
    }

    /// Each `and`/`or` expands to three basic blocks (left, right, end)
    /// joined by a `phi`.
    fn gen_logical(
        &mut self,
        op: LogicalOp,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
        span: Span,
    ) -> Result<Val<'ctx>> {
        let function = self.current_function.expect("logical expr only inside a function body");
        let right_block = self.context.append_basic_block(function, "logical.rhs");
        let end_block = self.context.append_basic_block(function, "logical.end");

        let Some(lv) = self.gen_expr(left)? else { return Ok(None) };
        let lv_bool = lv.into_int_value();
        let left_block = self.builder.get_insert_block().expect("builder always has a block");

        match op {
            LogicalOp::Or => self.builder.build_conditional_branch(lv_bool, end_block, right_block),
            LogicalOp::And => self.builder.build_conditional_branch(lv_bool, right_block, end_block),
        }
        .map_err(|e| CodeGenError::LlvmOperationFailed(format!("logical branch: {e}")))?;

        self.builder.position_at_end(right_block);
        let rv = self.gen_expr(right)?;
        let rv_bool = rv
            .map(|v| v.into_int_value())
            .unwrap_or_else(|| self.context.bool_type().const_int(0, false));
        let rhs_end = self.builder.get_insert_block().expect("builder always has a block");
        self.builder
            .build_unconditional_branch(end_block)
            .map_err(|e| CodeGenError::LlvmOperationFailed(format!("logical join: {e}")))?;

        self.builder.position_at_end(end_block);
        let phi = self
            .builder
            .build_phi(self.context.bool_type(), "logical.phi")
            .map_err(|e| CodeGenError::LlvmOperationFailed(format!("logical phi: {e}")))?;
        phi.add_incoming(&[(&lv_bool, left_block), (&rv_bool, rhs_end)]);
        let _ = span;
        Ok(Some(phi.as_basic_value()))
    }

    /// `then`, `else`, `endIf` blocks, both branches jumping unconditionally
    /// to `endIf`. When the result type is `Void` (no `else`, or both
    /// branches are statement blocks), no `phi` is built.
    fn gen_if_else(
        &mut self,
        cond: &'a Expr<'a>,
        then_block: &'a Expr<'a>,
        else_block: Option<&'a Expr<'a>>,
        result_ty: Type,
    ) -> Result<Val<'ctx>> {
        let function = self.current_function.expect("if/else only inside a function body");
        let then_bb = self.context.append_basic_block(function, "if.then");
        let else_bb = self.context.append_basic_block(function, "if.else");
        let end_bb = self.context.append_basic_block(function, "if.end");

        let Some(cond_v) = self.gen_expr(cond)? else { return Ok(None) };
        self.builder
            .build_conditional_branch(cond_v.into_int_value(), then_bb, else_bb)
            .map_err(|e| CodeGenError::LlvmOperationFailed(format!("if branch: {e}")))?;

        self.builder.position_at_end(then_bb);
        let then_v = self.gen_expr(then_block)?;
        let then_end = self.builder.get_insert_block().expect("builder always has a block");
        self.builder
            .build_unconditional_branch(end_bb)
            .map_err(|e| CodeGenError::LlvmOperationFailed(format!("if join: {e}")))?;

        self.builder.position_at_end(else_bb);
        let else_v = match else_block {
            Some(e) => self.gen_expr(e)?,
            None => None,
        };
        let else_end = self.builder.get_insert_block().expect("builder always has a block");
        self.builder
            .build_unconditional_branch(end_bb)
            .map_err(|e| CodeGenError::LlvmOperationFailed(format!("if join: {e}")))?;

        self.builder.position_at_end(end_bb);
        if result_ty == Type::Void {
            return Ok(None);
        }
        let ty = self.type_mapper.basic_type(result_ty);
        let phi = self
            .builder
            .build_phi(ty, "if.phi")
            .map_err(|e| CodeGenError::LlvmOperationFailed(format!("if phi: {e}")))?;
        let then_incoming = then_v.unwrap_or_else(|| zero_of(ty));
        let else_incoming = else_v.unwrap_or_else(|| zero_of(ty));
        phi.add_incoming(&[(&then_incoming, then_end), (&else_incoming, else_end)]);
        Ok(Some(phi.as_basic_value()))
    }

    /// Creates the LLVM function for a `Func` node the first time it is
    /// reached; later references reuse the cached value, since
    /// monomorphization means there is exactly one signature to emit.
    pub(crate) fn gen_func(&mut self, func_expr: &'a Expr<'a>, name_hint: &str) -> Result<FunctionValue<'ctx>> {
        let key = func_expr as *const Expr<'a> as usize;
        if let Some(f) = self.compiled_funcs.get(&key) {
            return Ok(*f);
        }
        let Expr::Func { params, body, param_types, ret_type, .. } = func_expr else {
            unreachable!("gen_func is only ever called with a Func node");
        };

        let param_types = param_types.borrow();
        let param_basic_types: Vec<inkwell::types::BasicMetadataTypeEnum<'ctx>> = params
            .iter()
            .enumerate()
            .map(|(i, _)| {
                let ty = param_types.get(i).copied().unwrap_or(Type::I32);
                self.type_mapper.basic_type(ty).into()
            })
            .collect();

        let ret = ret_type.get();
        let fn_type = if ret == Type::Void {
            self.context.void_type().fn_type(&param_basic_types, false)
        } else {
            self.type_mapper.basic_type(ret).fn_type(&param_basic_types, false)
        };
        let function = self.module.add_function(name_hint, fn_type, None);

        let saved_block = self.builder.get_insert_block();
        let saved_function = self.current_function;

        let entry = self.context.append_basic_block(function, "entry");
        self.builder.position_at_end(entry);
        self.current_function = Some(function);
        self.push_scope();

        for (i, param_sym) in params.iter().enumerate() {
            let param_val = function.get_nth_param(i as u32).expect("param count matches signature");
            let ty = param_val.get_type();
            let slot = self.build_entry_alloca(ty, "param_slot")?;
            self.builder
                .build_store(slot, param_val)
                .map_err(|e| CodeGenError::LlvmOperationFailed(format!("store param: {e}")))?;
            self.define_variable(*param_sym, slot);
        }

        let body_val = self.gen_expr(body)?;
        if ret == Type::Void {
            self.builder
                .build_return(None)
                .map_err(|e| CodeGenError::LlvmOperationFailed(format!("fn return: {e}")))?;
        } else {
            let v = body_val.unwrap_or_else(|| zero_of(self.type_mapper.basic_type(ret)));
            self.builder
                .build_return(Some(&v))
                .map_err(|e| CodeGenError::LlvmOperationFailed(format!("fn return: {e}")))?;
        }

        self.pop_scope();
        self.current_function = saved_function;
        if let Some(block) = saved_block {
            self.builder.position_at_end(block);
        }

        self.compiled_funcs.insert(key, function);
        Ok(function)
    }

    /// Direct call when the callee statically names a known function;
    /// otherwise an indirect call through a loaded function pointer with an
    /// ad-hoc signature built from the argument types.
    fn gen_call(
        &mut self,
        callee: &'a Expr<'a>,
        args: &'a [&'a Expr<'a>],
        span: Span,
        result_ty: Type,
    ) -> Result<Val<'ctx>> {
        let direct = match callee {
            Expr::Var { name, .. } => self.lookup_function(*name),
            Expr::Func { .. } => {
                let name = self.fresh_anon_name();
                Some(self.gen_func(callee, &name)?)
            }
            _ => None,
        };

        let mut arg_values = Vec::with_capacity(args.len());
        for a in args {
            if let Some(v) = self.gen_expr(a)? {
                arg_values.push(inkwell::values::BasicMetadataValueEnum::from(v));
            }
        }

        let call_site = if let Some(function) = direct {
            self.builder
                .build_call(function, &arg_values, "call")
                .map_err(|e| CodeGenError::LlvmOperationFailed(format!("direct call: {e}")))?
        } else {
            let Some(callee_v) = self.gen_expr(callee)? else { return Ok(None) };
            let ptr = callee_v.into_pointer_value();
            let arg_basic_types: Vec<inkwell::types::BasicMetadataTypeEnum<'ctx>> =
                args.iter().map(|a| self.type_mapper.basic_type(a.ty()).into()).collect();
            let fn_type = if result_ty == Type::Void {
                self.context.void_type().fn_type(&arg_basic_types, false)
            } else {
                self.type_mapper.basic_type(result_ty).fn_type(&arg_basic_types, false)
            };
            self.builder
                .build_indirect_call(fn_type, ptr, &arg_values, "icall")
                .map_err(|e| CodeGenError::LlvmOperationFailed(format!("indirect call: {e}")))?
        };

        let _ = span;
        Ok(call_site.try_as_basic_value().left())
    }

    /// Builds (once per unique format) a global constant format string
    /// composed of per-argument specifiers, comma-joined with a trailing
    /// `\n`, then emits a call to `@printf`.
    fn gen_println(&mut self, values: &'a [&'a Expr<'a>]) -> Result<BasicValueEnum<'ctx>> {
        let spec: Vec<&str> = values
            .iter()
            .map(|v| match v.ty() {
                Type::R64 => "%f",
                Type::Str => "%s",
                _ => "%i",
            })
            .collect();
        let format = format!("{}\n", spec.join(", "));
        let fmt_ptr = self.get_or_create_format_global(&format)?;

        let mut printf_args: Vec<inkwell::values::BasicMetadataValueEnum<'ctx>> = vec![fmt_ptr.into()];
        for v in values {
            let Some(val) = self.gen_expr(v)? else { continue };
            let val = if v.ty() == Type::Bool {
                self.builder
                    .build_int_z_extend(val.into_int_value(), self.context.i32_type(), "bool_zext")
                    .map_err(|e| CodeGenError::LlvmOperationFailed(format!("bool zext: {e}")))?
                    .into()
            } else {
                val
            };
            printf_args.push(val.into());
        }

        let call = self
            .builder
            .build_call(self.printf, &printf_args, "printf_call")
            .map_err(|e| CodeGenError::LlvmOperationFailed(format!("printf call: {e}")))?;
        Ok(call
            .try_as_basic_value()
            .left()
            .unwrap_or_else(|| self.context.i32_type().const_int(0, false).into()))
    }

    fn get_or_create_string_global(&mut self, sym: wispc_util::Symbol) -> Result<PointerValue<'ctx>> {
        if let Some(ptr) = self.string_globals.get(&sym) {
            return Ok(*ptr);
        }
        let text = self.interner.resolve(sym);
        let ptr = self.build_const_string_global(text, &format!("str.{}", self.string_globals.len()))?;
        self.string_globals.insert(sym, ptr);
        Ok(ptr)
    }

    fn get_or_create_format_global(&mut self, format: &str) -> Result<PointerValue<'ctx>> {
        if let Some(ptr) = self.format_globals.get(format) {
            return Ok(*ptr);
        }
        let ptr =
            self.build_const_string_global(format, &format!("fmt.{}", self.format_globals.len()))?;
        self.format_globals.insert(format.to_string(), ptr);
        Ok(ptr)
    }

    /// A top-level `NewVar`'s slot: a module `GlobalVariable` rather than an
    /// alloca, since a nested `Func` body closing over it needs a pointer
    /// that stays valid outside the function that declared it.
    fn build_global_slot(
        &mut self,
        ty: inkwell::types::BasicTypeEnum<'ctx>,
        name: &str,
    ) -> Result<PointerValue<'ctx>> {
        let global = self.module.add_global(ty, None, name);
        global.set_initializer(&zero_of(ty));
        global.set_linkage(inkwell::module::Linkage::Private);
        Ok(global.as_pointer_value())
    }

    fn build_const_string_global(&mut self, text: &str, name: &str) -> Result<PointerValue<'ctx>> {
        let constant = self.context.const_string(text.as_bytes(), true);
        let global = self.module.add_global(constant.get_type(), None, name);
        global.set_initializer(&constant);
        global.set_constant(true);
        global.set_linkage(inkwell::module::Linkage::Private);
        Ok(global.as_pointer_value())
    }
}

fn zero_of<'ctx>(ty: inkwell::types::BasicTypeEnum<'ctx>) -> BasicValueEnum<'ctx> {
    use inkwell::types::BasicTypeEnum::*;
    match ty {
        IntType(t) => t.const_int(0, false).into(),
        FloatType(t) => t.const_float(0.0).into(),
        PointerType(t) => t.const_null().into(),
        ArrayType(t) => t.const_zero().into(),
        StructType(t) => t.const_zero().into(),
        VectorType(t) => t.const_zero().into(),
    }
}
