//! Type lowering: `BOOL -> i1`, `I32 -> i32`, `R64 -> double`, `STR -> ptr`,
//! `FUNC -> ptr`, `VOID -> void`.
//!
//! `TypeMapper` is a thin wrapper carrying the `Context` so callers don't
//! need to thread it separately through every lowering call.

use inkwell::context::Context;
use inkwell::types::BasicTypeEnum;
use inkwell::AddressSpace;

use wispc_par::ast::Type;

pub struct TypeMapper<'ctx> {
    context: &'ctx Context,
}

impl<'ctx> TypeMapper<'ctx> {
    pub fn new(context: &'ctx Context) -> Self {
        Self { context }
    }

    /// Maps every type except `Void`, which has no `BasicTypeEnum` (it can
    /// only appear as a function's return type).
    pub fn basic_type(&self, ty: Type) -> BasicTypeEnum<'ctx> {
        match ty {
            Type::Bool => self.context.bool_type().into(),
            Type::I32 => self.context.i32_type().into(),
            Type::R64 => self.context.f64_type().into(),
            Type::Str => self.context.ptr_type(AddressSpace::default()).into(),
            Type::Func => self.context.ptr_type(AddressSpace::default()).into(),
            Type::Void => unreachable!("Void has no basic (value-carrying) LLVM type"),
        }
    }
}
