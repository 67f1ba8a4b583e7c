//! Error types for LLVM code generation, narrowed to the conditions the
//! AST-to-LLVM walker can actually hit.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodeGenError {
    #[error("LLVM operation failed: {0}")]
    LlvmOperationFailed(String),

    #[error("function '{0}' not found")]
    FunctionNotFound(String),

    #[error("module verification failed: {0}")]
    VerificationFailed(String),

    #[error("failed to write IR artifact: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CodeGenError>;
