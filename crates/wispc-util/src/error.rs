//! Fatal, non-diagnostic error conditions.
//!
//! Most problems a wispc pass encounters are *diagnostic*: they get pushed
//! to a [`crate::Handler`] and the pass carries on. A small
//! set of conditions can't be recovered from at all (the input file doesn't
//! exist, a string literal never closes, writing `output.ir` fails); those
//! surface as `Err(FatalError)` from the relevant entry point instead.

use std::path::PathBuf;

use thiserror::Error;

/// A condition that stops the pipeline outright rather than being collected
/// as a diagnostic and continuing.
#[derive(Debug, Error)]
pub enum FatalError {
    #[error("cannot open input file {path}: {source}")]
    CannotOpenInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unterminated string literal at {span:?}")]
    UnterminatedString { span: crate::Span },

    #[error("failed to write IR artifact {path}: {source}")]
    CannotWriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
