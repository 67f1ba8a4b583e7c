//! String literals.
//!
//! `"` ... `"`, body copied verbatim (no escape processing defined).
//! Reaching end of input before the closing quote is fatal
//! (`UnterminatedString` is not diagnosable, it aborts the whole run),
//! since there is no sane token boundary to recover at.

use wispc_util::{FatalError, FileId, Span};

use crate::Cursor;

pub fn scan(cursor: &mut Cursor, file: FileId) -> Result<String, FatalError> {
    debug_assert_eq!(cursor.peek(), b'"');
    let start_line = cursor.line();
    let start_col = cursor.column();
    cursor.bump();

    let mut text = String::new();
    loop {
        if cursor.is_at_end() {
            let span = Span::new(file, cursor.pos(), cursor.pos(), start_line, start_col);
            return Err(FatalError::UnterminatedString { span });
        }
        let b = cursor.peek();
        if b == b'"' {
            cursor.bump();
            return Ok(text);
        }
        text.push(cursor.bump() as char);
    }
}
