//! Number literals.
//!
//! `[0-9][0-9_]*(\.[0-9_]+)?` — a digit sequence, underscores skipped as
//! separators, at most one `.` expected. A second (or later) `.` is
//! diagnosed (`E_LEX_TWO_DOTS`) but recovered from by swallowing the extra
//! dot and continuing to scan digits into the same token, so `1.2.3` lexes
//! as one `Number("1.23")` rather than splitting at the second dot.

use wispc_util::diagnostic::E_LEX_TWO_DOTS;
use wispc_util::{FileId, Handler, Span};

use crate::cursor::is_digit;
use crate::Cursor;

pub struct ScannedNumber {
    /// The literal with separator underscores stripped, ready for
    /// `str::parse`.
    pub text: String,
    pub is_real: bool,
}

pub fn scan(cursor: &mut Cursor, handler: &mut Handler, file: FileId) -> ScannedNumber {
    let mut text = String::new();
    let mut is_real = false;

    scan_digits(cursor, &mut text);

    if cursor.peek() == b'.' {
        is_real = true;
        cursor.bump();
        text.push('.');
        scan_digits(cursor, &mut text);

        while cursor.peek() == b'.' {
            let start = cursor.pos();
            let line = cursor.line();
            let column = cursor.column();
            let span = Span::new(file, start, start + 1, line, column);
            handler.error(E_LEX_TWO_DOTS, "number literal has more than one '.'", span);
            cursor.bump();
            scan_digits(cursor, &mut text);
        }
    }

    ScannedNumber { text, is_real }
}

fn scan_digits(cursor: &mut Cursor, out: &mut String) {
    loop {
        let b = cursor.peek();
        if is_digit(b) {
            out.push(b as char);
            cursor.bump();
        } else if b == b'_' {
            cursor.bump();
        } else {
            break;
        }
    }
}
