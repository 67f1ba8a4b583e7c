//! Line comments.

use crate::Cursor;

/// If the cursor sits on `//`, consumes through (not including) the next
/// `\n` or end of input and returns `true`. Produces no token — the comment
/// simply never reaches the parser.
pub fn try_consume(cursor: &mut Cursor) -> bool {
    if !cursor.starts_with("//") {
        return false;
    }
    cursor.bump();
    cursor.bump();
    while !cursor.is_at_end() && cursor.peek() != b'\n' {
        cursor.bump();
    }
    true
}
