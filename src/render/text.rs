//! Plain text rendering.

use crate::document::PAGE_SEPARATOR;

/// Join page texts the way whole-document reads do.
pub fn to_text<S: AsRef<str>>(pages: &[(u32, S)]) -> String {
    pages
        .iter()
        .map(|(_, text)| text.as_ref())
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
}
