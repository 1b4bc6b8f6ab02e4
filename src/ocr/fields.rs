//! Field extraction from recognized slip text.
//!
//! A slip carries the operator name on its first printed line and the
//! unit code on the second. Everything after that is ignored.

/// Substituted for `name` when the text has no non-blank line.
pub const UNKNOWN_NAME: &str = "غير معروف";

/// Substituted for `code` when the text has fewer than two non-blank lines.
pub const MISSING_CODE: &str = "---";

/// Name/code pair taken from the first two non-blank lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFields {
    pub name: String,
    pub code: String,
}

/// Split recognized text into trimmed, non-empty lines.
fn non_blank_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty())
}

/// Pick `name` and `code` out of raw OCR output.
///
/// Never fails: missing lines fall back to [`UNKNOWN_NAME`] and
/// [`MISSING_CODE`].
pub fn extract_fields(text: &str) -> ExtractedFields {
    let mut lines = non_blank_lines(text);
    let name = lines.next().unwrap_or(UNKNOWN_NAME).to_string();
    let code = lines.next().unwrap_or(MISSING_CODE).to_string();
    ExtractedFields { name, code }
}
