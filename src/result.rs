//! Result text composition.
//!
//! The composed text is what the operator pastes into the dispatch log:
//! three labelled lines, plus one line per recipient annotation.

use crate::error::{Error, Result};
use crate::ocr::ExtractedFields;
use crate::status::StatusLabel;
use std::fmt;

pub const NAME_PREFIX: &str = "الاسم: ";
pub const CODE_PREFIX: &str = "الكود: ";
pub const STATUS_PREFIX: &str = "الحالة: ";
pub const RECIPIENT_PREFIX: &str = "المستلم/النائب: ";

/// Human-readable composed output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultText(String);

impl ResultText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a recipient/delegate line.
    ///
    /// Rejects empty or whitespace-only input without touching the text.
    /// Each call appends another line; nothing is de-duplicated.
    pub fn append_recipient(&mut self, recipient: &str) -> Result<()> {
        if recipient.trim().is_empty() {
            return Err(Error::EmptyRecipient);
        }
        self.0.push('\n');
        self.0.push_str(RECIPIENT_PREFIX);
        self.0.push_str(recipient);
        Ok(())
    }
}

impl fmt::Display for ResultText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build the three-line result: name, code, status.
pub fn compose(fields: &ExtractedFields, status: StatusLabel) -> ResultText {
    ResultText(format!(
        "{NAME_PREFIX}{}\n{CODE_PREFIX}{}\n{STATUS_PREFIX}{}",
        fields.name, fields.code, status
    ))
}
