//! Field checks shared by the entity modules

use crate::error::{LibraryError, Result};

/// Trim `value`, rejecting it if nothing is left
pub(crate) fn require_non_blank(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LibraryError::InvalidArgument(format!(
            "{} cannot be blank",
            field
        )));
    }
    Ok(trimmed.to_string())
}
