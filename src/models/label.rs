//! Display labels shared by competitors and tournaments.

use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum LabelError {
    #[error("label must not be empty or contain only whitespace characters")]
    Empty,
}

/// Trim surrounding whitespace and reject labels that end up empty.
pub fn trimmed_label(raw: &str) -> Result<String, LabelError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LabelError::Empty);
    }
    Ok(trimmed.to_owned())
}
