//! Creator handle validation.

use crate::CoreError;

/// Longest handle the platform accepts.
pub const MAX_USERNAME_LEN: usize = 30;

/// Normalizes and validates a creator handle.
///
/// Surrounding whitespace and a single leading `@` are stripped. The remainder
/// must be 1–30 characters of letters, digits, underscores, or dots.
///
/// # Errors
///
/// Returns [`CoreError::EmptyUsername`] when nothing is left after trimming and
/// [`CoreError::InvalidUsername`] for length or character violations.
pub fn validate_username(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    let handle = trimmed.strip_prefix('@').unwrap_or(trimmed);

    if handle.is_empty() {
        return Err(CoreError::EmptyUsername);
    }

    if handle.chars().count() > MAX_USERNAME_LEN {
        return Err(CoreError::InvalidUsername {
            username: handle.to_string(),
            reason: format!("longer than {MAX_USERNAME_LEN} characters"),
        });
    }

    if let Some(bad) = handle
        .chars()
        .find(|c| !(c.is_alphanumeric() || *c == '_' || *c == '.'))
    {
        return Err(CoreError::InvalidUsername {
            username: handle.to_string(),
            reason: format!("unsupported character '{bad}'"),
        });
    }

    Ok(handle.to_string())
}
