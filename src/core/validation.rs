//! Input validation for hangar operations.
//!
//! Validates names, addresses and ports before they reach the store.

use crate::core::constants::{COPY_SUFFIX, MAX_NAME_LEN};
use crate::error::{Result, ValidationError};

/// Validate and normalize a display name or label.
///
/// Names are trimmed, must not be empty, and are limited to
/// `MAX_NAME_LEN` characters.
///
/// # Errors
///
/// Returns `ValidationError` if the name is empty or too long.
pub fn validate_name(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field }.into());
    }

    let len = trimmed.chars().count();
    if len > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field,
            len,
            max: MAX_NAME_LEN,
        }
        .into());
    }

    Ok(trimmed.to_string())
}

/// Validate a network address (hostname or IP literal).
///
/// # Errors
///
/// Returns `ValidationError` if the address is empty or contains whitespace.
pub fn validate_address(value: &str) -> Result<String> {
    let address = validate_name("address", value)?;
    if address.chars().any(char::is_whitespace) {
        return Err(ValidationError::Invalid {
            field: "address",
            reason: "must not contain whitespace".to_string(),
        }
        .into());
    }
    Ok(address)
}

/// Validate a port number.
///
/// # Errors
///
/// Returns `ValidationError::InvalidPort` for port 0.
pub fn validate_port(port: u16) -> Result<u16> {
    if port == 0 {
        return Err(ValidationError::InvalidPort(port.into()).into());
    }
    Ok(port)
}

/// Name for a duplicated record: `name (copy)`, or `name` unchanged if the
/// suffix would push it past the length limit.
pub fn copy_name(name: &str) -> String {
    if name.chars().count() + COPY_SUFFIX.chars().count() > MAX_NAME_LEN {
        return name.to_string();
    }
    format!("{}{}", name, COPY_SUFFIX)
}
