//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so limits are applied
//! here before anything reaches the repository layer.

use crate::utils::AppError;

// ========== Text length limits ==========

/// Entity names: product, store, order number, username, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, transaction notes
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, contact, size, hours
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ========== Validation helpers ==========

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate that a quantity is a positive integer.
pub fn validate_positive_quantity(value: i64, field: &str) -> Result<(), AppError> {
    if value <= 0 {
        return Err(AppError::validation(format!(
            "{field} must be positive, got {value}"
        )));
    }
    Ok(())
}

/// Parse a raw JSON value into a positive integer quantity.
///
/// Accepts a JSON integer or a numeric string; anything else is a
/// validation error, matching the behavior of the restock endpoint.
pub fn parse_quantity(raw: &serde_json::Value, field: &str) -> Result<i64, AppError> {
    let parsed = match raw {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    let quantity =
        parsed.ok_or_else(|| AppError::validation(format!("Invalid {field}: {raw}")))?;
    validate_positive_quantity(quantity, field)?;
    Ok(quantity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn quantity_accepts_integers_and_numeric_strings() {
        assert_eq!(parse_quantity(&json!(5), "quantity").unwrap(), 5);
        assert_eq!(parse_quantity(&json!("7"), "quantity").unwrap(), 7);
    }

    #[test]
    fn quantity_rejects_non_positive() {
        assert!(parse_quantity(&json!(0), "quantity").is_err());
        assert!(parse_quantity(&json!(-3), "quantity").is_err());
    }

    #[test]
    fn quantity_rejects_non_integers() {
        assert!(parse_quantity(&json!(2.5), "quantity").is_err());
        assert!(parse_quantity(&json!("lots"), "quantity").is_err());
        assert!(parse_quantity(&json!(null), "quantity").is_err());
        assert!(parse_quantity(&json!([1]), "quantity").is_err());
    }
}
