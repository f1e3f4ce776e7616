//! Short code generation and custom alias validation.

use crate::error::AppError;
use rand::Rng;
use serde_json::json;

/// Alphabet for generated codes: `a-z`, `A-Z`, `0-9`.
pub const CODE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of generated codes.
pub const CODE_LENGTH: usize = 6;

const ALIAS_MIN_LENGTH: usize = 3;
const ALIAS_MAX_LENGTH: usize = 32;

/// Generates a random short code.
///
/// Draws [`CODE_LENGTH`] characters uniformly from [`CODE_ALPHABET`] using the
/// thread-local CSPRNG. Uniqueness is not guaranteed here; the link registry
/// retries on collision.
///
/// # Examples
///
/// ```
/// use link_tracker::utils::code_generator::generate_code;
///
/// let code = generate_code();
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Validates a caller-supplied custom alias.
///
/// # Rules
///
/// - Length: 3-32 characters
/// - ASCII letters and digits only (case-sensitive)
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_alias(alias: &str) -> Result<(), AppError> {
    if alias.len() < ALIAS_MIN_LENGTH || alias.len() > ALIAS_MAX_LENGTH {
        return Err(AppError::bad_request(
            "Custom alias must be 3-32 characters",
            json!({ "field": "custom_alias", "provided_length": alias.len() }),
        ));
    }

    if !alias.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::bad_request(
            "Custom alias can only contain letters and digits",
            json!({ "field": "custom_alias", "alias": alias }),
        ));
    }

    Ok(())
}
