//! Blob key validation.
//!
//! Valid keys:
//! - Must be non-empty and at most 64 bytes
//! - Must contain only ASCII lowercase letters, digits, `_` and `-`
//! - Must start with a letter
//!
//! The rules keep keys usable as file stems for [`crate::DirBlobStore`].

use crate::error::{StoreError, StoreResult};

/// Longest key accepted by any backend.
pub const MAX_KEY_LEN: usize = 64;

/// Validate a blob key, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use filmdb_store::keys::validate_key;
///
/// assert!(validate_key("people").is_ok());
/// assert!(validate_key("").is_err());
/// assert!(validate_key("../etc").is_err());
/// ```
pub fn validate_key(key: &str) -> StoreResult<()> {
    if key.is_empty() {
        return Err(StoreError::InvalidKey {
            key: key.to_string(),
            reason: "key must not be empty".into(),
        });
    }

    if key.len() > MAX_KEY_LEN {
        return Err(StoreError::InvalidKey {
            key: key.to_string(),
            reason: format!("key longer than {MAX_KEY_LEN} bytes"),
        });
    }

    if !key.starts_with(|c: char| c.is_ascii_lowercase()) {
        return Err(StoreError::InvalidKey {
            key: key.to_string(),
            reason: "key must start with a lowercase letter".into(),
        });
    }

    if let Some(ch) = key
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-'))
    {
        return Err(StoreError::InvalidKey {
            key: key.to_string(),
            reason: format!("contains forbidden character: {ch:?}"),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn valid_collection_keys() {
        for key in ["people", "publishers", "movies", "actors", "directors"] {
            assert!(validate_key(key).is_ok(), "{key}");
        }
        assert!(validate_key("movies_v2").is_ok());
        assert!(validate_key("film-archive").is_ok());
    }

    #[test]
    fn reject_empty_key() {
        assert!(validate_key("").is_err());
    }

    #[test]
    fn reject_path_like_keys() {
        assert!(validate_key("../people").is_err());
        assert!(validate_key("a/b").is_err());
        assert!(validate_key("a.json").is_err());
    }

    #[test]
    fn reject_uppercase_and_whitespace() {
        assert!(validate_key("People").is_err());
        assert!(validate_key("my key").is_err());
    }

    #[test]
    fn reject_leading_digit_or_dash() {
        assert!(validate_key("1people").is_err());
        assert!(validate_key("-people").is_err());
    }

    #[test]
    fn reject_overlong_key() {
        let key = "a".repeat(MAX_KEY_LEN + 1);
        assert!(validate_key(&key).is_err());
        assert!(validate_key(&key[..MAX_KEY_LEN]).is_ok());
    }

    proptest! {
        #[test]
        fn generated_valid_keys_pass(key in "[a-z][a-z0-9_-]{0,40}") {
            prop_assert!(validate_key(&key).is_ok());
        }

        #[test]
        fn keys_with_a_dot_fail(prefix in "[a-z]{1,8}", suffix in "[a-z]{0,8}") {
            let key = format!("{prefix}.{suffix}");
            prop_assert!(validate_key(&key).is_err());
        }
    }
}
