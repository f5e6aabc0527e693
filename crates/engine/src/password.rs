//! Password hashing.
//!
//! Hashes are bcrypt strings; the cost is configured on the engine builder.

use crate::{EngineError, ResultEngine};

pub(crate) fn hash_password(raw: &str, cost: u32) -> ResultEngine<String> {
    if raw.is_empty() {
        return Err(EngineError::InvalidValue(
            "password must not be empty".to_string(),
        ));
    }
    Ok(bcrypt::hash(raw, cost)?)
}

/// Returns `Ok(false)` on mismatch; only a malformed stored hash is an error.
pub(crate) fn verify_password(raw: &str, hash: &str) -> ResultEngine<bool> {
    Ok(bcrypt::verify(raw, hash)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("averysafeandsecurepassword", TEST_COST).unwrap();
        assert_ne!(hash, "averysafeandsecurepassword");
        assert!(verify_password("averysafeandsecurepassword", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn empty_password_is_rejected() {
        assert!(matches!(
            hash_password("", TEST_COST),
            Err(EngineError::InvalidValue(_))
        ));
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(verify_password("password", "not-a-bcrypt-hash").is_err());
    }
}
