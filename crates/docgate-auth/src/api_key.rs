//! Static API key gate for public endpoints

use std::fmt;

use axum::http::HeaderMap;
use subtle::ConstantTimeEq;

use crate::error::AuthError;

/// Header carrying the client-supplied key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Checks a shared secret presented on public requests
///
/// A valid key grants anonymous access; no identity is attached.
#[derive(Clone)]
pub struct ApiKeyGate {
    key: String,
}

impl ApiKeyGate {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Verify the key carried by the request headers
    pub fn verify(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        match headers.get(API_KEY_HEADER) {
            None => Err(AuthError::MissingApiKey),
            Some(value) => match value.to_str() {
                Ok(provided) => self.check(provided),
                Err(_) => Err(AuthError::InvalidApiKey),
            },
        }
    }

    /// Compare a provided key against the configured one
    ///
    /// An empty key counts as not provided.
    fn check(&self, provided: &str) -> Result<(), AuthError> {
        if provided.is_empty() {
            return Err(AuthError::MissingApiKey);
        }

        // Constant time over the contents only; a length mismatch returns early.
        if bool::from(self.key.as_bytes().ct_eq(provided.as_bytes())) {
            Ok(())
        } else {
            Err(AuthError::InvalidApiKey)
        }
    }
}

impl fmt::Debug for ApiKeyGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKeyGate([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(v) = value {
            headers.insert(API_KEY_HEADER, HeaderValue::from_str(v).unwrap());
        }
        headers
    }

    #[test]
    fn test_missing_key_is_unauthenticated() {
        let gate = ApiKeyGate::new("s3cret");
        assert!(matches!(gate.verify(&headers(None)), Err(AuthError::MissingApiKey)));
        assert!(matches!(gate.verify(&headers(Some(""))), Err(AuthError::MissingApiKey)));
    }

    #[test]
    fn test_wrong_key_is_forbidden() {
        let gate = ApiKeyGate::new("s3cret");
        for wrong in ["s3cre", "s3cret!", "S3CRET", " s3cret", "other"] {
            assert!(
                matches!(gate.verify(&headers(Some(wrong))), Err(AuthError::InvalidApiKey)),
                "{} should be rejected",
                wrong
            );
        }
    }

    #[test]
    fn test_non_ascii_header_is_forbidden() {
        let gate = ApiKeyGate::new("s3cret");
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_bytes(&[0xff, 0xfe]).unwrap());
        assert!(matches!(gate.verify(&headers), Err(AuthError::InvalidApiKey)));
    }

    #[test]
    fn test_same_length_mismatch_is_forbidden() {
        let gate = ApiKeyGate::new("s3cret");
        assert!(matches!(gate.check("s3creT"), Err(AuthError::InvalidApiKey)));
        assert!(matches!(gate.check(""), Err(AuthError::MissingApiKey)));
        assert!(gate.check("s3cret").is_ok());
    }

    #[test]
    fn test_correct_key_is_allowed() {
        let gate = ApiKeyGate::new("s3cret");
        assert!(gate.verify(&headers(Some("s3cret"))).is_ok());
    }

    #[test]
    fn test_debug_hides_key() {
        let gate = ApiKeyGate::new("s3cret");
        assert!(!format!("{:?}", gate).contains("s3cret"));
    }
}
