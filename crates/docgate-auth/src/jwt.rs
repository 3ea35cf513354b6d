//! JWT token issuance and verification

use chrono::{DateTime, Duration, Utc};
use docgate_db::UserRole;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::AuthError;
use crate::middleware::AuthUser;

/// Lifetime of tokens handed out by `/login`
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Username
    pub username: String,
    /// User role
    pub role: UserRole,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// Identity carried by these claims
    pub fn identity(&self) -> Result<AuthUser, AuthError> {
        let id = Uuid::parse_str(&self.sub).map_err(|_| AuthError::InvalidToken)?;
        Ok(AuthUser {
            id,
            username: self.username.clone(),
            role: self.role,
        })
    }
}

/// Signs and verifies access tokens with a server-held secret
///
/// Tokens are stateless: nothing is stored server-side, and expiry is the
/// only way a token stops being accepted.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    /// Create a new codec
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller's clock in `verify_at`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Codec for tokens handed out by `/login`, which always live one hour
    pub fn for_login(secret: &str) -> Self {
        Self::new(secret, Duration::seconds(DEFAULT_TOKEN_TTL_SECS))
    }

    /// Issue a token for a user, valid from now
    pub fn issue(&self, user: &AuthUser) -> Result<String, AuthError> {
        self.issue_at(user, Utc::now())
    }

    /// Issue a token as if it were issued at `issued_at`
    ///
    /// The expiry is counted from the whole second of `issued_at`.
    pub fn issue_at(&self, user: &AuthUser, issued_at: DateTime<Utc>) -> Result<String, AuthError> {
        let iat = issued_at.timestamp();
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role,
            exp: iat + self.ttl.num_seconds(),
            iat,
        };

        debug!("Issuing token for user: {}", user.username);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(AuthError::Jwt)
    }

    /// Verify a token against the current time and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token against `now`
    ///
    /// The signature is checked before the expiry, so a forged token reports
    /// `InvalidSignature` even when its claimed expiry is in the past.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                    ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::InvalidToken,
                }
            })?;

        if now.timestamp() >= token_data.claims.exp {
            return Err(AuthError::TokenExpired);
        }

        Ok(token_data.claims)
    }
}
