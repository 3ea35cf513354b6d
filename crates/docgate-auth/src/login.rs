//! Credential verification and token grant

use std::sync::OnceLock;

use async_trait::async_trait;
use docgate_db::{Database, DbError, User, UserRole};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::AuthError;
use crate::jwt::TokenCodec;
use crate::middleware::AuthUser;
use crate::password::{hash_password, verify_password};

/// Maximum allowed username length
pub const MAX_USERNAME_LENGTH: usize = 64;
/// Maximum allowed password length (prevent DoS with very large passwords)
pub const MAX_PASSWORD_LENGTH: usize = 256;

/// Source of user records for login
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find a user by exact username
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DbError>;
}

#[async_trait]
impl CredentialStore for Database {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        self.get_user_by_username(username).await
    }
}

/// Result of a successful login
#[derive(Debug, Clone, Serialize)]
pub struct LoginGrant {
    pub token: String,
    pub role: UserRole,
}

/// Hash verified when the username is unknown, so both paths cost the same
fn dummy_hash() -> Result<&'static str, AuthError> {
    static DUMMY_HASH: OnceLock<String> = OnceLock::new();
    if let Some(hash) = DUMMY_HASH.get() {
        return Ok(hash.as_str());
    }
    let hash = hash_password("docgate-timing-equalizer")?;
    Ok(DUMMY_HASH.get_or_init(|| hash).as_str())
}

/// Validate login input lengths before any hashing work
fn validate_input(username: &str, password: &str) -> Result<(), AuthError> {
    if username.is_empty() || password.is_empty() {
        return Err(AuthError::InvalidCredentials);
    }
    if username.len() > MAX_USERNAME_LENGTH {
        return Err(AuthError::InvalidInput(format!(
            "Username exceeds maximum length of {} characters",
            MAX_USERNAME_LENGTH
        )));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(AuthError::InvalidInput(format!(
            "Password exceeds maximum length of {} characters",
            MAX_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

/// Verify a username/password pair and issue an access token
///
/// Unknown usernames and wrong passwords fail identically with
/// `InvalidCredentials`.
pub async fn login<S>(
    store: &S,
    codec: &TokenCodec,
    username: &str,
    password: &str,
) -> Result<LoginGrant, AuthError>
where
    S: CredentialStore + ?Sized,
{
    validate_input(username, password)?;

    debug!("Login attempt for user: {}", username);

    let user = store.find_user_by_username(username).await?;

    // Always run a verification so timing does not reveal whether the user exists
    let (hash, user) = match user {
        Some(u) => (u.password_hash.clone(), Some(u)),
        None => (dummy_hash()?.to_string(), None),
    };
    let password_valid = verify_password(password, &hash)?;

    let user = match (user, password_valid) {
        (Some(u), true) => u,
        _ => {
            warn!("Rejected login for user: {}", username);
            return Err(AuthError::InvalidCredentials);
        }
    };

    let identity = AuthUser {
        id: user.id,
        username: user.username,
        role: user.role,
    };
    let token = codec.issue(&identity)?;

    info!("User {} logged in successfully", identity.username);

    Ok(LoginGrant {
        token,
        role: identity.role,
    })
}
