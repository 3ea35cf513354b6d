//! docgate authentication and authorization
//!
//! This crate provides the API-key gate for public reads, JWT-based
//! bearer authentication for private endpoints and role-based
//! access control on top of it.

pub mod api_key;
pub mod error;
pub mod jwt;
pub mod login;
pub mod middleware;
pub mod password;

pub use api_key::{API_KEY_HEADER, ApiKeyGate};
pub use error::AuthError;
pub use jwt::{Claims, TokenCodec};
pub use login::{CredentialStore, LoginGrant, login};
pub use middleware::{
    AuthUser, RequiredRoles, authorize, require_api_key, require_roles, require_token,
};
pub use password::{hash_password, verify_password};
