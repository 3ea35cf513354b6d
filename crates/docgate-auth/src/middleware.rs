//! Authentication and authorization middleware for Axum

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use docgate_db::UserRole;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::api_key::ApiKeyGate;
use crate::error::AuthError;
use crate::jwt::TokenCodec;

/// Authenticated user information, attached to the request after token
/// verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub role: UserRole,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::MissingAuthHeader)
    }
}

/// Roles allowed to reach a route
#[derive(Debug, Clone)]
pub struct RequiredRoles(Arc<[UserRole]>);

impl RequiredRoles {
    pub fn new(roles: impl IntoIterator<Item = UserRole>) -> Self {
        Self(roles.into_iter().collect())
    }

    pub fn admin_only() -> Self {
        Self::new([UserRole::Admin])
    }

    pub fn allows(&self, role: UserRole) -> bool {
        self.0.contains(&role)
    }

    /// Human-readable list, e.g. "admin or user"
    pub fn describe(&self) -> String {
        self.0
            .iter()
            .map(UserRole::as_str)
            .collect::<Vec<_>>()
            .join(" or ")
    }
}

/// Check an authenticated user against a role set
pub fn authorize(user: &AuthUser, required: &RequiredRoles) -> Result<(), AuthError> {
    if required.allows(user.role) {
        Ok(())
    } else {
        Err(AuthError::InsufficientPermissions {
            required: required.describe(),
        })
    }
}

/// Extract bearer token from authorization header
fn extract_bearer_token(header: &str) -> Result<&str, AuthError> {
    header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthHeader)
}

/// API key middleware
///
/// Rejects the request unless it carries the configured `x-api-key`.
pub async fn require_api_key(
    State(gate): State<Arc<ApiKeyGate>>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    if let Err(e) = gate.verify(request.headers()) {
        debug!("API key rejected: {}", e);
        return Err(e);
    }

    Ok(next.run(request).await)
}

/// Bearer token middleware
///
/// Verifies the JWT from the Authorization header and adds the AuthUser to
/// request extensions.
pub async fn require_token(
    State(codec): State<Arc<TokenCodec>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = extract_bearer_token(header)?;
    let user = codec
        .verify(token)
        .and_then(|claims| claims.identity())
        .inspect_err(|e| debug!("Token rejected: {}", e))?;

    debug!("Authenticated user: {} ({})", user.username, user.role);

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Role middleware; must be layered inside `require_token`
pub async fn require_roles(
    State(required): State<RequiredRoles>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or(AuthError::MissingAuthHeader)?;

    if let Err(e) = authorize(user, &required) {
        debug!("User {} denied: {}", user.username, e);
        return Err(e);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
    };
    use chrono::{Duration, Utc};
    use tower::ServiceExt;

    const SECRET: &str = "middleware-test-secret";

    fn user(role: UserRole) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            username: format!("{}-user", role),
            role,
        }
    }

    async fn whoami(user: AuthUser) -> String {
        user.username
    }

    fn app() -> Router {
        let codec = Arc::new(TokenCodec::new(SECRET, Duration::hours(1)));
        let gate = Arc::new(ApiKeyGate::new("public-key"));

        let public = Router::new()
            .route("/public", get(|| async { "public" }))
            .route_layer(from_fn_with_state(gate, require_api_key));

        let private = Router::new()
            .route("/private", get(whoami))
            .route(
                "/admin",
                get(whoami).route_layer(from_fn_with_state(
                    RequiredRoles::admin_only(),
                    require_roles,
                )),
            )
            .route_layer(from_fn_with_state(codec, require_token));

        public.merge(private)
    }

    fn token_for(user: &AuthUser) -> String {
        TokenCodec::new(SECRET, Duration::hours(1)).issue(user).unwrap()
    }

    async fn status_of(uri: &str, header: Option<(&str, String)>) -> StatusCode {
        let mut builder = HttpRequest::builder().uri(uri);
        if let Some((name, value)) = header {
            builder = builder.header(name, value);
        }
        let response = app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        response.status()
    }

    #[test]
    fn test_authorize_admin_only() {
        let required = RequiredRoles::admin_only();
        assert!(authorize(&user(UserRole::Admin), &required).is_ok());
        assert!(matches!(
            authorize(&user(UserRole::User), &required),
            Err(AuthError::InsufficientPermissions { ref required }) if required == "admin"
        ));
    }

    #[test]
    fn test_required_roles_describe() {
        let required = RequiredRoles::new([UserRole::Admin, UserRole::User]);
        assert_eq!(required.describe(), "admin or user");
        assert!(required.allows(UserRole::User));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc").unwrap(), "abc");
        assert!(matches!(
            extract_bearer_token("Basic abc"),
            Err(AuthError::InvalidAuthHeader)
        ));
        assert!(matches!(
            extract_bearer_token("bearer abc"),
            Err(AuthError::InvalidAuthHeader)
        ));
    }

    #[tokio::test]
    async fn test_api_key_gate_statuses() {
        assert_eq!(status_of("/public", None).await, StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of("/public", Some(("x-api-key", "wrong".to_string()))).await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of("/public", Some(("x-api-key", "public-key".to_string()))).await,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn test_token_gate_statuses() {
        let token = token_for(&user(UserRole::User));

        assert_eq!(status_of("/private", None).await, StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of("/private", Some(("authorization", format!("Token {}", token)))).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of("/private", Some(("authorization", "Bearer garbage".to_string()))).await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of("/private", Some(("authorization", format!("Bearer {}", token)))).await,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn test_expired_token_forbidden() {
        let stale = TokenCodec::new(SECRET, Duration::hours(1))
            .issue_at(&user(UserRole::Admin), Utc::now() - Duration::hours(2))
            .unwrap();

        assert_eq!(
            status_of("/private", Some(("authorization", format!("Bearer {}", stale)))).await,
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn test_role_gate_statuses() {
        let admin = token_for(&user(UserRole::Admin));
        let plain = token_for(&user(UserRole::User));

        assert_eq!(
            status_of("/admin", Some(("authorization", format!("Bearer {}", plain)))).await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of("/admin", Some(("authorization", format!("Bearer {}", admin)))).await,
            StatusCode::OK
        );
        // Authentication runs before the role check
        assert_eq!(status_of("/admin", None).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_identity_reaches_handler() {
        let admin = user(UserRole::Admin);
        let response = app()
            .oneshot(
                HttpRequest::builder()
                    .uri("/private")
                    .header("authorization", format!("Bearer {}", token_for(&admin)))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], admin.username.as_bytes());
    }
}
