use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, StatusCode},
};
use tracing::warn;
use uuid::Uuid;

use super::session::{cookie_value, SessionKeys, TokenKind, ACCESS_COOKIE};

/// Id of the signed-in user.
///
/// Reads a `Bearer` access token, falling back to the `access_token` cookie
/// when the `Authorization` header is absent or uses another scheme.
pub struct AuthUser(pub Uuid);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .or_else(|| cookie_value(&parts.headers, ACCESS_COOKIE))
            .ok_or((StatusCode::UNAUTHORIZED, "Not signed in".to_string()))?;

        let user_id = SessionKeys::from_ref(state)
            .open(token, TokenKind::Access)
            .map_err(|e| {
                warn!(error = %e, "rejected session token");
                (StatusCode::UNAUTHORIZED, "Invalid or expired session".to_string())
            })?;

        Ok(AuthUser(user_id))
    }
}
