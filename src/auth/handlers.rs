use axum::{
    extract::{FromRef, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use super::{
    credentials::{hash_password, normalize_email, password_matches, MIN_PASSWORD_LEN},
    dto::{Credentials, PublicUser, RefreshRequest, SessionResponse},
    extractor::AuthUser,
    repo_types::User,
    session::{cookie_value, SessionKeys, TokenKind, REFRESH_COOKIE},
};
use crate::state::AppState;

type Rejection = (StatusCode, String);
type SessionReply = (HeaderMap, Json<SessionResponse>);

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

fn internal(e: anyhow::Error) -> Rejection {
    error!(error = %e, "auth internal error");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
}

fn unauthorized(msg: &str) -> Rejection {
    (StatusCode::UNAUTHORIZED, msg.to_string())
}

/// Starts a session for `user`: cookies for the browser, tokens in the body.
fn start_session(keys: &SessionKeys, user: User) -> Result<SessionReply, Rejection> {
    let session = keys.start(user.id).map_err(internal)?;
    let headers = keys.set_cookies(&session).map_err(internal)?;
    Ok((
        headers,
        Json(SessionResponse {
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            user: PublicUser {
                id: user.id,
                email: user.email,
            },
        }),
    ))
}

fn checked_email(raw: &str) -> Result<String, Rejection> {
    normalize_email(raw).ok_or_else(|| {
        warn!(email = %raw.trim(), "invalid email");
        (StatusCode::BAD_REQUEST, "Invalid email".to_string())
    })
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<Credentials>,
) -> Result<SessionReply, Rejection> {
    let email = checked_email(&payload.email)?;
    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err((StatusCode::BAD_REQUEST, "Password too short".into()));
    }

    if User::find_by_email(&state.db, &email)
        .await
        .map_err(internal)?
        .is_some()
    {
        warn!(email = %email, "email already registered");
        return Err((StatusCode::CONFLICT, "Email already registered".into()));
    }

    let hash = hash_password(&payload.password).map_err(internal)?;
    let user = User::create(&state.db, &email, &hash)
        .await
        .map_err(internal)?;

    info!(user_id = %user.id, "user registered");
    start_session(&SessionKeys::from_ref(&state), user)
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<Credentials>,
) -> Result<SessionReply, Rejection> {
    let email = checked_email(&payload.email)?;

    let Some(user) = User::find_by_email(&state.db, &email)
        .await
        .map_err(internal)?
    else {
        warn!(email = %email, "login unknown email");
        return Err(unauthorized("Invalid credentials"));
    };

    if !password_matches(&payload.password, &user.password_hash).map_err(internal)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(unauthorized("Invalid credentials"));
    }

    info!(user_id = %user.id, "user logged in");
    start_session(&SessionKeys::from_ref(&state), user)
}

/// Rotates the session. The refresh token comes from the body or the refresh cookie.
#[instrument(skip_all)]
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<RefreshRequest>>,
) -> Result<SessionReply, Rejection> {
    let token = body
        .as_ref()
        .map(|Json(b)| b.refresh_token.as_str())
        .or_else(|| cookie_value(&headers, REFRESH_COOKIE))
        .ok_or_else(|| unauthorized("Missing refresh token"))?;

    let keys = SessionKeys::from_ref(&state);
    let user_id = keys.open(token, TokenKind::Refresh).map_err(|e| {
        warn!(error = %e, "refresh rejected");
        unauthorized("Invalid or expired refresh token")
    })?;

    let user = User::find_by_id(&state.db, user_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| unauthorized("User not found"))?;

    start_session(&keys, user)
}

/// Expires both session cookies. Tokens are stateless, so nothing is revoked server-side.
pub async fn logout(State(state): State<AppState>) -> Result<(StatusCode, HeaderMap), Rejection> {
    let headers = SessionKeys::from_ref(&state)
        .clear_cookies()
        .map_err(internal)?;
    Ok((StatusCode::NO_CONTENT, headers))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, Rejection> {
    let user = User::find_by_id(&state.db, user_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| unauthorized("User not found"))?;

    Ok(Json(PublicUser {
        id: user.id,
        email: user.email,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::memory::MemoryFoodLog;
    use axum::http::header;
    use std::sync::Arc;

    fn fake_state() -> AppState {
        AppState::fake(Arc::new(MemoryFoodLog::new()))
    }

    #[tokio::test]
    async fn logout_expires_both_cookies() {
        let (status, headers) = logout(State(fake_state())).await.unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let cookies: Vec<&str> = headers
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        assert_eq!(cookies.len(), 2);
        assert!(cookies.iter().all(|c| c.contains("=;") && c.contains("Max-Age=0")));
    }

    #[tokio::test]
    async fn refresh_without_token_is_unauthorized() {
        let (status, msg) = refresh(State(fake_state()), HeaderMap::new(), None)
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(msg, "Missing refresh token");
    }

    #[tokio::test]
    async fn refresh_rejects_access_token_cookie() {
        let state = fake_state();
        let session = SessionKeys::from_ref(&state).start(uuid::Uuid::new_v4()).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            format!("refresh_token={}", session.access_token).parse().unwrap(),
        );

        let (status, msg) = refresh(State(state), headers, None).await.unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(msg, "Invalid or expired refresh token");
    }

    #[test]
    fn checked_email_rejects_garbage() {
        assert_eq!(checked_email(" Ann@Example.com").unwrap(), "ann@example.com");
        let (status, _) = checked_email("nope").unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
