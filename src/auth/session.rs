//! Signed sessions for the dashboard.
//!
//! A session is a pair of JWTs: a short-lived access token, and a refresh token
//! that can mint a new pair. Browsers hold both as HttpOnly cookies. API clients
//! may send the access token as `Authorization: Bearer`.

use std::time::Duration;

use axum::{
    extract::FromRef,
    http::{header, HeaderMap, HeaderValue},
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use crate::{config::SessionConfig, state::AppState};

pub const ACCESS_COOKIE: &str = "access_token";
pub const REFRESH_COOKIE: &str = "refresh_token";

/// Refresh cookies only travel to the auth endpoints.
const REFRESH_COOKIE_PATH: &str = "/api/v1/auth";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    fn cookie_name(self) -> &'static str {
        match self {
            TokenKind::Access => ACCESS_COOKIE,
            TokenKind::Refresh => REFRESH_COOKIE,
        }
    }

    fn cookie_path(self) -> &'static str {
        match self {
            TokenKind::Access => "/",
            TokenKind::Refresh => REFRESH_COOKIE_PATH,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: Uuid,
    kind: TokenKind,
    iat: i64,
    exp: i64,
    iss: String,
    aud: String,
}

/// Freshly issued token pair.
#[derive(Debug)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
    secure_cookies: bool,
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::new(&state.config.session)
    }
}

fn minutes(m: i64) -> Duration {
    Duration::from_secs(m.max(0) as u64 * 60)
}

impl SessionKeys {
    pub fn new(cfg: &SessionConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            access_ttl: minutes(cfg.access_ttl_minutes),
            refresh_ttl: minutes(cfg.refresh_ttl_minutes),
            secure_cookies: cfg.secure_cookies,
        }
    }

    fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }

    fn sign(&self, user_id: Uuid, kind: TokenKind, now: OffsetDateTime) -> anyhow::Result<String> {
        let claims = SessionClaims {
            sub: user_id,
            kind,
            iat: now.unix_timestamp(),
            exp: now.unix_timestamp() + self.ttl(kind).as_secs() as i64,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Issues a new access/refresh pair for `user_id`.
    pub fn start(&self, user_id: Uuid) -> anyhow::Result<Session> {
        let now = OffsetDateTime::now_utc();
        let session = Session {
            access_token: self.sign(user_id, TokenKind::Access, now)?,
            refresh_token: self.sign(user_id, TokenKind::Refresh, now)?,
        };
        debug!(user_id = %user_id, "session issued");
        Ok(session)
    }

    /// Verifies `token` and that it is of the `expected` kind; returns its user.
    pub fn open(&self, token: &str, expected: TokenKind) -> anyhow::Result<Uuid> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let claims = decode::<SessionClaims>(token, &self.decoding, &validation)?.claims;
        anyhow::ensure!(
            claims.kind == expected,
            "expected {expected:?} token, got {:?}",
            claims.kind
        );
        Ok(claims.sub)
    }

    fn cookie(&self, kind: TokenKind, value: &str, max_age: Duration) -> String {
        let mut cookie = format!(
            "{}={value}; HttpOnly; Path={}; SameSite=Lax; Max-Age={}",
            kind.cookie_name(),
            kind.cookie_path(),
            max_age.as_secs()
        );
        if self.secure_cookies {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// `Set-Cookie` headers carrying both tokens of `session`.
    pub fn set_cookies(&self, session: &Session) -> anyhow::Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        for (kind, token) in [
            (TokenKind::Access, &session.access_token),
            (TokenKind::Refresh, &session.refresh_token),
        ] {
            let value = HeaderValue::from_str(&self.cookie(kind, token, self.ttl(kind)))?;
            headers.append(header::SET_COOKIE, value);
        }
        Ok(headers)
    }

    /// `Set-Cookie` headers that expire both session cookies.
    pub fn clear_cookies(&self) -> anyhow::Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        for kind in [TokenKind::Access, TokenKind::Refresh] {
            let value = HeaderValue::from_str(&self.cookie(kind, "", Duration::ZERO))?;
            headers.append(header::SET_COOKIE, value);
        }
        Ok(headers)
    }
}

/// Value of cookie `name` from the request's `Cookie` headers.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}
