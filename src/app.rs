use std::net::SocketAddr;
use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use crate::state::AppState;
use crate::{auth, dashboard};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(dashboard::page_routes())
        .nest("/api/v1",
              Router::new()
                  .merge(auth::router())
                  .merge(dashboard::api_routes())
                  .route("/health", get(|| async { "ok" }))
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
        .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::SessionKeys;
    use crate::entries::memory::MemoryFoodLog;
    use axum::{
        body::Body,
        extract::FromRef,
        http::{header, Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn fake_state() -> AppState {
        AppState::fake(Arc::new(MemoryFoodLog::new()))
    }

    async fn status_of(state: &AppState, uri: &str, cookie: Option<&str>) -> StatusCode {
        let mut req = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }
        build_app(state.clone())
            .oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn home_pages_require_a_session() {
        let state = fake_state();
        assert_eq!(status_of(&state, "/", None).await, StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(&state, "/index", None).await, StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(&state, "/api/v1/dashboard", None).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn home_pages_render_with_session_cookie() {
        let state = fake_state();
        let session = SessionKeys::from_ref(&state).start(Uuid::new_v4()).unwrap();
        let cookie = format!("access_token={}", session.access_token);

        for uri in ["/", "/index", "/api/v1/dashboard"] {
            assert_eq!(status_of(&state, uri, Some(&cookie)).await, StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn public_routes_need_no_session() {
        let state = fake_state();
        assert_eq!(status_of(&state, "/about", None).await, StatusCode::OK);
        assert_eq!(status_of(&state, "/api/v1/health", None).await, StatusCode::OK);
        assert_eq!(status_of(&state, "/nope", None).await, StatusCode::NOT_FOUND);
    }
}
