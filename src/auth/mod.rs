use crate::state::AppState;
use axum::Router;

mod credentials;
mod dto;
mod extractor;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod session;

pub use extractor::AuthUser;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::auth_routes())
        .merge(handlers::me_routes())
}
