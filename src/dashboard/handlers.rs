use askama::Template;
use axum::{extract::State, response::Html, routing::get, Json, Router};
use tracing::instrument;

use super::dto::IndexContext;
use super::services::{about_context, assemble_index};
use super::templates::{AboutTemplate, IndexTemplate};
use crate::{auth::AuthUser, error::AppError, state::AppState};

/// HTML pages served at the site root.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/index", get(index))
        .route("/about", get(about))
}

/// JSON twin of the home page, mounted under the API prefix.
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

async fn load_index(state: &AppState, user_id: uuid::Uuid) -> Result<IndexContext, AppError> {
    let today = state.config.today();
    Ok(assemble_index(state.food_log.as_ref(), user_id, today).await?)
}

#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Html<String>, AppError> {
    let ctx = load_index(&state, user_id).await?;
    let page = IndexTemplate::new(&ctx)?;
    Ok(Html(page.render()?))
}

#[instrument(skip(state))]
pub async fn dashboard(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<IndexContext>, AppError> {
    Ok(Json(load_index(&state, user_id).await?))
}

pub async fn about() -> Result<Html<String>, AppError> {
    let page = AboutTemplate::from(about_context());
    Ok(Html(page.render()?))
}
