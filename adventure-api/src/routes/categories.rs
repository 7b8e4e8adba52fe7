use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Deserialize;
use tracing::instrument;

use crate::{adapters::inbound::http::CategoryResponse, app_state::AppState, auth::AuthUser};

use super::ApiError;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_categories).post(create_category))
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryBody {
    name: String,
}

#[instrument(name = "list_categories", skip(app_state))]
async fn list_categories(
    user: AuthUser,
    State(app_state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let categories = app_state.grid_service.list_categories(&user.id).await?;

    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

#[instrument(name = "create_category", skip(app_state))]
async fn create_category(
    user: AuthUser,
    State(app_state): State<AppState>,
    Json(body): Json<CreateCategoryBody>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiError> {
    let category = app_state
        .grid_service
        .create_category(&user.id, &body.name)
        .await?;

    Ok((StatusCode::CREATED, Json(category.into())))
}
