use adventure_core::{CategoryId, GridMonth};
use axum::{
    extract::{Query, State},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use time::{macros::format_description, Date};
use tracing::instrument;

use crate::{
    adapters::inbound::http::{CellCommitResponse, GridResponse},
    app_state::AppState,
    auth::AuthUser,
    domain::{models::CommitCellRequest, GridError},
};

use super::ApiError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_grid))
        .route("/cell", put(commit_cell))
}

#[derive(Debug, Deserialize)]
pub struct GridQuery {
    month: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitCellBody {
    day: String,
    category_id: CategoryId,
    #[serde(default)]
    minutes: Option<u32>,
}

#[instrument(name = "get_grid", skip(app_state))]
async fn get_grid(
    user: AuthUser,
    State(app_state): State<AppState>,
    Query(query): Query<GridQuery>,
) -> Result<Json<GridResponse>, ApiError> {
    let service = &app_state.grid_service;
    let month = match query.month.as_deref() {
        Some(month) => month.parse::<GridMonth>()?,
        None => GridMonth::current(service.offset()),
    };

    let grid = service.load_month(&user.id, month).await?;

    Ok(Json(grid.into()))
}

#[instrument(name = "commit_cell", skip(app_state))]
async fn commit_cell(
    user: AuthUser,
    State(app_state): State<AppState>,
    Json(body): Json<CommitCellBody>,
) -> Result<Json<CellCommitResponse>, ApiError> {
    let request = CommitCellRequest {
        day: parse_day(&body.day)?,
        category_id: body.category_id,
        minutes: body.minutes,
    };

    let commit = app_state
        .grid_service
        .commit_cell(&user.id, &request)
        .await?;

    Ok(Json(commit.into()))
}

fn parse_day(day: &str) -> Result<Date, GridError> {
    Date::parse(day, format_description!("[year]-[month]-[day]"))
        .map_err(|_| GridError::InvalidDay(day.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn parse_day_accepts_iso_dates_only() {
        assert_eq!(parse_day("2026-01-15").unwrap(), date!(2026 - 01 - 15));
        assert!(matches!(parse_day("2026-02-30"), Err(GridError::InvalidDay(_))));
        assert!(matches!(parse_day("15/01/2026"), Err(GridError::InvalidDay(_))));
        assert!(matches!(parse_day(""), Err(GridError::InvalidDay(_))));
    }

    #[test]
    fn commit_body_treats_missing_and_null_minutes_as_clear() {
        let body: CommitCellBody =
            serde_json::from_str(r#"{"day":"2026-01-15","categoryId":3,"minutes":null}"#).unwrap();
        assert_eq!(body.minutes, None);
        assert_eq!(body.category_id, CategoryId::new(3));

        let body: CommitCellBody =
            serde_json::from_str(r#"{"day":"2026-01-15","categoryId":3}"#).unwrap();
        assert_eq!(body.minutes, None);

        let body: CommitCellBody =
            serde_json::from_str(r#"{"day":"2026-01-15","categoryId":3,"minutes":90}"#).unwrap();
        assert_eq!(body.minutes, Some(90));
    }
}
