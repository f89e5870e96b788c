use axum::{extract::State, http::StatusCode, Json};

use crate::dto::{DailyLogForm, LogOptionsResponse};
use crate::error::{AppError, AppResult};
use crate::handlers::extract::AppJson;
use crate::models::daily_log::LogEntry;
use crate::AppState;

pub async fn create_daily_log(
    State(state): State<AppState>,
    AppJson(body): AppJson<DailyLogForm>,
) -> AppResult<(StatusCode, Json<LogEntry>)> {
    let draft = body.into_entry().map_err(AppError::Validation)?;
    let entry = state.logs.save_log(draft).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn list_daily_logs(State(state): State<AppState>) -> Json<Vec<LogEntry>> {
    Json(state.logs.get_logs().await)
}

pub async fn latest_daily_log(State(state): State<AppState>) -> Json<Option<LogEntry>> {
    Json(state.logs.get_latest_log().await)
}

pub async fn log_options() -> Json<LogOptionsResponse> {
    Json(LogOptionsResponse::default())
}
