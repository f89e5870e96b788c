use axum::{extract::State, Json};

use crate::dto::DashboardResponse;
use crate::AppState;

pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardResponse> {
    Json(state.logs.dashboard().await)
}
