use axum::{extract::State, Json};
use chrono::Utc;

use service::dashboard_service::{self, Dashboard};

use crate::{errors::JsonApiError, state::ServerState};

#[utoipa::path(
    get, path = "/api/dashboard", tag = "dashboard",
    responses((status = 200, description = "Landing page counters"))
)]
pub async fn summary(State(state): State<ServerState>) -> Result<Json<Dashboard>, JsonApiError> {
    Ok(Json(dashboard_service::summary(&state.db, Utc::now().date_naive()).await?))
}
