use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use common::{pagination::Pagination, types::Page};
use models::maintenance_plan;
use service::maintenance::service as plans;
use service::maintenance::{NewPlan, PlanFilter, PlanUpdate, RunSummary, Suggestion};

use crate::{actor::Actor, errors::JsonApiError, state::ServerState};

#[utoipa::path(
    get, path = "/api/maintenance-plans", tag = "maintenance",
    params(
        ("equipment_id" = Option<Uuid>, Query,),
        ("active" = Option<bool>, Query,),
        ("due_within_days" = Option<i64>, Query, description = "Due on or before today + N days, overdue included"),
        ("page" = Option<u32>, Query,), ("per_page" = Option<u32>, Query,)
    ),
    responses((status = 200, description = "List OK"))
)]
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<PlanFilter>,
    Query(page): Query<Pagination>,
) -> Result<Json<Page<maintenance_plan::Model>>, JsonApiError> {
    let today = Utc::now().date_naive();
    Ok(Json(plans::list_plans(&state.db, filter, page, today).await?))
}

#[utoipa::path(
    post, path = "/api/maintenance-plans", tag = "maintenance",
    request_body = crate::openapi::CreatePlanDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Equipment or user not found")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Actor(actor): Actor,
    Json(input): Json<NewPlan>,
) -> Result<(StatusCode, Json<maintenance_plan::Model>), JsonApiError> {
    let created = plans::create_plan(&state.db, actor, input, Utc::now().date_naive()).await?;
    info!(plan_id = %created.id, next_due_on = %created.next_due_on, "maintenance plan created via api");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/api/maintenance-plans/{id}", tag = "maintenance",
    params(("id" = Uuid, Path, description = "Plan ID")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<maintenance_plan::Model>, JsonApiError> {
    Ok(Json(plans::get_plan(&state.db, id).await?))
}

#[utoipa::path(
    put, path = "/api/maintenance-plans/{id}", tag = "maintenance",
    params(("id" = Uuid, Path, description = "Plan ID")),
    request_body = crate::openapi::UpdatePlanDoc,
    responses((status = 200, description = "Updated"), (status = 404, description = "Not Found"))
)]
pub async fn update(
    State(state): State<ServerState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(changes): Json<PlanUpdate>,
) -> Result<Json<maintenance_plan::Model>, JsonApiError> {
    Ok(Json(plans::update_plan(&state.db, actor, id, changes).await?))
}

#[utoipa::path(
    delete, path = "/api/maintenance-plans/{id}", tag = "maintenance",
    params(("id" = Uuid, Path, description = "Plan ID")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete(State(state): State<ServerState>, Actor(actor): Actor, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    plans::delete_plan(&state.db, actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get, path = "/api/maintenance-plans/{id}/suggestion", tag = "maintenance",
    params(("id" = Uuid, Path, description = "Plan ID")),
    responses((status = 200, description = "Best day plus every scored candidate"), (status = 404, description = "Not Found"))
)]
pub async fn suggestion(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<Suggestion>, JsonApiError> {
    Ok(Json(plans::suggestion(&state.db, id, Utc::now().date_naive()).await?))
}

#[utoipa::path(
    post, path = "/api/maintenance/run", tag = "maintenance",
    responses((status = 200, description = "Due check finished"))
)]
pub async fn run(State(state): State<ServerState>) -> Result<Json<RunSummary>, JsonApiError> {
    let summary = plans::run_due_check(&state.db, Utc::now().date_naive()).await?;
    info!(
        plans_checked = summary.plans_checked,
        work_orders_created = summary.work_orders_created,
        "maintenance due check triggered via api"
    );
    Ok(Json(summary))
}
