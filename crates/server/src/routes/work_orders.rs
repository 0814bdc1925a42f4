use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use common::{pagination::Pagination, types::Page};
use models::work_order;
use service::work_order_service::{self, NewWorkOrder, StatusChange, WorkOrderFilter, WorkOrderUpdate};

use crate::{actor::Actor, errors::JsonApiError, state::ServerState};

#[derive(Debug, Deserialize)]
pub struct AssignInput {
    pub user_id: Uuid,
}

#[utoipa::path(
    get, path = "/api/work-orders", tag = "work-orders",
    params(
        ("status" = Option<String>, Query, description = "open | assigned | in_progress | on_hold | completed | cancelled"),
        ("priority" = Option<String>, Query, description = "low | medium | high | critical"),
        ("kind" = Option<String>, Query, description = "preventive | corrective | inspection | calibration"),
        ("equipment_id" = Option<Uuid>, Query,),
        ("assigned_to" = Option<Uuid>, Query,),
        ("page" = Option<u32>, Query,), ("per_page" = Option<u32>, Query,)
    ),
    responses((status = 200, description = "List OK"))
)]
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<WorkOrderFilter>,
    Query(page): Query<Pagination>,
) -> Result<Json<Page<work_order::Model>>, JsonApiError> {
    Ok(Json(work_order_service::list_work_orders(&state.db, filter, page).await?))
}

#[utoipa::path(
    post, path = "/api/work-orders", tag = "work-orders",
    request_body = crate::openapi::CreateWorkOrderDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Equipment, plan or user not found")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Actor(actor): Actor,
    Json(input): Json<NewWorkOrder>,
) -> Result<(StatusCode, Json<work_order::Model>), JsonApiError> {
    let created = work_order_service::create_work_order(&state.db, actor, input).await?;
    info!(work_order_id = %created.id, code = %created.code, kind = ?created.kind, "work order created via api");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/api/work-orders/{id}", tag = "work-orders",
    params(("id" = Uuid, Path, description = "Work order ID")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<work_order::Model>, JsonApiError> {
    Ok(Json(work_order_service::get_work_order(&state.db, id).await?))
}

#[utoipa::path(
    put, path = "/api/work-orders/{id}", tag = "work-orders",
    params(("id" = Uuid, Path, description = "Work order ID")),
    request_body = crate::openapi::UpdateWorkOrderDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Work order is closed")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(changes): Json<WorkOrderUpdate>,
) -> Result<Json<work_order::Model>, JsonApiError> {
    Ok(Json(work_order_service::update_work_order(&state.db, actor, id, changes).await?))
}

#[utoipa::path(
    post, path = "/api/work-orders/{id}/assign", tag = "work-orders",
    params(("id" = Uuid, Path, description = "Work order ID")),
    request_body = crate::openapi::AssignDoc,
    responses(
        (status = 200, description = "Assigned"),
        (status = 404, description = "Work order or user not found"),
        (status = 422, description = "Work order is closed")
    )
)]
pub async fn assign(
    State(state): State<ServerState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(input): Json<AssignInput>,
) -> Result<Json<work_order::Model>, JsonApiError> {
    Ok(Json(work_order_service::assign(&state.db, actor, id, input.user_id).await?))
}

#[utoipa::path(
    post, path = "/api/work-orders/{id}/status", tag = "work-orders",
    params(("id" = Uuid, Path, description = "Work order ID")),
    request_body = crate::openapi::StatusChangeDoc,
    responses(
        (status = 200, description = "Status changed"),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Transition not allowed")
    )
)]
pub async fn change_status(
    State(state): State<ServerState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(change): Json<StatusChange>,
) -> Result<Json<work_order::Model>, JsonApiError> {
    let updated = work_order_service::change_status(&state.db, actor, id, change).await?;
    info!(work_order_id = %updated.id, status = updated.status.as_str(), "work order status changed via api");
    Ok(Json(updated))
}

#[utoipa::path(
    delete, path = "/api/work-orders/{id}", tag = "work-orders",
    params(("id" = Uuid, Path, description = "Work order ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Only open or cancelled orders can be deleted")
    )
)]
pub async fn delete(State(state): State<ServerState>, Actor(actor): Actor, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    work_order_service::delete_work_order(&state.db, actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
