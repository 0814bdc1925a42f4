use axum::{extract::{Path, Query, State}, http::{header, StatusCode}, response::IntoResponse, Json};
use tracing::info;
use uuid::Uuid;

use common::{pagination::Pagination, types::Page};
use models::{equipment, work_order};
use service::equipment_service::{self, EquipmentFilter, EquipmentUpdate, NewEquipment};
use service::report_service;

use crate::{actor::Actor, errors::JsonApiError, state::ServerState};

#[utoipa::path(
    get, path = "/api/equipment", tag = "equipment",
    params(
        ("status" = Option<String>, Query, description = "operational | under_maintenance | out_of_service | decommissioned"),
        ("category" = Option<String>, Query,),
        ("location" = Option<String>, Query,),
        ("search" = Option<String>, Query, description = "Inventory code, name or serial number"),
        ("page" = Option<u32>, Query,), ("per_page" = Option<u32>, Query,)
    ),
    responses((status = 200, description = "List OK"))
)]
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<EquipmentFilter>,
    Query(page): Query<Pagination>,
) -> Result<Json<Page<equipment::Model>>, JsonApiError> {
    Ok(Json(equipment_service::list_equipment(&state.db, filter, page).await?))
}

#[utoipa::path(
    post, path = "/api/equipment", tag = "equipment",
    request_body = crate::openapi::CreateEquipmentDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 409, description = "Inventory code already in use")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Actor(actor): Actor,
    Json(input): Json<NewEquipment>,
) -> Result<(StatusCode, Json<equipment::Model>), JsonApiError> {
    let created = equipment_service::create_equipment(&state.db, actor, input).await?;
    info!(equipment_id = %created.id, inventory_code = %created.inventory_code, "equipment created via api");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/api/equipment/{id}", tag = "equipment",
    params(("id" = Uuid, Path, description = "Equipment ID")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<equipment::Model>, JsonApiError> {
    Ok(Json(equipment_service::get_equipment(&state.db, id).await?))
}

#[utoipa::path(
    put, path = "/api/equipment/{id}", tag = "equipment",
    params(("id" = Uuid, Path, description = "Equipment ID")),
    request_body = crate::openapi::UpdateEquipmentDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Inventory code already in use")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(changes): Json<EquipmentUpdate>,
) -> Result<Json<equipment::Model>, JsonApiError> {
    Ok(Json(equipment_service::update_equipment(&state.db, actor, id, changes).await?))
}

#[utoipa::path(
    delete, path = "/api/equipment/{id}", tag = "equipment",
    params(("id" = Uuid, Path, description = "Equipment ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Work orders reference the equipment")
    )
)]
pub async fn delete(State(state): State<ServerState>, Actor(actor): Actor, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    equipment_service::delete_equipment(&state.db, actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get, path = "/api/equipment/{id}/work-orders", tag = "equipment",
    params(("id" = Uuid, Path, description = "Equipment ID"), ("page" = Option<u32>, Query,), ("per_page" = Option<u32>, Query,)),
    responses((status = 200, description = "History, newest first"), (status = 404, description = "Not Found"))
)]
pub async fn work_orders(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Query(page): Query<Pagination>,
) -> Result<Json<Page<work_order::Model>>, JsonApiError> {
    Ok(Json(equipment_service::work_order_history(&state.db, id, page).await?))
}

#[utoipa::path(
    get, path = "/api/equipment/{id}/report", tag = "equipment",
    params(("id" = Uuid, Path, description = "Equipment ID")),
    responses((status = 200, description = "Plain-text history", content_type = "text/plain"), (status = 404, description = "Not Found"))
)]
pub async fn report(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<impl IntoResponse, JsonApiError> {
    let text = report_service::equipment_history(&state.db, id).await?;
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text))
}
