use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use uuid::Uuid;

use common::{pagination::Pagination, types::Page};
use models::document;
use service::document_service::{self, DocumentFilter, NewDocument};

use crate::{actor::Actor, errors::JsonApiError, state::ServerState};

#[utoipa::path(
    get, path = "/api/documents", tag = "documents",
    params(
        ("equipment_id" = Option<Uuid>, Query,),
        ("work_order_id" = Option<Uuid>, Query,),
        ("kind" = Option<String>, Query, description = "manual | certificate | calibration_report | invoice | other"),
        ("page" = Option<u32>, Query,), ("per_page" = Option<u32>, Query,)
    ),
    responses((status = 200, description = "List OK"))
)]
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<DocumentFilter>,
    Query(page): Query<Pagination>,
) -> Result<Json<Page<document::Model>>, JsonApiError> {
    Ok(Json(document_service::list_documents(&state.db, filter, page).await?))
}

#[utoipa::path(
    post, path = "/api/documents", tag = "documents",
    request_body = crate::openapi::CreateDocumentDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Needs an owner, a title and a url"),
        (status = 404, description = "Owner not found")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Actor(actor): Actor,
    Json(input): Json<NewDocument>,
) -> Result<(StatusCode, Json<document::Model>), JsonApiError> {
    let created = document_service::create_document(&state.db, actor, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/api/documents/{id}", tag = "documents",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<document::Model>, JsonApiError> {
    Ok(Json(document_service::get_document(&state.db, id).await?))
}

#[utoipa::path(
    delete, path = "/api/documents/{id}", tag = "documents",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete(State(state): State<ServerState>, Actor(actor): Actor, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    document_service::delete_document(&state.db, actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
