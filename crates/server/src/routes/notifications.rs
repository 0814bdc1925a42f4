use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use common::{pagination::Pagination, types::Page};
use models::notification;
use service::notification_service::{self, NewSystemNotification, NotificationFilter};

use crate::{actor::Actor, errors::JsonApiError, state::ServerState};

/// Whose inbox a count or bulk update applies to. Without a user only broadcasts are touched.
#[derive(Debug, Default, Deserialize)]
pub struct InboxQuery {
    pub user_id: Option<Uuid>,
}

#[utoipa::path(
    get, path = "/api/notifications", tag = "notifications",
    params(
        ("user_id" = Option<Uuid>, Query, description = "Recipient; broadcasts are always included"),
        ("unread_only" = Option<bool>, Query,),
        ("page" = Option<u32>, Query,), ("per_page" = Option<u32>, Query,)
    ),
    responses((status = 200, description = "List OK, newest first"))
)]
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<NotificationFilter>,
    Query(page): Query<Pagination>,
) -> Result<Json<Page<notification::Model>>, JsonApiError> {
    Ok(Json(notification_service::list(&state.db, filter, page).await?))
}

#[utoipa::path(
    post, path = "/api/notifications", tag = "notifications",
    request_body = crate::openapi::CreateNotificationDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Recipient not found")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Actor(actor): Actor,
    Json(input): Json<NewSystemNotification>,
) -> Result<(StatusCode, Json<notification::Model>), JsonApiError> {
    let created = notification_service::create_system(&state.db, actor, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/api/notifications/unread-count", tag = "notifications",
    params(("user_id" = Option<Uuid>, Query,)),
    responses((status = 200, description = "Unread count"))
)]
pub async fn unread_count(State(state): State<ServerState>, Query(q): Query<InboxQuery>) -> Result<Json<Value>, JsonApiError> {
    let n = notification_service::unread_count(&state.db, q.user_id).await?;
    Ok(Json(json!({ "unread": n })))
}

#[utoipa::path(
    post, path = "/api/notifications/read-all", tag = "notifications",
    params(("user_id" = Option<Uuid>, Query,)),
    responses((status = 200, description = "Number of notifications marked read"))
)]
pub async fn read_all(
    State(state): State<ServerState>,
    Actor(actor): Actor,
    Query(q): Query<InboxQuery>,
) -> Result<Json<Value>, JsonApiError> {
    let n = notification_service::mark_all_read(&state.db, actor, q.user_id).await?;
    Ok(Json(json!({ "updated": n })))
}

#[utoipa::path(
    post, path = "/api/notifications/{id}/read", tag = "notifications",
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses((status = 200, description = "Marked read"), (status = 404, description = "Not Found"))
)]
pub async fn mark_read(State(state): State<ServerState>, Actor(actor): Actor, Path(id): Path<Uuid>) -> Result<Json<notification::Model>, JsonApiError> {
    Ok(Json(notification_service::mark_read(&state.db, actor, id).await?))
}

#[utoipa::path(
    delete, path = "/api/notifications/{id}", tag = "notifications",
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete(State(state): State<ServerState>, Actor(actor): Actor, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    notification_service::delete_notification(&state.db, actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
