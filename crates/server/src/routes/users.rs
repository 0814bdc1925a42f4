use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use common::{pagination::Pagination, types::Page};
use models::user;
use service::user_service::{self, NewUser, UserFilter, UserUpdate};

use crate::{actor::Actor, errors::JsonApiError, state::ServerState};

#[derive(Debug, Deserialize)]
pub struct ChangePasswordInput {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub hard: bool,
}

#[utoipa::path(
    get, path = "/api/users", tag = "users",
    params(
        ("role" = Option<String>, Query, description = "admin | supervisor | technician | viewer"),
        ("active" = Option<bool>, Query,),
        ("search" = Option<String>, Query, description = "Substring of name or email"),
        ("page" = Option<u32>, Query,), ("per_page" = Option<u32>, Query,)
    ),
    responses((status = 200, description = "List OK"))
)]
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<UserFilter>,
    Query(page): Query<Pagination>,
) -> Result<Json<Page<user::Model>>, JsonApiError> {
    Ok(Json(user_service::list_users(&state.db, filter, page).await?))
}

#[utoipa::path(
    post, path = "/api/users", tag = "users",
    request_body = crate::openapi::CreateUserDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Actor(actor): Actor,
    Json(input): Json<NewUser>,
) -> Result<(StatusCode, Json<user::Model>), JsonApiError> {
    let created = user_service::create_user(&state.db, actor, input).await?;
    info!(user_id = %created.id, role = ?created.role, "user created via api");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/api/users/{id}", tag = "users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<user::Model>, JsonApiError> {
    Ok(Json(user_service::get_user(&state.db, id).await?))
}

#[utoipa::path(
    put, path = "/api/users/{id}", tag = "users",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = crate::openapi::UpdateUserDoc,
    responses((status = 200, description = "Updated"), (status = 404, description = "Not Found"))
)]
pub async fn update(
    State(state): State<ServerState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(changes): Json<UserUpdate>,
) -> Result<Json<user::Model>, JsonApiError> {
    Ok(Json(user_service::update_user(&state.db, actor, id, changes).await?))
}

#[utoipa::path(
    post, path = "/api/users/{id}/password", tag = "users",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = crate::openapi::ChangePasswordDoc,
    responses(
        (status = 204, description = "Password changed"),
        (status = 401, description = "Current password does not match")
    )
)]
pub async fn change_password(
    State(state): State<ServerState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(input): Json<ChangePasswordInput>,
) -> Result<StatusCode, JsonApiError> {
    user_service::change_password(&state.db, actor, id, &input.current_password, &input.new_password).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete, path = "/api/users/{id}", tag = "users",
    params(("id" = Uuid, Path, description = "User ID"), ("hard" = Option<bool>, Query, description = "Remove the row instead of soft deleting")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete(
    State(state): State<ServerState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Query(q): Query<DeleteQuery>,
) -> Result<StatusCode, JsonApiError> {
    user_service::delete_user(&state.db, actor, id, q.hard).await?;
    Ok(StatusCode::NO_CONTENT)
}
