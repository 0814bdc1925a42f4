use axum::{extract::{Query, State}, Json};

use common::{pagination::Pagination, types::Page};
use models::audit_log;
use service::audit_service::{self, AuditFilter};

use crate::{errors::JsonApiError, state::ServerState};

#[utoipa::path(
    get, path = "/api/audit-logs", tag = "audit",
    params(
        ("entity" = Option<String>, Query, description = "equipment | work_order | maintenance_plan | document | user"),
        ("entity_id" = Option<String>, Query,),
        ("user_id" = Option<uuid::Uuid>, Query,),
        ("action" = Option<String>, Query,),
        ("page" = Option<u32>, Query,), ("per_page" = Option<u32>, Query,)
    ),
    responses((status = 200, description = "Entries, newest first"))
)]
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<AuditFilter>,
    Query(page): Query<Pagination>,
) -> Result<Json<Page<audit_log::Model>>, JsonApiError> {
    Ok(Json(audit_service::list(&state.db, filter, page).await?))
}
