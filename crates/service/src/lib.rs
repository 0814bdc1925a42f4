//! Service layer providing business-oriented operations on top of models.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Every mutation writes its audit row on the same connection or transaction.

pub mod errors;
pub mod observability;
pub mod audit_service;
pub mod user_service;
pub mod equipment_service;
pub mod work_order_service;
pub mod maintenance;
pub mod document_service;
pub mod notification_service;
pub mod dashboard_service;
pub mod report_service;
#[cfg(test)]
pub mod test_support;

use common::{pagination::Pagination, types::Page};
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, Select};
use serde::Serialize;

use crate::errors::ServiceError;

/// Run `select` as one page and count the full result set.
pub(crate) async fn fetch_page<E, C>(db: &C, select: Select<E>, opts: Pagination) -> Result<Page<E::Model>, ServiceError>
where
    E: EntityTrait,
    E::Model: Sync,
    C: ConnectionTrait,
{
    let (page_idx, page_size) = opts.normalize();
    let paginator = select.paginate(db, page_size);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page_idx).await?;
    let (page, per_page) = opts.effective();
    Ok(Page { items, total, page, per_page })
}

/// The snake_case name an enum value has on the wire.
pub(crate) fn label<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}
