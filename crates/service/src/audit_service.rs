use serde::Deserialize;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::debug;
use uuid::Uuid;

use common::{pagination::Pagination, types::Page};
use models::audit_log::{self, AuditAction};
use crate::errors::ServiceError;

#[derive(Debug, Default, Clone, Deserialize)]
pub struct AuditFilter {
    pub entity: Option<String>,
    pub entity_id: Option<String>,
    pub user_id: Option<Uuid>,
    pub action: Option<AuditAction>,
}

/// Append one audit entry on `db`, which is usually the caller's open transaction.
pub async fn record<C: ConnectionTrait>(
    db: &C,
    actor: Option<Uuid>,
    action: AuditAction,
    entity: &str,
    entity_id: impl ToString,
    details: Option<serde_json::Value>,
) -> Result<(), ServiceError> {
    let entry = audit_log::record(db, actor, action, entity, entity_id, details).await?;
    debug!(audit_id = entry.id, entity = %entry.entity, entity_id = %entry.entity_id, action = ?entry.action, "audit recorded");
    Ok(())
}

/// Audit entries matching `filter`, newest first.
pub async fn list<C: ConnectionTrait>(db: &C, filter: AuditFilter, opts: Pagination) -> Result<Page<audit_log::Model>, ServiceError> {
    let mut q = audit_log::Entity::find();
    if let Some(entity) = filter.entity {
        q = q.filter(audit_log::Column::Entity.eq(entity));
    }
    if let Some(entity_id) = filter.entity_id {
        q = q.filter(audit_log::Column::EntityId.eq(entity_id));
    }
    if let Some(user_id) = filter.user_id {
        q = q.filter(audit_log::Column::UserId.eq(user_id));
    }
    if let Some(action) = filter.action {
        q = q.filter(audit_log::Column::Action.eq(action));
    }
    crate::fetch_page(db, q.order_by_desc(audit_log::Column::Id), opts).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn list_filters_and_orders_newest_first() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let actor = Uuid::new_v4();
        let target = Uuid::new_v4();

        record(&db, Some(actor), AuditAction::Create, "equipment", target, None).await?;
        record(&db, Some(actor), AuditAction::Update, "equipment", target, Some(serde_json::json!({"name": "x"}))).await?;
        record(&db, None, AuditAction::Create, "user", Uuid::new_v4(), None).await?;

        let all = list(&db, AuditFilter::default(), Pagination::default()).await?;
        assert_eq!(all.total, 3);
        assert_eq!(all.items[0].entity, "user");

        let for_target = list(
            &db,
            AuditFilter { entity: Some("equipment".into()), entity_id: Some(target.to_string()), ..Default::default() },
            Pagination::default(),
        )
        .await?;
        assert_eq!(for_target.total, 2);
        assert_eq!(for_target.items[0].action, AuditAction::Update);

        let by_action = list(&db, AuditFilter { action: Some(AuditAction::Create), user_id: Some(actor), ..Default::default() }, Pagination::default()).await?;
        assert_eq!(by_action.total, 1);

        let paged = list(&db, AuditFilter::default(), Pagination { page: 2, per_page: 2 }).await?;
        assert_eq!(paged.items.len(), 1);
        assert_eq!(paged.page, 2);
        Ok(())
    }
}
