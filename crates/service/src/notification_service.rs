use chrono::Utc;
use sea_orm::{sea_query::Expr, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use serde::Deserialize;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use common::{pagination::Pagination, types::Page};
use models::audit_log::AuditAction;
use models::notification::{self, NewNotification, NotificationKind, Severity};
use crate::{audit_service, errors::ServiceError, observability::NOTIFICATIONS_CREATED_TOTAL, user_service};

#[derive(Debug, Default, Clone, Deserialize)]
pub struct NotificationFilter {
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub unread_only: bool,
}

/// Body of a manually posted notification; always of kind `system`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSystemNotification {
    pub user_id: Option<Uuid>,
    pub severity: Option<Severity>,
    pub title: String,
    pub message: String,
}

/// Recipient condition: the user's own rows plus broadcasts.
fn audience(user_id: Option<Uuid>) -> Condition {
    match user_id {
        Some(id) => Condition::any()
            .add(notification::Column::UserId.eq(id))
            .add(notification::Column::UserId.is_null()),
        None => Condition::all(),
    }
}

/// Store a notification on `db` and count it.
pub async fn notify<C: ConnectionTrait>(db: &C, n: NewNotification) -> Result<notification::Model, ServiceError> {
    let created = notification::create(db, n).await?;
    NOTIFICATIONS_CREATED_TOTAL.inc();
    debug!(notification_id = %created.id, kind = ?created.kind, user_id = ?created.user_id, "notification created");
    Ok(created)
}

#[instrument(skip(db, input), fields(user_id = ?input.user_id))]
pub async fn create_system(db: &DatabaseConnection, actor: Option<Uuid>, input: NewSystemNotification) -> Result<notification::Model, ServiceError> {
    let txn = db.begin().await?;
    if let Some(uid) = input.user_id {
        user_service::get_user(&txn, uid).await?;
    }
    let created = notify(&txn, NewNotification {
        user_id: input.user_id,
        kind: NotificationKind::System,
        severity: input.severity.unwrap_or(Severity::Info),
        title: input.title,
        message: input.message,
        equipment_id: None,
        work_order_id: None,
    })
    .await?;
    audit_service::record(
        &txn,
        actor,
        AuditAction::Create,
        "notification",
        created.id,
        Some(serde_json::json!({ "user_id": created.user_id, "severity": created.severity })),
    )
    .await?;
    txn.commit().await?;
    Ok(created)
}

pub async fn get_notification<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<notification::Model, ServiceError> {
    notification::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("notification"))
}

/// Notifications visible to `filter.user_id`, newest first.
pub async fn list<C: ConnectionTrait>(db: &C, filter: NotificationFilter, opts: Pagination) -> Result<Page<notification::Model>, ServiceError> {
    let mut q = notification::Entity::find().filter(audience(filter.user_id));
    if filter.unread_only {
        q = q.filter(notification::Column::ReadAt.is_null());
    }
    let q = q
        .order_by_desc(notification::Column::CreatedAt)
        .order_by_asc(notification::Column::Id);
    crate::fetch_page(db, q, opts).await
}

pub async fn unread_count<C: ConnectionTrait>(db: &C, user_id: Option<Uuid>) -> Result<u64, ServiceError> {
    Ok(notification::Entity::find()
        .filter(audience(user_id))
        .filter(notification::Column::ReadAt.is_null())
        .count(db)
        .await?)
}

/// Mark one notification read; reading twice keeps the first timestamp and audits nothing.
pub async fn mark_read(db: &DatabaseConnection, actor: Option<Uuid>, id: Uuid) -> Result<notification::Model, ServiceError> {
    let txn = db.begin().await?;
    let found = get_notification(&txn, id).await?;
    if found.read_at.is_some() {
        return Ok(found);
    }
    let mut am: notification::ActiveModel = found.into();
    am.read_at = Set(Some(Utc::now().into()));
    let updated = am.update(&txn).await?;
    audit_service::record(&txn, actor, AuditAction::Update, "notification", id, Some(serde_json::json!({ "read": true }))).await?;
    txn.commit().await?;
    Ok(updated)
}

/// Mark every unread notification visible to `user_id` as read; returns how many changed.
/// The audit row is keyed by the inbox owner, or `broadcast` without one.
#[instrument(skip(db))]
pub async fn mark_all_read(db: &DatabaseConnection, actor: Option<Uuid>, user_id: Option<Uuid>) -> Result<u64, ServiceError> {
    let txn = db.begin().await?;
    let res = notification::Entity::update_many()
        .col_expr(notification::Column::ReadAt, Expr::value(Some(chrono::DateTime::<chrono::FixedOffset>::from(Utc::now()))))
        .filter(audience(user_id))
        .filter(notification::Column::ReadAt.is_null())
        .exec(&txn)
        .await?;
    let inbox = user_id.map(|u| u.to_string()).unwrap_or_else(|| "broadcast".to_string());
    audit_service::record(&txn, actor, AuditAction::Update, "notification", inbox, Some(serde_json::json!({ "marked_read": res.rows_affected }))).await?;
    txn.commit().await?;
    info!(updated = res.rows_affected, "notifications marked read");
    Ok(res.rows_affected)
}

pub async fn delete_notification(db: &DatabaseConnection, actor: Option<Uuid>, id: Uuid) -> Result<(), ServiceError> {
    let txn = db.begin().await?;
    let found = get_notification(&txn, id).await?;
    notification::Entity::delete_by_id(id).exec(&txn).await?;
    audit_service::record(&txn, actor, AuditAction::Delete, "notification", id, Some(serde_json::json!({ "title": found.title }))).await?;
    txn.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use crate::user_service::tests::technician;

    fn system(user_id: Option<Uuid>, title: &str) -> NewSystemNotification {
        NewSystemNotification { user_id, severity: None, title: title.into(), message: "body".into() }
    }

    #[tokio::test]
    async fn user_view_includes_broadcasts() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let a = technician(&db, "a@hospital.org").await?;
        let b = technician(&db, "b@hospital.org").await?;

        create_system(&db, None, system(Some(a.id), "for a")).await?;
        create_system(&db, None, system(Some(b.id), "for b")).await?;
        let broadcast = create_system(&db, None, system(None, "everyone")).await?;
        assert_eq!(broadcast.kind, NotificationKind::System);
        assert_eq!(broadcast.severity, Severity::Info);

        let for_a = list(&db, NotificationFilter { user_id: Some(a.id), unread_only: false }, Pagination::default()).await?;
        assert_eq!(for_a.total, 2);
        assert!(for_a.items.iter().all(|n| n.user_id != Some(b.id)));

        let all = list(&db, NotificationFilter::default(), Pagination::default()).await?;
        assert_eq!(all.total, 3);

        assert!(matches!(create_system(&db, None, system(Some(Uuid::new_v4()), "ghost")).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn read_tracking() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let a = technician(&db, "reader@hospital.org").await?;
        let first = create_system(&db, None, system(Some(a.id), "one")).await?;
        create_system(&db, None, system(Some(a.id), "two")).await?;
        create_system(&db, None, system(None, "three")).await?;
        assert_eq!(unread_count(&db, Some(a.id)).await?, 3);

        let read = mark_read(&db, None, first.id).await?;
        let stamp = read.read_at;
        assert!(stamp.is_some());
        assert_eq!(mark_read(&db, None, first.id).await?.read_at, stamp);
        assert_eq!(unread_count(&db, Some(a.id)).await?, 2);

        let unread = list(&db, NotificationFilter { user_id: Some(a.id), unread_only: true }, Pagination::default()).await?;
        assert_eq!(unread.total, 2);

        assert_eq!(mark_all_read(&db, None, Some(a.id)).await?, 2);
        assert_eq!(unread_count(&db, Some(a.id)).await?, 0);

        delete_notification(&db, None, first.id).await?;
        assert!(matches!(delete_notification(&db, None, first.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn inbox_changes_are_audited() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let actor = technician(&db, "auditor@hospital.org").await?;
        let by_entity = || audit_service::AuditFilter { entity: Some("notification".into()), ..Default::default() };
        assert_eq!(audit_service::list(&db, by_entity(), Pagination::default()).await?.total, 0);

        let n = create_system(&db, Some(actor.id), system(None, "generator test")).await?;
        mark_read(&db, Some(actor.id), n.id).await?;
        // already read: nothing changes, nothing recorded
        mark_read(&db, Some(actor.id), n.id).await?;
        mark_all_read(&db, Some(actor.id), Some(actor.id)).await?;
        delete_notification(&db, Some(actor.id), n.id).await?;

        let entries = audit_service::list(&db, by_entity(), Pagination::default()).await?;
        assert_eq!(entries.total, 4);
        assert!(entries.items.iter().all(|e| e.user_id == Some(actor.id)));
        let actions: Vec<AuditAction> = entries.items.iter().map(|e| e.action).collect();
        assert_eq!(actions, vec![AuditAction::Delete, AuditAction::Update, AuditAction::Update, AuditAction::Create]);
        Ok(())
    }
}
