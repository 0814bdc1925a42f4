use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use serde::Deserialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use common::{pagination::Pagination, types::Page};
use models::audit_log::AuditAction;
use models::equipment::{self, EquipmentStatus};
use models::maintenance_plan;
use models::notification::{NewNotification, NotificationKind, Severity};
use models::work_order::{self, Priority, WorkOrderKind, WorkOrderStatus};
use crate::{audit_service, equipment_service, errors::ServiceError, notification_service, observability, user_service};

#[derive(Debug, Clone, Deserialize)]
pub struct NewWorkOrder {
    pub equipment_id: Uuid,
    pub maintenance_plan_id: Option<Uuid>,
    pub kind: WorkOrderKind,
    pub priority: Option<Priority>,
    pub title: String,
    pub description: Option<String>,
    pub reported_by: Option<Uuid>,
    pub assigned_to: Option<Uuid>,
    pub scheduled_for: Option<NaiveDate>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct WorkOrderUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub scheduled_for: Option<NaiveDate>,
    pub labor_hours: Option<f64>,
    pub cost_cents: Option<i64>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct WorkOrderFilter {
    pub status: Option<WorkOrderStatus>,
    pub priority: Option<Priority>,
    pub kind: Option<WorkOrderKind>,
    pub equipment_id: Option<Uuid>,
    pub assigned_to: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusChange {
    pub status: WorkOrderStatus,
    pub resolution: Option<String>,
}

pub async fn get_work_order<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<work_order::Model, ServiceError> {
    work_order::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("work order"))
}

async fn notify_assignee<C: ConnectionTrait>(db: &C, order: &work_order::Model, assignee: Uuid) -> Result<(), ServiceError> {
    notification_service::notify(db, NewNotification {
        user_id: Some(assignee),
        kind: NotificationKind::WorkOrderAssigned,
        severity: if order.priority >= Priority::High { Severity::Warning } else { Severity::Info },
        title: format!("Work order {} assigned to you", order.code),
        message: order.title.clone(),
        equipment_id: Some(order.equipment_id),
        work_order_id: Some(order.id),
    })
    .await?;
    Ok(())
}

/// Validate references and insert an order on `db` without committing or notifying.
pub(crate) async fn insert_order<C: ConnectionTrait>(
    db: &C,
    actor: Option<Uuid>,
    input: NewWorkOrder,
    today: NaiveDate,
) -> Result<work_order::Model, ServiceError> {
    work_order::validate_title(&input.title)?;
    let eq = equipment_service::get_equipment(db, input.equipment_id).await?;
    if !eq.accepts_new_work() {
        return Err(ServiceError::Conflict(format!("equipment {} is decommissioned", eq.inventory_code)));
    }
    if let Some(plan_id) = input.maintenance_plan_id {
        let plan = maintenance_plan::Entity::find_by_id(plan_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::Validation(format!("maintenance plan {plan_id} does not exist")))?;
        if plan.equipment_id != eq.id {
            return Err(ServiceError::Validation("maintenance plan belongs to another equipment".into()));
        }
    }
    if let Some(reporter) = input.reported_by {
        user_service::get_user(db, reporter)
            .await
            .map_err(|_| ServiceError::Validation(format!("reporting user {reporter} does not exist")))?;
    }
    if let Some(assignee) = input.assigned_to {
        user_service::require_assignable(db, assignee).await?;
    }

    let now = Utc::now().into();
    let status = if input.assigned_to.is_some() { WorkOrderStatus::Assigned } else { WorkOrderStatus::Open };
    let am = work_order::ActiveModel {
        id: Set(Uuid::new_v4()),
        code: Set(work_order::generate_code(today)),
        equipment_id: Set(eq.id),
        maintenance_plan_id: Set(input.maintenance_plan_id),
        kind: Set(input.kind),
        priority: Set(input.priority.unwrap_or(Priority::Medium)),
        status: Set(status),
        title: Set(input.title.trim().to_string()),
        description: Set(input.description.filter(|d| !d.trim().is_empty())),
        reported_by: Set(input.reported_by),
        assigned_to: Set(input.assigned_to),
        scheduled_for: Set(input.scheduled_for),
        started_at: Set(None),
        completed_at: Set(None),
        resolution: Set(None),
        labor_hours: Set(None),
        cost_cents: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let created = am.insert(db).await.map_err(|e| ServiceError::from_write(e, "work order"))?;
    audit_service::record(
        db,
        actor,
        AuditAction::Create,
        "work_order",
        created.id,
        Some(serde_json::json!({ "code": created.code, "kind": created.kind, "equipment_id": created.equipment_id })),
    )
    .await?;
    observability::WORK_ORDERS_CREATED_TOTAL
        .with_label_values(&[kind_label(created.kind)])
        .inc();
    Ok(created)
}

fn kind_label(kind: WorkOrderKind) -> &'static str {
    match kind {
        WorkOrderKind::Preventive => "preventive",
        WorkOrderKind::Corrective => "corrective",
        WorkOrderKind::Calibration => "calibration",
        WorkOrderKind::Inspection => "inspection",
    }
}

#[instrument(skip(db, input), fields(equipment_id = %input.equipment_id, kind = ?input.kind))]
pub async fn create_work_order(db: &DatabaseConnection, actor: Option<Uuid>, input: NewWorkOrder) -> Result<work_order::Model, ServiceError> {
    let txn = db.begin().await?;
    let created = insert_order(&txn, actor, input, Utc::now().date_naive()).await?;
    if let Some(assignee) = created.assigned_to {
        notify_assignee(&txn, &created, assignee).await?;
    }
    txn.commit().await?;
    info!(work_order_id = %created.id, code = %created.code, "work order created");
    Ok(created)
}

/// Orders matching `filter`, newest first.
pub async fn list_work_orders<C: ConnectionTrait>(db: &C, filter: WorkOrderFilter, opts: Pagination) -> Result<Page<work_order::Model>, ServiceError> {
    let mut q = work_order::Entity::find();
    if let Some(status) = filter.status {
        q = q.filter(work_order::Column::Status.eq(status));
    }
    if let Some(priority) = filter.priority {
        q = q.filter(work_order::Column::Priority.eq(priority));
    }
    if let Some(kind) = filter.kind {
        q = q.filter(work_order::Column::Kind.eq(kind));
    }
    if let Some(equipment_id) = filter.equipment_id {
        q = q.filter(work_order::Column::EquipmentId.eq(equipment_id));
    }
    if let Some(assigned_to) = filter.assigned_to {
        q = q.filter(work_order::Column::AssignedTo.eq(assigned_to));
    }
    let q = q
        .order_by_desc(work_order::Column::CreatedAt)
        .order_by_desc(work_order::Column::Code);
    crate::fetch_page(db, q, opts).await
}

#[instrument(skip(db, changes))]
pub async fn update_work_order(db: &DatabaseConnection, actor: Option<Uuid>, id: Uuid, changes: WorkOrderUpdate) -> Result<work_order::Model, ServiceError> {
    work_order::validate_labor_hours(changes.labor_hours)?;
    work_order::validate_cost(changes.cost_cents)?;
    let txn = db.begin().await?;
    let current = get_work_order(&txn, id).await?;
    let mut am: work_order::ActiveModel = current.into();
    if let Some(title) = changes.title.as_deref() {
        work_order::validate_title(title)?;
        am.title = Set(title.trim().to_string());
    }
    if let Some(description) = changes.description {
        am.description = Set(Some(description).filter(|d| !d.trim().is_empty()));
    }
    if let Some(priority) = changes.priority {
        am.priority = Set(priority);
    }
    if changes.scheduled_for.is_some() {
        am.scheduled_for = Set(changes.scheduled_for);
    }
    if changes.labor_hours.is_some() {
        am.labor_hours = Set(changes.labor_hours);
    }
    if changes.cost_cents.is_some() {
        am.cost_cents = Set(changes.cost_cents);
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(&txn).await?;
    audit_service::record(&txn, actor, AuditAction::Update, "work_order", id, None).await?;
    txn.commit().await?;
    Ok(updated)
}

/// Give the order to a technician or supervisor; an open order becomes assigned.
#[instrument(skip(db))]
pub async fn assign(db: &DatabaseConnection, actor: Option<Uuid>, id: Uuid, user_id: Uuid) -> Result<work_order::Model, ServiceError> {
    let txn = db.begin().await?;
    let current = get_work_order(&txn, id).await?;
    if current.status.is_terminal() {
        return Err(ServiceError::InvalidTransition(format!(
            "cannot assign a {} work order",
            current.status.as_str()
        )));
    }
    user_service::require_assignable(&txn, user_id).await?;

    let previous = current.assigned_to;
    let from = current.status;
    let mut am: work_order::ActiveModel = current.into();
    am.assigned_to = Set(Some(user_id));
    if from == WorkOrderStatus::Open {
        am.status = Set(WorkOrderStatus::Assigned);
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(&txn).await?;

    audit_service::record(
        &txn,
        actor,
        AuditAction::Assign,
        "work_order",
        id,
        Some(serde_json::json!({ "from": previous, "to": user_id })),
    )
    .await?;
    notify_assignee(&txn, &updated, user_id).await?;
    txn.commit().await?;
    info!(work_order_id = %id, assignee = %user_id, "work order assigned");
    Ok(updated)
}

/// Move the order through its lifecycle, applying the equipment and plan side effects.
#[instrument(skip(db, change), fields(to = change.status.as_str()))]
pub async fn change_status(db: &DatabaseConnection, actor: Option<Uuid>, id: Uuid, change: StatusChange) -> Result<work_order::Model, ServiceError> {
    let txn = db.begin().await?;
    let current = get_work_order(&txn, id).await?;
    let from = current.status;
    let to = change.status;
    if !from.can_transition_to(to) {
        return Err(ServiceError::InvalidTransition(format!("{} -> {}", from.as_str(), to.as_str())));
    }
    if to == WorkOrderStatus::Assigned && current.assigned_to.is_none() {
        return Err(ServiceError::InvalidTransition(format!(
            "work order {} has no assignee; use the assign endpoint",
            current.code
        )));
    }

    let now = Utc::now();
    let kind = current.kind;
    let equipment_id = current.equipment_id;
    let plan_id = current.maintenance_plan_id;
    let reporter = current.reported_by;
    let had_started = current.started_at.is_some();

    let mut am: work_order::ActiveModel = current.into();
    am.status = Set(to);
    match to {
        WorkOrderStatus::InProgress if !had_started => am.started_at = Set(Some(now.into())),
        WorkOrderStatus::Completed => am.completed_at = Set(Some(now.into())),
        WorkOrderStatus::Open => am.assigned_to = Set(None),
        _ => {}
    }
    if let Some(resolution) = change.resolution.filter(|r| !r.trim().is_empty()) {
        am.resolution = Set(Some(resolution));
    }
    am.updated_at = Set(now.into());
    let updated = am.update(&txn).await?;

    if to == WorkOrderStatus::InProgress && kind == WorkOrderKind::Corrective {
        set_equipment_status(&txn, equipment_id, EquipmentStatus::UnderMaintenance, &[EquipmentStatus::Operational, EquipmentStatus::OutOfService]).await?;
    }
    if to == WorkOrderStatus::Completed {
        if !other_repairs_running(&txn, equipment_id, id).await? {
            set_equipment_status(&txn, equipment_id, EquipmentStatus::Operational, &[EquipmentStatus::UnderMaintenance]).await?;
        }
        if let Some(plan_id) = plan_id {
            reschedule_plan(&txn, actor, plan_id, now.date_naive()).await?;
        }
    }

    let action = if to == WorkOrderStatus::Completed { AuditAction::Complete } else { AuditAction::StatusChange };
    audit_service::record(
        &txn,
        actor,
        action,
        "work_order",
        id,
        Some(serde_json::json!({ "from": from, "to": to })),
    )
    .await?;
    if let Some(reporter) = reporter.filter(|r| Some(*r) != actor) {
        notification_service::notify(&txn, NewNotification {
            user_id: Some(reporter),
            kind: NotificationKind::WorkOrderStatus,
            severity: Severity::Info,
            title: format!("Work order {} is now {}", updated.code, to.as_str()),
            message: updated.title.clone(),
            equipment_id: Some(equipment_id),
            work_order_id: Some(id),
        })
        .await?;
    }
    txn.commit().await?;

    observability::WORK_ORDER_TRANSITIONS_TOTAL.with_label_values(&[to.as_str()]).inc();
    info!(work_order_id = %id, from = from.as_str(), to = to.as_str(), "work order status changed");
    Ok(updated)
}

async fn other_repairs_running<C: ConnectionTrait>(db: &C, equipment_id: Uuid, except: Uuid) -> Result<bool, ServiceError> {
    let n = work_order::Entity::find()
        .filter(work_order::Column::EquipmentId.eq(equipment_id))
        .filter(work_order::Column::Id.ne(except))
        .filter(work_order::Column::Kind.eq(WorkOrderKind::Corrective))
        .filter(work_order::Column::Status.eq(WorkOrderStatus::InProgress))
        .count(db)
        .await?;
    Ok(n > 0)
}

/// Set the equipment status when its current status is one of `from`.
async fn set_equipment_status<C: ConnectionTrait>(
    db: &C,
    equipment_id: Uuid,
    to: EquipmentStatus,
    from: &[EquipmentStatus],
) -> Result<(), ServiceError> {
    let eq = equipment_service::get_equipment(db, equipment_id).await?;
    if !from.contains(&eq.status) {
        return Ok(());
    }
    let previous = eq.status;
    let mut am: equipment::ActiveModel = eq.into();
    am.status = Set(to);
    am.updated_at = Set(Utc::now().into());
    am.update(db).await?;
    info!(equipment_id = %equipment_id, from = previous.as_str(), to = to.as_str(), "equipment status follows work order");
    Ok(())
}

/// Record the completion on the plan and push its due date one period past it.
async fn reschedule_plan<C: ConnectionTrait>(db: &C, actor: Option<Uuid>, plan_id: Uuid, performed_on: NaiveDate) -> Result<(), ServiceError> {
    let Some(plan) = maintenance_plan::Entity::find_by_id(plan_id).one(db).await? else {
        warn!(plan_id = %plan_id, "completed order references a missing plan");
        return Ok(());
    };
    let next_due = plan.frequency.next_after(performed_on);
    let mut am: maintenance_plan::ActiveModel = plan.into();
    am.last_performed_on = Set(Some(performed_on));
    am.next_due_on = Set(next_due);
    am.updated_at = Set(Utc::now().into());
    am.update(db).await?;
    audit_service::record(
        db,
        actor,
        AuditAction::Schedule,
        "maintenance_plan",
        plan_id,
        Some(serde_json::json!({ "last_performed_on": performed_on, "next_due_on": next_due })),
    )
    .await?;
    Ok(())
}

/// Only open or cancelled orders may be removed.
#[instrument(skip(db))]
pub async fn delete_work_order(db: &DatabaseConnection, actor: Option<Uuid>, id: Uuid) -> Result<(), ServiceError> {
    let txn = db.begin().await?;
    let current = get_work_order(&txn, id).await?;
    if !matches!(current.status, WorkOrderStatus::Open | WorkOrderStatus::Cancelled) {
        return Err(ServiceError::Conflict(format!(
            "work order {} is {}; only open or cancelled orders can be deleted",
            current.code,
            current.status.as_str()
        )));
    }
    work_order::Entity::delete_by_id(id).exec(&txn).await?;
    audit_service::record(&txn, actor, AuditAction::Delete, "work_order", id, Some(serde_json::json!({ "code": current.code }))).await?;
    txn.commit().await?;
    info!(work_order_id = %id, "work order deleted");
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Duration;
    use models::maintenance_plan::Frequency;
    use models::notification;
    use crate::equipment_service::{self, tests::new_equipment, EquipmentUpdate};
    use crate::test_support::get_db;
    use crate::user_service::tests::technician;

    pub(crate) fn corrective(equipment_id: Uuid) -> NewWorkOrder {
        NewWorkOrder {
            equipment_id,
            maintenance_plan_id: None,
            kind: WorkOrderKind::Corrective,
            priority: Some(Priority::High),
            title: "Screen flickers".into(),
            description: None,
            reported_by: None,
            assigned_to: None,
            scheduled_for: None,
        }
    }

    #[tokio::test]
    async fn corrective_lifecycle_drives_equipment_status() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let eq = equipment_service::create_equipment(&db, None, new_equipment("WO-EQ-1")).await?;
        let tech = technician(&db, "wo-tech@hospital.org").await?;

        let wo = create_work_order(&db, None, corrective(eq.id)).await?;
        assert_eq!(wo.status, WorkOrderStatus::Open);
        assert!(wo.code.starts_with("OT-"));

        let wo = assign(&db, None, wo.id, tech.id).await?;
        assert_eq!(wo.status, WorkOrderStatus::Assigned);
        assert_eq!(wo.assigned_to, Some(tech.id));
        let inbox = notification::Entity::find()
            .filter(notification::Column::UserId.eq(tech.id))
            .all(&db)
            .await?;
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].kind, NotificationKind::WorkOrderAssigned);

        let wo = change_status(&db, None, wo.id, StatusChange { status: WorkOrderStatus::InProgress, resolution: None }).await?;
        assert!(wo.started_at.is_some());
        assert_eq!(equipment_service::get_equipment(&db, eq.id).await?.status, EquipmentStatus::UnderMaintenance);

        let wo = change_status(&db, None, wo.id, StatusChange { status: WorkOrderStatus::Completed, resolution: Some("Replaced backlight".into()) }).await?;
        assert!(wo.completed_at.is_some());
        assert_eq!(wo.resolution.as_deref(), Some("Replaced backlight"));
        assert_eq!(equipment_service::get_equipment(&db, eq.id).await?.status, EquipmentStatus::Operational);

        let again = change_status(&db, None, wo.id, StatusChange { status: WorkOrderStatus::InProgress, resolution: None }).await;
        assert!(matches!(again, Err(ServiceError::InvalidTransition(_))));
        assert!(matches!(delete_work_order(&db, None, wo.id).await, Err(ServiceError::Conflict(_))));
        Ok(())
    }

    #[tokio::test]
    async fn illegal_transitions_are_rejected() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let eq = equipment_service::create_equipment(&db, None, new_equipment("WO-EQ-2")).await?;
        let wo = create_work_order(&db, None, corrective(eq.id)).await?;

        let res = change_status(&db, None, wo.id, StatusChange { status: WorkOrderStatus::Completed, resolution: None }).await;
        assert!(matches!(res, Err(ServiceError::InvalidTransition(_))));
        assert_eq!(get_work_order(&db, wo.id).await?.status, WorkOrderStatus::Open);

        change_status(&db, None, wo.id, StatusChange { status: WorkOrderStatus::Cancelled, resolution: None }).await?;
        delete_work_order(&db, None, wo.id).await?;
        assert!(matches!(get_work_order(&db, wo.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn assigned_status_requires_an_assignee() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let eq = equipment_service::create_equipment(&db, None, new_equipment("WO-EQ-6")).await?;
        let wo = create_work_order(&db, None, corrective(eq.id)).await?;

        let res = change_status(&db, None, wo.id, StatusChange { status: WorkOrderStatus::Assigned, resolution: None }).await;
        assert!(matches!(res, Err(ServiceError::InvalidTransition(_))));
        let stored = get_work_order(&db, wo.id).await?;
        assert_eq!(stored.status, WorkOrderStatus::Open);
        assert_eq!(stored.assigned_to, None);
        Ok(())
    }

    #[tokio::test]
    async fn reopening_clears_the_assignee() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let eq = equipment_service::create_equipment(&db, None, new_equipment("WO-EQ-7")).await?;
        let tech = technician(&db, "reopen@hospital.org").await?;
        let wo = create_work_order(&db, None, corrective(eq.id)).await?;
        let wo = assign(&db, None, wo.id, tech.id).await?;
        assert_eq!(wo.assigned_to, Some(tech.id));

        let wo = change_status(&db, None, wo.id, StatusChange { status: WorkOrderStatus::Open, resolution: None }).await?;
        assert_eq!(wo.status, WorkOrderStatus::Open);
        assert_eq!(wo.assigned_to, None);
        Ok(())
    }

    #[tokio::test]
    async fn decommissioned_equipment_takes_no_orders() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let eq = equipment_service::create_equipment(&db, None, new_equipment("WO-EQ-3")).await?;
        equipment_service::update_equipment(&db, None, eq.id, EquipmentUpdate { status: Some(EquipmentStatus::Decommissioned), ..Default::default() }).await?;
        let res = create_work_order(&db, None, corrective(eq.id)).await;
        assert!(matches!(res, Err(ServiceError::Conflict(_))));
        Ok(())
    }

    #[tokio::test]
    async fn equipment_with_orders_cannot_be_deleted() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let eq = equipment_service::create_equipment(&db, None, new_equipment("WO-EQ-4")).await?;
        create_work_order(&db, None, corrective(eq.id)).await?;
        let res = equipment_service::delete_equipment(&db, None, eq.id).await;
        assert!(matches!(res, Err(ServiceError::Conflict(_))));

        let history = equipment_service::work_order_history(&db, eq.id, Pagination::default()).await?;
        assert_eq!(history.total, 1);
        Ok(())
    }

    #[tokio::test]
    async fn completing_plan_order_reschedules_plan() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let eq = equipment_service::create_equipment(&db, None, new_equipment("WO-EQ-5")).await?;
        let today = Utc::now().date_naive();
        let now = Utc::now().into();
        let plan = maintenance_plan::ActiveModel {
            id: Set(Uuid::new_v4()),
            equipment_id: Set(eq.id),
            title: Set("Monthly check".into()),
            description: Set(None),
            frequency: Set(Frequency::Monthly),
            lead_days: Set(7),
            next_due_on: Set(today - Duration::days(2)),
            last_performed_on: Set(None),
            assigned_to: Set(None),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&db)
        .await?;

        let mut input = corrective(eq.id);
        input.kind = WorkOrderKind::Preventive;
        input.maintenance_plan_id = Some(plan.id);
        let wo = create_work_order(&db, None, input).await?;
        change_status(&db, None, wo.id, StatusChange { status: WorkOrderStatus::InProgress, resolution: None }).await?;
        assert_eq!(equipment_service::get_equipment(&db, eq.id).await?.status, EquipmentStatus::Operational);
        change_status(&db, None, wo.id, StatusChange { status: WorkOrderStatus::Completed, resolution: None }).await?;

        let plan = maintenance_plan::Entity::find_by_id(plan.id).one(&db).await?.unwrap();
        assert_eq!(plan.last_performed_on, Some(today));
        assert_eq!(plan.next_due_on, today + Duration::days(30));
        Ok(())
    }

    #[tokio::test]
    async fn viewers_cannot_be_assigned() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let eq = equipment_service::create_equipment(&db, None, new_equipment("WO-EQ-6")).await?;
        let viewer = user_service::create_user(&db, None, user_service::NewUser {
            email: "viewer2@hospital.org".into(),
            name: "Viewer".into(),
            role: models::user::UserRole::Viewer,
            phone: None,
            password: "password123".into(),
        })
        .await?;
        let mut input = corrective(eq.id);
        input.assigned_to = Some(viewer.id);
        assert!(matches!(create_work_order(&db, None, input).await, Err(ServiceError::Validation(_))));
        Ok(())
    }
}
