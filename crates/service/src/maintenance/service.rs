use std::collections::HashMap;

use chrono::{Duration, NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use common::{pagination::Pagination, types::Page};
use models::audit_log::AuditAction;
use models::equipment::{self, EquipmentStatus};
use models::maintenance_plan::{self, Frequency, DEFAULT_LEAD_DAYS};
use models::notification::{NewNotification, NotificationKind, Severity};
use models::user;
use models::work_order::{self, Priority, WorkOrderKind, WorkOrderStatus};
use crate::{audit_service, equipment_service, errors::ServiceError, notification_service, observability, user_service, work_order_service};
use super::schedule::{self, Suggestion};

#[derive(Debug, Clone, Deserialize)]
pub struct NewPlan {
    pub equipment_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub frequency: Frequency,
    pub lead_days: Option<i32>,
    pub next_due_on: Option<NaiveDate>,
    pub assigned_to: Option<Uuid>,
    pub active: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct PlanUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub frequency: Option<Frequency>,
    pub lead_days: Option<i32>,
    pub next_due_on: Option<NaiveDate>,
    pub assigned_to: Option<Uuid>,
    pub active: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct PlanFilter {
    pub equipment_id: Option<Uuid>,
    pub active: Option<bool>,
    /// Plans due on or before today + N days, overdue ones included.
    pub due_within_days: Option<i64>,
}

/// Outcome of one due check.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub plans_checked: u64,
    pub work_orders_created: u64,
    pub notifications_created: u64,
}

pub async fn get_plan<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<maintenance_plan::Model, ServiceError> {
    maintenance_plan::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("maintenance plan"))
}

#[instrument(skip(db, input), fields(equipment_id = %input.equipment_id, frequency = ?input.frequency))]
pub async fn create_plan(db: &DatabaseConnection, actor: Option<Uuid>, input: NewPlan, today: NaiveDate) -> Result<maintenance_plan::Model, ServiceError> {
    maintenance_plan::validate_title(&input.title)?;
    let lead_days = input.lead_days.unwrap_or(DEFAULT_LEAD_DAYS);
    maintenance_plan::validate_lead_days(lead_days)?;

    let txn = db.begin().await?;
    let eq = equipment_service::get_equipment(&txn, input.equipment_id).await?;
    if !eq.accepts_new_work() {
        return Err(ServiceError::Conflict(format!("equipment {} is decommissioned", eq.inventory_code)));
    }
    if let Some(tech) = input.assigned_to {
        user_service::require_assignable(&txn, tech).await?;
    }
    let now = Utc::now().into();
    let am = maintenance_plan::ActiveModel {
        id: Set(Uuid::new_v4()),
        equipment_id: Set(eq.id),
        title: Set(input.title.trim().to_string()),
        description: Set(input.description.filter(|d| !d.trim().is_empty())),
        frequency: Set(input.frequency),
        lead_days: Set(lead_days),
        next_due_on: Set(input.next_due_on.unwrap_or_else(|| input.frequency.next_after(today))),
        last_performed_on: Set(None),
        assigned_to: Set(input.assigned_to),
        active: Set(input.active.unwrap_or(true)),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let created = am.insert(&txn).await?;
    audit_service::record(
        &txn,
        actor,
        AuditAction::Create,
        "maintenance_plan",
        created.id,
        Some(serde_json::json!({ "equipment_id": created.equipment_id, "frequency": created.frequency, "next_due_on": created.next_due_on })),
    )
    .await?;
    txn.commit().await?;
    info!(plan_id = %created.id, next_due_on = %created.next_due_on, "maintenance plan created");
    Ok(created)
}

/// Plans matching `filter`, soonest due first.
pub async fn list_plans<C: ConnectionTrait>(
    db: &C,
    filter: PlanFilter,
    opts: Pagination,
    today: NaiveDate,
) -> Result<Page<maintenance_plan::Model>, ServiceError> {
    let mut q = maintenance_plan::Entity::find();
    if let Some(equipment_id) = filter.equipment_id {
        q = q.filter(maintenance_plan::Column::EquipmentId.eq(equipment_id));
    }
    if let Some(active) = filter.active {
        q = q.filter(maintenance_plan::Column::Active.eq(active));
    }
    if let Some(days) = filter.due_within_days {
        if days < 0 {
            return Err(ServiceError::Validation("due_within_days must be >= 0".into()));
        }
        q = q.filter(maintenance_plan::Column::NextDueOn.lte(today + Duration::days(days)));
    }
    let q = q
        .order_by_asc(maintenance_plan::Column::NextDueOn)
        .order_by_asc(maintenance_plan::Column::Title);
    crate::fetch_page(db, q, opts).await
}

/// Partial update. A new frequency without an explicit due date re-derives it from the last execution.
#[instrument(skip(db, changes))]
pub async fn update_plan(db: &DatabaseConnection, actor: Option<Uuid>, id: Uuid, changes: PlanUpdate) -> Result<maintenance_plan::Model, ServiceError> {
    let txn = db.begin().await?;
    let current = get_plan(&txn, id).await?;
    let last_performed = current.last_performed_on;
    let frequency_changed = changes.frequency.is_some_and(|f| f != current.frequency);

    let mut am: maintenance_plan::ActiveModel = current.into();
    if let Some(title) = changes.title.as_deref() {
        maintenance_plan::validate_title(title)?;
        am.title = Set(title.trim().to_string());
    }
    if let Some(description) = changes.description {
        am.description = Set(Some(description).filter(|d| !d.trim().is_empty()));
    }
    if let Some(lead_days) = changes.lead_days {
        maintenance_plan::validate_lead_days(lead_days)?;
        am.lead_days = Set(lead_days);
    }
    if let Some(tech) = changes.assigned_to {
        user_service::require_assignable(&txn, tech).await?;
        am.assigned_to = Set(Some(tech));
    }
    if let Some(active) = changes.active {
        am.active = Set(active);
    }
    if let Some(frequency) = changes.frequency {
        am.frequency = Set(frequency);
        if frequency_changed && changes.next_due_on.is_none() {
            if let Some(last) = last_performed {
                am.next_due_on = Set(frequency.next_after(last));
            }
        }
    }
    if let Some(next_due_on) = changes.next_due_on {
        am.next_due_on = Set(next_due_on);
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(&txn).await?;
    audit_service::record(
        &txn,
        actor,
        AuditAction::Update,
        "maintenance_plan",
        id,
        Some(serde_json::json!({ "frequency": updated.frequency, "next_due_on": updated.next_due_on, "active": updated.active })),
    )
    .await?;
    txn.commit().await?;
    Ok(updated)
}

#[instrument(skip(db))]
pub async fn delete_plan(db: &DatabaseConnection, actor: Option<Uuid>, id: Uuid) -> Result<(), ServiceError> {
    let txn = db.begin().await?;
    let plan = get_plan(&txn, id).await?;
    maintenance_plan::Entity::delete_by_id(id).exec(&txn).await?;
    audit_service::record(&txn, actor, AuditAction::Delete, "maintenance_plan", id, Some(serde_json::json!({ "title": plan.title }))).await?;
    txn.commit().await?;
    info!(plan_id = %id, "maintenance plan deleted");
    Ok(())
}

/// Open orders per day across the candidate window, for the plan's technician or for everyone.
async fn scheduled_load<C: ConnectionTrait>(
    db: &C,
    technician: Option<Uuid>,
    today: NaiveDate,
    due: NaiveDate,
) -> Result<HashMap<NaiveDate, u32>, ServiceError> {
    let start = schedule::window_start(today, due);
    let end = start + Duration::days(schedule::CANDIDATE_DAYS - 1);
    let mut q = work_order::Entity::find()
        .filter(work_order::Column::ScheduledFor.between(start, end))
        .filter(work_order::Column::Status.is_in(WorkOrderStatus::ACTIVE));
    if let Some(tech) = technician {
        q = q.filter(work_order::Column::AssignedTo.eq(tech));
    }
    let mut load = HashMap::new();
    for order in q.all(db).await? {
        if let Some(day) = order.scheduled_for {
            *load.entry(day).or_insert(0) += 1;
        }
    }
    Ok(load)
}

pub async fn suggest_for_plan<C: ConnectionTrait>(db: &C, plan: &maintenance_plan::Model, today: NaiveDate) -> Result<Suggestion, ServiceError> {
    let load = scheduled_load(db, plan.assigned_to, today, plan.next_due_on).await?;
    Ok(schedule::suggest(today, plan.next_due_on, |day| load.get(&day).copied().unwrap_or(0)))
}

pub async fn suggestion<C: ConnectionTrait>(db: &C, plan_id: Uuid, today: NaiveDate) -> Result<Suggestion, ServiceError> {
    let plan = get_plan(db, plan_id).await?;
    suggest_for_plan(db, &plan, today).await
}

async fn has_pending_order<C: ConnectionTrait>(db: &C, plan_id: Uuid) -> Result<bool, ServiceError> {
    let n = work_order::Entity::find()
        .filter(work_order::Column::MaintenancePlanId.eq(plan_id))
        .filter(work_order::Column::Status.is_in(WorkOrderStatus::ACTIVE))
        .count(db)
        .await?;
    Ok(n > 0)
}

/// Technician that can still take the plan's work, if any.
async fn effective_technician<C: ConnectionTrait>(db: &C, plan: &maintenance_plan::Model) -> Result<Option<Uuid>, ServiceError> {
    let Some(tech) = plan.assigned_to else { return Ok(None) };
    let found = user::Entity::find_by_id(tech).one(db).await?;
    match found {
        Some(u) if u.is_assignable() => Ok(Some(u.id)),
        _ => {
            warn!(plan_id = %plan.id, technician = %tech, "plan technician unavailable; broadcasting");
            Ok(None)
        }
    }
}

/// Generate the preventive order and the reminder for one due plan. Returns the notifications created.
async fn schedule_plan(
    db: &DatabaseConnection,
    plan: &maintenance_plan::Model,
    eq: &equipment::Model,
    today: NaiveDate,
) -> Result<u64, ServiceError> {
    let txn = db.begin().await?;
    let days_until = plan.days_until_due(today);
    let technician = effective_technician(&txn, plan).await?;
    let suggestion = suggest_for_plan(&txn, plan, today).await?;
    let overdue = days_until < 0;

    let order = work_order_service::insert_order(
        &txn,
        None,
        work_order_service::NewWorkOrder {
            equipment_id: plan.equipment_id,
            maintenance_plan_id: Some(plan.id),
            kind: WorkOrderKind::Preventive,
            priority: Some(if overdue { Priority::High } else { Priority::Medium }),
            title: plan.title.clone(),
            description: plan.description.clone(),
            reported_by: None,
            assigned_to: technician,
            scheduled_for: Some(suggestion.suggested_on),
        },
        today,
    )
    .await?;

    let (kind, severity, title) = if overdue {
        (
            NotificationKind::MaintenanceOverdue,
            Severity::Critical,
            format!("Preventive maintenance overdue by {} day(s): {}", -days_until, eq.name),
        )
    } else {
        (
            NotificationKind::MaintenanceDue,
            Severity::Warning,
            format!("Preventive maintenance due in {} day(s): {}", days_until, eq.name),
        )
    };
    notification_service::notify(&txn, NewNotification {
        user_id: technician,
        kind,
        severity,
        title,
        message: format!(
            "{} ({}) due on {}; work order {} scheduled for {}",
            plan.title, eq.inventory_code, plan.next_due_on, order.code, suggestion.suggested_on
        ),
        equipment_id: Some(eq.id),
        work_order_id: Some(order.id),
    })
    .await?;
    audit_service::record(
        &txn,
        None,
        AuditAction::Schedule,
        "maintenance_plan",
        plan.id,
        Some(serde_json::json!({ "work_order_id": order.id, "scheduled_for": suggestion.suggested_on, "penalty": suggestion.score.total })),
    )
    .await?;
    txn.commit().await?;
    info!(plan_id = %plan.id, work_order_id = %order.id, scheduled_for = %suggestion.suggested_on, overdue, "preventive work order generated");
    Ok(1)
}

/// Create the preventive orders and reminders for every plan inside its lead window.
/// Plans that already have an unfinished order are left alone, so repeated runs add nothing.
#[instrument(skip(db))]
pub async fn run_due_check(db: &DatabaseConnection, today: NaiveDate) -> Result<RunSummary, ServiceError> {
    let _timer = observability::SCHEDULER_RUN_DURATION.start_timer();
    observability::SCHEDULER_RUNS_TOTAL.inc();

    let plans = maintenance_plan::Entity::find()
        .filter(maintenance_plan::Column::Active.eq(true))
        .find_also_related(equipment::Entity)
        .order_by_asc(maintenance_plan::Column::NextDueOn)
        .all(db)
        .await?;

    let mut summary = RunSummary::default();
    for (plan, eq) in plans {
        let Some(eq) = eq.filter(|e| e.status != EquipmentStatus::Decommissioned) else { continue };
        summary.plans_checked += 1;
        if plan.days_until_due(today) > i64::from(plan.lead_days) || has_pending_order(db, plan.id).await? {
            continue;
        }
        match schedule_plan(db, &plan, &eq, today).await {
            Ok(notified) => {
                summary.work_orders_created += 1;
                summary.notifications_created += notified;
            }
            Err(e) => error!(plan_id = %plan.id, error = %e, "failed to schedule preventive work"),
        }
    }
    info!(
        plans_checked = summary.plans_checked,
        work_orders_created = summary.work_orders_created,
        notifications_created = summary.notifications_created,
        "maintenance due check finished"
    );
    Ok(summary)
}
