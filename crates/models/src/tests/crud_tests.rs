use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::setup_test_db;
use crate::audit_log::{self, AuditAction};
use crate::equipment::{self, EquipmentStatus, RiskClass};
use crate::maintenance_plan::{self, Frequency};
use crate::notification::{self, NewNotification, NotificationKind, Severity};
use crate::user::{self, UserRole};
use crate::user_credentials;
use crate::work_order::{self, Priority, WorkOrderKind, WorkOrderStatus};

pub(crate) fn equipment_model(code: &str) -> equipment::ActiveModel {
    let now = Utc::now().into();
    equipment::ActiveModel {
        id: Set(Uuid::new_v4()),
        inventory_code: Set(code.to_string()),
        name: Set("Infusion pump".into()),
        brand: Set(Some("Baxter".into())),
        model_name: Set(Some("Sigma Spectrum".into())),
        serial_number: Set(None),
        category: Set("infusion".into()),
        location: Set("ICU bed 4".into()),
        risk_class: Set(RiskClass::IIb),
        status: Set(EquipmentStatus::Operational),
        acquisition_date: Set(NaiveDate::from_ymd_opt(2021, 6, 1)),
        warranty_expires_on: Set(None),
        responsible_id: Set(None),
        notes: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

#[tokio::test]
async fn test_user_crud() -> Result<()> {
    let db = setup_test_db().await?;

    let created = user::create(&db, "  Ana.Tech@Hospital.org ", "Ana", UserRole::Technician, None).await?;
    assert_eq!(created.email, "ana.tech@hospital.org");
    assert!(created.is_assignable());

    let found = user::Entity::find()
        .filter(user::Column::Role.eq(UserRole::Technician))
        .one(&db)
        .await?
        .expect("technician row");
    assert_eq!(found.id, created.id);

    let deleted = user::soft_delete(&db, created.id).await?;
    assert!(deleted.deleted_at.is_some());
    assert!(!deleted.active);
    assert!(!deleted.is_assignable());

    assert!(user::hard_delete(&db, created.id).await?);
    assert!(user::Entity::find_by_id(created.id).one(&db).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_credentials_upsert_replaces_hash() -> Result<()> {
    let db = setup_test_db().await?;
    let u = user::create(&db, "sup@hospital.org", "Sup", UserRole::Supervisor, None).await?;

    let first = user_credentials::upsert_password(&db, u.id, "hash-1".into(), "argon2").await?;
    let second = user_credentials::upsert_password(&db, u.id, "hash-2".into(), "argon2").await?;
    assert_eq!(first.id, second.id);

    assert!(user_credentials::verify_password(&db, u.id, |h| h == "hash-2").await?);
    assert!(!user_credentials::verify_password(&db, u.id, |h| h == "hash-1").await?);
    assert!(!user_credentials::verify_password(&db, Uuid::new_v4(), |_| true).await?);
    Ok(())
}

#[tokio::test]
async fn test_equipment_plan_and_work_order_roundtrip() -> Result<()> {
    let db = setup_test_db().await?;
    let eq = equipment_model("BIO-100").insert(&db).await?;
    assert_eq!(eq.risk_class, RiskClass::IIb);
    assert!(equipment::find_by_inventory_code(&db, " BIO-100 ").await?.is_some());

    let now = Utc::now().into();
    let due = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
    let plan = maintenance_plan::ActiveModel {
        id: Set(Uuid::new_v4()),
        equipment_id: Set(eq.id),
        title: Set("Electrical safety test".into()),
        description: Set(None),
        frequency: Set(Frequency::Quarterly),
        lead_days: Set(7),
        next_due_on: Set(due),
        last_performed_on: Set(None),
        assigned_to: Set(None),
        active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await?;
    assert_eq!(plan.next_due_on, due);
    assert_eq!(plan.days_until_due(NaiveDate::from_ymd_opt(2024, 3, 25).unwrap()), 7);

    let wo = work_order::ActiveModel {
        id: Set(Uuid::new_v4()),
        code: Set(work_order::generate_code(due)),
        equipment_id: Set(eq.id),
        maintenance_plan_id: Set(Some(plan.id)),
        kind: Set(WorkOrderKind::Preventive),
        priority: Set(Priority::Medium),
        status: Set(WorkOrderStatus::Open),
        title: Set(plan.title.clone()),
        description: Set(None),
        reported_by: Set(None),
        assigned_to: Set(None),
        scheduled_for: Set(Some(due)),
        started_at: Set(None),
        completed_at: Set(None),
        resolution: Set(None),
        labor_hours: Set(Some(1.5)),
        cost_cents: Set(Some(12_000)),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await?;

    let open = work_order::Entity::find()
        .filter(work_order::Column::Status.is_in(WorkOrderStatus::ACTIVE))
        .filter(work_order::Column::ScheduledFor.eq(due))
        .all(&db)
        .await?;
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].id, wo.id);
    assert_eq!(open[0].labor_hours, Some(1.5));
    Ok(())
}

#[tokio::test]
async fn test_notification_and_audit_records() -> Result<()> {
    let db = setup_test_db().await?;
    let n = notification::create(&db, NewNotification {
        user_id: None,
        kind: NotificationKind::System,
        severity: Severity::Info,
        title: "Maintenance window".into(),
        message: "Biomedical workshop closed on Friday".into(),
        equipment_id: None,
        work_order_id: None,
    })
    .await?;
    assert!(n.read_at.is_none());

    let empty_title = notification::create(&db, NewNotification {
        user_id: None,
        kind: NotificationKind::System,
        severity: Severity::Info,
        title: " ".into(),
        message: "x".into(),
        equipment_id: None,
        work_order_id: None,
    })
    .await;
    assert!(empty_title.is_err());

    let first = audit_log::record(&db, None, AuditAction::Create, "notification", n.id, Some(serde_json::json!({"title": n.title}))).await?;
    let second = audit_log::record(&db, None, AuditAction::Delete, "notification", n.id, None).await?;
    assert!(second.id > first.id);
    assert_eq!(first.details_json().unwrap()["title"], "Maintenance window");
    assert!(second.details_json().is_none());
    Ok(())
}
