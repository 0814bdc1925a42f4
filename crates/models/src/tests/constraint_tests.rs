use anyhow::Result;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use uuid::Uuid;

use super::crud_tests::equipment_model;
use super::setup_test_db;
use crate::{document, equipment, work_order};
use crate::document::DocumentKind;
use crate::work_order::{Priority, WorkOrderKind, WorkOrderStatus};

fn corrective_order(equipment_id: Uuid) -> work_order::ActiveModel {
    let now = Utc::now();
    work_order::ActiveModel {
        id: Set(Uuid::new_v4()),
        code: Set(work_order::generate_code(now.date_naive())),
        equipment_id: Set(equipment_id),
        maintenance_plan_id: Set(None),
        kind: Set(WorkOrderKind::Corrective),
        priority: Set(Priority::High),
        status: Set(WorkOrderStatus::Open),
        title: Set("Alarm does not sound".into()),
        description: Set(None),
        reported_by: Set(None),
        assigned_to: Set(None),
        scheduled_for: Set(None),
        started_at: Set(None),
        completed_at: Set(None),
        resolution: Set(None),
        labor_hours: Set(None),
        cost_cents: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
}

#[tokio::test]
async fn duplicate_inventory_code_is_rejected() -> Result<()> {
    let db = setup_test_db().await?;
    equipment_model("DUP-1").insert(&db).await?;
    assert!(equipment_model("DUP-1").insert(&db).await.is_err());
    Ok(())
}

#[tokio::test]
async fn work_order_requires_existing_equipment() -> Result<()> {
    let db = setup_test_db().await?;
    assert!(corrective_order(Uuid::new_v4()).insert(&db).await.is_err());
    Ok(())
}

#[tokio::test]
async fn equipment_with_orders_cannot_be_deleted() -> Result<()> {
    let db = setup_test_db().await?;
    let eq = equipment_model("RESTRICT-1").insert(&db).await?;
    corrective_order(eq.id).insert(&db).await?;
    assert!(equipment::Entity::delete_by_id(eq.id).exec(&db).await.is_err());
    Ok(())
}

#[tokio::test]
async fn documents_cascade_with_equipment() -> Result<()> {
    let db = setup_test_db().await?;
    let eq = equipment_model("CASCADE-1").insert(&db).await?;
    let doc = document::ActiveModel {
        id: Set(Uuid::new_v4()),
        equipment_id: Set(Some(eq.id)),
        work_order_id: Set(None),
        title: Set("Service manual".into()),
        kind: Set(DocumentKind::Manual),
        url: Set("https://files.example.org/manual.pdf".into()),
        mime_type: Set(Some("application/pdf".into())),
        uploaded_by: Set(None),
        created_at: Set(Utc::now().into()),
    }
    .insert(&db)
    .await?;

    equipment::Entity::delete_by_id(eq.id).exec(&db).await?;
    assert!(document::Entity::find_by_id(doc.id).one(&db).await?.is_none());
    Ok(())
}
