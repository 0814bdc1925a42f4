//! Plain-text history export of one equipment.

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use models::{document, maintenance_plan, user, work_order};
use crate::{equipment_service, errors::ServiceError, label};

fn or_dash(value: Option<impl ToString>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

pub async fn equipment_history<C: ConnectionTrait>(db: &C, equipment_id: Uuid) -> Result<String, ServiceError> {
    let eq = equipment_service::get_equipment(db, equipment_id).await?;
    let responsible = match eq.responsible_id {
        Some(id) => user::Entity::find_by_id(id).one(db).await?.map(|u| u.name),
        None => None,
    };
    let plans = maintenance_plan::Entity::find()
        .filter(maintenance_plan::Column::EquipmentId.eq(equipment_id))
        .order_by_asc(maintenance_plan::Column::NextDueOn)
        .all(db)
        .await?;
    let orders = work_order::Entity::find()
        .filter(work_order::Column::EquipmentId.eq(equipment_id))
        .order_by_asc(work_order::Column::CreatedAt)
        .order_by_asc(work_order::Column::Code)
        .all(db)
        .await?;
    let documents = document::Entity::find()
        .filter(document::Column::EquipmentId.eq(equipment_id))
        .order_by_asc(document::Column::Title)
        .all(db)
        .await?;

    let mut lines = vec![
        format!("EQUIPMENT HISTORY: {} - {}", eq.inventory_code, eq.name),
        "=".repeat(60),
        format!("Brand / model:   {} / {}", or_dash(eq.brand.as_ref()), or_dash(eq.model_name.as_ref())),
        format!("Serial number:   {}", or_dash(eq.serial_number.as_ref())),
        format!("Category:        {}", eq.category),
        format!("Location:        {}", eq.location),
        format!("Risk class:      {}", label(&eq.risk_class).to_uppercase()),
        format!("Status:          {}", eq.status.as_str()),
        format!("Acquired:        {}", or_dash(eq.acquisition_date)),
        format!("Warranty until:  {}", or_dash(eq.warranty_expires_on)),
        format!("Responsible:     {}", or_dash(responsible)),
        String::new(),
        format!("PREVENTIVE PLANS ({})", plans.len()),
    ];
    for p in &plans {
        lines.push(format!(
            "  - {} [{}] next due {} / last done {}{}",
            p.title,
            label(&p.frequency),
            p.next_due_on,
            or_dash(p.last_performed_on),
            if p.active { "" } else { " (inactive)" }
        ));
    }

    lines.push(String::new());
    lines.push(format!("WORK ORDERS ({})", orders.len()));
    for o in &orders {
        lines.push(format!(
            "  {} {} {}/{} {}: {}",
            o.created_at.format("%Y-%m-%d"),
            o.code,
            label(&o.kind),
            label(&o.priority),
            o.status.as_str(),
            o.title
        ));
        if let Some(done) = o.completed_at {
            lines.push(format!("      completed {}", done.format("%Y-%m-%d %H:%M")));
        }
        if let Some(resolution) = &o.resolution {
            lines.push(format!("      resolution: {resolution}"));
        }
        if o.labor_hours.is_some() || o.cost_cents.is_some() {
            lines.push(format!(
                "      labor {} h, cost {}",
                or_dash(o.labor_hours),
                or_dash(o.cost_cents.map(|c| format!("{}.{:02}", c / 100, c % 100)))
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!("DOCUMENTS ({})", documents.len()));
    for d in &documents {
        lines.push(format!("  - {} [{}] {}", d.title, label(&d.kind), d.url));
    }
    lines.push(String::new());
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equipment_service::tests::new_equipment;
    use crate::test_support::get_db;
    use crate::work_order_service::{self, tests::corrective, StatusChange, WorkOrderUpdate};
    use crate::document_service::{self, NewDocument};
    use crate::maintenance::NewPlan;
    use models::document::DocumentKind;
    use models::maintenance_plan::Frequency;
    use models::work_order::WorkOrderStatus;

    #[tokio::test]
    async fn history_lists_orders_with_resolution() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let eq = equipment_service::create_equipment(&db, None, new_equipment("REP-1")).await?;
        let wo = work_order_service::create_work_order(&db, None, corrective(eq.id)).await?;
        work_order_service::update_work_order(&db, None, wo.id, WorkOrderUpdate { labor_hours: Some(2.5), cost_cents: Some(4550), ..Default::default() }).await?;
        work_order_service::change_status(&db, None, wo.id, StatusChange { status: WorkOrderStatus::InProgress, resolution: None }).await?;
        work_order_service::change_status(&db, None, wo.id, StatusChange { status: WorkOrderStatus::Completed, resolution: Some("Cable replaced".into()) }).await?;

        let text = equipment_history(&db, eq.id).await?;
        assert!(text.starts_with("EQUIPMENT HISTORY: REP-1 - Defibrillator"));
        assert!(text.contains("Risk class:      III"));
        assert!(text.contains("WORK ORDERS (1)"));
        assert!(text.contains(&wo.code));
        assert!(text.contains("resolution: Cable replaced"));
        assert!(text.contains("cost 45.50"));
        assert!(text.contains("PREVENTIVE PLANS (0)"));
        assert!(text.contains("corrective/high completed"));

        assert!(matches!(equipment_history(&db, Uuid::new_v4()).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn history_uses_wire_names() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let eq = equipment_service::create_equipment(&db, None, new_equipment("REP-2")).await?;
        let today = chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        crate::maintenance::service::create_plan(&db, None, NewPlan {
            equipment_id: eq.id,
            title: "Electrical safety".into(),
            description: None,
            frequency: Frequency::Quarterly,
            lead_days: None,
            next_due_on: None,
            assigned_to: None,
            active: None,
        }, today)
        .await?;
        document_service::create_document(&db, None, NewDocument {
            equipment_id: Some(eq.id),
            work_order_id: None,
            title: "Service manual".into(),
            kind: Some(DocumentKind::CalibrationReport),
            url: "https://files.example.org/cal.pdf".into(),
            mime_type: None,
            uploaded_by: None,
        })
        .await?;

        let text = equipment_history(&db, eq.id).await?;
        assert!(text.contains("Electrical safety [quarterly]"));
        assert!(text.contains("Service manual [calibration_report]"));
        assert!(!text.contains("Quarterly"));
        Ok(())
    }
}
