use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, Iterable, PaginatorTrait, QueryFilter};
use serde::Serialize;

use models::equipment::{self, EquipmentStatus};
use models::maintenance_plan;
use models::notification;
use models::work_order::{self, Priority, WorkOrderStatus};
use crate::{errors::ServiceError, label};

pub const UPCOMING_WINDOW_DAYS: i64 = 30;

/// Counters shown on the landing page.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub equipment_total: u64,
    pub equipment_by_status: BTreeMap<String, u64>,
    pub open_work_orders: u64,
    pub open_work_orders_by_priority: BTreeMap<String, u64>,
    pub overdue_plans: u64,
    pub plans_due_next_30_days: u64,
    pub unread_broadcasts: u64,
}

pub async fn summary<C: ConnectionTrait>(db: &C, today: NaiveDate) -> Result<Dashboard, ServiceError> {
    let mut equipment_by_status = BTreeMap::new();
    for status in EquipmentStatus::iter() {
        let n = equipment::Entity::find()
            .filter(equipment::Column::Status.eq(status))
            .count(db)
            .await?;
        equipment_by_status.insert(status.as_str().to_string(), n);
    }

    let mut open_work_orders_by_priority = BTreeMap::new();
    for priority in Priority::iter() {
        let n = work_order::Entity::find()
            .filter(work_order::Column::Status.is_in(WorkOrderStatus::ACTIVE))
            .filter(work_order::Column::Priority.eq(priority))
            .count(db)
            .await?;
        open_work_orders_by_priority.insert(label(&priority), n);
    }

    let active_plans = || maintenance_plan::Entity::find().filter(maintenance_plan::Column::Active.eq(true));
    let overdue_plans = active_plans()
        .filter(maintenance_plan::Column::NextDueOn.lt(today))
        .count(db)
        .await?;
    let plans_due_next_30_days = active_plans()
        .filter(maintenance_plan::Column::NextDueOn.between(today, today + Duration::days(UPCOMING_WINDOW_DAYS)))
        .count(db)
        .await?;
    let unread_broadcasts = notification::Entity::find()
        .filter(notification::Column::UserId.is_null())
        .filter(notification::Column::ReadAt.is_null())
        .count(db)
        .await?;

    Ok(Dashboard {
        equipment_total: equipment_by_status.values().sum(),
        equipment_by_status,
        open_work_orders: open_work_orders_by_priority.values().sum(),
        open_work_orders_by_priority,
        overdue_plans,
        plans_due_next_30_days,
        unread_broadcasts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equipment_service::{self, tests::new_equipment, EquipmentUpdate};
    use crate::maintenance::service::{create_plan, NewPlan};
    use crate::notification_service::{self, NewSystemNotification};
    use crate::test_support::get_db;
    use crate::work_order_service::{self, tests::corrective};
    use models::maintenance_plan::Frequency;

    #[tokio::test]
    async fn counts_reflect_state() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let today = NaiveDate::from_ymd_opt(2024, 3, 18).unwrap();

        let empty = summary(&db, today).await?;
        assert_eq!(empty.equipment_total, 0);
        assert_eq!(empty.equipment_by_status.len(), 4);
        assert_eq!(empty.open_work_orders_by_priority.get("critical"), Some(&0));

        let a = equipment_service::create_equipment(&db, None, new_equipment("DASH-1")).await?;
        let b = equipment_service::create_equipment(&db, None, new_equipment("DASH-2")).await?;
        equipment_service::update_equipment(&db, None, b.id, EquipmentUpdate { status: Some(EquipmentStatus::OutOfService), ..Default::default() }).await?;
        work_order_service::create_work_order(&db, None, corrective(a.id)).await?;
        for (due, active) in [(today - Duration::days(3), true), (today + Duration::days(10), true), (today + Duration::days(10), false)] {
            create_plan(&db, None, NewPlan {
                equipment_id: a.id,
                title: "Check".into(),
                description: None,
                frequency: Frequency::Monthly,
                lead_days: None,
                next_due_on: Some(due),
                assigned_to: None,
                active: Some(active),
            }, today)
            .await?;
        }
        notification_service::create_system(&db, None, NewSystemNotification { user_id: None, severity: None, title: "t".into(), message: "m".into() }).await?;

        let s = summary(&db, today).await?;
        assert_eq!(s.equipment_total, 2);
        assert_eq!(s.equipment_by_status["operational"], 1);
        assert_eq!(s.equipment_by_status["out_of_service"], 1);
        assert_eq!(s.open_work_orders, 1);
        assert_eq!(s.open_work_orders_by_priority["high"], 1);
        assert_eq!(s.overdue_plans, 1);
        assert_eq!(s.plans_due_next_30_days, 1);
        assert_eq!(s.unread_broadcasts, 1);
        Ok(())
    }
}
