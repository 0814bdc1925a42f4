use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{self, require_text};
use crate::user;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    #[sea_orm(string_value = "maintenance_due")]
    MaintenanceDue,
    #[sea_orm(string_value = "maintenance_overdue")]
    MaintenanceOverdue,
    #[sea_orm(string_value = "work_order_assigned")]
    WorkOrderAssigned,
    #[sea_orm(string_value = "work_order_status")]
    WorkOrderStatus,
    #[sea_orm(string_value = "system")]
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[sea_orm(string_value = "info")]
    Info,
    #[sea_orm(string_value = "warning")]
    Warning,
    #[sea_orm(string_value = "critical")]
    Critical,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notification")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// `None` means every user sees it.
    pub user_id: Option<Uuid>,
    pub kind: NotificationKind,
    pub severity: Severity,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub equipment_id: Option<Uuid>,
    pub work_order_id: Option<Uuid>,
    pub read_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { User }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields of a notification before it is stored.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: Option<Uuid>,
    pub kind: NotificationKind,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub equipment_id: Option<Uuid>,
    pub work_order_id: Option<Uuid>,
}

pub async fn create<C: ConnectionTrait>(db: &C, n: NewNotification) -> Result<Model, errors::ModelError> {
    require_text("title", &n.title, 200)?;
    require_text("message", &n.message, 4000)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(n.user_id),
        kind: Set(n.kind),
        severity: Set(n.severity),
        title: Set(n.title),
        message: Set(n.message),
        equipment_id: Set(n.equipment_id),
        work_order_id: Set(n.work_order_id),
        read_at: Set(None),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}
