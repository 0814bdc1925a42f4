use sea_orm::entity::prelude::*;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::errors::{self, require_text};
use crate::{equipment, maintenance_plan, user};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderKind {
    #[sea_orm(string_value = "preventive")]
    Preventive,
    #[sea_orm(string_value = "corrective")]
    Corrective,
    #[sea_orm(string_value = "calibration")]
    Calibration,
    #[sea_orm(string_value = "inspection")]
    Inspection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[sea_orm(string_value = "low")]
    Low,
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "high")]
    High,
    #[sea_orm(string_value = "critical")]
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderStatus {
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "assigned")]
    Assigned,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "on_hold")]
    OnHold,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl WorkOrderStatus {
    pub const ACTIVE: [WorkOrderStatus; 4] = [
        WorkOrderStatus::Open,
        WorkOrderStatus::Assigned,
        WorkOrderStatus::InProgress,
        WorkOrderStatus::OnHold,
    ];

    pub fn is_terminal(self) -> bool {
        matches!(self, WorkOrderStatus::Completed | WorkOrderStatus::Cancelled)
    }

    pub fn can_transition_to(self, next: WorkOrderStatus) -> bool {
        use WorkOrderStatus::*;
        matches!(
            (self, next),
            (Open, Assigned | InProgress | Cancelled)
                | (Assigned, InProgress | OnHold | Cancelled | Open)
                | (InProgress, OnHold | Completed | Cancelled)
                | (OnHold, InProgress | Cancelled)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WorkOrderStatus::Open => "open",
            WorkOrderStatus::Assigned => "assigned",
            WorkOrderStatus::InProgress => "in_progress",
            WorkOrderStatus::OnHold => "on_hold",
            WorkOrderStatus::Completed => "completed",
            WorkOrderStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "work_order")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub code: String,
    pub equipment_id: Uuid,
    pub maintenance_plan_id: Option<Uuid>,
    pub kind: WorkOrderKind,
    pub priority: Priority,
    pub status: WorkOrderStatus,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub reported_by: Option<Uuid>,
    pub assigned_to: Option<Uuid>,
    pub scheduled_for: Option<Date>,
    pub started_at: Option<DateTimeWithTimeZone>,
    pub completed_at: Option<DateTimeWithTimeZone>,
    #[sea_orm(column_type = "Text", nullable)]
    pub resolution: Option<String>,
    pub labor_hours: Option<f64>,
    pub cost_cents: Option<i64>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Equipment, MaintenancePlan, Assignee }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Equipment => Entity::belongs_to(equipment::Entity)
                .from(Column::EquipmentId)
                .to(equipment::Column::Id)
                .into(),
            Relation::MaintenancePlan => Entity::belongs_to(maintenance_plan::Entity)
                .from(Column::MaintenancePlanId)
                .to(maintenance_plan::Column::Id)
                .into(),
            Relation::Assignee => Entity::belongs_to(user::Entity)
                .from(Column::AssignedTo)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl Related<equipment::Entity> for Entity {
    fn to() -> RelationDef { Relation::Equipment.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Human-readable order code, `OT-YYYYMMDD-XXXXXX`.
pub fn generate_code(on: Date) -> String {
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(6).collect();
    format!("OT-{}-{}", on.format("%Y%m%d"), suffix.to_ascii_uppercase())
}

pub fn validate_title(title: &str) -> Result<(), errors::ModelError> {
    require_text("title", title, 200)
}

pub fn validate_labor_hours(hours: Option<f64>) -> Result<(), errors::ModelError> {
    match hours {
        Some(h) if !h.is_finite() || h < 0.0 => Err(errors::ModelError::Validation("labor_hours must be >= 0".into())),
        _ => Ok(()),
    }
}

pub fn validate_cost(cost_cents: Option<i64>) -> Result<(), errors::ModelError> {
    match cost_cents {
        Some(c) if c < 0 => Err(errors::ModelError::Validation("cost_cents must be >= 0".into())),
        _ => Ok(()),
    }
}
