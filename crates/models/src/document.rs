use sea_orm::entity::prelude::*;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::errors::{self, require_text};
use crate::{equipment, work_order};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    #[sea_orm(string_value = "manual")]
    Manual,
    #[sea_orm(string_value = "certificate")]
    Certificate,
    #[sea_orm(string_value = "calibration_report")]
    CalibrationReport,
    #[sea_orm(string_value = "invoice")]
    Invoice,
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "document")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub equipment_id: Option<Uuid>,
    pub work_order_id: Option<Uuid>,
    pub title: String,
    pub kind: DocumentKind,
    #[sea_orm(column_type = "Text")]
    pub url: String,
    pub mime_type: Option<String>,
    pub uploaded_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Equipment, WorkOrder }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Equipment => Entity::belongs_to(equipment::Entity)
                .from(Column::EquipmentId)
                .to(equipment::Column::Id)
                .into(),
            Relation::WorkOrder => Entity::belongs_to(work_order::Entity)
                .from(Column::WorkOrderId)
                .to(work_order::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_title(title: &str) -> Result<(), errors::ModelError> {
    require_text("title", title, 200)
}

/// Documents only hold a reference; the file itself lives elsewhere.
pub fn validate_url(url: &str) -> Result<(), errors::ModelError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(errors::ModelError::Validation("url required".into()));
    }
    if url.chars().any(char::is_whitespace) {
        return Err(errors::ModelError::Validation("url must not contain whitespace".into()));
    }
    Ok(())
}

pub fn validate_owner(equipment_id: Option<Uuid>, work_order_id: Option<Uuid>) -> Result<(), errors::ModelError> {
    if equipment_id.is_none() && work_order_id.is_none() {
        return Err(errors::ModelError::Validation("equipment_id or work_order_id required".into()));
    }
    Ok(())
}
