use sea_orm::{entity::prelude::*, ConnectionTrait, QueryFilter};
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::errors::{self, require_text};
use crate::user;

/// Biomedical risk classification (I lowest, III highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "lowercase")]
pub enum RiskClass {
    #[sea_orm(string_value = "i")]
    I,
    #[sea_orm(string_value = "iia")]
    IIa,
    #[sea_orm(string_value = "iib")]
    IIb,
    #[sea_orm(string_value = "iii")]
    III,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum EquipmentStatus {
    #[sea_orm(string_value = "operational")]
    Operational,
    #[sea_orm(string_value = "under_maintenance")]
    UnderMaintenance,
    #[sea_orm(string_value = "out_of_service")]
    OutOfService,
    #[sea_orm(string_value = "decommissioned")]
    Decommissioned,
}

impl EquipmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EquipmentStatus::Operational => "operational",
            EquipmentStatus::UnderMaintenance => "under_maintenance",
            EquipmentStatus::OutOfService => "out_of_service",
            EquipmentStatus::Decommissioned => "decommissioned",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "equipment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub inventory_code: String,
    pub name: String,
    pub brand: Option<String>,
    #[serde(rename = "model")]
    pub model_name: Option<String>,
    pub serial_number: Option<String>,
    pub category: String,
    pub location: String,
    pub risk_class: RiskClass,
    pub status: EquipmentStatus,
    pub acquisition_date: Option<Date>,
    pub warranty_expires_on: Option<Date>,
    pub responsible_id: Option<Uuid>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Responsible }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Responsible => Entity::belongs_to(user::Entity)
                .from(Column::ResponsibleId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn accepts_new_work(&self) -> bool {
        self.status != EquipmentStatus::Decommissioned
    }
}

pub fn validate_inventory_code(code: &str) -> Result<(), errors::ModelError> {
    require_text("inventory_code", code, 64)?;
    if code.trim().chars().any(char::is_whitespace) {
        return Err(errors::ModelError::Validation("inventory_code must not contain spaces".into()));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    require_text("name", name, 160)
}

pub fn validate_category(category: &str) -> Result<(), errors::ModelError> {
    require_text("category", category, 96)
}

pub fn validate_location(location: &str) -> Result<(), errors::ModelError> {
    require_text("location", location, 160)
}

pub fn validate_dates(acquisition: Option<Date>, warranty: Option<Date>) -> Result<(), errors::ModelError> {
    if let (Some(a), Some(w)) = (acquisition, warranty) {
        if w < a {
            return Err(errors::ModelError::Validation("warranty_expires_on precedes acquisition_date".into()));
        }
    }
    Ok(())
}

pub async fn find_by_inventory_code<C: ConnectionTrait>(db: &C, code: &str) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find()
        .filter(Column::InventoryCode.eq(code.trim().to_string()))
        .one(db)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn inventory_code_rules() {
        assert!(validate_inventory_code("BIO-0001").is_ok());
        assert!(validate_inventory_code("   ").is_err());
        assert!(validate_inventory_code("BIO 0001").is_err());
    }

    #[test]
    fn warranty_cannot_precede_acquisition() {
        let a = NaiveDate::from_ymd_opt(2023, 5, 1);
        let w = NaiveDate::from_ymd_opt(2022, 5, 1);
        assert!(validate_dates(a, w).is_err());
        assert!(validate_dates(w, a).is_ok());
        assert!(validate_dates(None, a).is_ok());
    }
}
