use sea_orm::entity::prelude::*;
use uuid::Uuid;
use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::errors::{self, require_text};
use crate::{equipment, user};

pub const DEFAULT_LEAD_DAYS: i32 = 7;
pub const MAX_LEAD_DAYS: i32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    #[sea_orm(string_value = "daily")]
    Daily,
    #[sea_orm(string_value = "weekly")]
    Weekly,
    #[sea_orm(string_value = "biweekly")]
    Biweekly,
    #[sea_orm(string_value = "monthly")]
    Monthly,
    #[sea_orm(string_value = "quarterly")]
    Quarterly,
    #[sea_orm(string_value = "semiannual")]
    Semiannual,
    #[sea_orm(string_value = "annual")]
    Annual,
}

impl Frequency {
    /// Interval in days between two occurrences.
    pub fn days(self) -> i64 {
        match self {
            Frequency::Daily => 1,
            Frequency::Weekly => 7,
            Frequency::Biweekly => 14,
            Frequency::Monthly => 30,
            Frequency::Quarterly => 90,
            Frequency::Semiannual => 180,
            Frequency::Annual => 365,
        }
    }

    /// First due date after `from`.
    pub fn next_after(self, from: Date) -> Date {
        from + Duration::days(self.days())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "maintenance_plan")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub equipment_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub frequency: Frequency,
    pub lead_days: i32,
    pub next_due_on: Date,
    pub last_performed_on: Option<Date>,
    pub assigned_to: Option<Uuid>,
    pub active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Equipment, Technician }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Equipment => Entity::belongs_to(equipment::Entity)
                .from(Column::EquipmentId)
                .to(equipment::Column::Id)
                .into(),
            Relation::Technician => Entity::belongs_to(user::Entity)
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

impl Model {
    /// Days from `today` until the plan is due; negative when overdue.
    pub fn days_until_due(&self, today: Date) -> i64 {
        (self.next_due_on - today).num_days()
    }
}

pub fn validate_title(title: &str) -> Result<(), errors::ModelError> {
    require_text("title", title, 160)
}

pub fn validate_lead_days(lead_days: i32) -> Result<(), errors::ModelError> {
    if !(0..=MAX_LEAD_DAYS).contains(&lead_days) {
        return Err(errors::ModelError::Validation(format!("lead_days must be within 0..={MAX_LEAD_DAYS}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn frequency_adds_fixed_days() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(Frequency::Monthly.next_after(d), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(Frequency::Weekly.next_after(d), NaiveDate::from_ymd_opt(2024, 2, 7).unwrap());
        assert_eq!(Frequency::Annual.next_after(d), NaiveDate::from_ymd_opt(2025, 1, 30).unwrap());
    }

    #[test]
    fn lead_days_bounds() {
        assert!(validate_lead_days(0).is_ok());
        assert!(validate_lead_days(90).is_ok());
        assert!(validate_lead_days(-1).is_err());
        assert!(validate_lead_days(91).is_err());
    }
}
