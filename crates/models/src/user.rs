use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{self, require_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "supervisor")]
    Supervisor,
    #[sea_orm(string_value = "technician")]
    Technician,
    #[sea_orm(string_value = "viewer")]
    Viewer,
}

impl UserRole {
    /// Roles that may carry out work orders and preventive plans.
    pub fn can_be_assigned(self) -> bool {
        matches!(self, UserRole::Technician | UserRole::Supervisor)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub active: bool,
    pub phone: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_assignable(&self) -> bool {
        self.active && self.deleted_at.is_none() && self.role.can_be_assigned()
    }
}

pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.'),
        None => false,
    };
    if !valid || email.len() > 255 {
        return Err(errors::ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    require_text("name", name, 128)
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    email: &str,
    name: &str,
    role: UserRole,
    phone: Option<String>,
) -> Result<Model, errors::ModelError> {
    validate_email(email)?;
    validate_name(name)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(normalize_email(email)),
        name: Set(name.trim().to_string()),
        role: Set(role),
        active: Set(true),
        phone: Set(phone),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    };
    Ok(am.insert(db).await?)
}

pub async fn soft_delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Model, errors::ModelError> {
    let mut found: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| errors::ModelError::Validation("user not found".into()))?
        .into();
    let now = Utc::now();
    found.deleted_at = Set(Some(now.into()));
    found.active = Set(false);
    found.updated_at = Set(now.into());
    Ok(found.update(db).await?)
}

pub async fn hard_delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<bool, errors::ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(validate_email("tech@hospital.org").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@hospital.org").is_err());
        assert!(validate_email("tech@localhost").is_err());
    }

    #[test]
    fn only_field_roles_are_assignable() {
        assert!(UserRole::Technician.can_be_assigned());
        assert!(UserRole::Supervisor.can_be_assigned());
        assert!(!UserRole::Viewer.can_be_assigned());
        assert!(!UserRole::Admin.can_be_assigned());
    }
}
