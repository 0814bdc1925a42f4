use sea_orm::{entity::prelude::*, ConnectionTrait, NotSet, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    #[sea_orm(string_value = "create")]
    Create,
    #[sea_orm(string_value = "update")]
    Update,
    #[sea_orm(string_value = "delete")]
    Delete,
    #[sea_orm(string_value = "status_change")]
    StatusChange,
    #[sea_orm(string_value = "assign")]
    Assign,
    #[sea_orm(string_value = "complete")]
    Complete,
    #[sea_orm(string_value = "schedule")]
    Schedule,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: Option<Uuid>,
    pub action: AuditAction,
    pub entity: String,
    pub entity_id: String,
    /// JSON document with the relevant before/after values.
    #[sea_orm(column_type = "Text", nullable)]
    pub details: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn details_json(&self) -> Option<serde_json::Value> {
        self.details.as_deref().and_then(|d| serde_json::from_str(d).ok())
    }
}

pub async fn record<C: ConnectionTrait>(
    db: &C,
    user_id: Option<Uuid>,
    action: AuditAction,
    entity: &str,
    entity_id: impl ToString,
    details: Option<serde_json::Value>,
) -> Result<Model, errors::ModelError> {
    let am = ActiveModel {
        id: NotSet,
        user_id: Set(user_id),
        action: Set(action),
        entity: Set(entity.to_string()),
        entity_id: Set(entity_id.to_string()),
        details: Set(details.map(|d| d.to_string())),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}
