use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use common::{pagination::Pagination, types::Page};
use models::audit_log::AuditAction;
use models::equipment::{self, EquipmentStatus, RiskClass};
use models::work_order;
use crate::{audit_service, errors::ServiceError, user_service};

#[derive(Debug, Clone, Deserialize)]
pub struct NewEquipment {
    pub inventory_code: String,
    pub name: String,
    pub brand: Option<String>,
    #[serde(alias = "model")]
    pub model_name: Option<String>,
    pub serial_number: Option<String>,
    pub category: String,
    pub location: String,
    pub risk_class: RiskClass,
    pub status: Option<EquipmentStatus>,
    pub acquisition_date: Option<NaiveDate>,
    pub warranty_expires_on: Option<NaiveDate>,
    pub responsible_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct EquipmentUpdate {
    pub inventory_code: Option<String>,
    pub name: Option<String>,
    pub brand: Option<String>,
    #[serde(alias = "model")]
    pub model_name: Option<String>,
    pub serial_number: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub risk_class: Option<RiskClass>,
    pub status: Option<EquipmentStatus>,
    pub acquisition_date: Option<NaiveDate>,
    pub warranty_expires_on: Option<NaiveDate>,
    pub responsible_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct EquipmentFilter {
    pub status: Option<EquipmentStatus>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub search: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

async fn ensure_code_free<C: ConnectionTrait>(db: &C, code: &str, except: Option<Uuid>) -> Result<(), ServiceError> {
    if let Some(existing) = equipment::find_by_inventory_code(db, code).await? {
        if Some(existing.id) != except {
            return Err(ServiceError::Conflict(format!("inventory code {} already in use", code.trim())));
        }
    }
    Ok(())
}

async fn ensure_responsible<C: ConnectionTrait>(db: &C, id: Option<Uuid>) -> Result<(), ServiceError> {
    if let Some(id) = id {
        let u = user_service::get_user(db, id)
            .await
            .map_err(|_| ServiceError::Validation(format!("responsible user {id} does not exist")))?;
        if u.deleted_at.is_some() {
            return Err(ServiceError::Validation(format!("responsible user {id} was deleted")));
        }
    }
    Ok(())
}

#[instrument(skip(db, input), fields(inventory_code = %input.inventory_code))]
pub async fn create_equipment(db: &DatabaseConnection, actor: Option<Uuid>, input: NewEquipment) -> Result<equipment::Model, ServiceError> {
    equipment::validate_inventory_code(&input.inventory_code)?;
    equipment::validate_name(&input.name)?;
    equipment::validate_category(&input.category)?;
    equipment::validate_location(&input.location)?;
    equipment::validate_dates(input.acquisition_date, input.warranty_expires_on)?;

    let txn = db.begin().await?;
    ensure_code_free(&txn, &input.inventory_code, None).await?;
    ensure_responsible(&txn, input.responsible_id).await?;

    let now = Utc::now().into();
    let am = equipment::ActiveModel {
        id: Set(Uuid::new_v4()),
        inventory_code: Set(input.inventory_code.trim().to_string()),
        name: Set(input.name.trim().to_string()),
        brand: Set(non_blank(input.brand)),
        model_name: Set(non_blank(input.model_name)),
        serial_number: Set(non_blank(input.serial_number)),
        category: Set(input.category.trim().to_string()),
        location: Set(input.location.trim().to_string()),
        risk_class: Set(input.risk_class),
        status: Set(input.status.unwrap_or(EquipmentStatus::Operational)),
        acquisition_date: Set(input.acquisition_date),
        warranty_expires_on: Set(input.warranty_expires_on),
        responsible_id: Set(input.responsible_id),
        notes: Set(non_blank(input.notes)),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let created = am.insert(&txn).await.map_err(|e| ServiceError::from_write(e, "equipment"))?;
    audit_service::record(
        &txn,
        actor,
        AuditAction::Create,
        "equipment",
        created.id,
        Some(serde_json::json!({ "inventory_code": created.inventory_code, "name": created.name })),
    )
    .await?;
    txn.commit().await?;

    info!(equipment_id = %created.id, "equipment created");
    Ok(created)
}

pub async fn get_equipment<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<equipment::Model, ServiceError> {
    equipment::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("equipment"))
}

pub async fn list_equipment<C: ConnectionTrait>(db: &C, filter: EquipmentFilter, opts: Pagination) -> Result<Page<equipment::Model>, ServiceError> {
    let mut q = equipment::Entity::find();
    if let Some(status) = filter.status {
        q = q.filter(equipment::Column::Status.eq(status));
    }
    if let Some(category) = non_blank(filter.category) {
        q = q.filter(equipment::Column::Category.eq(category));
    }
    if let Some(location) = non_blank(filter.location) {
        q = q.filter(equipment::Column::Location.contains(location));
    }
    if let Some(search) = non_blank(filter.search) {
        q = q.filter(
            Condition::any()
                .add(equipment::Column::InventoryCode.contains(search.as_str()))
                .add(equipment::Column::Name.contains(search.as_str()))
                .add(equipment::Column::SerialNumber.contains(search.as_str())),
        );
    }
    crate::fetch_page(db, q.order_by_asc(equipment::Column::InventoryCode), opts).await
}

/// Partial update; a status change is audited separately from the other fields.
#[instrument(skip(db, changes))]
pub async fn update_equipment(
    db: &DatabaseConnection,
    actor: Option<Uuid>,
    id: Uuid,
    changes: EquipmentUpdate,
) -> Result<equipment::Model, ServiceError> {
    let txn = db.begin().await?;
    let current = get_equipment(&txn, id).await?;
    let previous_status = current.status;
    let acquisition = changes.acquisition_date.or(current.acquisition_date);
    let warranty = changes.warranty_expires_on.or(current.warranty_expires_on);
    equipment::validate_dates(acquisition, warranty)?;

    let mut am: equipment::ActiveModel = current.into();
    if let Some(code) = changes.inventory_code.as_deref() {
        equipment::validate_inventory_code(code)?;
        ensure_code_free(&txn, code, Some(id)).await?;
        am.inventory_code = Set(code.trim().to_string());
    }
    if let Some(name) = changes.name.as_deref() {
        equipment::validate_name(name)?;
        am.name = Set(name.trim().to_string());
    }
    if let Some(category) = changes.category.as_deref() {
        equipment::validate_category(category)?;
        am.category = Set(category.trim().to_string());
    }
    if let Some(location) = changes.location.as_deref() {
        equipment::validate_location(location)?;
        am.location = Set(location.trim().to_string());
    }
    if changes.brand.is_some() {
        am.brand = Set(non_blank(changes.brand));
    }
    if changes.model_name.is_some() {
        am.model_name = Set(non_blank(changes.model_name));
    }
    if changes.serial_number.is_some() {
        am.serial_number = Set(non_blank(changes.serial_number));
    }
    if changes.notes.is_some() {
        am.notes = Set(non_blank(changes.notes));
    }
    if let Some(risk) = changes.risk_class {
        am.risk_class = Set(risk);
    }
    if let Some(status) = changes.status {
        am.status = Set(status);
    }
    if changes.responsible_id.is_some() {
        ensure_responsible(&txn, changes.responsible_id).await?;
        am.responsible_id = Set(changes.responsible_id);
    }
    am.acquisition_date = Set(acquisition);
    am.warranty_expires_on = Set(warranty);
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(&txn).await.map_err(|e| ServiceError::from_write(e, "equipment"))?;

    if updated.status != previous_status {
        audit_service::record(
            &txn,
            actor,
            AuditAction::StatusChange,
            "equipment",
            id,
            Some(serde_json::json!({ "from": previous_status, "to": updated.status })),
        )
        .await?;
        info!(equipment_id = %id, from = previous_status.as_str(), to = updated.status.as_str(), "equipment status changed");
    } else {
        audit_service::record(&txn, actor, AuditAction::Update, "equipment", id, None).await?;
    }
    txn.commit().await?;
    Ok(updated)
}

/// Delete equipment that no work order references. Plans and documents go with it.
#[instrument(skip(db))]
pub async fn delete_equipment(db: &DatabaseConnection, actor: Option<Uuid>, id: Uuid) -> Result<(), ServiceError> {
    let txn = db.begin().await?;
    let found = get_equipment(&txn, id).await?;
    let orders = work_order::Entity::find()
        .filter(work_order::Column::EquipmentId.eq(id))
        .count(&txn)
        .await?;
    if orders > 0 {
        return Err(ServiceError::Conflict(format!(
            "equipment {} has {orders} work order(s); decommission it instead",
            found.inventory_code
        )));
    }
    equipment::Entity::delete_by_id(id)
        .exec(&txn)
        .await
        .map_err(|e| ServiceError::from_write(e, "equipment"))?;
    audit_service::record(
        &txn,
        actor,
        AuditAction::Delete,
        "equipment",
        id,
        Some(serde_json::json!({ "inventory_code": found.inventory_code })),
    )
    .await?;
    txn.commit().await?;
    info!(equipment_id = %id, "equipment deleted");
    Ok(())
}

/// Work order history of one equipment, newest first.
pub async fn work_order_history<C: ConnectionTrait>(db: &C, id: Uuid, opts: Pagination) -> Result<Page<work_order::Model>, ServiceError> {
    get_equipment(db, id).await?;
    let q = work_order::Entity::find()
        .filter(work_order::Column::EquipmentId.eq(id))
        .order_by_desc(work_order::Column::CreatedAt)
        .order_by_desc(work_order::Column::Code);
    crate::fetch_page(db, q, opts).await
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use models::audit_log;
    use crate::test_support::get_db;

    pub(crate) fn new_equipment(code: &str) -> NewEquipment {
        NewEquipment {
            inventory_code: code.into(),
            name: "Defibrillator".into(),
            brand: Some("Zoll".into()),
            model_name: Some("R Series".into()),
            serial_number: Some(format!("SN-{code}")),
            category: "life_support".into(),
            location: "Emergency room".into(),
            risk_class: RiskClass::III,
            status: None,
            acquisition_date: NaiveDate::from_ymd_opt(2020, 1, 15),
            warranty_expires_on: NaiveDate::from_ymd_opt(2023, 1, 15),
            responsible_id: None,
            notes: None,
        }
    }

    #[test]
    fn accepts_model_alias() {
        let input: NewEquipment = serde_json::from_value(serde_json::json!({
            "inventory_code": "X-1", "name": "Monitor", "model": "IntelliVue",
            "category": "monitoring", "location": "ICU", "risk_class": "iib"
        }))
        .unwrap();
        assert_eq!(input.model_name.as_deref(), Some("IntelliVue"));
        assert_eq!(input.risk_class, RiskClass::IIb);
    }

    #[tokio::test]
    async fn equipment_crud_service() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let created = create_equipment(&db, None, new_equipment("EQ-001")).await?;
        assert_eq!(created.status, EquipmentStatus::Operational);

        let dup = create_equipment(&db, None, new_equipment("EQ-001")).await;
        assert!(matches!(dup, Err(ServiceError::Conflict(_))));

        let mut bad = new_equipment("EQ-002");
        bad.responsible_id = Some(Uuid::new_v4());
        assert!(matches!(create_equipment(&db, None, bad).await, Err(ServiceError::Validation(_))));

        create_equipment(&db, None, new_equipment("EQ-003")).await?;
        let page = list_equipment(&db, EquipmentFilter { search: Some("EQ-00".into()), ..Default::default() }, Pagination { page: 1, per_page: 1 }).await?;
        assert_eq!(page.total, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].inventory_code, "EQ-001");

        let updated = update_equipment(&db, None, created.id, EquipmentUpdate {
            status: Some(EquipmentStatus::OutOfService),
            location: Some("Workshop".into()),
            ..Default::default()
        })
        .await?;
        assert_eq!(updated.status, EquipmentStatus::OutOfService);
        assert_eq!(updated.location, "Workshop");

        let status_changes = audit_log::Entity::find()
            .filter(audit_log::Column::Action.eq(AuditAction::StatusChange))
            .count(&db)
            .await?;
        assert_eq!(status_changes, 1);

        let clash = update_equipment(&db, None, created.id, EquipmentUpdate { inventory_code: Some("EQ-003".into()), ..Default::default() }).await;
        assert!(matches!(clash, Err(ServiceError::Conflict(_))));

        delete_equipment(&db, None, created.id).await?;
        assert!(matches!(get_equipment(&db, created.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn each_update_writes_one_audit_row() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let created = create_equipment(&db, None, new_equipment("EQ-020")).await?;
        let by_id = || audit_service::AuditFilter { entity_id: Some(created.id.to_string()), ..Default::default() };
        assert_eq!(audit_service::list(&db, by_id(), Pagination::default()).await?.total, 1);

        update_equipment(&db, None, created.id, EquipmentUpdate { status: Some(EquipmentStatus::OutOfService), ..Default::default() }).await?;
        let entries = audit_service::list(&db, by_id(), Pagination::default()).await?;
        assert_eq!(entries.total, 2);
        assert_eq!(entries.items[0].action, AuditAction::StatusChange);

        update_equipment(&db, None, created.id, EquipmentUpdate { notes: Some("Cracked housing".into()), ..Default::default() }).await?;
        let entries = audit_service::list(&db, by_id(), Pagination::default()).await?;
        assert_eq!(entries.total, 3);
        assert_eq!(entries.items[0].action, AuditAction::Update);
        Ok(())
    }

    #[tokio::test]
    async fn warranty_before_acquisition_is_rejected_on_update() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let created = create_equipment(&db, None, new_equipment("EQ-010")).await?;
        let res = update_equipment(&db, None, created.id, EquipmentUpdate {
            warranty_expires_on: NaiveDate::from_ymd_opt(2019, 1, 1),
            ..Default::default()
        })
        .await;
        assert!(matches!(res, Err(ServiceError::Model(_))));
        Ok(())
    }
}
