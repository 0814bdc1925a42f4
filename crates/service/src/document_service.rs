use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use common::{pagination::Pagination, types::Page};
use models::audit_log::AuditAction;
use models::document::{self, DocumentKind};
use crate::{audit_service, equipment_service, errors::ServiceError, user_service, work_order_service};

/// Metadata of a file kept outside the database.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDocument {
    pub equipment_id: Option<Uuid>,
    pub work_order_id: Option<Uuid>,
    pub title: String,
    pub kind: Option<DocumentKind>,
    pub url: String,
    pub mime_type: Option<String>,
    pub uploaded_by: Option<Uuid>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct DocumentFilter {
    pub equipment_id: Option<Uuid>,
    pub work_order_id: Option<Uuid>,
    pub kind: Option<DocumentKind>,
}

#[instrument(skip(db, input), fields(title = %input.title))]
pub async fn create_document(db: &DatabaseConnection, actor: Option<Uuid>, input: NewDocument) -> Result<document::Model, ServiceError> {
    document::validate_owner(input.equipment_id, input.work_order_id)?;
    document::validate_title(&input.title)?;
    document::validate_url(&input.url)?;

    let txn = db.begin().await?;
    if let Some(id) = input.equipment_id {
        equipment_service::get_equipment(&txn, id).await?;
    }
    if let Some(id) = input.work_order_id {
        let wo = work_order_service::get_work_order(&txn, id).await?;
        if input.equipment_id.is_some_and(|eq| eq != wo.equipment_id) {
            return Err(ServiceError::Validation("work order belongs to another equipment".into()));
        }
    }
    if let Some(id) = input.uploaded_by {
        user_service::get_user(&txn, id).await?;
    }
    let am = document::ActiveModel {
        id: Set(Uuid::new_v4()),
        equipment_id: Set(input.equipment_id),
        work_order_id: Set(input.work_order_id),
        title: Set(input.title.trim().to_string()),
        kind: Set(input.kind.unwrap_or(DocumentKind::Other)),
        url: Set(input.url.trim().to_string()),
        mime_type: Set(input.mime_type.filter(|m| !m.trim().is_empty())),
        uploaded_by: Set(input.uploaded_by),
        created_at: Set(Utc::now().into()),
    };
    let created = am.insert(&txn).await?;
    audit_service::record(
        &txn,
        actor,
        AuditAction::Create,
        "document",
        created.id,
        Some(serde_json::json!({ "title": created.title, "kind": created.kind, "url": created.url })),
    )
    .await?;
    txn.commit().await?;
    info!(document_id = %created.id, "document registered");
    Ok(created)
}

pub async fn get_document<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<document::Model, ServiceError> {
    document::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("document"))
}

pub async fn list_documents<C: ConnectionTrait>(db: &C, filter: DocumentFilter, opts: Pagination) -> Result<Page<document::Model>, ServiceError> {
    let mut q = document::Entity::find();
    if let Some(id) = filter.equipment_id {
        q = q.filter(document::Column::EquipmentId.eq(id));
    }
    if let Some(id) = filter.work_order_id {
        q = q.filter(document::Column::WorkOrderId.eq(id));
    }
    if let Some(kind) = filter.kind {
        q = q.filter(document::Column::Kind.eq(kind));
    }
    crate::fetch_page(db, q.order_by_desc(document::Column::CreatedAt).order_by_asc(document::Column::Title), opts).await
}

#[instrument(skip(db))]
pub async fn delete_document(db: &DatabaseConnection, actor: Option<Uuid>, id: Uuid) -> Result<(), ServiceError> {
    let txn = db.begin().await?;
    let doc = get_document(&txn, id).await?;
    document::Entity::delete_by_id(id).exec(&txn).await?;
    audit_service::record(&txn, actor, AuditAction::Delete, "document", id, Some(serde_json::json!({ "title": doc.title }))).await?;
    txn.commit().await?;
    Ok(())
}
