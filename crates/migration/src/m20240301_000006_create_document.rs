//! Create `document` table: metadata for manuals, certificates and reports.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Document::Table)
                    .if_not_exists()
                    .col(uuid(Document::Id).primary_key())
                    .col(uuid_null(Document::EquipmentId))
                    .col(uuid_null(Document::WorkOrderId))
                    .col(string_len(Document::Title, 200).not_null())
                    .col(string_len(Document::Kind, 32).not_null())
                    .col(text(Document::Url).not_null())
                    .col(string_len_null(Document::MimeType, 128))
                    .col(uuid_null(Document::UploadedBy))
                    .col(timestamp_with_time_zone(Document::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_document_equipment")
                            .from(Document::Table, Document::EquipmentId)
                            .to(Equipment::Table, Equipment::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_document_work_order")
                            .from(Document::Table, Document::WorkOrderId)
                            .to(WorkOrder::Table, WorkOrder::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_document_uploader")
                            .from(Document::Table, Document::UploadedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Document::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Document { Table, Id, EquipmentId, WorkOrderId, Title, Kind, Url, MimeType, UploadedBy, CreatedAt }

#[derive(DeriveIden)]
enum Equipment { Table, Id }

#[derive(DeriveIden)]
enum WorkOrder { Table, Id }

#[derive(DeriveIden)]
enum User { Table, Id }
