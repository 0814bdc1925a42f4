//! Create `equipment` table with optional FK to the responsible `user`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Equipment::Table)
                    .if_not_exists()
                    .col(uuid(Equipment::Id).primary_key())
                    .col(string_len(Equipment::InventoryCode, 64).unique_key().not_null())
                    .col(string_len(Equipment::Name, 160).not_null())
                    .col(string_len_null(Equipment::Brand, 128))
                    .col(string_len_null(Equipment::ModelName, 128))
                    .col(string_len_null(Equipment::SerialNumber, 128))
                    .col(string_len(Equipment::Category, 96).not_null())
                    .col(string_len(Equipment::Location, 160).not_null())
                    .col(string_len(Equipment::RiskClass, 8).not_null())
                    .col(string_len(Equipment::Status, 32).not_null())
                    .col(date_null(Equipment::AcquisitionDate))
                    .col(date_null(Equipment::WarrantyExpiresOn))
                    .col(uuid_null(Equipment::ResponsibleId))
                    .col(text_null(Equipment::Notes))
                    .col(timestamp_with_time_zone(Equipment::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Equipment::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_equipment_responsible")
                            .from(Equipment::Table, Equipment::ResponsibleId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Equipment::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Equipment {
    Table,
    Id,
    InventoryCode,
    Name,
    Brand,
    ModelName,
    SerialNumber,
    Category,
    Location,
    RiskClass,
    Status,
    AcquisitionDate,
    WarrantyExpiresOn,
    ResponsibleId,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum User { Table, Id }
