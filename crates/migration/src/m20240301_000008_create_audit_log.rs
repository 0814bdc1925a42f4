//! Create `audit_log` table.
//!
//! Append-only trail of mutations; no FKs so entries outlive the rows they describe.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AuditLog::Table)
                    .if_not_exists()
                    .col(pk_auto(AuditLog::Id))
                    .col(uuid_null(AuditLog::UserId))
                    .col(string_len(AuditLog::Action, 32).not_null())
                    .col(string_len(AuditLog::Entity, 64).not_null())
                    .col(string_len(AuditLog::EntityId, 64).not_null())
                    .col(text_null(AuditLog::Details))
                    .col(timestamp_with_time_zone(AuditLog::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(AuditLog::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum AuditLog { Table, Id, UserId, Action, Entity, EntityId, Details, CreatedAt }
