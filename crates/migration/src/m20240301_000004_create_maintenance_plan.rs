//! Create `maintenance_plan` table with FKs to `equipment` and optional technician.
//!
//! One row per recurring preventive task; `next_due_on` drives the scheduler.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MaintenancePlan::Table)
                    .if_not_exists()
                    .col(uuid(MaintenancePlan::Id).primary_key())
                    .col(uuid(MaintenancePlan::EquipmentId).not_null())
                    .col(string_len(MaintenancePlan::Title, 160).not_null())
                    .col(text_null(MaintenancePlan::Description))
                    .col(string_len(MaintenancePlan::Frequency, 32).not_null())
                    .col(integer(MaintenancePlan::LeadDays).not_null())
                    .col(date(MaintenancePlan::NextDueOn).not_null())
                    .col(date_null(MaintenancePlan::LastPerformedOn))
                    .col(uuid_null(MaintenancePlan::AssignedTo))
                    .col(boolean(MaintenancePlan::Active).not_null())
                    .col(timestamp_with_time_zone(MaintenancePlan::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(MaintenancePlan::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_plan_equipment")
                            .from(MaintenancePlan::Table, MaintenancePlan::EquipmentId)
                            .to(Equipment::Table, Equipment::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_plan_technician")
                            .from(MaintenancePlan::Table, MaintenancePlan::AssignedTo)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(MaintenancePlan::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum MaintenancePlan {
    Table,
    Id,
    EquipmentId,
    Title,
    Description,
    Frequency,
    LeadDays,
    NextDueOn,
    LastPerformedOn,
    AssignedTo,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Equipment { Table, Id }

#[derive(DeriveIden)]
enum User { Table, Id }
