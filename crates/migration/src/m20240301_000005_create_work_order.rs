//! Create `work_order` table with FKs to `equipment`, `maintenance_plan` and `user`.
//!
//! Equipment deletion is restricted while orders reference it; the history must survive.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WorkOrder::Table)
                    .if_not_exists()
                    .col(uuid(WorkOrder::Id).primary_key())
                    .col(string_len(WorkOrder::Code, 32).unique_key().not_null())
                    .col(uuid(WorkOrder::EquipmentId).not_null())
                    .col(uuid_null(WorkOrder::MaintenancePlanId))
                    .col(string_len(WorkOrder::Kind, 32).not_null())
                    .col(string_len(WorkOrder::Priority, 16).not_null())
                    .col(string_len(WorkOrder::Status, 32).not_null())
                    .col(string_len(WorkOrder::Title, 200).not_null())
                    .col(text_null(WorkOrder::Description))
                    .col(uuid_null(WorkOrder::ReportedBy))
                    .col(uuid_null(WorkOrder::AssignedTo))
                    .col(date_null(WorkOrder::ScheduledFor))
                    .col(timestamp_with_time_zone_null(WorkOrder::StartedAt))
                    .col(timestamp_with_time_zone_null(WorkOrder::CompletedAt))
                    .col(text_null(WorkOrder::Resolution))
                    .col(double_null(WorkOrder::LaborHours))
                    .col(big_integer_null(WorkOrder::CostCents))
                    .col(timestamp_with_time_zone(WorkOrder::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(WorkOrder::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_order_equipment")
                            .from(WorkOrder::Table, WorkOrder::EquipmentId)
                            .to(Equipment::Table, Equipment::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_order_plan")
                            .from(WorkOrder::Table, WorkOrder::MaintenancePlanId)
                            .to(MaintenancePlan::Table, MaintenancePlan::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_order_reporter")
                            .from(WorkOrder::Table, WorkOrder::ReportedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_order_assignee")
                            .from(WorkOrder::Table, WorkOrder::AssignedTo)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(WorkOrder::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum WorkOrder {
    Table,
    Id,
    Code,
    EquipmentId,
    MaintenancePlanId,
    Kind,
    Priority,
    Status,
    Title,
    Description,
    ReportedBy,
    AssignedTo,
    ScheduledFor,
    StartedAt,
    CompletedAt,
    Resolution,
    LaborHours,
    CostCents,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Equipment { Table, Id }

#[derive(DeriveIden)]
enum MaintenancePlan { Table, Id }

#[derive(DeriveIden)]
enum User { Table, Id }
