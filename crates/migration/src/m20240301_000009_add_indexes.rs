use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Equipment: filter by status
        manager
            .create_index(
                Index::create()
                    .name("idx_equipment_status")
                    .table(Equipment::Table)
                    .col(Equipment::Status)
                    .to_owned(),
            )
            .await?;

        // Plans: the scheduler scans by due date
        manager
            .create_index(
                Index::create()
                    .name("idx_plan_next_due")
                    .table(MaintenancePlan::Table)
                    .col(MaintenancePlan::NextDueOn)
                    .to_owned(),
            )
            .await?;

        // Work orders: per-equipment history and per-day technician load
        manager
            .create_index(
                Index::create()
                    .name("idx_work_order_equipment")
                    .table(WorkOrder::Table)
                    .col(WorkOrder::EquipmentId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_work_order_schedule")
                    .table(WorkOrder::Table)
                    .col(WorkOrder::ScheduledFor)
                    .col(WorkOrder::AssignedTo)
                    .to_owned(),
            )
            .await?;

        // Notifications: unread per user
        manager
            .create_index(
                Index::create()
                    .name("idx_notification_user_read")
                    .table(Notification::Table)
                    .col(Notification::UserId)
                    .col(Notification::ReadAt)
                    .to_owned(),
            )
            .await?;

        // Audit: lookups by entity
        manager
            .create_index(
                Index::create()
                    .name("idx_audit_entity")
                    .table(AuditLog::Table)
                    .col(AuditLog::Entity)
                    .col(AuditLog::EntityId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_equipment_status").table(Equipment::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_plan_next_due").table(MaintenancePlan::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_work_order_equipment").table(WorkOrder::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_work_order_schedule").table(WorkOrder::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_notification_user_read").table(Notification::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_audit_entity").table(AuditLog::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Equipment { Table, Status }

#[derive(DeriveIden)]
enum MaintenancePlan { Table, NextDueOn }

#[derive(DeriveIden)]
enum WorkOrder { Table, EquipmentId, ScheduledFor, AssignedTo }

#[derive(DeriveIden)]
enum Notification { Table, UserId, ReadAt }

#[derive(DeriveIden)]
enum AuditLog { Table, Entity, EntityId }
