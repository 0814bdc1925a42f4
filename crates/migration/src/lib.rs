//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_user;
mod m20240301_000002_create_user_credentials;
mod m20240301_000003_create_equipment;
mod m20240301_000004_create_maintenance_plan;
mod m20240301_000005_create_work_order;
mod m20240301_000006_create_document;
mod m20240301_000007_create_notification;
mod m20240301_000008_create_audit_log;
mod m20240301_000009_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_user::Migration),
            Box::new(m20240301_000002_create_user_credentials::Migration),
            Box::new(m20240301_000003_create_equipment::Migration),
            Box::new(m20240301_000004_create_maintenance_plan::Migration),
            Box::new(m20240301_000005_create_work_order::Migration),
            Box::new(m20240301_000006_create_document::Migration),
            Box::new(m20240301_000007_create_notification::Migration),
            Box::new(m20240301_000008_create_audit_log::Migration),
            // Indexes should always be applied last
            Box::new(m20240301_000009_add_indexes::Migration),
        ]
    }
}
