pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_users_tables;
mod m20240601_000002_create_catalog_tables;
mod m20240601_000003_create_orders_tables;
mod m20240601_000004_create_engagement_tables;
mod m20240601_000005_create_operations_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_users_tables::Migration),
            Box::new(m20240601_000002_create_catalog_tables::Migration),
            Box::new(m20240601_000003_create_orders_tables::Migration),
            Box::new(m20240601_000004_create_engagement_tables::Migration),
            Box::new(m20240601_000005_create_operations_tables::Migration),
        ]
    }
}
