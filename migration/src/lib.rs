pub use sea_orm_migration::prelude::*;

mod m20250901_000001_initial;
mod m20250901_000002_add_prizes;
mod m20250901_000003_add_leads;
mod m20250901_000004_add_metrics;
mod m20250901_000005_add_notifications;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_initial::Migration),
            Box::new(m20250901_000002_add_prizes::Migration),
            Box::new(m20250901_000003_add_leads::Migration),
            Box::new(m20250901_000004_add_metrics::Migration),
            Box::new(m20250901_000005_add_notifications::Migration),
        ]
    }
}
