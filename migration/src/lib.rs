pub use sea_orm_migration::prelude::*;

mod m20261016_000001_create_artists_table;
mod m20261016_000002_create_projects_table;
mod m20261016_000003_create_staking_pools_table;
mod m20261016_000004_create_patents_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261016_000001_create_artists_table::Migration),
            Box::new(m20261016_000002_create_projects_table::Migration),
            Box::new(m20261016_000003_create_staking_pools_table::Migration),
            Box::new(m20261016_000004_create_patents_table::Migration),
        ]
    }
}
