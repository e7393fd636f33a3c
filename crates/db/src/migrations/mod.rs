//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_hierarchy_tables;
mod m20250101_000002_create_member_table;
mod m20250101_000003_create_content_tables;
mod m20250101_000004_create_cell_life_tables;
mod m20250101_000005_create_catalog_tables;
mod m20250101_000006_backfill_cell_network;
mod m20250101_000007_seed_schools;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_hierarchy_tables::Migration),
            Box::new(m20250101_000002_create_member_table::Migration),
            Box::new(m20250101_000003_create_content_tables::Migration),
            Box::new(m20250101_000004_create_cell_life_tables::Migration),
            Box::new(m20250101_000005_create_catalog_tables::Migration),
            Box::new(m20250101_000006_backfill_cell_network::Migration),
            Box::new(m20250101_000007_seed_schools::Migration),
        ]
    }
}
