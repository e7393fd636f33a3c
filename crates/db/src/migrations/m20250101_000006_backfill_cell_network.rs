//! Resolve the legacy free-text network label of cells into `network_id`.
//!
//! Labels are matched to networks by case-insensitive name; a network is
//! created for labels that match none. The label column is dropped once
//! every cell points at its network.

use std::collections::HashMap;

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, QueryResult};

use super::m20250101_000001_create_hierarchy_tables::{Cell, Network};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if !manager.has_column("cell", "network_label").await? {
            return Ok(());
        }

        let db = manager.get_connection();
        let backend = manager.get_database_backend();

        let mut networks: HashMap<String, i32> = HashMap::new();
        let select_networks = Query::select()
            .columns([Network::Id, Network::Name])
            .from(Network::Table)
            .order_by(Network::Id, Order::Asc)
            .to_owned();
        for row in db.query_all(backend.build(&select_networks)).await? {
            let id: i32 = row.try_get("", "id")?;
            let name: String = row.try_get("", "name")?;
            networks.entry(name.trim().to_lowercase()).or_insert(id);
        }

        let select_cells = Query::select()
            .columns([Cell::Id, Cell::NetworkLabel])
            .from(Cell::Table)
            .and_where(Expr::col(Cell::NetworkLabel).is_not_null())
            .and_where(Expr::col(Cell::NetworkId).is_null())
            .to_owned();
        let cells = db.query_all(backend.build(&select_cells)).await?;

        for row in cells {
            let cell_id: i32 = row.try_get("", "id")?;
            let label: String = row.try_get("", "network_label")?;
            let label = label.trim();
            if label.is_empty() {
                continue;
            }

            let key = label.to_lowercase();
            let network_id = if let Some(id) = networks.get(&key) {
                *id
            } else {
                let id = insert_network(manager, label).await?;
                networks.insert(key, id);
                id
            };

            let update = Query::update()
                .table(Cell::Table)
                .value(Cell::NetworkId, network_id)
                .and_where(Expr::col(Cell::Id).eq(cell_id))
                .to_owned();
            db.execute(backend.build(&update)).await?;
        }

        manager
            .alter_table(
                Table::alter()
                    .table(Cell::Table)
                    .drop_column(Cell::NetworkLabel)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Cell::Table)
                    .add_column(ColumnDef::new(Cell::NetworkLabel).string_len(100))
                    .to_owned(),
            )
            .await?;

        let db = manager.get_connection();
        let backend = manager.get_database_backend();

        let select = Query::select()
            .column((Cell::Table, Cell::Id))
            .column((Network::Table, Network::Name))
            .from(Cell::Table)
            .inner_join(
                Network::Table,
                Expr::col((Cell::Table, Cell::NetworkId)).equals((Network::Table, Network::Id)),
            )
            .to_owned();

        for row in db.query_all(backend.build(&select)).await? {
            let cell_id: i32 = row.try_get("", "id")?;
            let name: String = row.try_get("", "name")?;
            let update = Query::update()
                .table(Cell::Table)
                .value(Cell::NetworkLabel, name)
                .and_where(Expr::col(Cell::Id).eq(cell_id))
                .to_owned();
            db.execute(backend.build(&update)).await?;
        }

        Ok(())
    }
}

/// Insert a network named `name` and return its id.
async fn insert_network(manager: &SchemaManager<'_>, name: &str) -> Result<i32, DbErr> {
    let db = manager.get_connection();
    let backend = manager.get_database_backend();

    let mut insert = Query::insert();
    insert
        .into_table(Network::Table)
        .columns([Network::Name])
        .values([name.into()])
        .map_err(|e| DbErr::Custom(e.to_string()))?;
    db.execute(backend.build(&insert)).await?;

    let select = Query::select()
        .column(Network::Id)
        .from(Network::Table)
        .and_where(Expr::col(Network::Name).eq(name))
        .order_by(Network::Id, Order::Desc)
        .limit(1)
        .to_owned();

    let row: Option<QueryResult> = db.query_one(backend.build(&select)).await?;
    let row = row.ok_or_else(|| DbErr::RecordNotInserted)?;
    tracing::info!(network = %name, "Created network for legacy cell label");
    row.try_get("", "id")
}
