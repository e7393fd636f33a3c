//! Network, generation and cell management.

use std::collections::HashMap;

use celula_common::{AppError, AppResult};
use celula_db::{
    entities::{cell, generation, member, network},
    repositories::{
        CascadeRepository, CellRepository, GenerationRepository, MemberRepository,
        NetworkRepository,
    },
};
use sea_orm::Set;
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use super::access::{ensure_admin, ensure_leader};
use super::input::{deserialize_some, safe_float, safe_int};

/// Hierarchy service for business logic.
#[derive(Clone)]
pub struct HierarchyService {
    network_repo: NetworkRepository,
    generation_repo: GenerationRepository,
    cell_repo: CellRepository,
    member_repo: MemberRepository,
    cascade_repo: CascadeRepository,
}

/// Input for creating a network.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateNetworkInput {
    #[serde(rename = "nome")]
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(rename = "lider_nome")]
    pub leader_name: Option<String>,
    #[serde(rename = "lider_telefone")]
    pub leader_phone: Option<String>,
}

/// Partial update of a network.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateNetworkInput {
    #[serde(rename = "nome")]
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[serde(rename = "lider_nome", default, deserialize_with = "deserialize_some")]
    pub leader_name: Option<Option<String>>,
    #[serde(rename = "lider_telefone", default, deserialize_with = "deserialize_some")]
    pub leader_phone: Option<Option<String>>,
}

/// Input for creating a generation.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateGenerationInput {
    #[serde(rename = "nome")]
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(rename = "rede_id", default)]
    pub network_id: Value,
    #[serde(rename = "lider_nome")]
    pub leader_name: Option<String>,
    #[serde(rename = "lider_telefone")]
    pub leader_phone: Option<String>,
}

/// Partial update of a generation.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateGenerationInput {
    #[serde(rename = "nome")]
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[serde(rename = "rede_id", default, deserialize_with = "deserialize_some")]
    pub network_id: Option<Value>,
    #[serde(rename = "lider_nome", default, deserialize_with = "deserialize_some")]
    pub leader_name: Option<Option<String>>,
    #[serde(rename = "lider_telefone", default, deserialize_with = "deserialize_some")]
    pub leader_phone: Option<Option<String>>,
}

/// Input for creating a cell.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCellInput {
    #[serde(rename = "nome")]
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(rename = "lider")]
    pub leader: Option<String>,
    #[serde(rename = "lider_treinamento")]
    pub trainee_leader: Option<String>,
    #[serde(rename = "rede_id", default)]
    pub network_id: Value,
    #[serde(rename = "geracao_id", default)]
    pub generation_id: Value,
    /// Network given by name, used when no `rede_id` is sent.
    #[serde(rename = "rede")]
    pub network_label: Option<String>,
    #[serde(rename = "endereco")]
    pub address: Option<String>,
    #[serde(rename = "numero")]
    pub number: Option<String>,
    #[serde(rename = "bairro")]
    pub district: Option<String>,
    #[serde(rename = "cidade")]
    pub city: Option<String>,
    #[serde(rename = "estado")]
    pub state: Option<String>,
    #[serde(rename = "cep")]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub latitude: Value,
    #[serde(default)]
    pub longitude: Value,
    #[serde(rename = "dia_reuniao")]
    pub meeting_day: Option<String>,
    #[serde(rename = "horario_reuniao")]
    pub meeting_time: Option<String>,
}

/// Partial update of a cell. Present keys are applied, `null` clears.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCellInput {
    #[serde(rename = "nome")]
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[serde(rename = "lider", default, deserialize_with = "deserialize_some")]
    pub leader: Option<Option<String>>,
    #[serde(rename = "lider_treinamento", default, deserialize_with = "deserialize_some")]
    pub trainee_leader: Option<Option<String>>,
    #[serde(rename = "rede_id", default, deserialize_with = "deserialize_some")]
    pub network_id: Option<Value>,
    #[serde(rename = "geracao_id", default, deserialize_with = "deserialize_some")]
    pub generation_id: Option<Value>,
    #[serde(rename = "rede")]
    pub network_label: Option<String>,
    #[serde(rename = "endereco", default, deserialize_with = "deserialize_some")]
    pub address: Option<Option<String>>,
    #[serde(rename = "numero", default, deserialize_with = "deserialize_some")]
    pub number: Option<Option<String>>,
    #[serde(rename = "bairro", default, deserialize_with = "deserialize_some")]
    pub district: Option<Option<String>>,
    #[serde(rename = "cidade", default, deserialize_with = "deserialize_some")]
    pub city: Option<Option<String>>,
    #[serde(rename = "estado", default, deserialize_with = "deserialize_some")]
    pub state: Option<Option<String>>,
    #[serde(rename = "cep", default, deserialize_with = "deserialize_some")]
    pub zip_code: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub latitude: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub longitude: Option<Value>,
    #[serde(rename = "dia_reuniao", default, deserialize_with = "deserialize_some")]
    pub meeting_day: Option<Option<String>>,
    #[serde(rename = "horario_reuniao", default, deserialize_with = "deserialize_some")]
    pub meeting_time: Option<Option<String>>,
}

/// A cell with its resolved hierarchy names and members.
#[derive(Debug, Clone)]
pub struct CellView {
    pub cell: cell::Model,
    pub network_name: Option<String>,
    pub generation_name: Option<String>,
    pub members: Vec<member::Model>,
}

/// Short cell entry listed under its generation.
#[derive(Debug, Clone)]
pub struct CellSummary {
    pub id: i32,
    pub name: String,
    pub leader: Option<String>,
    pub member_count: i64,
}

/// A generation with its network name and cells.
#[derive(Debug, Clone)]
pub struct GenerationView {
    pub generation: generation::Model,
    pub network_name: Option<String>,
    pub cells: Vec<CellSummary>,
}

impl HierarchyService {
    /// Create a new hierarchy service.
    #[must_use]
    pub const fn new(
        network_repo: NetworkRepository,
        generation_repo: GenerationRepository,
        cell_repo: CellRepository,
        member_repo: MemberRepository,
        cascade_repo: CascadeRepository,
    ) -> Self {
        Self {
            network_repo,
            generation_repo,
            cell_repo,
            member_repo,
            cascade_repo,
        }
    }

    // ==================== Networks ====================

    /// All networks.
    pub async fn list_networks(&self) -> AppResult<Vec<network::Model>> {
        self.network_repo.find_all().await
    }

    /// Get a network by ID.
    pub async fn get_network(&self, id: i32) -> AppResult<network::Model> {
        self.network_repo.get_by_id(id).await
    }

    /// Create a network (admin only).
    pub async fn create_network(
        &self,
        actor: &member::Model,
        input: CreateNetworkInput,
    ) -> AppResult<network::Model> {
        ensure_admin(actor)?;
        input.validate()?;

        let model = network::ActiveModel {
            name: Set(input.name.trim().to_string()),
            leader_name: Set(input.leader_name),
            leader_phone: Set(input.leader_phone),
            ..Default::default()
        };

        let network = self.network_repo.create(model).await?;
        tracing::info!(network_id = network.id, name = %network.name, "Created network");
        Ok(network)
    }

    /// Update a network (admin only).
    pub async fn update_network(
        &self,
        actor: &member::Model,
        id: i32,
        input: UpdateNetworkInput,
    ) -> AppResult<network::Model> {
        ensure_admin(actor)?;
        input.validate()?;

        let network = self.network_repo.get_by_id(id).await?;
        let mut active: network::ActiveModel = network.into();

        if let Some(name) = input.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(leader_name) = input.leader_name {
            active.leader_name = Set(leader_name);
        }
        if let Some(leader_phone) = input.leader_phone {
            active.leader_phone = Set(leader_phone);
        }

        self.network_repo.update(active).await
    }

    /// Delete a network, detaching everything below it (admin only).
    pub async fn delete_network(&self, actor: &member::Model, id: i32) -> AppResult<()> {
        ensure_admin(actor)?;
        self.network_repo.get_by_id(id).await?;
        self.cascade_repo.delete_network(id).await
    }

    // ==================== Generations ====================

    /// Generations with their cells, optionally for one network.
    pub async fn list_generations(&self, network_id: Option<i32>) -> AppResult<Vec<GenerationView>> {
        let generations = self.generation_repo.find_all(network_id).await?;
        self.generation_views(generations).await
    }

    /// Get a generation with its cells.
    pub async fn get_generation(&self, id: i32) -> AppResult<GenerationView> {
        let generation = self.generation_repo.get_by_id(id).await?;
        let mut views = self.generation_views(vec![generation]).await?;
        views
            .pop()
            .ok_or_else(|| AppError::NotFound(format!("Generation {id}")))
    }

    /// Create a generation (admin only).
    pub async fn create_generation(
        &self,
        actor: &member::Model,
        input: CreateGenerationInput,
    ) -> AppResult<GenerationView> {
        ensure_admin(actor)?;
        input.validate()?;

        let network_id = safe_int(&input.network_id);
        self.ensure_network(network_id).await?;

        let model = generation::ActiveModel {
            name: Set(input.name.trim().to_string()),
            network_id: Set(network_id),
            leader_name: Set(input.leader_name),
            leader_phone: Set(input.leader_phone),
            ..Default::default()
        };

        let generation = self.generation_repo.create(model).await?;
        tracing::info!(generation_id = generation.id, ?network_id, "Created generation");
        self.get_generation(generation.id).await
    }

    /// Update a generation (admin only).
    pub async fn update_generation(
        &self,
        actor: &member::Model,
        id: i32,
        input: UpdateGenerationInput,
    ) -> AppResult<GenerationView> {
        ensure_admin(actor)?;
        input.validate()?;

        let generation = self.generation_repo.get_by_id(id).await?;
        let mut active: generation::ActiveModel = generation.into();

        if let Some(name) = input.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(network_id) = input.network_id {
            let network_id = safe_int(&network_id);
            self.ensure_network(network_id).await?;
            active.network_id = Set(network_id);
        }
        if let Some(leader_name) = input.leader_name {
            active.leader_name = Set(leader_name);
        }
        if let Some(leader_phone) = input.leader_phone {
            active.leader_phone = Set(leader_phone);
        }

        self.generation_repo.update(active).await?;
        self.get_generation(id).await
    }

    /// Delete a generation, detaching its cells and members (admin only).
    pub async fn delete_generation(&self, actor: &member::Model, id: i32) -> AppResult<()> {
        ensure_admin(actor)?;
        self.generation_repo.get_by_id(id).await?;
        self.cascade_repo.delete_generation(id).await
    }

    // ==================== Cells ====================

    /// All cells, alphabetical.
    pub async fn list_cells(&self) -> AppResult<Vec<CellView>> {
        let mut cells = self.cell_repo.find_all().await?;
        cells.sort_by(|a, b| a.name.cmp(&b.name));
        self.cell_views(cells).await
    }

    /// Get a cell with its members.
    pub async fn get_cell(&self, id: i32) -> AppResult<CellView> {
        let cell = self.cell_repo.get_by_id(id).await?;
        let mut views = self.cell_views(vec![cell]).await?;
        views.pop().ok_or(AppError::CellNotFound(id))
    }

    /// Create a cell (leaders only).
    pub async fn create_cell(
        &self,
        actor: &member::Model,
        input: CreateCellInput,
    ) -> AppResult<CellView> {
        ensure_leader(actor)?;
        input.validate()?;

        let network_id = match safe_int(&input.network_id) {
            Some(id) => Some(id),
            None => self.network_from_label(input.network_label.as_deref()).await?,
        };
        let generation_id = safe_int(&input.generation_id);
        self.ensure_network(network_id).await?;
        self.ensure_generation(generation_id).await?;

        let model = cell::ActiveModel {
            name: Set(input.name.trim().to_string()),
            leader: Set(input.leader),
            trainee_leader: Set(input.trainee_leader),
            network_id: Set(network_id),
            generation_id: Set(generation_id),
            address: Set(input.address),
            number: Set(input.number),
            district: Set(input.district),
            city: Set(input.city),
            state: Set(input.state),
            zip_code: Set(input.zip_code),
            latitude: Set(safe_float(&input.latitude)),
            longitude: Set(safe_float(&input.longitude)),
            meeting_day: Set(input.meeting_day),
            meeting_time: Set(input.meeting_time),
            ..Default::default()
        };

        let cell = self.cell_repo.create(model).await?;
        tracing::info!(cell_id = cell.id, ?network_id, ?generation_id, "Created cell");
        self.get_cell(cell.id).await
    }

    /// Apply a partial update to a cell (leaders only).
    pub async fn update_cell(
        &self,
        actor: &member::Model,
        id: i32,
        input: UpdateCellInput,
    ) -> AppResult<CellView> {
        ensure_leader(actor)?;
        input.validate()?;

        let cell = self.cell_repo.get_by_id(id).await?;
        let mut active: cell::ActiveModel = cell.into();

        if let Some(name) = input.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(leader) = input.leader {
            active.leader = Set(leader);
        }
        if let Some(trainee_leader) = input.trainee_leader {
            active.trainee_leader = Set(trainee_leader);
        }
        match input.network_id {
            Some(value) => {
                let network_id = safe_int(&value);
                self.ensure_network(network_id).await?;
                active.network_id = Set(network_id);
            }
            None => {
                if input.network_label.is_some() {
                    let network_id =
                        self.network_from_label(input.network_label.as_deref()).await?;
                    active.network_id = Set(network_id);
                }
            }
        }
        if let Some(value) = input.generation_id {
            let generation_id = safe_int(&value);
            self.ensure_generation(generation_id).await?;
            active.generation_id = Set(generation_id);
        }
        if let Some(address) = input.address {
            active.address = Set(address);
        }
        if let Some(number) = input.number {
            active.number = Set(number);
        }
        if let Some(district) = input.district {
            active.district = Set(district);
        }
        if let Some(city) = input.city {
            active.city = Set(city);
        }
        if let Some(state) = input.state {
            active.state = Set(state);
        }
        if let Some(zip_code) = input.zip_code {
            active.zip_code = Set(zip_code);
        }
        if let Some(latitude) = input.latitude {
            active.latitude = Set(safe_float(&latitude));
        }
        if let Some(longitude) = input.longitude {
            active.longitude = Set(safe_float(&longitude));
        }
        if let Some(meeting_day) = input.meeting_day {
            active.meeting_day = Set(meeting_day);
        }
        if let Some(meeting_time) = input.meeting_time {
            active.meeting_time = Set(meeting_time);
        }

        self.cell_repo.update(active).await?;
        self.get_cell(id).await
    }

    /// Delete a cell and its cell-level content (leaders only).
    pub async fn delete_cell(&self, actor: &member::Model, id: i32) -> AppResult<()> {
        ensure_leader(actor)?;
        self.cell_repo.get_by_id(id).await?;
        self.cascade_repo.delete_cell(id).await
    }

    // ==================== Helpers ====================

    /// Resolve a network label to its id. Blank labels mean no network.
    async fn network_from_label(&self, label: Option<&str>) -> AppResult<Option<i32>> {
        let Some(label) = label.map(str::trim).filter(|l| !l.is_empty()) else {
            return Ok(None);
        };

        self.network_repo
            .find_by_name(label)
            .await?
            .map(|network| Some(network.id))
            .ok_or_else(|| AppError::BadRequest(format!("Rede não encontrada: {label}")))
    }

    async fn ensure_network(&self, id: Option<i32>) -> AppResult<()> {
        if let Some(id) = id
            && self.network_repo.find_by_id(id).await?.is_none()
        {
            return Err(AppError::BadRequest(format!("Rede {id} não encontrada")));
        }
        Ok(())
    }

    async fn ensure_generation(&self, id: Option<i32>) -> AppResult<()> {
        if let Some(id) = id
            && self.generation_repo.find_by_id(id).await?.is_none()
        {
            return Err(AppError::BadRequest(format!("Geração {id} não encontrada")));
        }
        Ok(())
    }

    async fn name_maps(&self) -> AppResult<(HashMap<i32, String>, HashMap<i32, String>)> {
        let networks = self
            .network_repo
            .find_all()
            .await?
            .into_iter()
            .map(|n| (n.id, n.name))
            .collect();
        let generations = self
            .generation_repo
            .find_all(None)
            .await?
            .into_iter()
            .map(|g| (g.id, g.name))
            .collect();
        Ok((networks, generations))
    }

    async fn cell_views(&self, cells: Vec<cell::Model>) -> AppResult<Vec<CellView>> {
        let (networks, generations) = self.name_maps().await?;
        let ids: Vec<i32> = cells.iter().map(|c| c.id).collect();

        let mut members_by_cell: HashMap<i32, Vec<member::Model>> = HashMap::new();
        for member in self.member_repo.find_by_cells(&ids).await? {
            if let Some(cell_id) = member.cell_id {
                members_by_cell.entry(cell_id).or_default().push(member);
            }
        }

        Ok(cells
            .into_iter()
            .map(|cell| CellView {
                network_name: cell.network_id.and_then(|id| networks.get(&id).cloned()),
                generation_name: cell.generation_id.and_then(|id| generations.get(&id).cloned()),
                members: members_by_cell.remove(&cell.id).unwrap_or_default(),
                cell,
            })
            .collect())
    }

    async fn generation_views(
        &self,
        generations: Vec<generation::Model>,
    ) -> AppResult<Vec<GenerationView>> {
        let networks: HashMap<i32, String> = self
            .network_repo
            .find_all()
            .await?
            .into_iter()
            .map(|n| (n.id, n.name))
            .collect();

        let mut views = Vec::with_capacity(generations.len());
        for generation in generations {
            let cells = self.cell_repo.find_by_generation(generation.id).await?;
            let ids: Vec<i32> = cells.iter().map(|c| c.id).collect();
            let counts = self.cell_repo.count_members(&ids).await?;

            views.push(GenerationView {
                network_name: generation.network_id.and_then(|id| networks.get(&id).cloned()),
                cells: cells
                    .into_iter()
                    .map(|c| CellSummary {
                        member_count: counts.get(&c.id).copied().unwrap_or(0),
                        id: c.id,
                        name: c.name,
                        leader: c.leader,
                    })
                    .collect(),
                generation,
            });
        }
        Ok(views)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::access::tests::member_with_role;
    use celula_db::entities::member::Role;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::json;
    use std::sync::Arc;

    fn service_with(db: sea_orm::DatabaseConnection) -> HierarchyService {
        let db = Arc::new(db);
        HierarchyService::new(
            NetworkRepository::new(db.clone()),
            GenerationRepository::new(db.clone()),
            CellRepository::new(db.clone()),
            MemberRepository::new(db.clone()),
            CascadeRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_create_network_requires_admin() {
        let service = service_with(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let input = CreateNetworkInput {
            name: "Rede Jovem".to_string(),
            leader_name: None,
            leader_phone: None,
        };

        let result = service
            .create_network(&member_with_role(1, Role::Leader), input)
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_create_cell_rejects_plain_member() {
        let service = service_with(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let input: CreateCellInput = serde_json::from_value(json!({"nome": "Alpha"})).unwrap();

        let result = service
            .create_cell(&member_with_role(1, Role::Member), input)
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_get_cell_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<cell::Model>::new()])
            .into_connection();
        let service = service_with(db);

        let result = service.get_cell(42).await;
        assert!(matches!(result, Err(AppError::CellNotFound(42))));
    }

    #[test]
    fn test_update_cell_input_null_clears() {
        let input: UpdateCellInput = serde_json::from_value(json!({
            "lider": null,
            "latitude": "",
            "rede_id": "3"
        }))
        .unwrap();

        assert_eq!(input.leader, Some(None));
        assert_eq!(input.trainee_leader, None);
        assert_eq!(input.latitude.as_ref().and_then(safe_float), None);
        assert!(input.latitude.is_some());
        assert_eq!(input.network_id.as_ref().and_then(safe_int), Some(3));
    }

    #[test]
    fn test_cell_name_validation() {
        let input: CreateCellInput = serde_json::from_value(json!({"nome": ""})).unwrap();
        assert!(input.validate().is_err());
    }
}
