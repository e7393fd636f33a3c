//! Hierarchy fan-out: which nodes a feed or mural covers.

use celula_common::AppResult;
use celula_db::repositories::{CellRepository, GenerationRepository, ScopeFilter};

/// Resolves network/generation/cell filters into the set of hierarchy nodes
/// whose content is visible.
#[derive(Clone)]
pub struct ScopeResolver {
    generation_repo: GenerationRepository,
    cell_repo: CellRepository,
}

impl ScopeResolver {
    /// Create a new scope resolver.
    #[must_use]
    pub const fn new(generation_repo: GenerationRepository, cell_repo: CellRepository) -> Self {
        Self {
            generation_repo,
            cell_repo,
        }
    }

    /// Expand a feed filter into its descendants.
    ///
    /// A network covers itself, its generations and every cell attached to
    /// it directly or through one of those generations. A generation covers
    /// itself and its cells. The network filter wins when both are given;
    /// `None` means the feed is unrestricted.
    pub async fn feed(
        &self,
        network_id: Option<i32>,
        generation_id: Option<i32>,
    ) -> AppResult<Option<ScopeFilter>> {
        if let Some(network_id) = network_id {
            let generation_ids = self.generation_repo.find_ids_by_network(network_id).await?;
            let cell_ids = self
                .cell_repo
                .find_ids_in_network(network_id, &generation_ids)
                .await?;

            tracing::debug!(
                network_id,
                generations = generation_ids.len(),
                cells = cell_ids.len(),
                "Resolved network scope"
            );

            return Ok(Some(ScopeFilter {
                network_ids: vec![network_id],
                generation_ids,
                cell_ids,
            }));
        }

        if let Some(generation_id) = generation_id {
            let cell_ids = self.cell_repo.find_ids_by_generation(generation_id).await?;
            return Ok(Some(ScopeFilter {
                network_ids: vec![],
                generation_ids: vec![generation_id],
                cell_ids,
            }));
        }

        Ok(None)
    }

    /// Nodes above a cell whose announcements reach its mural: the cell, its
    /// generation and its effective network (its own, else its generation's).
    ///
    /// Missing ancestors are left out, so unscoped rows never match.
    pub async fn mural(&self, cell_id: i32) -> AppResult<ScopeFilter> {
        let cell = self.cell_repo.get_by_id(cell_id).await?;

        let network_id = match (cell.network_id, cell.generation_id) {
            (Some(network_id), _) => Some(network_id),
            (None, Some(generation_id)) => self
                .generation_repo
                .find_by_id(generation_id)
                .await?
                .and_then(|generation| generation.network_id),
            (None, None) => None,
        };

        Ok(ScopeFilter {
            network_ids: network_id.into_iter().collect(),
            generation_ids: cell.generation_id.into_iter().collect(),
            cell_ids: vec![cell.id],
        })
    }
}
