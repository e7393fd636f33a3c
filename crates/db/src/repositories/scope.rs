//! Hierarchy scope matching shared by announcements and stories.

use sea_orm::{ColumnTrait, Condition};

/// A set of hierarchy nodes a row may be scoped to.
///
/// A row matches when its network, generation or cell column is one of the
/// listed ids. Empty lists contribute nothing, so NULL scope columns never
/// match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeFilter {
    pub network_ids: Vec<i32>,
    pub generation_ids: Vec<i32>,
    pub cell_ids: Vec<i32>,
}

impl ScopeFilter {
    /// True when no node is listed; such a filter matches nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.network_ids.is_empty() && self.generation_ids.is_empty() && self.cell_ids.is_empty()
    }

    /// Build the OR condition over the given scope columns.
    pub fn condition<C: ColumnTrait>(&self, network: C, generation: C, cell: C) -> Condition {
        let mut condition = Condition::any();
        if !self.network_ids.is_empty() {
            condition = condition.add(network.is_in(self.network_ids.clone()));
        }
        if !self.generation_ids.is_empty() {
            condition = condition.add(generation.is_in(self.generation_ids.clone()));
        }
        if !self.cell_ids.is_empty() {
            condition = condition.add(cell.is_in(self.cell_ids.clone()));
        }
        condition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Announcement, announcement};
    use sea_orm::{DbBackend, EntityTrait, QueryFilter, QueryTrait};

    #[test]
    fn test_condition_skips_empty_lists() {
        let scope = ScopeFilter {
            network_ids: vec![],
            generation_ids: vec![2],
            cell_ids: vec![5, 6],
        };

        let sql = Announcement::find()
            .filter(scope.condition(
                announcement::Column::NetworkId,
                announcement::Column::GenerationId,
                announcement::Column::CellId,
            ))
            .build(DbBackend::Sqlite)
            .to_string();

        assert!(!sql.contains("\"network_id\" IN"));
        assert!(sql.contains("\"generation_id\" IN (2)"));
        assert!(sql.contains("\"cell_id\" IN (5, 6)"));
        assert!(sql.contains(" OR "));
    }

    #[test]
    fn test_is_empty() {
        assert!(ScopeFilter::default().is_empty());
        assert!(!ScopeFilter {
            network_ids: vec![1],
            ..Default::default()
        }
        .is_empty());
    }
}
