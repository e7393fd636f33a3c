//! Role checks applied by the services before mutating anything.

use celula_common::{AppError, AppResult};
use celula_db::entities::member;

/// Require a leader-type role (`Lider`, `LiderRede`, `LiderGeracao`, `Admin`).
pub fn ensure_leader(actor: &member::Model) -> AppResult<()> {
    if actor.role.is_leader() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Apenas líderes podem realizar esta ação".to_string(),
        ))
    }
}

/// Require the `Admin` role.
pub fn ensure_admin(actor: &member::Model) -> AppResult<()> {
    if actor.role.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Apenas administradores podem realizar esta ação".to_string(),
        ))
    }
}

/// Allow the member themself or any leader.
pub fn ensure_self_or_leader(actor: &member::Model, member_id: i32) -> AppResult<()> {
    if actor.id == member_id || actor.role.is_leader() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Sem permissão para acessar este membro".to_string(),
        ))
    }
}

/// Allow the author of a record or any leader. Authorless rows need a leader.
pub fn ensure_author_or_leader(actor: &member::Model, author_id: Option<i32>) -> AppResult<()> {
    if author_id == Some(actor.id) || actor.role.is_leader() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Apenas o autor ou um líder pode remover".to_string(),
        ))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;
    use member::Role;

    pub(crate) fn member_with_role(id: i32, role: Role) -> member::Model {
        member::Model {
            id,
            name: format!("Membro {id}"),
            cell_id: None,
            network_id: None,
            generation_id: None,
            phone: None,
            birth_date: None,
            address: None,
            number: None,
            district: None,
            city: None,
            state: None,
            zip_code: None,
            role,
            conversion_date: None,
            email: Some(format!("m{id}@igreja.org")),
            password_hash: None,
            token: None,
            attended_encounter: false,
            bio: None,
            photo_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_leader_roles() {
        for role in [
            Role::Leader,
            Role::NetworkLeader,
            Role::GenerationLeader,
            Role::Admin,
        ] {
            assert!(ensure_leader(&member_with_role(1, role)).is_ok());
        }
        assert!(ensure_leader(&member_with_role(1, Role::Member)).is_err());
        assert!(ensure_leader(&member_with_role(1, Role::Visitor)).is_err());
    }

    #[test]
    fn test_admin_only() {
        assert!(ensure_admin(&member_with_role(1, Role::Admin)).is_ok());
        assert!(matches!(
            ensure_admin(&member_with_role(1, Role::NetworkLeader)),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_self_or_leader() {
        let member = member_with_role(5, Role::Member);
        assert!(ensure_self_or_leader(&member, 5).is_ok());
        assert!(ensure_self_or_leader(&member, 6).is_err());
        assert!(ensure_self_or_leader(&member_with_role(7, Role::Leader), 6).is_ok());
    }

    #[test]
    fn test_author_or_leader() {
        let member = member_with_role(5, Role::Member);
        assert!(ensure_author_or_leader(&member, Some(5)).is_ok());
        assert!(ensure_author_or_leader(&member, Some(9)).is_err());
        assert!(ensure_author_or_leader(&member, None).is_err());
        assert!(ensure_author_or_leader(&member_with_role(1, Role::Admin), None).is_ok());
    }
}
