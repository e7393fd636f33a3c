//! Member service: accounts, authentication and profiles.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use celula_common::{AppError, AppResult, TokenGenerator};
use celula_db::{
    entities::{
        member::{self, Role},
        network,
    },
    repositories::{
        CascadeRepository, CellRepository, GenerationRepository, MemberRepository,
        NetworkRepository,
    },
};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use super::access::{ensure_admin, ensure_leader, ensure_self_or_leader};
use super::hierarchy::{CellView, GenerationView, HierarchyService};
use super::input::{
    deserialize_some, non_blank, parse_date, parse_role, role_for_invite_code, safe_int,
    strict_id,
};

/// Member service for business logic.
#[derive(Clone)]
pub struct MemberService {
    member_repo: MemberRepository,
    cell_repo: CellRepository,
    network_repo: NetworkRepository,
    generation_repo: GenerationRepository,
    cascade_repo: CascadeRepository,
    hierarchy: HierarchyService,
    tokens: TokenGenerator,
}

/// Self-registration input.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[serde(rename = "nome")]
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email, length(max = 100))]
    pub email: String,
    #[serde(rename = "senha")]
    #[validate(length(min = 1, max = 128))]
    pub password: String,
    #[serde(rename = "codigo_vip", default)]
    pub invite_code: Option<String>,
    #[serde(rename = "celula_id", default)]
    pub cell_id: Value,
    #[serde(rename = "rede_id", default)]
    pub network_id: Value,
    #[serde(rename = "geracao_id", default)]
    pub generation_id: Value,
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
    #[serde(rename = "data_nascimento")]
    pub birth_date: Option<String>,
    #[serde(rename = "fez_encontro", default)]
    pub attended_encounter: bool,
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
}

/// Member created from the admin panel.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMemberInput {
    #[serde(rename = "nome")]
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(rename = "celula_id", default)]
    pub cell_id: Value,
    #[serde(rename = "rede_id", default)]
    pub network_id: Value,
    #[serde(rename = "geracao_id", default)]
    pub generation_id: Value,
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
    #[serde(rename = "data_nascimento")]
    pub birth_date: Option<String>,
    #[serde(rename = "endereco")]
    pub address: Option<String>,
    /// Explicit role label; wins over the invite code.
    #[serde(rename = "tipo")]
    pub role: Option<String>,
    #[serde(rename = "codigo_vip")]
    pub invite_code: Option<String>,
    #[validate(email, length(max = 100))]
    pub email: Option<String>,
    #[serde(rename = "senha")]
    #[validate(length(min = 1, max = 128))]
    pub password: Option<String>,
    #[serde(rename = "fez_encontro", default)]
    pub attended_encounter: bool,
}

/// Admin-side partial update of a member.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateMemberInput {
    #[serde(rename = "nome")]
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[serde(rename = "telefone", default, deserialize_with = "deserialize_some")]
    pub phone: Option<Option<String>>,
    #[serde(rename = "celula_id", default, deserialize_with = "deserialize_some")]
    pub cell_id: Option<Value>,
    #[serde(rename = "rede_id", default, deserialize_with = "deserialize_some")]
    pub network_id: Option<Value>,
    #[serde(rename = "geracao_id", default, deserialize_with = "deserialize_some")]
    pub generation_id: Option<Value>,
    #[serde(rename = "tipo")]
    pub role: Option<String>,
    #[serde(rename = "fez_encontro")]
    pub attended_encounter: Option<bool>,
}

/// Self-service profile update.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileInput {
    #[serde(rename = "nome")]
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[serde(rename = "telefone", default, deserialize_with = "deserialize_some")]
    pub phone: Option<Option<String>>,
    #[validate(email, length(max = 100))]
    pub email: Option<String>,
    /// Only applied when it parses as `YYYY-MM-DD`.
    #[serde(rename = "data_nascimento")]
    pub birth_date: Option<String>,
    #[serde(rename = "biografia", default, deserialize_with = "deserialize_some")]
    pub bio: Option<Option<String>>,
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
}

/// Password change request.
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordInput {
    #[serde(rename = "senha_atual", default)]
    pub current_password: String,
    #[serde(rename = "nova_senha")]
    #[validate(length(min = 1, max = 128))]
    pub new_password: String,
}

/// A member together with the hierarchy nodes they belong to.
#[derive(Debug, Clone)]
pub struct MemberDetails {
    pub member: member::Model,
    pub cell: Option<CellView>,
    pub network: Option<network::Model>,
    pub generation: Option<GenerationView>,
}

impl MemberService {
    /// Create a new member service.
    #[must_use]
    pub const fn new(
        member_repo: MemberRepository,
        cell_repo: CellRepository,
        network_repo: NetworkRepository,
        generation_repo: GenerationRepository,
        cascade_repo: CascadeRepository,
        hierarchy: HierarchyService,
    ) -> Self {
        Self {
            member_repo,
            cell_repo,
            network_repo,
            generation_repo,
            cascade_repo,
            hierarchy,
            tokens: TokenGenerator::new(),
        }
    }

    // ==================== Authentication ====================

    /// Register a new member and issue a session token.
    pub async fn register(&self, input: RegisterInput) -> AppResult<member::Model> {
        input.validate()?;

        let email = input.email.trim().to_string();
        if self.member_repo.email_taken(&email, None).await? {
            return Err(AppError::BadRequest("Email ja cadastrado".to_string()));
        }

        let cell_id = strict_id(&input.cell_id, "ID da Célula")?;
        if let Some(id) = cell_id
            && self.cell_repo.find_by_id(id).await?.is_none()
        {
            return Err(AppError::BadRequest(format!(
                "Célula {id} não encontrada. Deixe em branco se não tiver."
            )));
        }

        let role = role_for_invite_code(input.invite_code.as_deref().unwrap_or_default());
        let network_id = self.known_network(safe_int(&input.network_id)).await?;
        let generation_id = self.known_generation(safe_int(&input.generation_id)).await?;

        let model = member::ActiveModel {
            name: Set(input.name.trim().to_string()),
            cell_id: Set(cell_id),
            network_id: Set(network_id),
            generation_id: Set(generation_id),
            phone: Set(input.phone),
            birth_date: Set(input.birth_date.as_deref().and_then(parse_date)),
            address: Set(input.address),
            number: Set(input.number),
            district: Set(input.district),
            city: Set(input.city),
            state: Set(input.state),
            zip_code: Set(input.zip_code),
            role: Set(role),
            email: Set(Some(email)),
            password_hash: Set(Some(hash_password(&input.password)?)),
            token: Set(Some(self.tokens.generate())),
            attended_encounter: Set(input.attended_encounter),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let member = self.member_repo.create(model).await?;
        tracing::info!(member_id = member.id, role = role.as_str(), ?cell_id, "Registered member");
        Ok(member)
    }

    /// Authenticate by email and password.
    ///
    /// Members created without a token get one on their first login.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<member::Model> {
        let member = self
            .member_repo
            .find_by_email(email.trim())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let hash = member
            .password_hash
            .as_deref()
            .ok_or(AppError::InvalidCredentials)?;
        if !verify_password(password, hash)? {
            tracing::debug!(member_id = member.id, "Rejected login");
            return Err(AppError::InvalidCredentials);
        }

        if member.token.is_some() {
            return Ok(member);
        }

        let mut active: member::ActiveModel = member.into();
        active.token = Set(Some(self.tokens.generate()));
        self.member_repo.update(active).await
    }

    /// Resolve a session token to its member.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<member::Model> {
        self.member_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Verify the current password, set a new one and rotate the token.
    pub async fn change_password(
        &self,
        actor: &member::Model,
        id: i32,
        input: ChangePasswordInput,
    ) -> AppResult<member::Model> {
        ensure_self_or_leader(actor, id)?;
        input.validate()?;

        let member = self.member_repo.get_by_id(id).await?;
        let matches = match member.password_hash.as_deref() {
            Some(hash) => verify_password(&input.current_password, hash)?,
            None => false,
        };
        if !matches {
            return Err(AppError::BadRequest("Senha atual incorreta".to_string()));
        }

        let mut active: member::ActiveModel = member.into();
        active.password_hash = Set(Some(hash_password(&input.new_password)?));
        active.token = Set(Some(self.tokens.generate()));

        let member = self.member_repo.update(active).await?;
        tracing::info!(member_id = id, "Changed password");
        Ok(member)
    }

    // ==================== Queries ====================

    /// Get a member by ID.
    pub async fn get(&self, id: i32) -> AppResult<member::Model> {
        self.member_repo.get_by_id(id).await
    }

    /// All members.
    pub async fn list(&self) -> AppResult<Vec<member::Model>> {
        self.member_repo.find_all().await
    }

    /// Members not attached to any cell.
    pub async fn list_without_cell(&self) -> AppResult<Vec<member::Model>> {
        self.member_repo.find_without_cell().await
    }

    /// A member with their cell, network and generation.
    pub async fn details(&self, actor: &member::Model, id: i32) -> AppResult<MemberDetails> {
        ensure_self_or_leader(actor, id)?;
        let member = self.member_repo.get_by_id(id).await?;

        let cell = match member.cell_id {
            Some(cell_id) => Some(self.hierarchy.get_cell(cell_id).await?),
            None => None,
        };
        let network = match member.network_id {
            Some(network_id) => self.network_repo.find_by_id(network_id).await?,
            None => None,
        };
        let generation = match member.generation_id {
            Some(generation_id) => Some(self.hierarchy.get_generation(generation_id).await?),
            None => None,
        };

        Ok(MemberDetails {
            member,
            cell,
            network,
            generation,
        })
    }

    // ==================== Administration ====================

    /// Create a member from the admin panel (leaders only).
    ///
    /// Granting any role above `Membro`/`Visitante` requires an admin.
    pub async fn create(
        &self,
        actor: &member::Model,
        input: CreateMemberInput,
    ) -> AppResult<member::Model> {
        ensure_leader(actor)?;
        input.validate()?;

        let role = match input.role.as_deref() {
            Some(label) => parse_role(label)?,
            None => role_for_invite_code(input.invite_code.as_deref().unwrap_or_default()),
        };
        if !matches!(role, Role::Member | Role::Visitor) {
            ensure_admin(actor)?;
        }

        let email = non_blank(input.email);
        if let Some(email) = &email
            && self.member_repo.email_taken(email, None).await?
        {
            return Err(AppError::BadRequest("Email ja cadastrado".to_string()));
        }

        let cell_id = self.existing_cell(&input.cell_id).await?;
        let password_hash = match input.password.as_deref() {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };

        let model = member::ActiveModel {
            name: Set(input.name.trim().to_string()),
            cell_id: Set(cell_id),
            network_id: Set(self.known_network(safe_int(&input.network_id)).await?),
            generation_id: Set(self.known_generation(safe_int(&input.generation_id)).await?),
            phone: Set(input.phone),
            birth_date: Set(input.birth_date.as_deref().and_then(parse_date)),
            address: Set(input.address),
            role: Set(role),
            email: Set(email),
            password_hash: Set(password_hash),
            attended_encounter: Set(input.attended_encounter),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let member = self.member_repo.create(model).await?;
        tracing::info!(member_id = member.id, actor_id = actor.id, "Created member");
        Ok(member)
    }

    /// Apply an admin patch to a member (leaders only; role changes need an
    /// admin).
    pub async fn update(
        &self,
        actor: &member::Model,
        id: i32,
        input: UpdateMemberInput,
    ) -> AppResult<member::Model> {
        ensure_leader(actor)?;
        input.validate()?;

        let member = self.member_repo.get_by_id(id).await?;
        let mut active: member::ActiveModel = member.into();

        if let Some(label) = input.role.as_deref() {
            ensure_admin(actor)?;
            active.role = Set(parse_role(label)?);
        }
        if let Some(name) = input.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(phone) = input.phone {
            active.phone = Set(phone);
        }
        if let Some(value) = input.cell_id {
            active.cell_id = Set(self.existing_cell(&value).await?);
        }
        if let Some(value) = input.network_id {
            active.network_id = Set(self.known_network(safe_int(&value)).await?);
        }
        if let Some(value) = input.generation_id {
            active.generation_id = Set(self.known_generation(safe_int(&value)).await?);
        }
        if let Some(attended) = input.attended_encounter {
            active.attended_encounter = Set(attended);
        }

        self.member_repo.update(active).await
    }

    /// Self-service profile update (the member or a leader).
    pub async fn update_profile(
        &self,
        actor: &member::Model,
        id: i32,
        input: UpdateProfileInput,
    ) -> AppResult<member::Model> {
        ensure_self_or_leader(actor, id)?;
        input.validate()?;

        let member = self.member_repo.get_by_id(id).await?;
        let mut active: member::ActiveModel = member.into();

        if let Some(name) = input.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(phone) = input.phone {
            active.phone = Set(phone);
        }
        if let Some(email) = non_blank(input.email) {
            if self.member_repo.email_taken(&email, Some(id)).await? {
                return Err(AppError::BadRequest("Email ja cadastrado".to_string()));
            }
            active.email = Set(Some(email));
        }
        if let Some(birth_date) = input.birth_date.as_deref().and_then(parse_date) {
            active.birth_date = Set(Some(birth_date));
        }
        if let Some(bio) = input.bio {
            active.bio = Set(bio);
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

        self.member_repo.update(active).await
    }

    /// Point a member's photo at an uploaded file.
    pub async fn set_photo(
        &self,
        actor: &member::Model,
        id: i32,
        photo_url: String,
    ) -> AppResult<member::Model> {
        ensure_self_or_leader(actor, id)?;

        let member = self.member_repo.get_by_id(id).await?;
        let mut active: member::ActiveModel = member.into();
        active.photo_url = Set(Some(photo_url));

        self.member_repo.update(active).await
    }

    /// Delete a member and everything they own (leaders only).
    pub async fn delete(&self, actor: &member::Model, id: i32) -> AppResult<()> {
        ensure_leader(actor)?;
        self.member_repo.get_by_id(id).await?;
        self.cascade_repo.delete_member(id).await
    }

    // ==================== Helpers ====================

    /// Parse a cell id strictly and require the cell to exist.
    async fn existing_cell(&self, value: &Value) -> AppResult<Option<i32>> {
        let cell_id = strict_id(value, "ID da Célula")?;
        if let Some(id) = cell_id
            && self.cell_repo.find_by_id(id).await?.is_none()
        {
            return Err(AppError::BadRequest(format!("Célula {id} não encontrada")));
        }
        Ok(cell_id)
    }

    /// Keep a network id only when the network exists.
    async fn known_network(&self, id: Option<i32>) -> AppResult<Option<i32>> {
        match id {
            Some(id) => Ok(self.network_repo.find_by_id(id).await?.map(|n| n.id)),
            None => Ok(None),
        }
    }

    /// Keep a generation id only when the generation exists.
    async fn known_generation(&self, id: Option<i32>) -> AppResult<Option<i32>> {
        match id {
            Some(id) => Ok(self.generation_repo.find_by_id(id).await?.map(|g| g.id)),
            None => Ok(None),
        }
    }
}

/// Hash a password using Argon2.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::access::tests::member_with_role;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use serde_json::json;
    use std::sync::Arc;

    fn service_with(db: DatabaseConnection) -> MemberService {
        let db = Arc::new(db);
        let hierarchy = HierarchyService::new(
            NetworkRepository::new(db.clone()),
            GenerationRepository::new(db.clone()),
            CellRepository::new(db.clone()),
            MemberRepository::new(db.clone()),
            CascadeRepository::new(db.clone()),
        );
        MemberService::new(
            MemberRepository::new(db.clone()),
            CellRepository::new(db.clone()),
            NetworkRepository::new(db.clone()),
            GenerationRepository::new(db.clone()),
            CascadeRepository::new(db),
            hierarchy,
        )
    }

    #[test]
    fn test_hash_password() {
        let hash = hash_password("segredo123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("segredo123", &hash).unwrap());
        assert!(!verify_password("errada", &hash).unwrap());
    }

    #[test]
    fn test_hash_password_different_each_time() {
        let a = hash_password("segredo123").unwrap();
        let b = hash_password("segredo123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(verify_password("x", "not-a-hash").is_err());
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<member::Model>::new()])
            .into_connection();
        let service = service_with(db);

        let result = service.login("ninguem@igreja.org", "x").await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut member = member_with_role(3, Role::Member);
        member.password_hash = Some(hash_password("certa").unwrap());
        member.token = Some("abc".to_string());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[member]])
            .into_connection();
        let service = service_with(db);

        let result = service.login("m3@igreja.org", "errada").await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_returns_existing_token() {
        let mut member = member_with_role(3, Role::Member);
        member.password_hash = Some(hash_password("certa").unwrap());
        member.token = Some("abc".to_string());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[member]])
            .into_connection();
        let service = service_with(db);

        let member = service.login("m3@igreja.org", "certa").await.unwrap();
        assert_eq!(member.token.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_authenticate_by_token_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<member::Model>::new()])
            .into_connection();
        let service = service_with(db);

        let result = service.authenticate_by_token("invalid").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_member_cannot_read_other_details() {
        let service = service_with(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let result = service.details(&member_with_role(1, Role::Member), 2).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_leader_cannot_grant_leader_role() {
        let service = service_with(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let input: CreateMemberInput =
            serde_json::from_value(json!({"nome": "Ana", "tipo": "Lider"})).unwrap();

        let result = service.create(&member_with_role(1, Role::Leader), input).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[test]
    fn test_register_input_validation() {
        let input: RegisterInput = serde_json::from_value(json!({
            "nome": "Ana",
            "email": "nao-e-email",
            "senha": "123"
        }))
        .unwrap();
        assert!(input.validate().is_err());

        let input: RegisterInput = serde_json::from_value(json!({
            "nome": "Ana",
            "email": "ana@igreja.org",
            "senha": "123",
            "celula_id": ""
        }))
        .unwrap();
        assert!(input.validate().is_ok());
        assert!(!input.attended_encounter);
    }
}
