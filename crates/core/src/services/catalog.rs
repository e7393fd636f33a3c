//! School and study catalog.

use celula_common::AppResult;
use celula_db::{
    entities::{member, school, study},
    repositories::{SchoolRepository, StudyRepository},
};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::access::ensure_admin;
use super::input::{deserialize_some, non_blank, parse_datetime};

/// Input for creating a school.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSchoolInput {
    #[serde(rename = "nome")]
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "foto_url")]
    pub photo_url: Option<String>,
    #[serde(rename = "dia_horario")]
    #[validate(length(max = 100))]
    pub schedule: Option<String>,
}

/// Partial update of a school.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateSchoolInput {
    #[serde(rename = "nome")]
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[serde(rename = "descricao", default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    #[serde(rename = "foto_url", default, deserialize_with = "deserialize_some")]
    pub photo_url: Option<Option<String>>,
    #[serde(rename = "dia_horario", default, deserialize_with = "deserialize_some")]
    pub schedule: Option<Option<String>>,
}

/// Input for publishing a study.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStudyInput {
    #[serde(rename = "titulo")]
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(rename = "conteudo_link")]
    #[validate(length(max = 500))]
    pub content_link: Option<String>,
    /// Defaults to now.
    #[serde(rename = "data_publicacao")]
    pub published_at: Option<String>,
}

/// Service for the school and study catalogs.
#[derive(Clone)]
pub struct CatalogService {
    school_repo: SchoolRepository,
    study_repo: StudyRepository,
}

impl CatalogService {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(school_repo: SchoolRepository, study_repo: StudyRepository) -> Self {
        Self {
            school_repo,
            study_repo,
        }
    }

    pub async fn list_schools(&self) -> AppResult<Vec<school::Model>> {
        self.school_repo.find_all().await
    }

    pub async fn get_school(&self, id: i32) -> AppResult<school::Model> {
        self.school_repo.get_by_id(id).await
    }

    /// Add a school (admin only).
    pub async fn create_school(
        &self,
        actor: &member::Model,
        input: CreateSchoolInput,
    ) -> AppResult<school::Model> {
        ensure_admin(actor)?;
        input.validate()?;

        let model = school::ActiveModel {
            name: Set(input.name.trim().to_string()),
            description: Set(non_blank(input.description)),
            photo_url: Set(non_blank(input.photo_url)),
            schedule: Set(non_blank(input.schedule)),
            ..Default::default()
        };

        let school = self.school_repo.create(model).await?;
        tracing::info!(school_id = school.id, name = %school.name, "Created school");
        Ok(school)
    }

    /// Apply a partial update to a school (admin only).
    pub async fn update_school(
        &self,
        actor: &member::Model,
        id: i32,
        input: UpdateSchoolInput,
    ) -> AppResult<school::Model> {
        ensure_admin(actor)?;
        input.validate()?;

        let school = self.school_repo.get_by_id(id).await?;
        let mut active: school::ActiveModel = school.into();

        if let Some(name) = input.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(description) = input.description {
            active.description = Set(non_blank(description));
        }
        if let Some(photo_url) = input.photo_url {
            active.photo_url = Set(non_blank(photo_url));
        }
        if let Some(schedule) = input.schedule {
            active.schedule = Set(non_blank(schedule));
        }

        self.school_repo.update(active).await
    }

    /// Remove a school (admin only).
    pub async fn delete_school(&self, actor: &member::Model, id: i32) -> AppResult<()> {
        ensure_admin(actor)?;
        self.school_repo.get_by_id(id).await?;
        self.school_repo.delete(id).await?;
        tracing::info!(school_id = id, "Deleted school");
        Ok(())
    }

    pub async fn list_studies(&self) -> AppResult<Vec<study::Model>> {
        self.study_repo.find_all().await
    }

    /// Publish a study (admin only).
    pub async fn create_study(
        &self,
        actor: &member::Model,
        input: CreateStudyInput,
    ) -> AppResult<study::Model> {
        ensure_admin(actor)?;
        input.validate()?;

        let published_at = input
            .published_at
            .as_deref()
            .and_then(parse_datetime)
            .map_or_else(Utc::now, |naive| naive.and_utc());

        let model = study::ActiveModel {
            title: Set(input.title.trim().to_string()),
            content_link: Set(non_blank(input.content_link)),
            published_at: Set(published_at),
            ..Default::default()
        };

        self.study_repo.create(model).await
    }
}
