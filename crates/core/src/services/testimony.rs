//! Testimonies shared with a cell.

use std::collections::HashMap;

use celula_common::AppResult;
use celula_db::{
    entities::{member, testimony},
    repositories::{CellRepository, MemberRepository, TestimonyRepository},
};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::access::ensure_author_or_leader;
use super::input::trimmed;
use super::scope::ScopeResolver;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTestimonyInput {
    #[serde(rename = "texto", deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 2000))]
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct TestimonyView {
    pub testimony: testimony::Model,
    pub author_name: Option<String>,
    pub author_photo: Option<String>,
}

/// Service for testimonies.
#[derive(Clone)]
pub struct TestimonyService {
    testimony_repo: TestimonyRepository,
    cell_repo: CellRepository,
    member_repo: MemberRepository,
    scopes: ScopeResolver,
}

impl TestimonyService {
    #[must_use]
    pub const fn new(
        testimony_repo: TestimonyRepository,
        cell_repo: CellRepository,
        member_repo: MemberRepository,
        scopes: ScopeResolver,
    ) -> Self {
        Self {
            testimony_repo,
            cell_repo,
            member_repo,
            scopes,
        }
    }

    /// Testimonies of one cell, newest first.
    pub async fn list_by_cell(&self, cell_id: i32) -> AppResult<Vec<TestimonyView>> {
        self.cell_repo.get_by_id(cell_id).await?;
        let testimonies = self.testimony_repo.find_by_cells(Some(&[cell_id])).await?;
        self.views(testimonies).await
    }

    /// Testimonies across the cells under a network or generation.
    pub async fn feed(
        &self,
        network_id: Option<i32>,
        generation_id: Option<i32>,
    ) -> AppResult<Vec<TestimonyView>> {
        let scope = self.scopes.feed(network_id, generation_id).await?;
        let testimonies = self
            .testimony_repo
            .find_by_cells(scope.as_ref().map(|s| s.cell_ids.as_slice()))
            .await?;
        self.views(testimonies).await
    }

    pub async fn create(
        &self,
        actor: &member::Model,
        cell_id: i32,
        input: CreateTestimonyInput,
    ) -> AppResult<TestimonyView> {
        input.validate()?;
        let cell = self.cell_repo.get_by_id(cell_id).await?;

        let model = testimony::ActiveModel {
            cell_id: Set(cell.id),
            member_id: Set(actor.id),
            text: Set(input.text),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let testimony = self.testimony_repo.create(model).await?;
        tracing::info!(testimony_id = testimony.id, cell_id, member_id = actor.id, "Shared testimony");

        Ok(TestimonyView {
            testimony,
            author_name: Some(actor.name.clone()),
            author_photo: actor.photo_url.clone(),
        })
    }

    /// Delete a testimony (author or leader).
    pub async fn delete(&self, actor: &member::Model, id: i32) -> AppResult<()> {
        let testimony = self.testimony_repo.get_by_id(id).await?;
        ensure_author_or_leader(actor, Some(testimony.member_id))?;
        self.testimony_repo.delete(id).await
    }

    async fn views(&self, testimonies: Vec<testimony::Model>) -> AppResult<Vec<TestimonyView>> {
        let author_ids: Vec<i32> = testimonies.iter().map(|t| t.member_id).collect();
        let authors: HashMap<i32, member::Model> = self
            .member_repo
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        Ok(testimonies
            .into_iter()
            .map(|testimony| {
                let author = authors.get(&testimony.member_id);
                TestimonyView {
                    author_name: author.map(|a| a.name.clone()),
                    author_photo: author.and_then(|a| a.photo_url.clone()),
                    testimony,
                }
            })
            .collect())
    }
}
