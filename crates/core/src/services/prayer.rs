//! Prayer requests posted to a cell.

use std::collections::HashMap;

use celula_common::{AppError, AppResult};
use celula_db::{
    entities::{member, prayer_request},
    repositories::{CellRepository, MemberRepository, PrayerRequestRepository},
};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::access::ensure_author_or_leader;
use super::input::trimmed;
use super::scope::ScopeResolver;

/// Input for a prayer request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePrayerInput {
    #[serde(rename = "pedido", deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 1000))]
    pub text: String,
}

/// A prayer request with its author.
#[derive(Debug, Clone)]
pub struct PrayerView {
    pub request: prayer_request::Model,
    pub author_name: Option<String>,
    pub author_photo: Option<String>,
}

/// Service for prayer requests.
#[derive(Clone)]
pub struct PrayerService {
    prayer_repo: PrayerRequestRepository,
    cell_repo: CellRepository,
    member_repo: MemberRepository,
    scopes: ScopeResolver,
}

impl PrayerService {
    /// Create a new prayer service.
    #[must_use]
    pub const fn new(
        prayer_repo: PrayerRequestRepository,
        cell_repo: CellRepository,
        member_repo: MemberRepository,
        scopes: ScopeResolver,
    ) -> Self {
        Self {
            prayer_repo,
            cell_repo,
            member_repo,
            scopes,
        }
    }

    /// Prayer requests of one cell, newest first.
    pub async fn list_by_cell(&self, cell_id: i32) -> AppResult<Vec<PrayerView>> {
        self.cell_repo.get_by_id(cell_id).await?;
        let requests = self.prayer_repo.find_by_cells(Some(&[cell_id])).await?;
        self.views(requests).await
    }

    /// Prayer requests across the cells under a network or generation.
    pub async fn feed(
        &self,
        network_id: Option<i32>,
        generation_id: Option<i32>,
    ) -> AppResult<Vec<PrayerView>> {
        let scope = self.scopes.feed(network_id, generation_id).await?;
        let requests = self
            .prayer_repo
            .find_by_cells(scope.as_ref().map(|s| s.cell_ids.as_slice()))
            .await?;
        self.views(requests).await
    }

    /// Post a prayer request to a cell as the actor.
    pub async fn create(
        &self,
        actor: &member::Model,
        cell_id: i32,
        input: CreatePrayerInput,
    ) -> AppResult<PrayerView> {
        input.validate()?;
        let cell = self.cell_repo.get_by_id(cell_id).await?;

        let model = prayer_request::ActiveModel {
            cell_id: Set(cell.id),
            member_id: Set(actor.id),
            text: Set(input.text),
            created_at: Set(Utc::now()),
            resolved: Set(false),
            ..Default::default()
        };

        let request = self.prayer_repo.create(model).await?;
        tracing::info!(prayer_id = request.id, cell_id, member_id = actor.id, "Posted prayer request");

        Ok(PrayerView {
            request,
            author_name: Some(actor.name.clone()),
            author_photo: actor.photo_url.clone(),
        })
    }

    /// Flip the resolved flag (author or leader).
    pub async fn toggle_resolved(&self, actor: &member::Model, id: i32) -> AppResult<PrayerView> {
        let request = self.prayer_repo.get_by_id(id).await?;
        ensure_author_or_leader(actor, Some(request.member_id))?;

        let resolved = !request.resolved;
        let mut active: prayer_request::ActiveModel = request.into();
        active.resolved = Set(resolved);
        let request = self.prayer_repo.update(active).await?;

        tracing::debug!(prayer_id = id, resolved, "Toggled prayer request");
        self.views(vec![request])
            .await?
            .pop()
            .ok_or_else(|| AppError::NotFound(format!("Prayer request {id}")))
    }

    /// Delete a prayer request (author or leader).
    pub async fn delete(&self, actor: &member::Model, id: i32) -> AppResult<()> {
        let request = self.prayer_repo.get_by_id(id).await?;
        ensure_author_or_leader(actor, Some(request.member_id))?;
        self.prayer_repo.delete(id).await
    }

    async fn views(&self, requests: Vec<prayer_request::Model>) -> AppResult<Vec<PrayerView>> {
        let author_ids: Vec<i32> = requests.iter().map(|r| r.member_id).collect();
        let authors: HashMap<i32, member::Model> = self
            .member_repo
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        Ok(requests
            .into_iter()
            .map(|request| {
                let author = authors.get(&request.member_id);
                PrayerView {
                    author_name: author.map(|a| a.name.clone()),
                    author_photo: author.and_then(|a| a.photo_url.clone()),
                    request,
                }
            })
            .collect())
    }
}
