//! Story service. Stories expire from the feed 24 hours after posting.

use std::collections::HashMap;

use celula_common::AppResult;
use celula_db::{
    entities::{member, story},
    repositories::{MemberRepository, StoryRepository},
};
use chrono::{Duration, Utc};
use sea_orm::Set;
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use super::access::ensure_author_or_leader;
use super::input::{non_blank, safe_int};
use super::scope::ScopeResolver;

const STORY_LIFETIME_HOURS: i64 = 24;

/// Service for stories.
#[derive(Clone)]
pub struct StoryService {
    story_repo: StoryRepository,
    member_repo: MemberRepository,
    scopes: ScopeResolver,
}

/// Input for posting a story.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStoryInput {
    #[serde(rename = "foto_url")]
    #[validate(length(min = 1, max = 500))]
    pub photo_url: String,
    #[serde(rename = "legenda")]
    #[validate(length(max = 200))]
    pub caption: Option<String>,
    #[serde(rename = "celula_id", default)]
    pub cell_id: Value,
    #[serde(rename = "rede_id", default)]
    pub network_id: Value,
    #[serde(rename = "geracao_id", default)]
    pub generation_id: Value,
}

/// A story with its author's name.
#[derive(Debug, Clone)]
pub struct StoryView {
    pub story: story::Model,
    pub author_name: Option<String>,
}

impl StoryService {
    /// Create a new story service.
    #[must_use]
    pub const fn new(
        story_repo: StoryRepository,
        member_repo: MemberRepository,
        scopes: ScopeResolver,
    ) -> Self {
        Self {
            story_repo,
            member_repo,
            scopes,
        }
    }

    /// Live stories, newest first, with the same hierarchy fan-out as the
    /// announcement feed.
    pub async fn list(
        &self,
        network_id: Option<i32>,
        generation_id: Option<i32>,
        author_id: Option<i32>,
    ) -> AppResult<Vec<StoryView>> {
        let since = Utc::now() - Duration::hours(STORY_LIFETIME_HOURS);
        let scope = self.scopes.feed(network_id, generation_id).await?;
        let stories = self
            .story_repo
            .find_since(since, scope.as_ref(), author_id)
            .await?;

        let author_ids: Vec<i32> = stories.iter().filter_map(|s| s.author_id).collect();
        let authors: HashMap<i32, String> = self
            .member_repo
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|m| (m.id, m.name))
            .collect();

        Ok(stories
            .into_iter()
            .map(|story| StoryView {
                author_name: story.author_id.and_then(|id| authors.get(&id).cloned()),
                story,
            })
            .collect())
    }

    /// Post a story as the actor.
    pub async fn create(
        &self,
        actor: &member::Model,
        input: CreateStoryInput,
    ) -> AppResult<StoryView> {
        input.validate()?;

        let model = story::ActiveModel {
            photo_url: Set(input.photo_url.trim().to_string()),
            caption: Set(non_blank(input.caption)),
            created_at: Set(Utc::now()),
            author_id: Set(Some(actor.id)),
            cell_id: Set(safe_int(&input.cell_id)),
            network_id: Set(safe_int(&input.network_id)),
            generation_id: Set(safe_int(&input.generation_id)),
            ..Default::default()
        };

        let story = self.story_repo.create(model).await?;
        tracing::info!(story_id = story.id, author_id = actor.id, "Posted story");

        Ok(StoryView {
            story,
            author_name: Some(actor.name.clone()),
        })
    }

    /// Delete a story (author or leader).
    pub async fn delete(&self, actor: &member::Model, id: i32) -> AppResult<()> {
        let story = self.story_repo.get_by_id(id).await?;
        ensure_author_or_leader(actor, story.author_id)?;
        self.story_repo.delete(id).await
    }
}
