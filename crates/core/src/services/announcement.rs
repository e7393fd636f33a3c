//! Announcement service: hierarchical feed and cell murals.

use std::collections::{HashMap, HashSet};

use celula_common::{AppError, AppResult};
use celula_db::{
    entities::{announcement, member},
    repositories::{
        AnnouncementRepository, CascadeRepository, CellRepository, CommentRepository,
        LikeRepository, MemberRepository, ScopeFilter,
    },
};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use super::access::{ensure_author_or_leader, ensure_leader};
use super::input::{safe_int, trimmed};
use super::scope::ScopeResolver;

/// Service for announcements posted by leaders.
#[derive(Clone)]
pub struct AnnouncementService {
    announcement_repo: AnnouncementRepository,
    cell_repo: CellRepository,
    member_repo: MemberRepository,
    like_repo: LikeRepository,
    comment_repo: CommentRepository,
    cascade_repo: CascadeRepository,
    scopes: ScopeResolver,
}

/// Input for posting an announcement.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAnnouncementInput {
    #[serde(rename = "titulo", deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[serde(rename = "mensagem", deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
    #[serde(rename = "rede_id", default)]
    pub network_id: Value,
    #[serde(rename = "geracao_id", default)]
    pub generation_id: Value,
}

/// Partial update of an announcement.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateAnnouncementInput {
    #[serde(rename = "titulo")]
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    #[serde(rename = "mensagem")]
    #[validate(length(min = 1, max = 2000))]
    pub message: Option<String>,
}

/// An announcement with its author and interaction counters.
#[derive(Debug, Clone)]
pub struct AnnouncementView {
    pub announcement: announcement::Model,
    pub author_name: Option<String>,
    pub total_likes: i64,
    pub total_comments: i64,
    pub liked_by_me: Option<bool>,
}

impl AnnouncementService {
    /// Create a new announcement service.
    #[must_use]
    pub const fn new(
        announcement_repo: AnnouncementRepository,
        cell_repo: CellRepository,
        member_repo: MemberRepository,
        like_repo: LikeRepository,
        comment_repo: CommentRepository,
        cascade_repo: CascadeRepository,
        scopes: ScopeResolver,
    ) -> Self {
        Self {
            announcement_repo,
            cell_repo,
            member_repo,
            like_repo,
            comment_repo,
            cascade_repo,
            scopes,
        }
    }

    /// Announcement feed, newest first.
    ///
    /// With a network or generation filter the feed also holds whatever was
    /// posted to the nodes below it.
    pub async fn feed(
        &self,
        network_id: Option<i32>,
        generation_id: Option<i32>,
        author_id: Option<i32>,
        viewer: Option<i32>,
    ) -> AppResult<Vec<AnnouncementView>> {
        let scope = self.scopes.feed(network_id, generation_id).await?;
        let announcements = self
            .announcement_repo
            .find_feed(scope.as_ref(), author_id)
            .await?;
        self.views(announcements, viewer).await
    }

    /// Mural of a cell: its own announcements plus those of its generation
    /// and effective network.
    pub async fn mural(&self, cell_id: i32, viewer: Option<i32>) -> AppResult<Vec<AnnouncementView>> {
        let scope: ScopeFilter = self.scopes.mural(cell_id).await?;
        let announcements = self
            .announcement_repo
            .find_feed(Some(&scope), None)
            .await?;
        self.views(announcements, viewer).await
    }

    /// Get one announcement.
    pub async fn get(&self, id: i32, viewer: Option<i32>) -> AppResult<AnnouncementView> {
        let announcement = self.announcement_repo.get_by_id(id).await?;
        self.views(vec![announcement], viewer)
            .await?
            .pop()
            .ok_or_else(|| AppError::NotFound(format!("Announcement {id}")))
    }

    /// Post an announcement (leaders only). Cell id `0` posts without a cell.
    pub async fn create(
        &self,
        actor: &member::Model,
        cell_id: i32,
        input: CreateAnnouncementInput,
    ) -> AppResult<AnnouncementView> {
        ensure_leader(actor)?;
        input.validate()?;

        let cell_id = if cell_id == 0 {
            None
        } else {
            Some(self.cell_repo.get_by_id(cell_id).await?.id)
        };

        let model = announcement::ActiveModel {
            cell_id: Set(cell_id),
            network_id: Set(safe_int(&input.network_id)),
            generation_id: Set(safe_int(&input.generation_id)),
            title: Set(input.title),
            message: Set(input.message),
            created_at: Set(Utc::now()),
            author_id: Set(actor.id),
            ..Default::default()
        };

        let announcement = self.announcement_repo.create(model).await?;
        tracing::info!(
            announcement_id = announcement.id,
            author_id = actor.id,
            ?cell_id,
            "Posted announcement"
        );
        self.get(announcement.id, Some(actor.id)).await
    }

    /// Edit the title or message of an announcement.
    pub async fn update(
        &self,
        actor: &member::Model,
        id: i32,
        input: UpdateAnnouncementInput,
    ) -> AppResult<AnnouncementView> {
        input.validate()?;

        let announcement = self.announcement_repo.get_by_id(id).await?;
        ensure_author_or_leader(actor, Some(announcement.author_id))?;

        let mut active: announcement::ActiveModel = announcement.into();
        if let Some(title) = input.title {
            active.title = Set(title.trim().to_string());
        }
        if let Some(message) = input.message {
            active.message = Set(message);
        }

        self.announcement_repo.update(active).await?;
        self.get(id, Some(actor.id)).await
    }

    /// Delete an announcement with its likes and comments.
    pub async fn delete(&self, actor: &member::Model, id: i32) -> AppResult<()> {
        let announcement = self.announcement_repo.get_by_id(id).await?;
        ensure_author_or_leader(actor, Some(announcement.author_id))?;
        self.cascade_repo.delete_announcement(id).await
    }

    async fn views(
        &self,
        announcements: Vec<announcement::Model>,
        viewer: Option<i32>,
    ) -> AppResult<Vec<AnnouncementView>> {
        let ids: Vec<i32> = announcements.iter().map(|a| a.id).collect();
        let author_ids: Vec<i32> = announcements.iter().map(|a| a.author_id).collect();

        let authors: HashMap<i32, String> = self
            .member_repo
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|m| (m.id, m.name))
            .collect();
        let likes = self.like_repo.count_by_announcements(&ids).await?;
        let comments = self.comment_repo.count_by_announcements(&ids).await?;
        let liked: Option<HashSet<i32>> = match viewer {
            Some(member_id) => Some(self.like_repo.liked_announcements(member_id, &ids).await?),
            None => None,
        };

        Ok(announcements
            .into_iter()
            .map(|announcement| AnnouncementView {
                author_name: authors.get(&announcement.author_id).cloned(),
                total_likes: likes.get(&announcement.id).copied().unwrap_or(0),
                total_comments: comments.get(&announcement.id).copied().unwrap_or(0),
                liked_by_me: liked.as_ref().map(|set| set.contains(&announcement.id)),
                announcement,
            })
            .collect())
    }
}
