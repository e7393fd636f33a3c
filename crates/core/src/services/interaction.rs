//! Likes and threaded comments on events and announcements.

use std::collections::{HashMap, HashSet};

use celula_common::{AppError, AppResult};
use celula_db::{
    entities::{comment, member},
    repositories::{
        AnnouncementRepository, CascadeRepository, CommentRepository, EventRepository,
        LikeRepository, LikeTarget, LikeToggle, MemberRepository,
    },
};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::access::ensure_author_or_leader;
use super::input::trimmed;

/// What a comment thread hangs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentTarget {
    Event(i32),
    Announcement(i32),
}

/// Input for a comment or a reply.
#[derive(Debug, Deserialize, Validate)]
pub struct CommentInput {
    #[serde(rename = "texto", deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 1000))]
    pub text: String,
}

/// A comment with its author, like counter and replies.
#[derive(Debug, Clone)]
pub struct CommentNode {
    pub comment: comment::Model,
    pub author_name: Option<String>,
    pub author_photo: Option<String>,
    pub total_likes: i64,
    pub liked_by_me: Option<bool>,
    /// Oldest first.
    pub replies: Vec<CommentNode>,
}

/// Service for likes and comments.
#[derive(Clone)]
pub struct InteractionService {
    like_repo: LikeRepository,
    comment_repo: CommentRepository,
    event_repo: EventRepository,
    announcement_repo: AnnouncementRepository,
    member_repo: MemberRepository,
    cascade_repo: CascadeRepository,
}

impl InteractionService {
    /// Create a new interaction service.
    #[must_use]
    pub const fn new(
        like_repo: LikeRepository,
        comment_repo: CommentRepository,
        event_repo: EventRepository,
        announcement_repo: AnnouncementRepository,
        member_repo: MemberRepository,
        cascade_repo: CascadeRepository,
    ) -> Self {
        Self {
            like_repo,
            comment_repo,
            event_repo,
            announcement_repo,
            member_repo,
            cascade_repo,
        }
    }

    /// Flip the actor's like on `target`.
    pub async fn toggle_like(
        &self,
        actor: &member::Model,
        target: LikeTarget,
    ) -> AppResult<LikeToggle> {
        match target {
            LikeTarget::Event(id) => {
                self.event_repo.get_by_id(id).await?;
            }
            LikeTarget::Announcement(id) => {
                self.announcement_repo.get_by_id(id).await?;
            }
            LikeTarget::Comment(id) => {
                self.comment_repo.get_by_id(id).await?;
            }
        }

        self.like_repo.toggle(target, actor.id).await
    }

    /// Comment threads on `target`: roots newest first, replies nested.
    pub async fn list(
        &self,
        target: CommentTarget,
        viewer: Option<i32>,
    ) -> AppResult<Vec<CommentNode>> {
        let comments = match target {
            CommentTarget::Event(id) => {
                self.event_repo.get_by_id(id).await?;
                self.comment_repo.find_by_event(id).await?
            }
            CommentTarget::Announcement(id) => {
                self.announcement_repo.get_by_id(id).await?;
                self.comment_repo.find_by_announcement(id).await?
            }
        };

        let nodes = self.nodes(comments, viewer).await?;
        Ok(build_threads(nodes))
    }

    /// Post a top-level comment as the actor.
    pub async fn comment(
        &self,
        actor: &member::Model,
        target: CommentTarget,
        input: CommentInput,
    ) -> AppResult<CommentNode> {
        input.validate()?;

        let (event_id, announcement_id) = match target {
            CommentTarget::Event(id) => (Some(self.event_repo.get_by_id(id).await?.id), None),
            CommentTarget::Announcement(id) => {
                (None, Some(self.announcement_repo.get_by_id(id).await?.id))
            }
        };

        let model = comment::ActiveModel {
            text: Set(input.text),
            created_at: Set(Utc::now()),
            event_id: Set(event_id),
            announcement_id: Set(announcement_id),
            member_id: Set(actor.id),
            parent_id: Set(None),
            ..Default::default()
        };

        let comment = self.comment_repo.create(model).await?;
        tracing::info!(comment_id = comment.id, ?target, member_id = actor.id, "Posted comment");
        self.node(comment, actor.id).await
    }

    /// Reply to a comment. The reply inherits the parent's target.
    pub async fn reply(
        &self,
        actor: &member::Model,
        parent_id: i32,
        input: CommentInput,
    ) -> AppResult<CommentNode> {
        input.validate()?;

        let parent = self
            .comment_repo
            .find_by_id(parent_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comentario pai nao encontrado".to_string()))?;

        let model = comment::ActiveModel {
            text: Set(input.text),
            created_at: Set(Utc::now()),
            event_id: Set(parent.event_id),
            announcement_id: Set(parent.announcement_id),
            member_id: Set(actor.id),
            parent_id: Set(Some(parent.id)),
            ..Default::default()
        };

        let reply = self.comment_repo.create(model).await?;
        tracing::info!(comment_id = reply.id, parent_id, member_id = actor.id, "Posted reply");
        self.node(reply, actor.id).await
    }

    /// Delete a comment and every reply below it.
    pub async fn delete_comment(&self, actor: &member::Model, id: i32) -> AppResult<()> {
        let comment = self.comment_repo.get_by_id(id).await?;
        ensure_author_or_leader(actor, Some(comment.member_id))?;
        self.cascade_repo.delete_comment(id).await
    }

    async fn node(&self, comment: comment::Model, viewer: i32) -> AppResult<CommentNode> {
        let id = comment.id;
        self.nodes(vec![comment], Some(viewer))
            .await?
            .pop()
            .ok_or_else(|| AppError::NotFound(format!("Comment {id}")))
    }

    async fn nodes(
        &self,
        comments: Vec<comment::Model>,
        viewer: Option<i32>,
    ) -> AppResult<Vec<CommentNode>> {
        let ids: Vec<i32> = comments.iter().map(|c| c.id).collect();
        let author_ids: Vec<i32> = comments.iter().map(|c| c.member_id).collect();

        let authors: HashMap<i32, member::Model> = self
            .member_repo
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();
        let likes = self.like_repo.count_by_comments(&ids).await?;
        let liked: Option<HashSet<i32>> = match viewer {
            Some(member_id) => Some(self.like_repo.liked_comments(member_id, &ids).await?),
            None => None,
        };

        Ok(comments
            .into_iter()
            .map(|comment| {
                let author = authors.get(&comment.member_id);
                CommentNode {
                    author_name: author.map(|a| a.name.clone()),
                    author_photo: author.and_then(|a| a.photo_url.clone()),
                    total_likes: likes.get(&comment.id).copied().unwrap_or(0),
                    liked_by_me: liked.as_ref().map(|set| set.contains(&comment.id)),
                    replies: vec![],
                    comment,
                }
            })
            .collect())
    }
}

/// Nest flat nodes (newest first) under their parents.
///
/// Roots keep the newest-first order; replies come out oldest first. Replies
/// whose parent is not in the list are dropped.
fn build_threads(nodes: Vec<CommentNode>) -> Vec<CommentNode> {
    let mut roots = Vec::new();
    let mut children: HashMap<i32, Vec<CommentNode>> = HashMap::new();

    for node in nodes {
        match node.comment.parent_id {
            None => roots.push(node),
            Some(parent_id) => children.entry(parent_id).or_default().push(node),
        }
    }

    roots
        .into_iter()
        .map(|root| attach(root, &mut children))
        .collect()
}

fn attach(mut node: CommentNode, children: &mut HashMap<i32, Vec<CommentNode>>) -> CommentNode {
    if let Some(mut replies) = children.remove(&node.comment.id) {
        replies.reverse();
        node.replies = replies
            .into_iter()
            .map(|reply| attach(reply, children))
            .collect();
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::access::tests::member_with_role;
    use celula_db::entities::member::Role;
    use chrono::Duration;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn node(id: i32, parent_id: Option<i32>, minutes_ago: i64) -> CommentNode {
        CommentNode {
            comment: comment::Model {
                id,
                text: format!("comentario {id}"),
                created_at: Utc::now() - Duration::minutes(minutes_ago),
                event_id: Some(1),
                announcement_id: None,
                member_id: 1,
                parent_id,
            },
            author_name: None,
            author_photo: None,
            total_likes: 0,
            liked_by_me: None,
            replies: vec![],
        }
    }

    fn service_with(db: sea_orm::DatabaseConnection) -> InteractionService {
        let db = Arc::new(db);
        InteractionService::new(
            LikeRepository::new(db.clone()),
            CommentRepository::new(db.clone()),
            EventRepository::new(db.clone()),
            AnnouncementRepository::new(db.clone()),
            MemberRepository::new(db.clone()),
            CascadeRepository::new(db),
        )
    }

    #[test]
    fn test_build_threads_orders_roots_and_replies() {
        // Newest first, as the repository returns them.
        let flat = vec![
            node(5, Some(1), 1),
            node(4, None, 2),
            node(3, Some(1), 3),
            node(2, Some(3), 4),
            node(1, None, 10),
        ];

        let threads = build_threads(flat);
        assert_eq!(threads.len(), 2);
        assert_eq!(threads[0].comment.id, 4);
        assert_eq!(threads[1].comment.id, 1);

        let replies: Vec<i32> = threads[1].replies.iter().map(|r| r.comment.id).collect();
        assert_eq!(replies, vec![3, 5]);
        assert_eq!(threads[1].replies[0].replies[0].comment.id, 2);
    }

    #[test]
    fn test_build_threads_drops_orphans() {
        let threads = build_threads(vec![node(7, Some(99), 1), node(6, None, 2)]);
        assert_eq!(threads.len(), 1);
        assert!(threads[0].replies.is_empty());
    }

    #[tokio::test]
    async fn test_reply_to_missing_parent() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<comment::Model>::new()])
            .into_connection();
        let service = service_with(db);

        let result = service
            .reply(
                &member_with_role(1, Role::Member),
                42,
                CommentInput {
                    text: "Amém".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_member_cannot_delete_others_comment() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![node(3, None, 1).comment]])
            .into_connection();
        let service = service_with(db);

        let result = service
            .delete_comment(&member_with_role(2, Role::Member), 3)
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
