//! API middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use celula_common::StorageBackend;
use celula_core::{
    AnnouncementService, CatalogService, EventService, HierarchyService, InteractionService,
    MeetingService, MemberService, PrayerService, ScopeResolver, StoryService, TestimonyService,
    UploadService,
};
use celula_db::repositories::{
    AnnouncementRepository, CascadeRepository, CellRepository, CommentRepository,
    EventRepository, GenerationRepository, LikeRepository, MeetingRepository, MemberRepository,
    NetworkRepository, PrayerRequestRepository, SchoolRepository, StoryRepository,
    StudyRepository, TestimonyRepository,
};
use sea_orm::DatabaseConnection;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub member_service: MemberService,
    pub hierarchy_service: HierarchyService,
    pub event_service: EventService,
    pub announcement_service: AnnouncementService,
    pub interaction_service: InteractionService,
    pub story_service: StoryService,
    pub prayer_service: PrayerService,
    pub testimony_service: TestimonyService,
    pub meeting_service: MeetingService,
    pub catalog_service: CatalogService,
    pub upload_service: UploadService,
}

impl AppState {
    /// Wire every repository and service on top of one connection.
    #[must_use]
    pub fn build(db: Arc<DatabaseConnection>, storage: Arc<dyn StorageBackend>) -> Self {
        let network_repo = NetworkRepository::new(db.clone());
        let generation_repo = GenerationRepository::new(db.clone());
        let cell_repo = CellRepository::new(db.clone());
        let member_repo = MemberRepository::new(db.clone());
        let event_repo = EventRepository::new(db.clone());
        let announcement_repo = AnnouncementRepository::new(db.clone());
        let like_repo = LikeRepository::new(db.clone());
        let comment_repo = CommentRepository::new(db.clone());
        let cascade_repo = CascadeRepository::new(db.clone());
        let scopes = ScopeResolver::new(generation_repo.clone(), cell_repo.clone());

        let hierarchy_service = HierarchyService::new(
            network_repo.clone(),
            generation_repo.clone(),
            cell_repo.clone(),
            member_repo.clone(),
            cascade_repo.clone(),
        );
        let member_service = MemberService::new(
            member_repo.clone(),
            cell_repo.clone(),
            network_repo,
            generation_repo,
            cascade_repo.clone(),
            hierarchy_service.clone(),
        );
        let event_service = EventService::new(
            event_repo.clone(),
            like_repo.clone(),
            comment_repo.clone(),
            cascade_repo.clone(),
        );
        let announcement_service = AnnouncementService::new(
            announcement_repo.clone(),
            cell_repo.clone(),
            member_repo.clone(),
            like_repo.clone(),
            comment_repo.clone(),
            cascade_repo.clone(),
            scopes.clone(),
        );
        let interaction_service = InteractionService::new(
            like_repo,
            comment_repo,
            event_repo,
            announcement_repo,
            member_repo.clone(),
            cascade_repo,
        );
        let story_service =
            StoryService::new(StoryRepository::new(db.clone()), member_repo.clone(), scopes.clone());
        let prayer_service = PrayerService::new(
            PrayerRequestRepository::new(db.clone()),
            cell_repo.clone(),
            member_repo.clone(),
            scopes.clone(),
        );
        let testimony_service = TestimonyService::new(
            TestimonyRepository::new(db.clone()),
            cell_repo.clone(),
            member_repo.clone(),
            scopes,
        );
        let meeting_service =
            MeetingService::new(MeetingRepository::new(db.clone()), cell_repo, member_repo);
        let catalog_service =
            CatalogService::new(SchoolRepository::new(db.clone()), StudyRepository::new(db));
        let upload_service = UploadService::new(storage, member_service.clone());

        Self {
            member_service,
            hierarchy_service,
            event_service,
            announcement_service,
            interaction_service,
            story_service,
            prayer_service,
            testimony_service,
            meeting_service,
            catalog_service,
            upload_service,
        }
    }
}

/// Authentication middleware.
///
/// Resolves `Authorization: Bearer <token>` into the member and stores it in
/// the request extensions. Unknown tokens leave the request anonymous.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.member_service.authenticate_by_token(token.trim()).await {
            Ok(member) => {
                req.extensions_mut().insert(member);
            }
            Err(e) => tracing::debug!(error = %e, "Ignoring bearer token"),
        }
    }

    next.run(req).await
}
