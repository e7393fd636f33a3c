//! End-to-end service flows on an in-memory SQLite database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use celula_common::{AppError, LocalStorage};
use celula_core::{
    AnnouncementService, AttendanceInput, CreateAnnouncementInput, CreateMeetingInput,
    CreatePrayerInput, CreateTestimonyInput, HierarchyService, MeetingService, MemberService,
    PrayerService, RegisterInput, ScopeResolver, StoryService, TestimonyService, UploadService,
    services::upload::MAX_UPLOAD_SIZE,
};
use celula_db::{
    entities::{Member, cell, generation, member, network, story},
    repositories::{
        AnnouncementRepository, CascadeRepository, CellRepository, CommentRepository,
        GenerationRepository, LikeRepository, MeetingRepository, MemberRepository,
        NetworkRepository, PrayerRequestRepository, StoryRepository, TestimonyRepository,
    },
    test_utils::setup_test_db,
};
use chrono::{Duration, Utc};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, Set};
use serde_json::json;

struct Services {
    db: Arc<DatabaseConnection>,
    members: MemberService,
    announcements: AnnouncementService,
    meetings: MeetingService,
    stories: StoryService,
    prayers: PrayerService,
    testimonies: TestimonyService,
}

async fn services() -> Services {
    let db = setup_test_db().await.unwrap();

    let network_repo = NetworkRepository::new(db.clone());
    let generation_repo = GenerationRepository::new(db.clone());
    let cell_repo = CellRepository::new(db.clone());
    let member_repo = MemberRepository::new(db.clone());
    let cascade_repo = CascadeRepository::new(db.clone());

    let hierarchy = HierarchyService::new(
        network_repo.clone(),
        generation_repo.clone(),
        cell_repo.clone(),
        member_repo.clone(),
        cascade_repo.clone(),
    );
    let members = MemberService::new(
        member_repo.clone(),
        cell_repo.clone(),
        network_repo,
        generation_repo.clone(),
        cascade_repo.clone(),
        hierarchy,
    );
    let scopes = ScopeResolver::new(generation_repo, cell_repo.clone());
    let announcements = AnnouncementService::new(
        AnnouncementRepository::new(db.clone()),
        cell_repo.clone(),
        member_repo.clone(),
        LikeRepository::new(db.clone()),
        CommentRepository::new(db.clone()),
        cascade_repo,
        scopes.clone(),
    );
    let stories = StoryService::new(
        StoryRepository::new(db.clone()),
        member_repo.clone(),
        scopes.clone(),
    );
    let prayers = PrayerService::new(
        PrayerRequestRepository::new(db.clone()),
        cell_repo.clone(),
        member_repo.clone(),
        scopes.clone(),
    );
    let testimonies = TestimonyService::new(
        TestimonyRepository::new(db.clone()),
        cell_repo.clone(),
        member_repo.clone(),
        scopes,
    );
    let meetings = MeetingService::new(MeetingRepository::new(db.clone()), cell_repo, member_repo);

    Services {
        db,
        members,
        announcements,
        meetings,
        stories,
        prayers,
        testimonies,
    }
}

fn register_input(email: &str, code: &str) -> RegisterInput {
    serde_json::from_value(json!({
        "nome": "Joana",
        "email": email,
        "senha": "segredo",
        "codigo_vip": code,
    }))
    .unwrap()
}

async fn leader(db: &Arc<DatabaseConnection>, cell_id: Option<i32>) -> member::Model {
    member_with(db, "Pr. Marcos", cell_id, member::Role::Leader).await
}

async fn member_with(
    db: &Arc<DatabaseConnection>,
    name: &str,
    cell_id: Option<i32>,
    role: member::Role,
) -> member::Model {
    MemberRepository::new(db.clone())
        .create(member::ActiveModel {
            name: Set(name.to_string()),
            cell_id: Set(cell_id),
            role: Set(role),
            attended_encounter: Set(false),
            created_at: Set(Utc::now()),
            ..Default::default()
        })
        .await
        .unwrap()
}

async fn new_cell(db: &Arc<DatabaseConnection>, name: &str, generation_id: Option<i32>) -> cell::Model {
    CellRepository::new(db.clone())
        .create(cell::ActiveModel {
            name: Set(name.to_string()),
            generation_id: Set(generation_id),
            ..Default::default()
        })
        .await
        .unwrap()
}

fn announcement(title: &str, generation_id: Option<i32>) -> CreateAnnouncementInput {
    serde_json::from_value(json!({
        "titulo": title,
        "mensagem": "Informação importante",
        "geracao_id": generation_id,
    }))
    .unwrap()
}

/// A network with one generation, plus a cell under that generation and a
/// cell outside the hierarchy: `(network, generation, inside, outside)`.
async fn hierarchy_tree(
    db: &Arc<DatabaseConnection>,
) -> (network::Model, generation::Model, cell::Model, cell::Model) {
    let network = NetworkRepository::new(db.clone())
        .create(network::ActiveModel {
            name: Set("Rede Jovem".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    let generation = GenerationRepository::new(db.clone())
        .create(generation::ActiveModel {
            name: Set("Geração Fogo".to_string()),
            network_id: Set(Some(network.id)),
            ..Default::default()
        })
        .await
        .unwrap();
    let inside = new_cell(db, "Alpha", Some(generation.id)).await;
    let outside = new_cell(db, "Avulsa", None).await;
    (network, generation, inside, outside)
}

async fn story_posted_at(
    db: &Arc<DatabaseConnection>,
    author: &member::Model,
    generation_id: Option<i32>,
    age: Duration,
) -> story::Model {
    StoryRepository::new(db.clone())
        .create(story::ActiveModel {
            photo_url: Set(format!("/uploads/story_{}.jpg", age.num_hours())),
            created_at: Set(Utc::now() - age),
            author_id: Set(Some(author.id)),
            generation_id: Set(generation_id),
            ..Default::default()
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn test_register_twice_with_same_email() {
    let s = services().await;

    let first = s
        .members
        .register(register_input("joana@igreja.org", ""))
        .await
        .unwrap();
    assert!(first.token.is_some());

    let second = s
        .members
        .register(register_input("joana@igreja.org", ""))
        .await;
    assert!(matches!(second, Err(AppError::BadRequest(_))));

    assert_eq!(Member::find().count(s.db.as_ref()).await.unwrap(), 1);
}

#[tokio::test]
async fn test_invite_codes_pick_role() {
    let s = services().await;

    let cases = [
        (" lider12 ", member::Role::Leader),
        ("LIDER12", member::Role::Leader),
        ("Lider12", member::Role::Leader),
        ("REDE12", member::Role::NetworkLeader),
        ("geracao12", member::Role::GenerationLeader),
        ("ADMIN12", member::Role::Admin),
        ("LIDER13", member::Role::Member),
        ("", member::Role::Member),
    ];

    for (i, (code, expected)) in cases.into_iter().enumerate() {
        let registered = s
            .members
            .register(register_input(&format!("m{i}@igreja.org"), code))
            .await
            .unwrap();
        assert_eq!(registered.role, expected, "code {code:?}");
    }
}

#[tokio::test]
async fn test_register_then_login_and_token_lookup() {
    let s = services().await;
    let registered = s
        .members
        .register(register_input("pedro@igreja.org", "LIDER12"))
        .await
        .unwrap();

    let logged_in = s.members.login("pedro@igreja.org", "segredo").await.unwrap();
    assert_eq!(logged_in.id, registered.id);
    assert_eq!(logged_in.token, registered.token);

    let wrong = s.members.login("pedro@igreja.org", "errada").await;
    assert!(matches!(wrong, Err(AppError::InvalidCredentials)));

    let token = registered.token.unwrap();
    let resolved = s.members.authenticate_by_token(&token).await.unwrap();
    assert_eq!(resolved.id, registered.id);
}

#[tokio::test]
async fn test_register_with_unknown_cell_is_rejected() {
    let s = services().await;
    let mut input = register_input("lia@igreja.org", "");
    input.cell_id = json!("99");

    let result = s.members.register(input).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let mut input = register_input("lia@igreja.org", "");
    input.cell_id = json!("abc");
    let result = s.members.register(input).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn test_announcement_fan_out_and_mural() {
    let s = services().await;

    let network = NetworkRepository::new(s.db.clone())
        .create(network::ActiveModel {
            name: Set("Rede Jovem".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    let generation = GenerationRepository::new(s.db.clone())
        .create(generation::ActiveModel {
            name: Set("Geração Fogo".to_string()),
            network_id: Set(Some(network.id)),
            ..Default::default()
        })
        .await
        .unwrap();
    let cell = new_cell(&s.db, "Alpha", Some(generation.id)).await;
    let sibling = new_cell(&s.db, "Beta", Some(generation.id)).await;
    let author = leader(&s.db, Some(cell.id)).await;

    let to_generation = s
        .announcements
        .create(&author, 0, announcement("Vigília", Some(generation.id)))
        .await
        .unwrap();
    let to_sibling = s
        .announcements
        .create(&author, sibling.id, announcement("Churrasco", None))
        .await
        .unwrap();

    let ids = |views: Vec<celula_core::AnnouncementView>| -> Vec<i32> {
        views.into_iter().map(|v| v.announcement.id).collect()
    };

    let by_generation = ids(s.announcements.feed(None, Some(generation.id), None, None).await.unwrap());
    assert!(by_generation.contains(&to_generation.announcement.id));
    assert!(by_generation.contains(&to_sibling.announcement.id));

    let by_network = ids(s.announcements.feed(Some(network.id), None, None, None).await.unwrap());
    assert!(by_network.contains(&to_generation.announcement.id));
    assert!(by_network.contains(&to_sibling.announcement.id));

    let mural = ids(s.announcements.mural(cell.id, None).await.unwrap());
    assert!(mural.contains(&to_generation.announcement.id));
    assert!(!mural.contains(&to_sibling.announcement.id));
}

#[tokio::test]
async fn test_visitor_cannot_post_announcement() {
    let s = services().await;
    let visitor = member_with(&s.db, "Visitante", None, member::Role::Visitor).await;

    let result = s
        .announcements
        .create(&visitor, 0, announcement("Oi", None))
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn test_report_without_meetings() {
    let s = services().await;
    let cell = new_cell(&s.db, "Alpha", None).await;
    member_with(&s.db, "Ana", Some(cell.id), member::Role::Member).await;
    member_with(&s.db, "Bia", Some(cell.id), member::Role::Member).await;
    member_with(&s.db, "Caio", Some(cell.id), member::Role::Visitor).await;

    let report = s.meetings.report(cell.id).await.unwrap();
    assert_eq!(report.total_membros, 2);
    assert_eq!(report.total_visitantes, 1);
    assert!(report.media_frequencia.abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_report_averages_latest_meetings() {
    let s = services().await;
    let cell = new_cell(&s.db, "Alpha", None).await;
    let boss = leader(&s.db, Some(cell.id)).await;
    let ana = member_with(&s.db, "Ana", Some(cell.id), member::Role::Member).await;
    let bia = member_with(&s.db, "Bia", Some(cell.id), member::Role::Member).await;

    let dates = ["2025-01-01", "2025-01-08", "2025-01-15"];
    let present = [vec![ana.id, bia.id], vec![ana.id], vec![]];
    for (date, present) in dates.iter().zip(present) {
        let input: CreateMeetingInput =
            serde_json::from_value(json!({"celula_id": cell.id, "data": date})).unwrap();
        let meeting = s.meetings.create(&boss, input).await.unwrap();
        s.meetings
            .replace_attendance(
                &boss,
                AttendanceInput {
                    meeting_id: meeting.id,
                    present_member_ids: present,
                },
            )
            .await
            .unwrap();
    }

    let report = s.meetings.report(cell.id).await.unwrap();
    // 3 present rows over 3 meetings.
    assert!((report.media_frequencia - 1.0).abs() < f64::EPSILON);
    assert!((report.media_frequencia_ultimas_4 - 1.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_attendance_rejects_unknown_members() {
    let s = services().await;
    let cell = new_cell(&s.db, "Alpha", None).await;
    let boss = leader(&s.db, Some(cell.id)).await;

    let input: CreateMeetingInput =
        serde_json::from_value(json!({"celula_id": cell.id})).unwrap();
    let meeting = s.meetings.create(&boss, input).await.unwrap();

    let result = s
        .meetings
        .replace_attendance(
            &boss,
            AttendanceInput {
                meeting_id: meeting.id,
                present_member_ids: vec![boss.id, 999],
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
    assert!(s.meetings.attendance(meeting.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_member_through_service() {
    let s = services().await;
    let boss = leader(&s.db, None).await;
    let target = s
        .members
        .register(register_input("saindo@igreja.org", ""))
        .await
        .unwrap();

    let member_only = s.members.delete(&target, boss.id).await;
    assert!(matches!(member_only, Err(AppError::Forbidden(_))));

    s.members.delete(&boss, target.id).await.unwrap();
    let gone = s.members.get(target.id).await;
    assert!(matches!(gone, Err(AppError::MemberNotFound(_))));
}

#[tokio::test]
async fn test_stories_expire_after_a_day() {
    let s = services().await;
    let author = leader(&s.db, None).await;

    let fresh = story_posted_at(&s.db, &author, None, Duration::zero()).await;
    let old = story_posted_at(&s.db, &author, None, Duration::hours(23)).await;
    let expired = story_posted_at(&s.db, &author, None, Duration::hours(25)).await;

    let ids: Vec<i32> = s
        .stories
        .list(None, None, None)
        .await
        .unwrap()
        .into_iter()
        .map(|v| v.story.id)
        .collect();

    assert_eq!(ids, vec![fresh.id, old.id]);
    assert!(!ids.contains(&expired.id));
}

#[tokio::test]
async fn test_story_window_applies_to_network_feed() {
    let s = services().await;
    let (network, generation, _, _) = hierarchy_tree(&s.db).await;
    let author = leader(&s.db, None).await;

    let fresh = story_posted_at(&s.db, &author, Some(generation.id), Duration::hours(1)).await;
    story_posted_at(&s.db, &author, Some(generation.id), Duration::hours(25)).await;
    story_posted_at(&s.db, &author, None, Duration::hours(1)).await;

    let views = s.stories.list(Some(network.id), None, None).await.unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].story.id, fresh.id);
}

#[tokio::test]
async fn test_stories_filter_by_author() {
    let s = services().await;
    let author = leader(&s.db, None).await;
    let other = member_with(&s.db, "Lia", None, member::Role::Member).await;

    let mine = story_posted_at(&s.db, &author, None, Duration::hours(1)).await;
    story_posted_at(&s.db, &other, None, Duration::hours(1)).await;

    let views = s.stories.list(None, None, Some(author.id)).await.unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].story.id, mine.id);
    assert_eq!(views[0].author_name.as_deref(), Some("Pr. Marcos"));
}

#[tokio::test]
async fn test_prayer_feed_reaches_cells_through_generation() {
    let s = services().await;
    let (network, generation, inside, outside) = hierarchy_tree(&s.db).await;
    let author = member_with(&s.db, "Lia", Some(inside.id), member::Role::Member).await;

    let prayer = |text: &str| -> CreatePrayerInput {
        serde_json::from_value(json!({"pedido": text})).unwrap()
    };
    let ours = s.prayers.create(&author, inside.id, prayer("Pela família")).await.unwrap();
    let theirs = s.prayers.create(&author, outside.id, prayer("Pela saúde")).await.unwrap();

    let ids = |views: Vec<celula_core::PrayerView>| -> Vec<i32> {
        views.into_iter().map(|v| v.request.id).collect()
    };

    let by_network = ids(s.prayers.feed(Some(network.id), None).await.unwrap());
    assert_eq!(by_network, vec![ours.request.id]);

    let by_generation = ids(s.prayers.feed(None, Some(generation.id)).await.unwrap());
    assert_eq!(by_generation, vec![ours.request.id]);

    let everything = ids(s.prayers.feed(None, None).await.unwrap());
    assert!(everything.contains(&ours.request.id));
    assert!(everything.contains(&theirs.request.id));
}

#[tokio::test]
async fn test_testimony_feed_reaches_cells_through_generation() {
    let s = services().await;
    let (network, generation, inside, outside) = hierarchy_tree(&s.db).await;
    let author = member_with(&s.db, "Lia", Some(inside.id), member::Role::Member).await;

    let testimony = |text: &str| -> CreateTestimonyInput {
        serde_json::from_value(json!({"texto": text})).unwrap()
    };
    let ours = s
        .testimonies
        .create(&author, inside.id, testimony("Fui curada"))
        .await
        .unwrap();
    s.testimonies
        .create(&author, outside.id, testimony("Emprego novo"))
        .await
        .unwrap();

    let ids = |views: Vec<celula_core::TestimonyView>| -> Vec<i32> {
        views.into_iter().map(|v| v.testimony.id).collect()
    };

    assert_eq!(
        ids(s.testimonies.feed(Some(network.id), None).await.unwrap()),
        vec![ours.testimony.id]
    );
    assert_eq!(
        ids(s.testimonies.feed(None, Some(generation.id)).await.unwrap()),
        vec![ours.testimony.id]
    );
    assert_eq!(s.testimonies.feed(None, None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_blank_text_is_rejected() {
    let s = services().await;
    let cell = new_cell(&s.db, "Alpha", None).await;
    let author = member_with(&s.db, "Lia", Some(cell.id), member::Role::Member).await;

    let prayer: CreatePrayerInput = serde_json::from_value(json!({"pedido": "   "})).unwrap();
    let result = s.prayers.create(&author, cell.id, prayer).await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let testimony: CreateTestimonyInput = serde_json::from_value(json!({"texto": "\n\t"})).unwrap();
    let result = s.testimonies.create(&author, cell.id, testimony).await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let padded: CreatePrayerInput = serde_json::from_value(json!({"pedido": "  Paz  "})).unwrap();
    let view = s.prayers.create(&author, cell.id, padded).await.unwrap();
    assert_eq!(view.request.text, "Paz");
}

#[tokio::test]
async fn test_upload_size_cap_and_empty_name() {
    let s = services().await;
    let dir = std::env::temp_dir().join(format!("celula-flow-{}", uuid::Uuid::new_v4()));
    let uploads = UploadService::new(
        Arc::new(LocalStorage::new(dir.clone(), "/uploads".to_string())),
        s.members.clone(),
    );

    let too_big = vec![0_u8; MAX_UPLOAD_SIZE + 1];
    let result = uploads.upload("grande.png", &too_big).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let result = uploads.upload("  ", b"x").await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let stored = uploads.upload("foto.png", b"x").await.unwrap();
    assert!(stored.url.starts_with("/uploads/upload_"));
    assert!(stored.url.ends_with("_foto.png"));

    let _ = std::fs::remove_dir_all(dir);
}
