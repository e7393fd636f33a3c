//! Database integration tests.
//!
//! These run every migration against an in-memory SQLite database and
//! exercise the repositories across tables.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use celula_db::{
    entities::{
        Attendance, Comment, CommentLike, Member, PostLike, PrayerRequest, announcement,
        attendance, cell, comment, comment_like, event, meeting, member, post_like,
        prayer_request,
    },
    repositories::{
        AnnouncementRepository, CascadeRepository, CellRepository, CommentRepository,
        EventRepository, LikeRepository, LikeTarget, MeetingRepository, MemberRepository,
        PrayerRequestRepository,
    },
    test_utils::setup_test_db,
};
use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set,
};

async fn create_member(db: &Arc<DatabaseConnection>, name: &str, cell_id: Option<i32>) -> member::Model {
    MemberRepository::new(db.clone())
        .create(member::ActiveModel {
            name: Set(name.to_string()),
            cell_id: Set(cell_id),
            role: Set(member::Role::Member),
            attended_encounter: Set(false),
            created_at: Set(Utc::now()),
            ..Default::default()
        })
        .await
        .unwrap()
}

async fn create_cell(db: &Arc<DatabaseConnection>, name: &str) -> cell::Model {
    CellRepository::new(db.clone())
        .create(cell::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        })
        .await
        .unwrap()
}

async fn create_event(db: &Arc<DatabaseConnection>) -> event::Model {
    EventRepository::new(db.clone())
        .create(event::ActiveModel {
            title: Set("Culto de Jovens".to_string()),
            ..Default::default()
        })
        .await
        .unwrap()
}

async fn comment_on(
    db: &Arc<DatabaseConnection>,
    event_id: i32,
    member_id: i32,
    parent_id: Option<i32>,
) -> comment::Model {
    CommentRepository::new(db.clone())
        .create(comment::ActiveModel {
            text: Set("Amém".to_string()),
            created_at: Set(Utc::now()),
            event_id: Set(Some(event_id)),
            announcement_id: Set(None),
            member_id: Set(member_id),
            parent_id: Set(parent_id),
            ..Default::default()
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn test_toggle_like_total_matches_rows() {
    let db = setup_test_db().await.unwrap();
    let likes = LikeRepository::new(db.clone());
    let event = create_event(&db).await;
    let ana = create_member(&db, "Ana", None).await;
    let bruno = create_member(&db, "Bruno", None).await;

    let first = likes.toggle(LikeTarget::Event(event.id), ana.id).await.unwrap();
    assert!(first.liked);
    assert_eq!(first.total, 1);

    let second = likes.toggle(LikeTarget::Event(event.id), bruno.id).await.unwrap();
    assert!(second.liked);
    assert_eq!(second.total, 2);

    let third = likes.toggle(LikeTarget::Event(event.id), ana.id).await.unwrap();
    assert!(!third.liked);
    assert_eq!(third.total, 1);

    let rows = PostLike::find()
        .filter(post_like::Column::EventId.eq(event.id))
        .count(db.as_ref())
        .await
        .unwrap();
    assert_eq!(rows, third.total);
}

#[tokio::test]
async fn test_delete_member_removes_everything_they_own() {
    let db = setup_test_db().await.unwrap();
    let cell = create_cell(&db, "Alpha").await;
    let doomed = create_member(&db, "Carlos", Some(cell.id)).await;
    let other = create_member(&db, "Diana", Some(cell.id)).await;
    let event = create_event(&db).await;
    let likes = LikeRepository::new(db.clone());

    // Carlos: 2 comments (one with a reply from Diana), likes, a prayer request.
    let root = comment_on(&db, event.id, doomed.id, None).await;
    comment_on(&db, event.id, doomed.id, None).await;
    let reply = comment_on(&db, event.id, other.id, Some(root.id)).await;
    let kept = comment_on(&db, event.id, other.id, None).await;

    likes.toggle(LikeTarget::Event(event.id), doomed.id).await.unwrap();
    likes.toggle(LikeTarget::Comment(kept.id), doomed.id).await.unwrap();
    likes.toggle(LikeTarget::Comment(kept.id), other.id).await.unwrap();
    likes.toggle(LikeTarget::Event(event.id), other.id).await.unwrap();

    let prayers = PrayerRequestRepository::new(db.clone());
    for text in ["Emprego", "Saúde"] {
        prayers
            .create(prayer_request::ActiveModel {
                cell_id: Set(cell.id),
                member_id: Set(doomed.id),
                text: Set(text.to_string()),
                created_at: Set(Utc::now()),
                resolved: Set(false),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    AnnouncementRepository::new(db.clone())
        .create(announcement::ActiveModel {
            cell_id: Set(Some(cell.id)),
            title: Set("Aviso".to_string()),
            message: Set("Reunião cancelada".to_string()),
            created_at: Set(Utc::now()),
            author_id: Set(doomed.id),
            ..Default::default()
        })
        .await
        .unwrap();

    let meetings = MeetingRepository::new(db.clone());
    let meeting = meetings
        .create(meeting::ActiveModel {
            cell_id: Set(cell.id),
            held_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        })
        .await
        .unwrap();
    meetings
        .replace_attendance(meeting.id, &[doomed.id, other.id])
        .await
        .unwrap();

    CascadeRepository::new(db.clone())
        .delete_member(doomed.id)
        .await
        .unwrap();

    let conn = db.as_ref();
    assert!(Member::find_by_id(doomed.id).one(conn).await.unwrap().is_none());
    assert_eq!(
        Comment::find()
            .filter(comment::Column::MemberId.eq(doomed.id))
            .count(conn)
            .await
            .unwrap(),
        0
    );
    // The reply hung off Carlos's comment and goes with it.
    assert!(Comment::find_by_id(reply.id).one(conn).await.unwrap().is_none());
    assert!(Comment::find_by_id(kept.id).one(conn).await.unwrap().is_some());
    assert_eq!(
        PostLike::find()
            .filter(post_like::Column::MemberId.eq(doomed.id))
            .count(conn)
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        CommentLike::find()
            .filter(comment_like::Column::MemberId.eq(doomed.id))
            .count(conn)
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        PrayerRequest::find()
            .filter(prayer_request::Column::MemberId.eq(doomed.id))
            .count(conn)
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        Attendance::find()
            .filter(attendance::Column::MemberId.eq(doomed.id))
            .count(conn)
            .await
            .unwrap(),
        0
    );

    // Diana's content survives.
    assert_eq!(likes.count(LikeTarget::Event(event.id)).await.unwrap(), 1);
    assert_eq!(likes.count(LikeTarget::Comment(kept.id)).await.unwrap(), 1);
    assert_eq!(meetings.count_present(&[meeting.id]).await.unwrap(), 1);
}

#[tokio::test]
async fn test_attendance_replace_semantics() {
    let db = setup_test_db().await.unwrap();
    let cell = create_cell(&db, "Beta").await;
    let m1 = create_member(&db, "Um", Some(cell.id)).await;
    let m2 = create_member(&db, "Dois", Some(cell.id)).await;
    let m3 = create_member(&db, "Três", Some(cell.id)).await;

    let meetings = MeetingRepository::new(db.clone());
    let meeting = meetings
        .create(meeting::ActiveModel {
            cell_id: Set(cell.id),
            held_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        })
        .await
        .unwrap();

    meetings.replace_attendance(meeting.id, &[m1.id, m2.id]).await.unwrap();
    meetings.replace_attendance(meeting.id, &[m1.id, m2.id]).await.unwrap();

    let rows = meetings.find_attendance(meeting.id).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.present));

    meetings.replace_attendance(meeting.id, &[m3.id]).await.unwrap();
    let rows = meetings.find_attendance(meeting.id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].member_id, m3.id);
}

#[tokio::test]
async fn test_delete_cell_detaches_members() {
    let db = setup_test_db().await.unwrap();
    let cell = create_cell(&db, "Gama").await;
    let member = create_member(&db, "Eva", Some(cell.id)).await;

    CascadeRepository::new(db.clone())
        .delete_cell(cell.id)
        .await
        .unwrap();

    let members = MemberRepository::new(db.clone());
    let detached = members.get_by_id(member.id).await.unwrap();
    assert_eq!(detached.cell_id, None);
    assert!(CellRepository::new(db).find_by_id(cell.id).await.unwrap().is_none());
}
