//! Database entities.

pub mod announcement;
pub mod attendance;
pub mod cell;
pub mod comment;
pub mod comment_like;
pub mod event;
pub mod generation;
pub mod meeting;
pub mod member;
pub mod network;
pub mod post_like;
pub mod prayer_request;
pub mod school;
pub mod story;
pub mod study;
pub mod testimony;

pub use announcement::Entity as Announcement;
pub use attendance::Entity as Attendance;
pub use cell::Entity as Cell;
pub use comment::Entity as Comment;
pub use comment_like::Entity as CommentLike;
pub use event::Entity as Event;
pub use generation::Entity as Generation;
pub use meeting::Entity as Meeting;
pub use member::Entity as Member;
pub use network::Entity as Network;
pub use post_like::Entity as PostLike;
pub use prayer_request::Entity as PrayerRequest;
pub use school::Entity as School;
pub use story::Entity as Story;
pub use study::Entity as Study;
pub use testimony::Entity as Testimony;
