//! Business logic services.

#![allow(missing_docs)]

pub mod access;
pub mod announcement;
pub mod catalog;
pub mod event;
pub mod hierarchy;
pub mod input;
pub mod interaction;
pub mod meeting;
pub mod member;
pub mod prayer;
pub mod scope;
pub mod story;
pub mod testimony;
pub mod upload;

pub use announcement::{
    AnnouncementService, AnnouncementView, CreateAnnouncementInput, UpdateAnnouncementInput,
};
pub use catalog::{CatalogService, CreateSchoolInput, CreateStudyInput, UpdateSchoolInput};
pub use event::{CreateEventInput, EventService, EventView, UpdateEventInput};
pub use hierarchy::{
    CellSummary, CellView, CreateCellInput, CreateGenerationInput, CreateNetworkInput,
    GenerationView, HierarchyService, UpdateCellInput, UpdateGenerationInput, UpdateNetworkInput,
};
pub use interaction::{CommentInput, CommentNode, CommentTarget, InteractionService};
pub use meeting::{AttendanceInput, CellReport, CreateMeetingInput, MeetingService};
pub use member::{
    ChangePasswordInput, CreateMemberInput, MemberDetails, MemberService, RegisterInput,
    UpdateMemberInput, UpdateProfileInput, hash_password, verify_password,
};
pub use prayer::{CreatePrayerInput, PrayerService, PrayerView};
pub use scope::ScopeResolver;
pub use story::{CreateStoryInput, StoryService, StoryView};
pub use testimony::{CreateTestimonyInput, TestimonyService, TestimonyView};
pub use upload::UploadService;
