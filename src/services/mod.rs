pub mod list_view;
pub mod mutations;
pub mod notices;
pub mod query;
pub mod refresh;

pub use list_view::{ListPage, ListView, PaginationPolicy};
pub use mutations::MutationService;
pub use notices::{Notice, NoticeBoard, NoticeLevel};
pub use query::{AssessmentSource, CourseSource, QueryCoordinator};
pub use refresh::RefreshBridge;
