pub mod assessments;
pub mod common;
pub mod courses;
pub mod filters;
pub mod users;

pub use common::pagination::{DEFAULT_PAGE_SIZE, PageCursor, PaginationInfo};
