pub mod state;

use serde::{Deserialize, Serialize};

pub use state::{FilterKey, FilterState, FilterUpdate, default_filter_state};

// 排序字段（每个列表视图只使用其中一部分）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Date,
    Title,
    Grade,
    Status,
    Newest,
    Updated,
    Progress,
    Assessments,
    Code,
    Name,
}

impl SortField {
    pub fn label(&self) -> &'static str {
        match self {
            SortField::Date => "Due date",
            SortField::Title => "Title",
            SortField::Grade => "Grade",
            SortField::Status => "Status",
            SortField::Newest => "Newest",
            SortField::Updated => "Last updated",
            SortField::Progress => "Progress",
            SortField::Assessments => "Assessments",
            SortField::Code => "Course code",
            SortField::Name => "Name",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// 列表视图种类，决定默认排序和可选排序字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Assessments,
    Courses,
}

impl ListKind {
    pub fn default_sort(&self) -> (SortField, SortOrder) {
        match self {
            ListKind::Assessments => (SortField::Newest, SortOrder::Desc),
            ListKind::Courses => (SortField::Updated, SortOrder::Desc),
        }
    }

    pub fn sort_fields(&self) -> &'static [SortField] {
        match self {
            ListKind::Assessments => &[
                SortField::Date,
                SortField::Title,
                SortField::Grade,
                SortField::Status,
                SortField::Newest,
            ],
            ListKind::Courses => &[
                SortField::Newest,
                SortField::Updated,
                SortField::Progress,
                SortField::Assessments,
                SortField::Code,
                SortField::Name,
            ],
        }
    }
}
