//! 列表过滤 / 排序 / 分页引擎
//!
//! 纯函数，不做 I/O，可以在每次按键时调用；防抖由调用方负责。
//!
//! - 所有已设置的条件按 AND 组合
//! - 排序稳定，主键相等时保持输入顺序，不引入次级键
//! - 缺失的排序值视为最小值
//! - 分页在过滤和排序之后进行

mod items;
pub mod paginate;
pub mod predicate;
pub mod sort;
pub mod tags;

#[cfg(test)]
pub(crate) mod fixtures;

use chrono::{DateTime, Utc};

use crate::models::assessments::entities::{AssessmentType, ResultsStatus, SubmissionStatus};
use crate::models::filters::{FilterState, SortField};

pub use paginate::{page, total_pages};
pub use predicate::CompiledFilter;
pub use tags::{FilterTag, active_filter_tags};

/// 排序键
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Missing,
    Number(f64),
    Date(DateTime<Utc>),
    Text(String),
}

/// 可被引擎过滤的条目
///
/// 条目不具备的维度返回 `None`，此时对应条件一旦设置就不会匹配。
pub trait Filterable {
    /// 参与文本搜索的字段
    fn search_fields(&self) -> Vec<&str>;

    fn course_id(&self) -> Option<&str>;

    fn assessment_type(&self) -> Option<AssessmentType> {
        None
    }

    fn submission_status(&self) -> Option<SubmissionStatus> {
        None
    }

    fn results_status(&self) -> Option<ResultsStatus> {
        None
    }

    fn due_date(&self) -> Option<DateTime<Utc>> {
        None
    }

    fn submitted_at(&self) -> Option<DateTime<Utc>> {
        None
    }

    fn sort_key(&self, field: SortField) -> SortKey;
}

/// 过滤并排序，返回新的序列
pub fn apply<T: Filterable + Clone>(items: &[T], state: &FilterState) -> Vec<T> {
    let filter = CompiledFilter::new(state);
    let matched: Vec<T> = items
        .iter()
        .filter(|item| filter.matches(*item))
        .cloned()
        .collect();

    match state.sort_field {
        Some(field) => sort::sort_items(matched, field, state.sort_order),
        None => matched,
    }
}
