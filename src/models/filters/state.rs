//! 列表过滤状态
//!
//! `FilterState` 是不可变值对象：所有修改都返回新值。
//! 某个维度为 `None`（或搜索词为空）表示"不约束"，绝不表示"全部不匹配"。
//! 排序字段与排序方向永远不计入"已启用的过滤条件"。

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ListKind, SortField, SortOrder};
use crate::models::assessments::entities::{AssessmentType, ResultsStatus, SubmissionStatus};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterState {
    pub search_query: String,
    pub course_id: Option<String>,
    pub assessment_type: Option<AssessmentType>,
    pub submission_status: Option<SubmissionStatus>,
    pub results_status: Option<ResultsStatus>,
    pub due_date_start: Option<NaiveDate>,
    pub due_date_end: Option<NaiveDate>,
    pub submission_date_start: Option<NaiveDate>,
    pub submission_date_end: Option<NaiveDate>,
    // None 表示保持输入顺序
    pub sort_field: Option<SortField>,
    pub sort_order: SortOrder,
}

/// 单个维度的修改
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterUpdate {
    Search(String),
    Course(Option<String>),
    AssessmentType(Option<AssessmentType>),
    SubmissionStatus(Option<SubmissionStatus>),
    ResultsStatus(Option<ResultsStatus>),
    DueDateStart(Option<NaiveDate>),
    DueDateEnd(Option<NaiveDate>),
    SubmissionDateStart(Option<NaiveDate>),
    SubmissionDateEnd(Option<NaiveDate>),
    SortField(Option<SortField>),
    SortOrder(SortOrder),
    ToggleSortOrder,
}

impl FilterUpdate {
    /// 是否只影响排序
    pub fn is_sort_only(&self) -> bool {
        matches!(
            self,
            FilterUpdate::SortField(_) | FilterUpdate::SortOrder(_) | FilterUpdate::ToggleSortOrder
        )
    }
}

/// 可清除的过滤维度
///
/// 日期区间既可以整体清除（移除标签的默认行为），也可以单独清除某一端。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKey {
    Search,
    Course,
    AssessmentType,
    SubmissionStatus,
    ResultsStatus,
    DueDateRange,
    DueDateStart,
    DueDateEnd,
    SubmissionDateRange,
    SubmissionDateStart,
    SubmissionDateEnd,
}

impl FilterState {
    /// 无任何约束、无排序
    pub fn unconstrained() -> Self {
        Self::default()
    }

    /// 指定视图的默认状态
    pub fn for_view(kind: ListKind) -> Self {
        let (field, order) = kind.default_sort();
        Self {
            sort_field: Some(field),
            sort_order: order,
            ..Self::default()
        }
    }

    pub fn update(&self, update: FilterUpdate) -> Self {
        let mut next = self.clone();
        match update {
            FilterUpdate::Search(query) => next.search_query = query,
            FilterUpdate::Course(id) => next.course_id = id,
            FilterUpdate::AssessmentType(t) => next.assessment_type = t,
            FilterUpdate::SubmissionStatus(s) => next.submission_status = s,
            FilterUpdate::ResultsStatus(s) => next.results_status = s,
            FilterUpdate::DueDateStart(d) => next.due_date_start = d,
            FilterUpdate::DueDateEnd(d) => next.due_date_end = d,
            FilterUpdate::SubmissionDateStart(d) => next.submission_date_start = d,
            FilterUpdate::SubmissionDateEnd(d) => next.submission_date_end = d,
            FilterUpdate::SortField(field) => next.sort_field = field,
            FilterUpdate::SortOrder(order) => next.sort_order = order,
            FilterUpdate::ToggleSortOrder => next.sort_order = next.sort_order.toggled(),
        }
        next
    }

    pub fn clear(&self, key: FilterKey) -> Self {
        let mut next = self.clone();
        match key {
            FilterKey::Search => next.search_query.clear(),
            FilterKey::Course => next.course_id = None,
            FilterKey::AssessmentType => next.assessment_type = None,
            FilterKey::SubmissionStatus => next.submission_status = None,
            FilterKey::ResultsStatus => next.results_status = None,
            FilterKey::DueDateRange => {
                next.due_date_start = None;
                next.due_date_end = None;
            }
            FilterKey::DueDateStart => next.due_date_start = None,
            FilterKey::DueDateEnd => next.due_date_end = None,
            FilterKey::SubmissionDateRange => {
                next.submission_date_start = None;
                next.submission_date_end = None;
            }
            FilterKey::SubmissionDateStart => next.submission_date_start = None,
            FilterKey::SubmissionDateEnd => next.submission_date_end = None,
        }
        next
    }

    /// 清除全部过滤条件，保留排序
    pub fn clear_all(&self) -> Self {
        Self {
            sort_field: self.sort_field,
            sort_order: self.sort_order,
            ..Self::default()
        }
    }

    /// 规范化后的搜索词（去空白、小写），空串视为无约束
    pub fn normalized_search(&self) -> Option<String> {
        let trimmed = self.search_query.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        }
    }

    /// 已启用的维度，日期区间各算一个
    pub fn active_keys(&self) -> Vec<FilterKey> {
        let mut keys = Vec::new();
        if self.normalized_search().is_some() {
            keys.push(FilterKey::Search);
        }
        if self.course_id.is_some() {
            keys.push(FilterKey::Course);
        }
        if self.assessment_type.is_some() {
            keys.push(FilterKey::AssessmentType);
        }
        if self.submission_status.is_some() {
            keys.push(FilterKey::SubmissionStatus);
        }
        if self.results_status.is_some() {
            keys.push(FilterKey::ResultsStatus);
        }
        if self.due_date_start.is_some() || self.due_date_end.is_some() {
            keys.push(FilterKey::DueDateRange);
        }
        if self.submission_date_start.is_some() || self.submission_date_end.is_some() {
            keys.push(FilterKey::SubmissionDateRange);
        }
        keys
    }

    pub fn has_active_filters(&self) -> bool {
        self.active_filter_count() > 0
    }

    pub fn active_filter_count(&self) -> usize {
        self.active_keys().len()
    }

    /// 两个状态是否筛选出同样的集合（忽略排序）
    pub fn predicate_eq(&self, other: &FilterState) -> bool {
        self.normalized_search() == other.normalized_search()
            && self.course_id == other.course_id
            && self.assessment_type == other.assessment_type
            && self.submission_status == other.submission_status
            && self.results_status == other.results_status
            && self.due_date_start == other.due_date_start
            && self.due_date_end == other.due_date_end
            && self.submission_date_start == other.submission_date_start
            && self.submission_date_end == other.submission_date_end
    }
}

/// 视图的默认过滤状态
pub fn default_filter_state(kind: ListKind) -> FilterState {
    FilterState::for_view(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn test_default_state_is_unconstrained() {
        let state = default_filter_state(ListKind::Assessments);
        assert!(!state.has_active_filters());
        assert_eq!(state.sort_field, Some(SortField::Newest));
        assert_eq!(state.sort_order, SortOrder::Desc);

        let courses = default_filter_state(ListKind::Courses);
        assert_eq!(courses.sort_field, Some(SortField::Updated));
    }

    #[test]
    fn test_update_returns_new_state() {
        let state = FilterState::for_view(ListKind::Assessments);
        let next = state.update(FilterUpdate::Search("quiz".into()));
        assert_eq!(state.search_query, "");
        assert_eq!(next.search_query, "quiz");
        assert_eq!(next.active_filter_count(), 1);
    }

    #[test]
    fn test_whitespace_search_is_not_active() {
        let state = FilterState::unconstrained().update(FilterUpdate::Search("   ".into()));
        assert!(!state.has_active_filters());
        assert_eq!(state.normalized_search(), None);
    }

    #[test]
    fn test_sort_never_counts_as_filter() {
        let state = FilterState::for_view(ListKind::Assessments)
            .update(FilterUpdate::SortField(Some(SortField::Title)))
            .update(FilterUpdate::ToggleSortOrder);
        assert_eq!(state.active_filter_count(), 0);
        assert_eq!(state.sort_order, SortOrder::Asc);
    }

    #[test]
    fn test_date_range_counts_once_and_clears_atomically() {
        let state = FilterState::unconstrained()
            .update(FilterUpdate::DueDateStart(Some(day(1))))
            .update(FilterUpdate::DueDateEnd(Some(day(8))));
        assert_eq!(state.active_filter_count(), 1);

        let cleared = state.clear(FilterKey::DueDateRange);
        assert_eq!(cleared.due_date_start, None);
        assert_eq!(cleared.due_date_end, None);
        assert!(!cleared.has_active_filters());
    }

    #[test]
    fn test_partial_range_clear_only_when_requested() {
        let state = FilterState::unconstrained()
            .update(FilterUpdate::SubmissionDateStart(Some(day(1))))
            .update(FilterUpdate::SubmissionDateEnd(Some(day(8))));
        let partial = state.clear(FilterKey::SubmissionDateStart);
        assert_eq!(partial.submission_date_start, None);
        assert_eq!(partial.submission_date_end, Some(day(8)));
        assert_eq!(partial.active_filter_count(), 1);
    }

    #[test]
    fn test_counts_every_dimension() {
        let state = FilterState::unconstrained()
            .update(FilterUpdate::Search("lab".into()))
            .update(FilterUpdate::Course(Some("c1".into())))
            .update(FilterUpdate::AssessmentType(Some(AssessmentType::Practical)))
            .update(FilterUpdate::SubmissionStatus(Some(SubmissionStatus::Graded)))
            .update(FilterUpdate::ResultsStatus(Some(ResultsStatus::Available)))
            .update(FilterUpdate::DueDateEnd(Some(day(2))))
            .update(FilterUpdate::SubmissionDateStart(Some(day(1))));
        assert_eq!(state.active_filter_count(), 7);
        assert_eq!(state.clear_all().active_filter_count(), 0);
    }

    #[test]
    fn test_predicate_eq_ignores_sort_and_search_case() {
        let a = FilterState::unconstrained().update(FilterUpdate::Search("Quiz ".into()));
        let b = a
            .update(FilterUpdate::Search("quiz".into()))
            .update(FilterUpdate::SortField(Some(SortField::Date)));
        assert!(a.predicate_eq(&b));
        let c = b.update(FilterUpdate::Course(Some("c2".into())));
        assert!(!a.predicate_eq(&c));
    }
}
