use chrono::{DateTime, NaiveDate, Utc};

use super::Filterable;
use crate::models::filters::FilterState;

/// 预处理后的过滤条件，避免对每个条目重复规范化搜索词
#[derive(Debug, Clone)]
pub struct CompiledFilter<'a> {
    state: &'a FilterState,
    search: Option<String>,
}

impl<'a> CompiledFilter<'a> {
    pub fn new(state: &'a FilterState) -> Self {
        Self {
            state,
            search: state.normalized_search(),
        }
    }

    /// 所有已设置的条件都满足才匹配
    pub fn matches<T: Filterable + ?Sized>(&self, item: &T) -> bool {
        self.matches_search(item)
            && self.matches_course(item)
            && self.matches_enums(item)
            && in_date_range(
                item.due_date(),
                self.state.due_date_start,
                self.state.due_date_end,
            )
            && in_date_range(
                item.submitted_at(),
                self.state.submission_date_start,
                self.state.submission_date_end,
            )
    }

    fn matches_search<T: Filterable + ?Sized>(&self, item: &T) -> bool {
        let Some(needle) = &self.search else {
            return true;
        };
        item.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle.as_str()))
    }

    fn matches_course<T: Filterable + ?Sized>(&self, item: &T) -> bool {
        match &self.state.course_id {
            Some(course_id) => item.course_id() == Some(course_id.as_str()),
            None => true,
        }
    }

    fn matches_enums<T: Filterable + ?Sized>(&self, item: &T) -> bool {
        let state = self.state;
        state
            .assessment_type
            .is_none_or(|t| item.assessment_type() == Some(t))
            && state
                .submission_status
                .is_none_or(|s| item.submission_status() == Some(s))
            && state
                .results_status
                .is_none_or(|s| item.results_status() == Some(s))
    }
}

/// 闭区间，按 UTC 日历日比较；任一端缺省即为半开区间
pub fn in_date_range(
    value: Option<DateTime<Utc>>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> bool {
    if start.is_none() && end.is_none() {
        return true;
    }
    let Some(value) = value else {
        return false;
    };
    let date = value.date_naive();
    start.is_none_or(|s| date >= s) && end.is_none_or(|e| date <= e)
}
