use chrono::NaiveDate;
use serde::Serialize;

use crate::models::filters::{FilterKey, FilterState};

/// 已启用过滤条件的标签，移除标签即 `state.clear(key)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterTag {
    pub key: FilterKey,
    pub label: String,
}

fn range_label(prefix: &str, start: Option<NaiveDate>, end: Option<NaiveDate>) -> String {
    match (start, end) {
        (Some(s), Some(e)) => format!("{prefix}: {s} to {e}"),
        (Some(s), None) => format!("{prefix}: from {s}"),
        (None, Some(e)) => format!("{prefix}: until {e}"),
        (None, None) => prefix.to_string(),
    }
}

pub fn active_filter_tags(state: &FilterState) -> Vec<FilterTag> {
    state
        .active_keys()
        .into_iter()
        .map(|key| {
            let label = match key {
                FilterKey::Search => format!("Search: \"{}\"", state.search_query.trim()),
                FilterKey::Course => {
                    format!("Course: {}", state.course_id.as_deref().unwrap_or_default())
                }
                FilterKey::AssessmentType => format!(
                    "Type: {}",
                    state.assessment_type.map(|t| t.label()).unwrap_or_default()
                ),
                FilterKey::SubmissionStatus => format!(
                    "Status: {}",
                    state.submission_status.map(|s| s.label()).unwrap_or_default()
                ),
                FilterKey::ResultsStatus => format!(
                    "Results: {}",
                    state.results_status.map(|s| s.label()).unwrap_or_default()
                ),
                FilterKey::DueDateRange | FilterKey::DueDateStart | FilterKey::DueDateEnd => {
                    range_label("Due", state.due_date_start, state.due_date_end)
                }
                FilterKey::SubmissionDateRange
                | FilterKey::SubmissionDateStart
                | FilterKey::SubmissionDateEnd => range_label(
                    "Submitted",
                    state.submission_date_start,
                    state.submission_date_end,
                ),
            };
            FilterTag { key, label }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures::day;
    use crate::models::assessments::entities::AssessmentType;
    use crate::models::filters::FilterUpdate;

    #[test]
    fn test_no_tags_for_default_state() {
        assert!(active_filter_tags(&FilterState::unconstrained()).is_empty());
    }

    #[test]
    fn test_tags_follow_active_dimensions() {
        let state = FilterState::unconstrained()
            .update(FilterUpdate::Search("quiz".into()))
            .update(FilterUpdate::AssessmentType(Some(AssessmentType::Examination)))
            .update(FilterUpdate::DueDateStart(Some(day(0))));
        let tags = active_filter_tags(&state);
        let labels: Vec<_> = tags.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Search: \"quiz\"", "Type: Examination", "Due: from 2026-03-01"]
        );
        assert_eq!(tags.len(), state.active_filter_count());
    }

    #[test]
    fn test_removing_range_tag_clears_both_ends() {
        let state = FilterState::unconstrained()
            .update(FilterUpdate::DueDateStart(Some(day(0))))
            .update(FilterUpdate::DueDateEnd(Some(day(7))));
        let tag = active_filter_tags(&state).remove(0);
        assert_eq!(tag.label, "Due: 2026-03-01 to 2026-03-08");
        let cleared = state.clear(tag.key);
        assert!(!cleared.has_active_filters());
    }
}
