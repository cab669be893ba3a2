use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::assessments::entities::{ResultsStatus, SubmissionStatus};
use crate::utils::status::{self, SubmissionTiming, Urgency};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTone {
    Neutral,
    Info,
    Success,
    Warning,
    Danger,
}

/// 状态徽章
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub label: String,
    pub tone: BadgeTone,
}

impl StatusBadge {
    pub fn new(label: impl Into<String>, tone: BadgeTone) -> Self {
        Self {
            label: label.into(),
            tone,
        }
    }
}

pub fn submission_badge(status: SubmissionStatus) -> StatusBadge {
    let tone = match status {
        SubmissionStatus::NotSubmitted => BadgeTone::Neutral,
        SubmissionStatus::Submitted => BadgeTone::Info,
        SubmissionStatus::Graded => BadgeTone::Success,
    };
    StatusBadge::new(status.label(), tone)
}

pub fn results_badge(status: ResultsStatus) -> StatusBadge {
    let tone = match status {
        ResultsStatus::Available => BadgeTone::Success,
        ResultsStatus::Pending => BadgeTone::Warning,
        ResultsStatus::NotApplicable => BadgeTone::Neutral,
    };
    StatusBadge::new(status.label(), tone)
}

/// 只有未提交的考核才显示截止提醒
pub fn urgency_badge(
    due_date: DateTime<Utc>,
    submission: SubmissionStatus,
    now: DateTime<Utc>,
) -> Option<StatusBadge> {
    if submission != SubmissionStatus::NotSubmitted {
        return None;
    }
    match status::urgency(due_date, now) {
        Urgency::Overdue => Some(StatusBadge::new("Overdue", BadgeTone::Danger)),
        Urgency::DueSoon => {
            let days = status::days_until(due_date, now);
            let label = if days == 1 {
                "Due in 1 day".to_string()
            } else {
                format!("Due in {days} days")
            };
            Some(StatusBadge::new(label, BadgeTone::Warning))
        }
        Urgency::Normal => None,
    }
}

pub fn timing_badge(submitted_at: DateTime<Utc>, due_date: DateTime<Utc>) -> StatusBadge {
    match status::submission_timing(submitted_at, due_date) {
        SubmissionTiming::OnTime => StatusBadge::new("On time", BadgeTone::Success),
        SubmissionTiming::Late => StatusBadge::new("Late", BadgeTone::Danger),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_urgency_badges() {
        let soon = urgency_badge(now() + Duration::days(2), SubmissionStatus::NotSubmitted, now());
        assert_eq!(soon, Some(StatusBadge::new("Due in 2 days", BadgeTone::Warning)));

        let late = urgency_badge(now() - Duration::hours(1), SubmissionStatus::NotSubmitted, now());
        assert_eq!(late.unwrap().tone, BadgeTone::Danger);

        assert!(urgency_badge(now() + Duration::days(30), SubmissionStatus::NotSubmitted, now()).is_none());
        // 已提交后不再提醒
        assert!(urgency_badge(now() - Duration::days(1), SubmissionStatus::Submitted, now()).is_none());
    }

    #[test]
    fn test_status_badge_tones() {
        assert_eq!(results_badge(ResultsStatus::Pending).tone, BadgeTone::Warning);
        assert_eq!(submission_badge(SubmissionStatus::Graded).label, "Graded");
        assert_eq!(timing_badge(now() + Duration::minutes(1), now()).label, "Late");
        assert_eq!(timing_badge(now(), now()).label, "On time");
    }
}
