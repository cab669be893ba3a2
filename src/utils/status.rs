//! 状态推导工具
//!
//! 纯函数：相同输入总是得到相同分类。需要"当前时间"的函数显式接收 `now`。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{AmsError, Result};
use crate::models::assessments::entities::{ResultsStatus, SubmissionStatus};

const MS_PER_DAY: f64 = 86_400_000.0;

/// 截止日期紧迫程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Normal,
    DueSoon,
    Overdue,
}

/// 提交时效
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionTiming {
    OnTime,
    Late,
}

/// 已评分优先，其次已提交，否则未提交
pub fn classify_submission(
    submitted_at: Option<DateTime<Utc>>,
    graded_at: Option<DateTime<Utc>>,
) -> SubmissionStatus {
    if graded_at.is_some() {
        SubmissionStatus::Graded
    } else if submitted_at.is_some() {
        SubmissionStatus::Submitted
    } else {
        SubmissionStatus::NotSubmitted
    }
}

pub fn classify_results(graded_at: Option<DateTime<Utc>>, released: bool) -> ResultsStatus {
    match (graded_at, released) {
        (Some(_), true) => ResultsStatus::Available,
        (Some(_), false) => ResultsStatus::Pending,
        (None, _) => ResultsStatus::NotApplicable,
    }
}

/// 只有未提交且已过截止时间才算逾期
pub fn is_overdue(due_date: DateTime<Utc>, status: SubmissionStatus, now: DateTime<Utc>) -> bool {
    status == SubmissionStatus::NotSubmitted && now > due_date
}

/// 距截止的天数（向上取整）
pub fn days_until(due_date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let ms = (due_date - now).num_milliseconds() as f64;
    (ms / MS_PER_DAY).ceil() as i64
}

/// 0 天按逾期处理，1..=7 天为即将截止
pub fn urgency(due_date: DateTime<Utc>, now: DateTime<Utc>) -> Urgency {
    match days_until(due_date, now) {
        d if d <= 0 => Urgency::Overdue,
        d if d <= 7 => Urgency::DueSoon,
        _ => Urgency::Normal,
    }
}

/// 未取整的 `score / total_marks`，排序用；总分为 0 时返回 `Division` 错误
pub fn ratio(score: f64, total_marks: f64) -> Result<f64> {
    if total_marks == 0.0 {
        return Err(AmsError::division("total marks is zero"));
    }
    let value = score / total_marks;
    if !value.is_finite() {
        return Err(AmsError::division(format!(
            "cannot compute percentage of {score}/{total_marks}"
        )));
    }
    Ok(value)
}

/// `round(score / total_marks * 100)`，仅用于显示
pub fn percentage(score: f64, total_marks: f64) -> Result<u32> {
    let value = (ratio(score, total_marks)? * 100.0).round();
    Ok(value.max(0.0) as u32)
}

/// 提交相对截止时间的分钟数，负数表示提前
pub fn late_duration(submitted_at: DateTime<Utc>, due_date: DateTime<Utc>) -> i64 {
    (submitted_at - due_date).num_minutes()
}

pub fn submission_timing(submitted_at: DateTime<Utc>, due_date: DateTime<Utc>) -> SubmissionTiming {
    if submitted_at > due_date {
        SubmissionTiming::Late
    } else {
        SubmissionTiming::OnTime
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_classify_submission_precedence() {
        let t = Some(now());
        assert_eq!(classify_submission(None, None), SubmissionStatus::NotSubmitted);
        assert_eq!(classify_submission(t, None), SubmissionStatus::Submitted);
        assert_eq!(classify_submission(t, t), SubmissionStatus::Graded);
        // 有成绩但无提交记录（线下考试）仍为已评分
        assert_eq!(classify_submission(None, t), SubmissionStatus::Graded);
    }

    #[test]
    fn test_classify_results() {
        assert_eq!(classify_results(None, true), ResultsStatus::NotApplicable);
        assert_eq!(classify_results(Some(now()), false), ResultsStatus::Pending);
        assert_eq!(classify_results(Some(now()), true), ResultsStatus::Available);
    }

    #[test]
    fn test_overdue_only_when_not_submitted() {
        let due = now() - Duration::hours(1);
        assert!(is_overdue(due, SubmissionStatus::NotSubmitted, now()));
        assert!(!is_overdue(due, SubmissionStatus::Submitted, now()));
        assert!(!is_overdue(due, SubmissionStatus::Graded, now()));
        assert!(!is_overdue(now(), SubmissionStatus::NotSubmitted, now()));
    }

    #[test]
    fn test_urgency_boundaries() {
        assert_eq!(urgency(now(), now()), Urgency::Overdue);
        assert_eq!(urgency(now() - Duration::hours(3), now()), Urgency::Overdue);
        assert_eq!(urgency(now() + Duration::hours(1), now()), Urgency::DueSoon);
        assert_eq!(urgency(now() + Duration::days(7), now()), Urgency::DueSoon);
        assert_eq!(
            urgency(now() + Duration::days(7) + Duration::minutes(1), now()),
            Urgency::Normal
        );
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(45.0, 60.0), Ok(75));
        assert_eq!(percentage(1.0, 3.0), Ok(33));
        assert_eq!(percentage(2.0, 3.0), Ok(67));
        let err = percentage(10.0, 0.0).unwrap_err();
        assert_eq!(err.code(), "E003");
    }

    #[test]
    fn test_ratio_is_not_rounded() {
        assert_eq!(ratio(75.4, 100.0), Ok(0.754));
        assert!(ratio(74.6, 100.0).unwrap() < ratio(75.4, 100.0).unwrap());
        assert_eq!(ratio(1.0, 0.0).unwrap_err().code(), "E003");
    }

    #[test]
    fn test_percentage_scaling_symmetry() {
        for (s, t) in [(45.0, 60.0), (1.0, 3.0), (17.5, 40.0), (99.0, 101.0), (0.0, 5.0)] {
            assert_eq!(percentage(s, t), percentage(s * 2.0, t * 2.0));
        }
    }

    #[test]
    fn test_late_duration_and_timing() {
        let due = now();
        assert_eq!(late_duration(due + Duration::minutes(125), due), 125);
        assert_eq!(late_duration(due - Duration::minutes(30), due), -30);
        assert_eq!(submission_timing(due, due), SubmissionTiming::OnTime);
        assert_eq!(
            submission_timing(due + Duration::seconds(1), due),
            SubmissionTiming::Late
        );
    }
}
