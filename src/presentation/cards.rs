use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::badges::{self, StatusBadge};
use crate::models::assessments::entities::{AssessmentItem, ResultsStatus};
use crate::models::courses::entities::CourseItem;
use crate::utils::status;

/// 没有可显示数值时的占位符
pub const NO_VALUE: &str = "—";

/// 百分比文本，缺少分数或总分为 0 时显示占位符
pub fn percentage_label(score: Option<f64>, total_marks: Option<f64>) -> String {
    match (score, total_marks) {
        (Some(score), Some(total)) => status::percentage(score, total)
            .map(|p| format!("{p}%"))
            .unwrap_or_else(|_| NO_VALUE.to_string()),
        _ => NO_VALUE.to_string(),
    }
}

/// 分钟数转为 "1d 2h 5m"
pub fn format_minutes(minutes: i64) -> String {
    let minutes = minutes.abs();
    let (days, hours, mins) = (minutes / 1440, (minutes % 1440) / 60, minutes % 60);
    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if mins > 0 || parts.is_empty() {
        parts.push(format!("{mins}m"));
    }
    parts.join(" ")
}

/// 迟交时返回 "Submitted 1d 2h late"
pub fn late_label(submitted_at: DateTime<Utc>, due_date: DateTime<Utc>) -> Option<String> {
    let minutes = status::late_duration(submitted_at, due_date);
    (submitted_at > due_date).then(|| format!("Submitted {} late", format_minutes(minutes)))
}

/// 按日历日描述截止时间
pub fn due_label(due_date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let date = due_date.format("%Y-%m-%d");
    match (due_date.date_naive() - now.date_naive()).num_days() {
        0 => format!("Due {date} (today)"),
        1 => format!("Due {date} (tomorrow)"),
        d if d > 1 => format!("Due {date} (in {d} days)"),
        -1 => format!("Due {date} (1 day ago)"),
        d => format!("Due {date} ({} days ago)", -d),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentCard {
    pub id: String,
    pub title: String,
    pub course_code: String,
    pub type_label: &'static str,
    pub due_label: String,
    pub urgency: Option<StatusBadge>,
    pub status: StatusBadge,
    pub results: StatusBadge,
    pub timing: Option<StatusBadge>,
    pub grade: String,
    pub late_label: Option<String>,
    /// 教师视角的批改进度，如 "3/5 graded"
    pub marking: Option<String>,
}

pub fn assessment_card(item: &AssessmentItem, now: DateTime<Utc>) -> AssessmentCard {
    let grade = match item.results_status {
        ResultsStatus::Available => percentage_label(item.score, item.total_marks),
        _ => NO_VALUE.to_string(),
    };
    let marking = (item.submission_count > 0)
        .then(|| format!("{}/{} graded", item.graded_count, item.submission_count));

    AssessmentCard {
        id: item.id.clone(),
        title: item.title.clone(),
        course_code: item.course_code.clone(),
        type_label: item.assessment_type.label(),
        due_label: due_label(item.due_date, now),
        urgency: badges::urgency_badge(item.due_date, item.submission_status, now),
        status: badges::submission_badge(item.submission_status),
        results: badges::results_badge(item.results_status),
        timing: item
            .submitted_at
            .map(|at| badges::timing_badge(at, item.due_date)),
        grade,
        late_label: item
            .submitted_at
            .and_then(|at| late_label(at, item.due_date)),
        marking,
    }
}

impl fmt::Display for AssessmentCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({}) | {} | {} | {} | grade {}",
            self.course_code,
            self.title,
            self.type_label,
            self.due_label,
            self.status.label,
            self.results.label,
            self.grade
        )?;
        if let Some(urgency) = &self.urgency {
            write!(f, " | {}", urgency.label)?;
        }
        if let Some(marking) = &self.marking {
            write!(f, " | {marking}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseCard {
    pub id: String,
    pub code: String,
    pub name: String,
    pub instructor: String,
    pub assessments_label: String,
    pub progress: Option<u32>,
    pub progress_label: String,
}

pub fn course_card(item: &CourseItem) -> CourseCard {
    let assessments_label = match item.assessment_count {
        1 => "1 assessment".to_string(),
        n => format!("{n} assessments"),
    };
    CourseCard {
        id: item.id.clone(),
        code: item.code.clone(),
        name: item.name.clone(),
        instructor: item
            .instructor_name
            .clone()
            .unwrap_or_else(|| "Unassigned".to_string()),
        assessments_label,
        progress: item.progress,
        progress_label: item
            .progress
            .map_or_else(|| NO_VALUE.to_string(), |p| format!("{p}%")),
    }
}

impl fmt::Display for CourseCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} | {} | {} | progress {}",
            self.code, self.name, self.instructor, self.assessments_label, self.progress_label
        )
    }
}
