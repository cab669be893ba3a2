use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::status::{classify_results, classify_submission};

// 考核类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentType {
    Assignment,
    Quiz,
    Examination,
    Project,
    Practical,
    Other,
}

impl AssessmentType {
    pub fn label(&self) -> &'static str {
        match self {
            AssessmentType::Assignment => "Assignment",
            AssessmentType::Quiz => "Quiz",
            AssessmentType::Examination => "Examination",
            AssessmentType::Project => "Project",
            AssessmentType::Practical => "Practical",
            AssessmentType::Other => "Other",
        }
    }
}

// 提交状态（由时间戳推导）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    NotSubmitted,
    Submitted,
    Graded,
}

impl SubmissionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SubmissionStatus::NotSubmitted => "Not submitted",
            SubmissionStatus::Submitted => "Submitted",
            SubmissionStatus::Graded => "Graded",
        }
    }

    /// 排序用的序号
    pub fn rank(&self) -> u8 {
        match self {
            SubmissionStatus::NotSubmitted => 0,
            SubmissionStatus::Submitted => 1,
            SubmissionStatus::Graded => 2,
        }
    }
}

// 成绩发布状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultsStatus {
    Available,     // 已审核并发布
    Pending,       // 已评分未发布
    NotApplicable, // 尚无成绩
}

impl ResultsStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ResultsStatus::Available => "Results available",
            ResultsStatus::Pending => "Results pending",
            ResultsStatus::NotApplicable => "No results",
        }
    }
}

/// 后端返回的考核行（已按当前会话的身份连接了提交与成绩）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRow {
    pub id: String,
    pub title: String,
    pub course_id: String,
    pub course_code: String,
    pub course_title: String,
    pub assessment_type: AssessmentType,
    pub total_marks: Option<f64>,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub graded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub grade_released: bool,
    // 教师视角的统计
    #[serde(default)]
    pub submission_count: u32,
    #[serde(default)]
    pub graded_count: u32,
}

/// 列表引擎消费的考核只读投影
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentItem {
    pub id: String,
    pub title: String,
    pub course_id: String,
    pub course_code: String,
    pub course_title: String,
    pub assessment_type: AssessmentType,
    pub total_marks: Option<f64>,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub graded_at: Option<DateTime<Utc>>,
    pub score: Option<f64>,
    pub grade_released: bool,
    pub submission_count: u32,
    pub graded_count: u32,
    pub submission_status: SubmissionStatus,
    pub results_status: ResultsStatus,
}

impl From<AssessmentRow> for AssessmentItem {
    fn from(row: AssessmentRow) -> Self {
        let submission_status = classify_submission(row.submitted_at, row.graded_at);
        let results_status = classify_results(row.graded_at, row.grade_released);
        Self {
            id: row.id,
            title: row.title,
            course_id: row.course_id,
            course_code: row.course_code,
            course_title: row.course_title,
            assessment_type: row.assessment_type,
            total_marks: row.total_marks,
            due_date: row.due_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
            submitted_at: row.submitted_at,
            graded_at: row.graded_at,
            score: row.score,
            grade_released: row.grade_released,
            submission_count: row.submission_count,
            graded_count: row.graded_count,
            submission_status,
            results_status,
        }
    }
}

impl AssessmentItem {
    /// 得分百分比，没有可用分数时为 None
    pub fn grade_percentage(&self) -> Option<u32> {
        let score = self.score?;
        let total = self.total_marks?;
        crate::utils::status::percentage(score, total).ok()
    }

    /// 未取整的得分比例
    pub fn grade_ratio(&self) -> Option<f64> {
        let score = self.score?;
        let total = self.total_marks?;
        crate::utils::status::ratio(score, total).ok()
    }

    /// 已批改 / 已提交，没有提交时为 None
    pub fn marking_ratio(&self) -> Option<f64> {
        crate::utils::status::ratio(
            f64::from(self.graded_count),
            f64::from(self.submission_count),
        )
        .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row() -> AssessmentRow {
        let t = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        AssessmentRow {
            id: "a1".into(),
            title: "Weekly Quiz 1".into(),
            course_id: "c1".into(),
            course_code: "CS101".into(),
            course_title: "Intro to Computing".into(),
            assessment_type: AssessmentType::Quiz,
            total_marks: Some(60.0),
            due_date: t,
            created_at: t,
            updated_at: t,
            submitted_at: None,
            graded_at: None,
            score: None,
            grade_released: false,
            submission_count: 0,
            graded_count: 0,
        }
    }

    #[test]
    fn test_item_derives_statuses() {
        let item = AssessmentItem::from(row());
        assert_eq!(item.submission_status, SubmissionStatus::NotSubmitted);
        assert_eq!(item.results_status, ResultsStatus::NotApplicable);

        let mut graded = row();
        graded.submitted_at = Some(graded.due_date);
        graded.graded_at = Some(graded.due_date);
        graded.score = Some(45.0);
        let item = AssessmentItem::from(graded);
        assert_eq!(item.submission_status, SubmissionStatus::Graded);
        assert_eq!(item.results_status, ResultsStatus::Pending);
        assert_eq!(item.grade_percentage(), Some(75));
    }

    #[test]
    fn test_row_accepts_missing_optional_fields() {
        let json = serde_json::json!({
            "id": "a9",
            "title": "Lab",
            "course_id": "c1",
            "course_code": "CS101",
            "course_title": "Intro",
            "assessment_type": "practical",
            "total_marks": null,
            "due_date": "2026-03-01T09:00:00Z",
            "created_at": "2026-02-01T09:00:00Z",
            "updated_at": "2026-02-01T09:00:00Z"
        });
        let row: AssessmentRow = serde_json::from_value(json).unwrap();
        assert_eq!(row.assessment_type, AssessmentType::Practical);
        assert!(row.submitted_at.is_none());
        assert!(!row.grade_released);
    }

    #[test]
    fn test_zero_total_marks_has_no_percentage() {
        let mut r = row();
        r.score = Some(10.0);
        r.total_marks = Some(0.0);
        assert_eq!(AssessmentItem::from(r).grade_percentage(), None);
    }
}
