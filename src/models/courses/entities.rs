use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 后端返回的课程行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRow {
    pub id: String,
    // 课程代码，如 CS101
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub instructor_id: Option<String>,
    #[serde(default)]
    pub instructor_name: Option<String>,
    // 课程下考核数量
    #[serde(default)]
    pub assessment_count: u32,
    // 已完成的考核数（学生：已提交；教师：已全部批改）
    #[serde(default)]
    pub completed_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 列表引擎消费的课程只读投影
#[derive(Debug, Clone, PartialEq)]
pub struct CourseItem {
    pub id: String,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub instructor_name: Option<String>,
    pub assessment_count: u32,
    pub completed_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    // 完成进度百分比，没有考核时为 None
    pub progress: Option<u32>,
}

impl CourseItem {
    /// 未取整的完成比例
    pub fn progress_ratio(&self) -> Option<f64> {
        crate::utils::status::ratio(
            f64::from(self.completed_count),
            f64::from(self.assessment_count),
        )
        .ok()
    }
}

impl From<CourseRow> for CourseItem {
    fn from(row: CourseRow) -> Self {
        let progress = crate::utils::status::percentage(
            f64::from(row.completed_count),
            f64::from(row.assessment_count),
        )
        .ok();
        Self {
            id: row.id,
            code: row.code,
            name: row.name,
            description: row.description,
            instructor_name: row.instructor_name,
            assessment_count: row.assessment_count,
            completed_count: row.completed_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
            progress,
        }
    }
}
