use chrono::{DateTime, Utc};

use crate::models::assessments::entities::AssessmentType;
use crate::models::users::entities::Profile;

// 所有记录带有插入序号，表扫描按序号输出，保证顺序稳定

#[derive(Debug, Clone)]
pub struct ProfileRecord {
    pub seq: u64,
    pub profile: Profile,
}

#[derive(Debug, Clone)]
pub struct CourseRecord {
    pub seq: u64,
    pub id: String,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub instructor_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct EnrollmentRecord {
    pub course_id: String,
    pub student_id: String,
    pub enrolled_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct AssessmentRecord {
    pub seq: u64,
    pub id: String,
    pub course_id: String,
    pub title: String,
    pub assessment_type: AssessmentType,
    pub total_marks: f64,
    pub due_date: DateTime<Utc>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SubmissionRecord {
    pub seq: u64,
    pub id: String,
    pub assessment_id: String,
    pub student_id: String,
    pub content: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct GradeRecord {
    pub seq: u64,
    pub id: String,
    pub submission_id: String,
    pub score: f64,
    pub feedback: Option<String>,
    pub graded_by: String,
    pub graded_at: DateTime<Utc>,
    pub verified: bool, // 已审核
    pub released: bool, // 已对学生发布
}
