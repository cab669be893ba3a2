use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ChangeKind;
use crate::models::assessments::entities::AssessmentType;
use crate::models::users::entities::UserRole;

/// 用户发起的变更操作，每个操作对应一次远程调用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MutationAction {
    CreateCourse {
        code: String,
        name: String,
        description: Option<String>,
        instructor_id: Option<String>,
    },
    CreateAssessment {
        course_id: String,
        title: String,
        assessment_type: AssessmentType,
        total_marks: f64,
        due_date: DateTime<Utc>,
    },
    SubmitAssessment {
        assessment_id: String,
        content: String,
    },
    GradeSubmission {
        submission_id: String,
        score: f64,
        feedback: Option<String>,
    },
    VerifyGrade {
        grade_id: String,
    },
    ReleaseGrades {
        assessment_id: String,
    },
    CreateUser {
        email: String,
        #[serde(skip_serializing)]
        password: String,
        full_name: String,
        role: UserRole,
    },
}

impl MutationAction {
    pub fn name(&self) -> &'static str {
        match self {
            MutationAction::CreateCourse { .. } => "create course",
            MutationAction::CreateAssessment { .. } => "create assessment",
            MutationAction::SubmitAssessment { .. } => "submit assessment",
            MutationAction::GradeSubmission { .. } => "grade submission",
            MutationAction::VerifyGrade { .. } => "verify grade",
            MutationAction::ReleaseGrades { .. } => "release grades",
            MutationAction::CreateUser { .. } => "create user",
        }
    }

    /// 操作成功后推送的变更类型
    pub fn change_kind(&self) -> ChangeKind {
        match self {
            MutationAction::CreateCourse { .. } => ChangeKind::CourseChanged,
            MutationAction::CreateAssessment { .. } => ChangeKind::AssessmentChanged,
            MutationAction::SubmitAssessment { .. } => ChangeKind::SubmissionChanged,
            MutationAction::GradeSubmission { .. }
            | MutationAction::VerifyGrade { .. }
            | MutationAction::ReleaseGrades { .. } => ChangeKind::GradeChanged,
            MutationAction::CreateUser { .. } => ChangeKind::UserChanged,
        }
    }
}

/// 变更结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationOutcome {
    pub record_id: String,
    pub kind: ChangeKind,
    pub message: String,
}
