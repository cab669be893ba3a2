use std::sync::Arc;

use tracing::{info, warn};

use crate::backend::{Backend, MutationAction, MutationOutcome};
use crate::errors::{AmsError, Result};
use crate::models::assessments::entities::AssessmentItem;
use crate::services::notices::NoticeBoard;
use crate::utils::validate;

/// 本地校验，失败时不会发出远程调用
pub fn validate_action(action: &MutationAction) -> Result<()> {
    match action {
        MutationAction::CreateCourse { code, name, .. } => {
            validate::validate_course_code(code)?;
            validate::validate_required("Course name", name)
        }
        MutationAction::CreateAssessment {
            course_id,
            title,
            total_marks,
            ..
        } => {
            validate::validate_required("Course", course_id)?;
            validate::validate_required("Title", title)?;
            validate::validate_total_marks(*total_marks)
        }
        MutationAction::SubmitAssessment {
            assessment_id,
            content,
        } => {
            validate::validate_required("Assessment", assessment_id)?;
            validate::validate_required("Submission content", content)
        }
        MutationAction::GradeSubmission {
            submission_id,
            score,
            ..
        } => {
            validate::validate_required("Submission", submission_id)?;
            // 上界由 grade_submission 或后端按满分校验
            if !score.is_finite() || *score < 0.0 {
                return Err(AmsError::validation("Score must be a non-negative number"));
            }
            Ok(())
        }
        MutationAction::VerifyGrade { grade_id } => validate::validate_required("Grade", grade_id),
        MutationAction::ReleaseGrades { assessment_id } => {
            validate::validate_required("Assessment", assessment_id)
        }
        MutationAction::CreateUser {
            email,
            password,
            full_name,
            ..
        } => {
            validate::validate_email(email)?;
            validate::validate_password_simple(password)?;
            validate::validate_required("Full name", full_name)
        }
    }
}

/// 用户操作入口：每次操作最多一次远程调用，失败不重试
pub struct MutationService {
    backend: Arc<dyn Backend>,
    notices: NoticeBoard,
}

impl MutationService {
    pub fn new(backend: Arc<dyn Backend>, notices: NoticeBoard) -> Self {
        Self { backend, notices }
    }

    /// 校验错误直接返回给调用方显示在表单上；远程错误额外推送提示
    pub async fn execute(&self, action: MutationAction) -> Result<MutationOutcome> {
        validate_action(&action)?;

        let name = action.name();
        match self.backend.mutate(action).await {
            Ok(outcome) => {
                info!("{} succeeded: {}", name, outcome.record_id);
                self.notices.success(outcome.message.clone());
                Ok(outcome)
            }
            Err(e) => {
                warn!("{} failed: {}", name, e);
                self.notices
                    .error(format!("Could not {name}: {}", e.message()));
                Err(e)
            }
        }
    }

    /// 评分：先按考核的满分校验分数
    pub async fn grade_submission(
        &self,
        assessment: &AssessmentItem,
        submission_id: &str,
        score: f64,
        feedback: Option<String>,
    ) -> Result<MutationOutcome> {
        if let Some(total_marks) = assessment.total_marks {
            validate::validate_score(score, total_marks)?;
        }
        self.execute(MutationAction::GradeSubmission {
            submission_id: submission_id.to_string(),
            score,
            feedback,
        })
        .await
    }
}
