use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::MemoryStore;
use super::records::{AssessmentRecord, CourseRecord, GradeRecord, SubmissionRecord};
use crate::backend::{MutationAction, MutationOutcome};
use crate::errors::{AmsError, Result};
use crate::models::users::entities::{Profile, UserRole, Viewer};
use crate::utils::validate;

fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

fn permission_denied(viewer: &Viewer, action: &MutationAction) -> AmsError {
    AmsError::remote(format!(
        "permission denied: {} cannot {}",
        viewer.role,
        action.name()
    ))
}

impl MemoryStore {
    /// 课程的授课教师，管理员视为拥有所有课程
    fn owns_course(&self, viewer: &Viewer, course_id: &str) -> Result<bool> {
        let course = self
            .inner
            .courses
            .get(course_id)
            .ok_or_else(|| AmsError::not_found(format!("course {course_id} not found")))?;
        Ok(viewer.role == UserRole::Admin
            || course.instructor_id.as_deref() == Some(viewer.user_id.as_str()))
    }

    fn course_of_assessment(&self, assessment_id: &str) -> Result<AssessmentRecord> {
        self.inner
            .assessments
            .get(assessment_id)
            .map(|a| a.value().clone())
            .ok_or_else(|| AmsError::not_found(format!("assessment {assessment_id} not found")))
    }

    /// 执行一次变更，成功时返回受影响的记录
    pub(super) fn apply_mutation(
        &self,
        viewer: &Viewer,
        action: MutationAction,
    ) -> Result<MutationOutcome> {
        let kind = action.change_kind();
        let now = Utc::now();

        let (record_id, message) = match &action {
            MutationAction::CreateCourse {
                code,
                name,
                description,
                instructor_id,
            } => {
                if !viewer.role.can_grade() {
                    return Err(permission_denied(viewer, &action));
                }
                validate::validate_course_code(code)?;
                validate::validate_required("Course name", name)?;
                let duplicate = self
                    .inner
                    .courses
                    .iter()
                    .any(|c| c.code.eq_ignore_ascii_case(code));
                if duplicate {
                    return Err(AmsError::remote(format!("course code {code} already exists")));
                }

                let instructor_id = match instructor_id {
                    Some(id) => {
                        let is_instructor = self
                            .inner
                            .profiles
                            .get(id)
                            .is_some_and(|p| p.profile.role == UserRole::Instructor);
                        if !is_instructor {
                            return Err(AmsError::not_found(format!("instructor {id} not found")));
                        }
                        Some(id.clone())
                    }
                    None if viewer.role == UserRole::Instructor => Some(viewer.user_id.clone()),
                    None => None,
                };

                let id = self.insert_course(CourseRecord {
                    seq: 0,
                    id: new_id("course"),
                    code: code.trim().to_string(),
                    name: name.trim().to_string(),
                    description: description.clone(),
                    instructor_id,
                    created_at: now,
                    updated_at: now,
                });
                (id, format!("Course {} created", code.trim()))
            }

            MutationAction::CreateAssessment {
                course_id,
                title,
                assessment_type,
                total_marks,
                due_date,
            } => {
                if !self.owns_course(viewer, course_id)? {
                    return Err(permission_denied(viewer, &action));
                }
                validate::validate_required("Title", title)?;
                validate::validate_total_marks(*total_marks)?;

                let id = self.insert_assessment(AssessmentRecord {
                    seq: 0,
                    id: new_id("assessment"),
                    course_id: course_id.clone(),
                    title: title.trim().to_string(),
                    assessment_type: *assessment_type,
                    total_marks: *total_marks,
                    due_date: *due_date,
                    created_by: viewer.user_id.clone(),
                    created_at: now,
                    updated_at: now,
                });
                (id, format!("Assessment \"{}\" created", title.trim()))
            }

            MutationAction::SubmitAssessment {
                assessment_id,
                content,
            } => {
                if viewer.role != UserRole::Student {
                    return Err(permission_denied(viewer, &action));
                }
                let assessment = self.course_of_assessment(assessment_id)?;
                let enrolled = self
                    .inner
                    .enrollments
                    .contains_key(&(assessment.course_id.clone(), viewer.user_id.clone()));
                if !enrolled {
                    return Err(permission_denied(viewer, &action));
                }
                if self.find_submission(assessment_id, &viewer.user_id).is_some() {
                    return Err(AmsError::remote("assessment already submitted"));
                }

                let id = self.insert_submission(SubmissionRecord {
                    seq: 0,
                    id: new_id("submission"),
                    assessment_id: assessment_id.clone(),
                    student_id: viewer.user_id.clone(),
                    content: content.clone(),
                    submitted_at: now,
                });
                let timing = if now > assessment.due_date {
                    " (late)"
                } else {
                    ""
                };
                (id, format!("Submitted \"{}\"{timing}", assessment.title))
            }

            MutationAction::GradeSubmission {
                submission_id,
                score,
                feedback,
            } => {
                let submission = self
                    .inner
                    .submissions
                    .get(submission_id)
                    .map(|s| s.value().clone())
                    .ok_or_else(|| {
                        AmsError::not_found(format!("submission {submission_id} not found"))
                    })?;
                let assessment = self.course_of_assessment(&submission.assessment_id)?;
                if !viewer.role.can_grade() || !self.owns_course(viewer, &assessment.course_id)? {
                    return Err(permission_denied(viewer, &action));
                }
                validate::validate_score(*score, assessment.total_marks)?;

                // 重新评分会撤销审核与发布
                let id = match self.find_grade(submission_id) {
                    Some(existing) => {
                        if let Some(mut grade) = self.inner.grades.get_mut(&existing.id) {
                            grade.score = *score;
                            grade.feedback = feedback.clone();
                            grade.graded_by = viewer.user_id.clone();
                            grade.graded_at = now;
                            grade.verified = false;
                            grade.released = false;
                        }
                        existing.id
                    }
                    None => self.insert_grade(GradeRecord {
                        seq: 0,
                        id: new_id("grade"),
                        submission_id: submission_id.clone(),
                        score: *score,
                        feedback: feedback.clone(),
                        graded_by: viewer.user_id.clone(),
                        graded_at: now,
                        verified: false,
                        released: false,
                    }),
                };
                (id, format!("Graded submission for \"{}\"", assessment.title))
            }

            MutationAction::VerifyGrade { grade_id } => {
                let submission_id = self
                    .inner
                    .grades
                    .get(grade_id)
                    .map(|g| g.submission_id.clone())
                    .ok_or_else(|| AmsError::not_found(format!("grade {grade_id} not found")))?;
                let assessment_id = self
                    .inner
                    .submissions
                    .get(&submission_id)
                    .map(|s| s.assessment_id.clone())
                    .ok_or_else(|| {
                        AmsError::not_found(format!("submission {submission_id} not found"))
                    })?;
                let assessment = self.course_of_assessment(&assessment_id)?;
                if !viewer.role.can_grade() || !self.owns_course(viewer, &assessment.course_id)? {
                    return Err(permission_denied(viewer, &action));
                }
                if let Some(mut grade) = self.inner.grades.get_mut(grade_id) {
                    grade.verified = true;
                }
                (grade_id.clone(), "Grade verified".to_string())
            }

            MutationAction::ReleaseGrades { assessment_id } => {
                let assessment = self.course_of_assessment(assessment_id)?;
                if !viewer.role.can_grade() || !self.owns_course(viewer, &assessment.course_id)? {
                    return Err(permission_denied(viewer, &action));
                }
                let submission_ids: Vec<String> = self
                    .inner
                    .submissions
                    .iter()
                    .filter(|s| s.assessment_id == *assessment_id)
                    .map(|s| s.id.clone())
                    .collect();

                // 只发布已审核的成绩
                let mut released = 0;
                for mut grade in self.inner.grades.iter_mut() {
                    if submission_ids.contains(&grade.submission_id)
                        && grade.verified
                        && !grade.released
                    {
                        grade.released = true;
                        released += 1;
                    }
                }
                if released == 0 {
                    return Err(AmsError::remote("no verified grades to release"));
                }
                (
                    assessment_id.clone(),
                    format!("Released {released} grade(s) for \"{}\"", assessment.title),
                )
            }

            MutationAction::CreateUser {
                email,
                password,
                full_name,
                role,
            } => {
                if viewer.role != UserRole::Admin {
                    return Err(permission_denied(viewer, &action));
                }
                validate::validate_email(email)?;
                validate::validate_password_simple(password)?;
                validate::validate_required("Full name", full_name)?;
                let exists = self
                    .inner
                    .profiles
                    .iter()
                    .any(|p| p.profile.email.eq_ignore_ascii_case(email));
                if exists {
                    return Err(AmsError::remote(format!("user {email} already exists")));
                }

                let id = new_id("user");
                self.insert_profile(Profile {
                    id: id.clone(),
                    email: email.trim().to_lowercase(),
                    full_name: full_name.trim().to_string(),
                    role: *role,
                    created_at: now,
                });
                (id, format!("User {} created", email.trim()))
            }
        };

        info!(
            "{} by {} succeeded: {}",
            action.name(),
            viewer.user_id,
            record_id
        );
        Ok(MutationOutcome {
            record_id,
            kind,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::seed::{
        self, DEMO_ADMIN, DEMO_INSTRUCTOR, DEMO_STUDENT, demo_now,
    };
    use crate::models::assessments::entities::AssessmentType;

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new(16);
        seed::seed_demo_data(&store, demo_now());
        store
    }

    fn instructor() -> Viewer {
        Viewer::new(DEMO_INSTRUCTOR, UserRole::Instructor)
    }

    fn student() -> Viewer {
        Viewer::new(DEMO_STUDENT, UserRole::Student)
    }

    #[test]
    fn test_student_cannot_create_course() {
        let store = seeded();
        let err = store
            .apply_mutation(
                &student(),
                MutationAction::CreateCourse {
                    code: "CS999".into(),
                    name: "Nope".into(),
                    description: None,
                    instructor_id: None,
                },
            )
            .unwrap_err();
        assert_eq!(err.code(), "E002");
        assert!(err.message().contains("permission denied"));
    }

    #[test]
    fn test_duplicate_course_code_rejected() {
        let store = seeded();
        let err = store
            .apply_mutation(
                &instructor(),
                MutationAction::CreateCourse {
                    code: "CS101".into(),
                    name: "Again".into(),
                    description: None,
                    instructor_id: None,
                },
            )
            .unwrap_err();
        assert!(err.message().contains("already exists"));
    }

    #[test]
    fn test_submit_then_duplicate_submit() {
        let store = seeded();
        let action = MutationAction::SubmitAssessment {
            assessment_id: seed::OPEN_ASSESSMENT.into(),
            content: "my answers".into(),
        };
        store.apply_mutation(&student(), action.clone()).unwrap();
        let err = store.apply_mutation(&student(), action).unwrap_err();
        assert!(err.message().contains("already submitted"));
    }

    #[test]
    fn test_grade_verify_release_flow() {
        let store = seeded();
        store
            .apply_mutation(
                &student(),
                MutationAction::SubmitAssessment {
                    assessment_id: seed::OPEN_ASSESSMENT.into(),
                    content: "answers".into(),
                },
            )
            .unwrap();
        let submission = store
            .find_submission(seed::OPEN_ASSESSMENT, DEMO_STUDENT)
            .unwrap();

        let over = store.apply_mutation(
            &instructor(),
            MutationAction::GradeSubmission {
                submission_id: submission.id.clone(),
                score: 1000.0,
                feedback: None,
            },
        );
        assert_eq!(over.unwrap_err().code(), "E001");

        let graded = store
            .apply_mutation(
                &instructor(),
                MutationAction::GradeSubmission {
                    submission_id: submission.id.clone(),
                    score: 40.0,
                    feedback: Some("Good".into()),
                },
            )
            .unwrap();

        // 未审核时不能发布
        let release = MutationAction::ReleaseGrades {
            assessment_id: seed::OPEN_ASSESSMENT.into(),
        };
        assert!(store.apply_mutation(&instructor(), release.clone()).is_err());

        store
            .apply_mutation(
                &Viewer::new(DEMO_ADMIN, UserRole::Admin),
                MutationAction::VerifyGrade {
                    grade_id: graded.record_id.clone(),
                },
            )
            .unwrap();
        let outcome = store.apply_mutation(&instructor(), release).unwrap();
        assert!(outcome.message.starts_with("Released 1 grade(s)"));
        assert!(store.find_grade(&submission.id).unwrap().released);
    }

    #[test]
    fn test_create_assessment_requires_course_owner() {
        let store = seeded();
        let action = MutationAction::CreateAssessment {
            course_id: seed::FOREIGN_COURSE.into(),
            title: "Midterm".into(),
            assessment_type: AssessmentType::Examination,
            total_marks: 100.0,
            due_date: demo_now(),
        };
        let err = store.apply_mutation(&instructor(), action).unwrap_err();
        assert!(err.message().contains("permission denied"));
    }

    #[test]
    fn test_admin_creates_user_once() {
        let store = seeded();
        let admin = Viewer::new(DEMO_ADMIN, UserRole::Admin);
        let action = MutationAction::CreateUser {
            email: "new.student@ams.test".into(),
            password: "secure123".into(),
            full_name: "New Student".into(),
            role: UserRole::Student,
        };
        store.apply_mutation(&admin, action.clone()).unwrap();
        let err = store.apply_mutation(&admin, action).unwrap_err();
        assert!(err.message().contains("already exists"));
    }
}
