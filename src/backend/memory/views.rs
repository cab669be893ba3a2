use std::collections::HashSet;

use chrono::{DateTime, Utc};

use super::MemoryStore;
use super::records::{AssessmentRecord, CourseRecord};
use crate::models::assessments::entities::AssessmentRow;
use crate::models::courses::entities::CourseRow;
use crate::models::users::entities::{UserRole, Viewer};

/// 当前身份可见的课程
fn visible_courses(store: &MemoryStore, viewer: &Viewer) -> Vec<CourseRecord> {
    let enrolled: HashSet<String> = match viewer.role {
        UserRole::Student => store
            .inner
            .enrollments
            .iter()
            .filter(|e| e.student_id == viewer.user_id)
            .map(|e| e.course_id.clone())
            .collect(),
        _ => HashSet::new(),
    };

    let mut courses: Vec<CourseRecord> = store
        .inner
        .courses
        .iter()
        .filter(|c| match viewer.role {
            UserRole::Admin => true,
            UserRole::Instructor => c.instructor_id.as_deref() == Some(viewer.user_id.as_str()),
            UserRole::Student => enrolled.contains(&c.id),
        })
        .map(|c| c.value().clone())
        .collect();
    courses.sort_by_key(|c| c.seq);
    courses
}

fn course_assessments(store: &MemoryStore, course_id: &str) -> Vec<AssessmentRecord> {
    let mut assessments: Vec<AssessmentRecord> = store
        .inner
        .assessments
        .iter()
        .filter(|a| a.course_id == course_id)
        .map(|a| a.value().clone())
        .collect();
    assessments.sort_by_key(|a| a.seq);
    assessments
}

/// 某考核下所有提交的统计
struct Tally {
    submissions: u32,
    graded: u32,
    released: u32,
    last_submitted: Option<DateTime<Utc>>,
    last_graded: Option<DateTime<Utc>>,
}

fn tally(store: &MemoryStore, assessment_id: &str) -> Tally {
    let submissions: Vec<(String, DateTime<Utc>)> = store
        .inner
        .submissions
        .iter()
        .filter(|s| s.assessment_id == assessment_id)
        .map(|s| (s.id.clone(), s.submitted_at))
        .collect();

    let mut result = Tally {
        submissions: 0,
        graded: 0,
        released: 0,
        last_submitted: None,
        last_graded: None,
    };
    for (submission_id, submitted_at) in submissions {
        result.submissions += 1;
        result.last_submitted = result.last_submitted.max(Some(submitted_at));
        if let Some(grade) = store.find_grade(&submission_id) {
            result.graded += 1;
            if grade.released {
                result.released += 1;
            }
            result.last_graded = result.last_graded.max(Some(grade.graded_at));
        }
    }
    result
}

/// 按身份连接提交与成绩后的考核行
pub(super) fn assessment_rows(store: &MemoryStore, viewer: &Viewer) -> Vec<AssessmentRow> {
    let mut rows = Vec::new();
    for course in visible_courses(store, viewer) {
        for assessment in course_assessments(store, &course.id) {
            let mut row = AssessmentRow {
                id: assessment.id.clone(),
                title: assessment.title.clone(),
                course_id: course.id.clone(),
                course_code: course.code.clone(),
                course_title: course.name.clone(),
                assessment_type: assessment.assessment_type,
                total_marks: Some(assessment.total_marks),
                due_date: assessment.due_date,
                created_at: assessment.created_at,
                updated_at: assessment.updated_at,
                submitted_at: None,
                graded_at: None,
                score: None,
                grade_released: false,
                submission_count: 0,
                graded_count: 0,
            };

            if viewer.role == UserRole::Student {
                if let Some(submission) = store.find_submission(&assessment.id, &viewer.user_id) {
                    row.submitted_at = Some(submission.submitted_at);
                    if let Some(grade) = store.find_grade(&submission.id) {
                        row.graded_at = Some(grade.graded_at);
                        row.grade_released = grade.released;
                        // 未发布的分数对学生不可见
                        row.score = grade.released.then_some(grade.score);
                    }
                }
            } else {
                let stats = tally(store, &assessment.id);
                row.submission_count = stats.submissions;
                row.graded_count = stats.graded;
                row.submitted_at = stats.last_submitted;
                row.graded_at = stats.last_graded;
                row.grade_released = stats.graded > 0 && stats.released == stats.graded;
            }
            rows.push(row);
        }
    }
    rows
}

pub(super) fn course_rows(store: &MemoryStore, viewer: &Viewer) -> Vec<CourseRow> {
    visible_courses(store, viewer)
        .into_iter()
        .map(|course| {
            let assessments = course_assessments(store, &course.id);
            let completed = assessments
                .iter()
                .filter(|a| match viewer.role {
                    UserRole::Student => store.find_submission(&a.id, &viewer.user_id).is_some(),
                    _ => {
                        let stats = tally(store, &a.id);
                        stats.submissions > 0 && stats.graded == stats.submissions
                    }
                })
                .count();
            let instructor_name = course.instructor_id.as_ref().and_then(|id| {
                store
                    .inner
                    .profiles
                    .get(id)
                    .map(|p| p.profile.full_name.clone())
            });

            CourseRow {
                id: course.id,
                code: course.code,
                name: course.name,
                description: course.description,
                instructor_id: course.instructor_id,
                instructor_name,
                assessment_count: u32::try_from(assessments.len()).unwrap_or(u32::MAX),
                completed_count: u32::try_from(completed).unwrap_or(u32::MAX),
                created_at: course.created_at,
                updated_at: course.updated_at,
            }
        })
        .collect()
}
