//! 测试用条目构造

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use crate::models::assessments::entities::{AssessmentItem, AssessmentRow, AssessmentType};
use crate::models::courses::entities::{CourseItem, CourseRow};

/// day0 的 09:00 UTC
pub(crate) fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
}

pub(crate) fn day(offset: i64) -> NaiveDate {
    (base_time() + Duration::days(offset)).date_naive()
}

pub(crate) fn assessment_row(id: &str, title: &str, due_offset_days: i64) -> AssessmentRow {
    AssessmentRow {
        id: id.to_string(),
        title: title.to_string(),
        course_id: "c1".into(),
        course_code: "CS101".into(),
        course_title: "Intro to Computing".into(),
        assessment_type: AssessmentType::Assignment,
        total_marks: Some(100.0),
        due_date: base_time() + Duration::days(due_offset_days),
        created_at: base_time() - Duration::days(30),
        updated_at: base_time() - Duration::days(30),
        submitted_at: None,
        graded_at: None,
        score: None,
        grade_released: false,
        submission_count: 0,
        graded_count: 0,
    }
}

pub(crate) fn assessment(id: &str, title: &str, due_offset_days: i64) -> AssessmentItem {
    assessment_row(id, title, due_offset_days).into()
}

/// 覆盖各个维度的一组考核
pub(crate) fn sample_items() -> Vec<AssessmentItem> {
    let mut rows = Vec::new();

    let mut r = assessment_row("s1", "Weekly Quiz 1", 1);
    r.assessment_type = AssessmentType::Quiz;
    r.submitted_at = Some(base_time());
    rows.push(r);

    let mut r = assessment_row("s2", "Quiz Week Examination", 4);
    r.assessment_type = AssessmentType::Examination;
    r.course_id = "c2".into();
    r.course_code = "MATH201".into();
    r.course_title = "Linear Algebra".into();
    rows.push(r);

    let mut r = assessment_row("s3", "Final Examination", 9);
    r.assessment_type = AssessmentType::Examination;
    r.submitted_at = Some(base_time() + Duration::days(5));
    r.graded_at = Some(base_time() + Duration::days(6));
    r.score = Some(72.0);
    r.grade_released = true;
    rows.push(r);

    let mut r = assessment_row("s4", "Lab Report", 3);
    r.assessment_type = AssessmentType::Practical;
    r.course_id = "c2".into();
    r.course_code = "MATH201".into();
    r.course_title = "Linear Algebra".into();
    r.submitted_at = Some(base_time() + Duration::days(2));
    r.graded_at = Some(base_time() + Duration::days(3));
    r.score = Some(40.0);
    rows.push(r);

    let mut r = assessment_row("s5", "Group Project", 14);
    r.assessment_type = AssessmentType::Project;
    r.updated_at = base_time();
    rows.push(r);

    let mut r = assessment_row("s6", "Pop quiz", -2);
    r.assessment_type = AssessmentType::Quiz;
    r.course_id = "c2".into();
    r.course_code = "MATH201".into();
    r.course_title = "Linear Algebra".into();
    r.submitted_at = Some(base_time() - Duration::days(1));
    rows.push(r);

    rows.into_iter().map(AssessmentItem::from).collect()
}

pub(crate) fn course(id: &str, code: &str, name: &str, assessments: u32, completed: u32) -> CourseItem {
    CourseRow {
        id: id.to_string(),
        code: code.to_string(),
        name: name.to_string(),
        description: None,
        instructor_id: Some("u-instructor".into()),
        instructor_name: Some("Dr. Mensah".into()),
        assessment_count: assessments,
        completed_count: completed,
        created_at: base_time(),
        updated_at: base_time(),
    }
    .into()
}
