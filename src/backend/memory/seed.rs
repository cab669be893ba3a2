use chrono::{DateTime, Duration, TimeZone, Utc};
use tracing::info;

use super::MemoryStore;
use super::records::{AssessmentRecord, CourseRecord, GradeRecord, SubmissionRecord};
use crate::models::assessments::entities::AssessmentType;
use crate::models::users::entities::{Profile, UserRole};

pub const DEMO_ADMIN: &str = "user-admin";
pub const DEMO_INSTRUCTOR: &str = "user-mensah";
pub const DEMO_STUDENT: &str = "user-ama";

/// 演示学生尚未提交、截止在即的作业
pub const OPEN_ASSESSMENT: &str = "assessment-cs101-pa1";
/// 不属于演示教师的课程
pub const FOREIGN_COURSE: &str = "course-math201";
/// 演示学生已评分、待审核发布的考核
pub const PENDING_ASSESSMENT: &str = "assessment-cs101-q2";

/// 测试使用的固定“当前时间”
pub fn demo_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

struct SeedGrade {
    score: f64,
    graded_days: i64,
    verified: bool,
    released: bool,
}

fn profile(store: &MemoryStore, id: &str, name: &str, role: UserRole, now: DateTime<Utc>) {
    let email = format!("{}@ams.test", id.trim_start_matches("user-"));
    store.insert_profile(Profile {
        id: id.to_string(),
        email,
        full_name: name.to_string(),
        role,
        created_at: now - Duration::days(120),
    });
}

fn course(store: &MemoryStore, id: &str, code: &str, name: &str, instructor: &str, now: DateTime<Utc>) {
    store.insert_course(CourseRecord {
        seq: 0,
        id: id.to_string(),
        code: code.to_string(),
        name: name.to_string(),
        description: None,
        instructor_id: Some(instructor.to_string()),
        created_at: now - Duration::days(90),
        updated_at: now - Duration::days(90),
    });
}

#[allow(clippy::too_many_arguments)]
fn assessment(
    store: &MemoryStore,
    id: &str,
    course_id: &str,
    title: &str,
    assessment_type: AssessmentType,
    total_marks: f64,
    due_days: i64,
    author: &str,
    now: DateTime<Utc>,
) {
    let created_at = now + Duration::days(due_days - 21);
    store.insert_assessment(AssessmentRecord {
        seq: 0,
        id: id.to_string(),
        course_id: course_id.to_string(),
        title: title.to_string(),
        assessment_type,
        total_marks,
        due_date: now + Duration::days(due_days),
        created_by: author.to_string(),
        created_at,
        updated_at: created_at,
    });
}

fn submit(
    store: &MemoryStore,
    assessment_id: &str,
    student_id: &str,
    submitted_days: i64,
    grade: Option<SeedGrade>,
    now: DateTime<Utc>,
) {
    let submission_id = format!("submission-{}-{}", assessment_id, student_id);
    store.insert_submission(SubmissionRecord {
        seq: 0,
        id: submission_id.clone(),
        assessment_id: assessment_id.to_string(),
        student_id: student_id.to_string(),
        content: "seeded submission".to_string(),
        submitted_at: now + Duration::days(submitted_days),
    });
    if let Some(grade) = grade {
        store.insert_grade(GradeRecord {
            seq: 0,
            id: format!("grade-{submission_id}"),
            submission_id,
            score: grade.score,
            feedback: None,
            graded_by: DEMO_INSTRUCTOR.to_string(),
            graded_at: now + Duration::days(grade.graded_days),
            verified: grade.verified,
            released: grade.released,
        });
    }
}

fn released(score: f64, graded_days: i64) -> Option<SeedGrade> {
    Some(SeedGrade {
        score,
        graded_days,
        verified: true,
        released: true,
    })
}

fn unreleased(score: f64, graded_days: i64) -> Option<SeedGrade> {
    Some(SeedGrade {
        score,
        graded_days,
        verified: false,
        released: false,
    })
}

/// 写入演示数据：4 门课程、12 项考核，以及若干提交和成绩
pub fn seed_demo_data(store: &MemoryStore, now: DateTime<Utc>) {
    use AssessmentType::*;

    profile(store, DEMO_ADMIN, "Registry Admin", UserRole::Admin, now);
    profile(store, DEMO_INSTRUCTOR, "Dr. Kwame Mensah", UserRole::Instructor, now);
    profile(store, "user-osei", "Dr. Abena Osei", UserRole::Instructor, now);
    profile(store, DEMO_STUDENT, "Ama Boateng", UserRole::Student, now);
    profile(store, "user-kofi", "Kofi Asante", UserRole::Student, now);
    profile(store, "user-efua", "Efua Owusu", UserRole::Student, now);

    course(store, "course-cs101", "CS101", "Introduction to Computing", DEMO_INSTRUCTOR, now);
    course(store, FOREIGN_COURSE, "MATH201", "Linear Algebra", "user-osei", now);
    course(store, "course-cs205", "CS205", "Data Structures", DEMO_INSTRUCTOR, now);
    course(store, "course-phy110", "PHY110", "Classical Mechanics", "user-osei", now);

    let enrolled_at = now - Duration::days(80);
    for (course_id, student) in [
        ("course-cs101", DEMO_STUDENT),
        (FOREIGN_COURSE, DEMO_STUDENT),
        ("course-cs101", "user-kofi"),
        ("course-cs205", "user-kofi"),
        (FOREIGN_COURSE, "user-efua"),
        ("course-phy110", "user-efua"),
    ] {
        store.enroll(course_id, student, enrolled_at);
    }

    let cs101 = "course-cs101";
    assessment(store, "assessment-cs101-q1", cs101, "Weekly Quiz 1", Quiz, 20.0, -14, DEMO_INSTRUCTOR, now);
    assessment(store, PENDING_ASSESSMENT, cs101, "Weekly Quiz 2", Quiz, 20.0, -7, DEMO_INSTRUCTOR, now);
    assessment(store, OPEN_ASSESSMENT, cs101, "Programming Assignment 1", Assignment, 100.0, 2, DEMO_INSTRUCTOR, now);
    assessment(store, "assessment-cs101-fp", cs101, "Final Project", Project, 100.0, 30, DEMO_INSTRUCTOR, now);

    let math = FOREIGN_COURSE;
    assessment(store, "assessment-math201-q1", math, "Matrix Operations Quiz", Quiz, 30.0, -3, "user-osei", now);
    assessment(store, "assessment-math201-mid", math, "Midterm Examination", Examination, 100.0, -1, "user-osei", now);
    assessment(store, "assessment-math201-ps3", math, "Problem Set 3", Assignment, 50.0, 5, "user-osei", now);

    let cs205 = "course-cs205";
    assessment(store, "assessment-cs205-lab", cs205, "Linked Lists Lab", Practical, 40.0, -10, DEMO_INSTRUCTOR, now);
    assessment(store, "assessment-cs205-trees", cs205, "Trees Assignment", Assignment, 60.0, 9, DEMO_INSTRUCTOR, now);

    let phy = "course-phy110";
    assessment(store, "assessment-phy110-q1", phy, "Kinematics Quiz", Quiz, 25.0, -2, "user-osei", now);
    assessment(store, "assessment-phy110-lab", phy, "Lab Report 1", Practical, 50.0, 4, "user-osei", now);
    assessment(store, "assessment-phy110-mid", phy, "Midterm Examination", Examination, 100.0, 12, "user-osei", now);

    submit(store, "assessment-cs101-q1", DEMO_STUDENT, -15, released(16.0, -12), now);
    // 截止后一天提交，已评分未发布
    submit(store, PENDING_ASSESSMENT, DEMO_STUDENT, -6, unreleased(14.0, -2), now);
    submit(store, "assessment-math201-q1", DEMO_STUDENT, -4, released(24.0, -1), now);
    submit(store, "assessment-cs101-q1", "user-kofi", -14, released(11.0, -12), now);
    submit(store, OPEN_ASSESSMENT, "user-kofi", -1, None, now);
    submit(store, "assessment-cs205-lab", "user-kofi", -11, released(35.0, -8), now);
    submit(store, "assessment-phy110-q1", "user-efua", -3, None, now);

    info!("Seeded demo data: 6 profiles, 4 courses, 12 assessments");
}
