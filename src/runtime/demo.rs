//! 演示脚本：以学生、教师、管理员三种身份走一遍列表与成绩流程

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use crate::backend::memory::seed::{
    DEMO_ADMIN, DEMO_INSTRUCTOR, DEMO_STUDENT, OPEN_ASSESSMENT, PENDING_ASSESSMENT,
};
use crate::backend::{ChangeKind, MutationAction};
use crate::config::AppConfig;
use crate::errors::{AmsError, Result};
use crate::models::assessments::entities::{AssessmentItem, ResultsStatus, SubmissionStatus};
use crate::models::courses::entities::CourseItem;
use crate::models::filters::{FilterKey, FilterUpdate, ListKind, SortField, SortOrder};
use crate::models::users::entities::{UserRole, Viewer};
use crate::presentation;
use crate::runtime::lifetime::startup::StartupContext;
use crate::services::list_view::{ListPage, ListView, PaginationPolicy};
use crate::services::mutations::MutationService;
use crate::services::query::{AssessmentSource, CourseSource, QueryPhase};

const REFRESH_WAIT: Duration = Duration::from_secs(5);

fn log_assessments(title: &str, page: &ListPage<AssessmentItem>) {
    let view = presentation::assessment_page(page, Utc::now());
    info!(
        "{} | page {}/{} | {} items | {} active filters",
        title,
        view.pagination.page,
        view.pagination.total_pages,
        view.pagination.total,
        view.active_filter_count
    );
    for tag in &view.tags {
        info!("  filter: {}", tag.label);
    }
    for card in &view.cards {
        info!("  {}", card);
    }
    if let Some(error) = &view.error {
        warn!("  last error: {}", error);
    }
}

fn log_courses(title: &str, page: &ListPage<CourseItem>) {
    let view = presentation::course_page(page);
    info!("{} | {} courses", title, view.pagination.total);
    for card in &view.cards {
        info!("  {}", card);
    }
}

fn log_groups(page: &ListPage<AssessmentItem>) {
    for group in presentation::grouped_page(page) {
        info!("  {} {} ({} rows)", group.course_code, group.course_title, group.rows.len());
    }
}

/// 等待变更事件触发的刷新带来预期的结果
async fn wait_for_refresh<T: Clone + Send + Sync + 'static>(
    view: &mut ListView<T>,
    arrived: impl Fn(&[T]) -> bool,
) -> Result<ListPage<T>> {
    let mut snapshots = view.coordinator().subscribe();
    tokio::time::timeout(
        REFRESH_WAIT,
        snapshots.wait_for(|s| s.phase == QueryPhase::Settled && arrived(&s.items)),
    )
    .await
    .map_err(|_| AmsError::channel("no refresh arrived after the change event"))?
    .map_err(|_| AmsError::channel("query coordinator stopped"))?;
    Ok(view.current_page())
}

pub async fn run(config: &AppConfig, startup: &StartupContext) -> Result<()> {
    let connector = &startup.connector;
    let notices = startup.notices.clone();
    let query = &config.query;

    let student = connector.connect(Viewer::new(DEMO_STUDENT, UserRole::Student));
    let instructor = connector.connect(Viewer::new(DEMO_INSTRUCTOR, UserRole::Instructor));
    let admin = connector.connect(Viewer::new(DEMO_ADMIN, UserRole::Admin));

    // 学生的考核列表，订阅成绩与提交变更
    let mut assessments = ListView::open(
        ListKind::Assessments,
        Arc::new(AssessmentSource::new(student.clone(), query.apply_mode)),
        query,
        notices.clone(),
        PaginationPolicy::Grid,
    )?
    .with_live_refresh(
        student.as_ref(),
        &[
            ChangeKind::AssessmentChanged,
            ChangeKind::SubmissionChanged,
            ChangeKind::GradeChanged,
        ],
    )?;
    let page = assessments.wait_settled().await?;
    log_assessments("My assessments", &page);

    assessments.apply(FilterUpdate::Search("quiz".into()))?;
    assessments.apply(FilterUpdate::ResultsStatus(Some(ResultsStatus::Pending)))?;
    let page = assessments.wait_settled().await?;
    log_assessments("Quizzes awaiting results", &page);

    assessments.clear_filters()?;
    assessments.apply(FilterUpdate::SortField(Some(SortField::Date)))?;
    assessments.apply(FilterUpdate::SortOrder(SortOrder::Asc))?;
    let page = assessments.wait_settled().await?;
    log_assessments("By due date", &page);

    // 教师的课程网格
    let mut courses = ListView::open(
        ListKind::Courses,
        Arc::new(CourseSource::new(instructor.clone(), query.apply_mode)),
        query,
        notices.clone(),
        PaginationPolicy::Grid,
    )?;
    let page = courses.wait_settled().await?;
    log_courses("Teaching", &page);
    courses.apply(FilterUpdate::Search("data".into()))?;
    let page = courses.wait_settled().await?;
    log_courses("Teaching, search 'data'", &page);
    courses.remove_filter(FilterKey::Search)?;
    let page = courses.wait_settled().await?;
    log_courses("Teaching, search removed", &page);

    let as_student = MutationService::new(student.clone(), notices.clone());
    let as_instructor = MutationService::new(instructor.clone(), notices.clone());
    let as_admin = MutationService::new(admin, notices.clone());

    // 学生提交作业
    let submitted = as_student
        .execute(MutationAction::SubmitAssessment {
            assessment_id: OPEN_ASSESSMENT.into(),
            content: "https://git.example.edu/ama/pa1".into(),
        })
        .await?;
    let page = wait_for_refresh(&mut assessments, |items| {
        items.iter().any(|item| {
            item.id == OPEN_ASSESSMENT && item.submission_status != SubmissionStatus::NotSubmitted
        })
    })
    .await?;
    log_assessments("After submitting", &page);

    // 教师评分：超出满分的分数在本地被拒绝
    let open = page
        .items
        .iter()
        .find(|item| item.id == OPEN_ASSESSMENT)
        .cloned()
        .ok_or_else(|| AmsError::not_found("submitted assessment is not on the page"))?;
    if let Err(e) = as_instructor
        .grade_submission(&open, &submitted.record_id, 150.0, None)
        .await
    {
        info!("Rejected locally: {}", e.message());
    }
    let graded = as_instructor
        .grade_submission(&open, &submitted.record_id, 86.0, Some("Clean solution".into()))
        .await?;

    // 管理员审核，教师发布
    as_admin
        .execute(MutationAction::VerifyGrade {
            grade_id: graded.record_id,
        })
        .await?;
    as_instructor
        .execute(MutationAction::ReleaseGrades {
            assessment_id: OPEN_ASSESSMENT.into(),
        })
        .await?;
    let page = wait_for_refresh(&mut assessments, |items| {
        items.iter().any(|item| {
            item.id == OPEN_ASSESSMENT && item.results_status == ResultsStatus::Available
        })
    })
    .await?;
    log_assessments("After release", &page);
    log_groups(&page);

    // 未审核的成绩不能发布
    if let Err(e) = as_instructor
        .execute(MutationAction::ReleaseGrades {
            assessment_id: PENDING_ASSESSMENT.into(),
        })
        .await
    {
        info!("Release refused: {}", e.message());
    }

    courses.close().await;
    assessments.close().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::lifetime::startup::prepare_startup;
    use crate::services::notices::NoticeLevel;

    #[tokio::test(start_paused = true)]
    async fn test_demo_runs_against_memory_backend() {
        let mut config = AppConfig::load().unwrap();
        config.backend.backend_type = "memory".into();
        config.backend.seed_demo_data = true;
        let startup = prepare_startup(&config).await.unwrap();
        let mut notices = startup.notices.subscribe();

        run(&config, &startup).await.unwrap();

        let mut levels = Vec::new();
        while let Ok(notice) = notices.try_recv() {
            levels.push(notice.level);
        }
        // 提交、评分、审核、发布各一次成功；未审核的发布失败
        assert_eq!(levels.iter().filter(|l| **l == NoticeLevel::Success).count(), 4);
        assert_eq!(levels.last(), Some(&NoticeLevel::Error));
    }
}
