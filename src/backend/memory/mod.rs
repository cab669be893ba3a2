//! 内存后端插件
//!
//! 用 DashMap 模拟托管后端的表，变更通过 broadcast 通道推送。
//! 可注入延迟与故障，方便演示和测试协调器的时序行为。

mod mutations;
pub mod records;
pub mod seed;
mod views;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::backend::register::BackendConstructor;
use crate::backend::{
    Backend, BackendConnector, ChangeEvent, ChangeKind, EntityType, MutationAction,
    MutationOutcome, Row, Subscription,
};
use crate::config::BackendConfig;
use crate::engine::{self, Filterable};
use crate::errors::{AmsError, Result};
use crate::models::assessments::entities::AssessmentItem;
use crate::models::courses::entities::CourseItem;
use crate::models::filters::FilterState;
use crate::models::users::entities::Viewer;

use records::{
    AssessmentRecord, CourseRecord, EnrollmentRecord, GradeRecord, ProfileRecord,
    SubmissionRecord,
};

pub const PLUGIN_NAME: &str = "memory";

pub fn constructor() -> BackendConstructor {
    Arc::new(|config: BackendConfig| {
        Box::pin(async move {
            let store = MemoryStore::new(config.channel_capacity);
            if config.seed_demo_data {
                seed::seed_demo_data(&store, chrono::Utc::now());
            }
            debug!(
                "MemoryStore initialized with channel capacity: {}",
                config.channel_capacity
            );
            Ok(Arc::new(store) as Arc<dyn BackendConnector>)
        })
    })
}

struct StoreInner {
    profiles: DashMap<String, ProfileRecord>,
    courses: DashMap<String, CourseRecord>,
    enrollments: DashMap<(String, String), EnrollmentRecord>,
    assessments: DashMap<String, AssessmentRecord>,
    submissions: DashMap<String, SubmissionRecord>,
    grades: DashMap<String, GradeRecord>,
    sequence: AtomicU64,
    events: broadcast::Sender<ChangeEvent>,
    // 故障注入
    offline: AtomicBool,
    pending_failures: AtomicU32,
    latency_ms: AtomicU64,
    fetch_count: AtomicU64,
}

/// 内存后端，克隆后共享同一份数据
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<StoreInner>,
}

impl MemoryStore {
    pub fn new(channel_capacity: usize) -> Self {
        let (events, _) = broadcast::channel(channel_capacity.max(1));
        Self {
            inner: Arc::new(StoreInner {
                profiles: DashMap::new(),
                courses: DashMap::new(),
                enrollments: DashMap::new(),
                assessments: DashMap::new(),
                submissions: DashMap::new(),
                grades: DashMap::new(),
                sequence: AtomicU64::new(0),
                events,
                offline: AtomicBool::new(false),
                pending_failures: AtomicU32::new(0),
                latency_ms: AtomicU64::new(0),
                fetch_count: AtomicU64::new(0),
            }),
        }
    }

    fn next_seq(&self) -> u64 {
        self.inner.sequence.fetch_add(1, Ordering::SeqCst)
    }

    /// 模拟断网：之后的取数与变更都会失败
    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.store(offline, Ordering::SeqCst);
    }

    /// 让接下来的 `count` 次远程调用失败
    pub fn fail_next(&self, count: u32) {
        self.inner.pending_failures.store(count, Ordering::SeqCst);
    }

    /// 每次取数前的人为延迟
    pub fn set_latency(&self, latency: Duration) {
        let millis = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.inner.latency_ms.store(millis, Ordering::SeqCst);
    }

    /// 已处理的取数请求次数
    pub fn fetch_count(&self) -> u64 {
        self.inner.fetch_count.load(Ordering::SeqCst)
    }

    /// 直接向推送通道发送事件
    pub fn publish(&self, event: ChangeEvent) {
        // 没有订阅者时发送失败，忽略即可
        let _ = self.inner.events.send(event);
    }

    pub fn subscribe_raw(&self, kinds: &[ChangeKind]) -> Subscription {
        Subscription::new(self.inner.events.subscribe(), kinds)
    }

    fn check_reachable(&self) -> Result<()> {
        if self.inner.offline.load(Ordering::SeqCst) {
            return Err(AmsError::remote("backend unreachable"));
        }
        let injected = self
            .inner
            .pending_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            return Err(AmsError::remote("request failed: service unavailable"));
        }
        Ok(())
    }

    pub fn insert_profile(&self, profile: crate::models::users::entities::Profile) {
        let seq = self.next_seq();
        self.inner
            .profiles
            .insert(profile.id.clone(), ProfileRecord { seq, profile });
    }

    pub fn insert_course(&self, mut course: CourseRecord) -> String {
        course.seq = self.next_seq();
        let id = course.id.clone();
        self.inner.courses.insert(id.clone(), course);
        id
    }

    pub fn enroll(&self, course_id: &str, student_id: &str, at: chrono::DateTime<chrono::Utc>) {
        self.inner.enrollments.insert(
            (course_id.to_string(), student_id.to_string()),
            EnrollmentRecord {
                course_id: course_id.to_string(),
                student_id: student_id.to_string(),
                enrolled_at: at,
            },
        );
    }

    pub fn insert_assessment(&self, mut assessment: AssessmentRecord) -> String {
        assessment.seq = self.next_seq();
        let id = assessment.id.clone();
        self.inner.assessments.insert(id.clone(), assessment);
        id
    }

    pub fn insert_submission(&self, mut submission: SubmissionRecord) -> String {
        submission.seq = self.next_seq();
        let id = submission.id.clone();
        self.inner.submissions.insert(id.clone(), submission);
        id
    }

    pub fn insert_grade(&self, mut grade: GradeRecord) -> String {
        grade.seq = self.next_seq();
        let id = grade.id.clone();
        self.inner.grades.insert(id.clone(), grade);
        id
    }

    /// 按学生与考核查找提交记录
    pub fn find_submission(&self, assessment_id: &str, student_id: &str) -> Option<SubmissionRecord> {
        self.inner
            .submissions
            .iter()
            .find(|s| s.assessment_id == assessment_id && s.student_id == student_id)
            .map(|s| s.value().clone())
    }

    /// 按提交记录查找成绩
    pub fn find_grade(&self, submission_id: &str) -> Option<GradeRecord> {
        self.inner
            .grades
            .iter()
            .find(|g| g.submission_id == submission_id)
            .map(|g| g.value().clone())
    }

    /// 以指定身份建立会话
    pub fn session(&self, viewer: Viewer) -> MemoryBackend {
        MemoryBackend {
            store: self.clone(),
            viewer,
        }
    }
}

impl BackendConnector for MemoryStore {
    fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    fn connect(&self, viewer: Viewer) -> Arc<dyn Backend> {
        Arc::new(self.session(viewer))
    }
}

/// 绑定身份的会话，行级可见性由身份决定
pub struct MemoryBackend {
    store: MemoryStore,
    viewer: Viewer,
}

fn assessment_id(item: &AssessmentItem) -> &str {
    &item.id
}

fn course_id(item: &CourseItem) -> &str {
    &item.id
}

/// 在“服务端”执行过滤，按过滤后的顺序输出原始行
fn pushdown<R, T>(rows: Vec<R>, filter: &FilterState, id_of: fn(&T) -> &str) -> Result<Vec<Row>>
where
    R: Serialize + Clone + Into<T>,
    T: Filterable + Clone,
{
    let mut by_id = HashMap::with_capacity(rows.len());
    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        let item: T = row.clone().into();
        by_id.insert(id_of(&item).to_string(), row);
        items.push(item);
    }

    engine::apply(&items, filter)
        .iter()
        .filter_map(|item| by_id.remove(id_of(item)))
        .map(|row| serde_json::to_value(row).map_err(AmsError::from))
        .collect()
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn fetch_filtered(&self, entity: EntityType, filter: &FilterState) -> Result<Vec<Row>> {
        self.store.inner.fetch_count.fetch_add(1, Ordering::SeqCst);
        let latency = self.store.inner.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
        if let Err(e) = self.store.check_reachable() {
            warn!("Fetch of {} failed: {}", entity.label(), e);
            return Err(e);
        }

        let rows = match entity {
            EntityType::Assessment => pushdown(
                views::assessment_rows(&self.store, &self.viewer),
                filter,
                assessment_id,
            )?,
            EntityType::Course => {
                pushdown(views::course_rows(&self.store, &self.viewer), filter, course_id)?
            }
        };
        debug!(
            "Fetched {} {} rows for {}",
            rows.len(),
            entity.label(),
            self.viewer.user_id
        );
        Ok(rows)
    }

    fn subscribe(&self, kinds: &[ChangeKind]) -> Result<Subscription> {
        if self.store.inner.offline.load(Ordering::SeqCst) {
            return Err(AmsError::remote("realtime channel unavailable"));
        }
        Ok(self.store.subscribe_raw(kinds))
    }

    async fn mutate(&self, action: MutationAction) -> Result<MutationOutcome> {
        self.store.check_reachable()?;
        let outcome = self.store.apply_mutation(&self.viewer, action)?;
        self.store
            .publish(ChangeEvent::new(outcome.kind, outcome.record_id.clone()));
        Ok(outcome)
    }
}
