//! 防抖查询协调器
//!
//! 每个列表页面拥有一个协调器。它是一个 tokio 任务，独占自己的状态：
//! - 过滤条件变化或刷新请求会重置静默窗口，窗口结束后只发出一次请求
//! - 每个请求带有代数，返回时代数不是最新的结果直接丢弃
//! - 请求失败时推送错误提示，保留上一次成功的结果
//! - 关闭后不再应用任何结果

mod snapshot;
mod source;

pub use snapshot::{FetchTrigger, QueryPhase, QuerySnapshot};
pub use source::{AssessmentSource, BackendSource, CourseSource, ListSource};

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, warn};

use crate::config::QueryConfig;
use crate::errors::{AmsError, Result};
use crate::models::filters::FilterState;
use crate::services::notices::NoticeBoard;

#[derive(Debug)]
enum Command {
    Load { generation: u64 },
    Update { generation: u64, filter: FilterState },
    Refresh { generation: u64 },
    Close,
}

/// 可克隆的命令句柄，供刷新桥等协作者使用
#[derive(Debug, Clone)]
pub struct CoordinatorHandle {
    commands: mpsc::UnboundedSender<Command>,
    generation: Arc<AtomicU64>,
}

impl CoordinatorHandle {
    fn send(&self, build: impl FnOnce(u64) -> Command) -> Result<u64> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.commands
            .send(build(generation))
            .map_err(|_| AmsError::channel("query coordinator is closed"))?;
        Ok(generation)
    }

    /// 立即取数，不等待静默窗口
    pub fn load(&self) -> Result<u64> {
        self.send(|generation| Command::Load { generation })
    }

    /// 提交新的过滤条件，返回该请求的代数
    pub fn update(&self, filter: FilterState) -> Result<u64> {
        self.send(|generation| Command::Update { generation, filter })
    }

    /// 在当前过滤条件下重新取数
    pub fn refresh(&self) -> Result<u64> {
        self.send(|generation| Command::Refresh { generation })
    }

    /// 最近一次分配的代数
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}

type FetchOutput<T> = (u64, FetchTrigger, FilterState, Result<Vec<T>>);

struct Worker<T> {
    source: Arc<dyn ListSource<T>>,
    debounce: Duration,
    notices: NoticeBoard,
    publisher: watch::Sender<QuerySnapshot<T>>,
    filter: FilterState,
    generation: u64,
    pending_trigger: Option<FetchTrigger>,
    deadline: Option<Instant>,
    in_flight: JoinSet<FetchOutput<T>>,
}

impl<T: Send + Sync + 'static> Worker<T> {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        loop {
            let deadline = self.deadline;
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Load { generation }) => {
                        self.advance(generation, FetchTrigger::Mount);
                        self.issue();
                    }
                    Some(Command::Update { generation, filter }) => {
                        self.filter = filter;
                        self.advance(generation, FetchTrigger::Filter);
                        self.arm();
                    }
                    Some(Command::Refresh { generation }) => {
                        self.advance(generation, FetchTrigger::Refresh);
                        self.arm();
                    }
                    Some(Command::Close) | None => break,
                },
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.issue();
                }
                Some(joined) = self.in_flight.join_next(), if !self.in_flight.is_empty() => {
                    self.on_response(joined);
                }
            }
        }

        // 丢弃所有未完成的请求
        self.in_flight.abort_all();
        debug!("Query coordinator for {} stopped", self.source.name());
    }

    fn advance(&mut self, generation: u64, trigger: FetchTrigger) {
        self.generation = self.generation.max(generation);
        self.pending_trigger = Some(match self.pending_trigger {
            Some(existing) => existing.merge(trigger),
            None => trigger,
        });
    }

    /// 重新开始静默窗口
    fn arm(&mut self) {
        self.deadline = Some(Instant::now() + self.debounce);
        let filter = self.filter.clone();
        let generation = self.generation;
        self.publisher.send_modify(|s| {
            s.phase = QueryPhase::Pending;
            s.filter = filter;
            s.generation = generation;
        });
        debug!(
            "{}: change #{} scheduled in {:?}",
            self.source.name(),
            generation,
            self.debounce
        );
    }

    fn issue(&mut self) {
        self.deadline = None;
        let generation = self.generation;
        let trigger = self
            .pending_trigger
            .take()
            .unwrap_or(FetchTrigger::Refresh);
        let filter = self.filter.clone();

        let source = Arc::clone(&self.source);
        let request = filter.clone();
        self.in_flight.spawn(async move {
            let result = source.fetch(&request).await;
            (generation, trigger, request, result)
        });

        self.publisher.send_modify(|s| {
            s.phase = QueryPhase::InFlight;
            s.filter = filter;
            s.generation = generation;
        });
        debug!(
            "{}: fetch #{} issued ({:?})",
            self.source.name(),
            generation,
            trigger
        );
    }

    fn on_response(&mut self, joined: std::result::Result<FetchOutput<T>, JoinError>) {
        let (generation, trigger, filter, result) = match joined {
            Ok(output) => output,
            Err(e) if e.is_cancelled() => return,
            Err(e) => {
                warn!("{}: fetch task panicked: {}", self.source.name(), e);
                if self.in_flight.is_empty() && self.deadline.is_none() {
                    self.fail(AmsError::remote("fetch task failed"));
                }
                return;
            }
        };

        if generation != self.generation {
            debug!(
                "{}: discarding stale response #{} (latest #{})",
                self.source.name(),
                generation,
                self.generation
            );
            return;
        }

        match result {
            Ok(items) => {
                debug!(
                    "{}: fetch #{} settled with {} items",
                    self.source.name(),
                    generation,
                    items.len()
                );
                self.publisher.send_modify(|s| {
                    // 首次结果不算数量变化
                    if trigger.is_user_driven()
                        && s.settled_generation.is_some()
                        && s.items.len() != items.len()
                    {
                        s.last_user_resize = Some(generation);
                    }
                    s.phase = QueryPhase::Settled;
                    s.items = Arc::new(items);
                    s.settled_filter = Some(filter);
                    s.settled_generation = Some(generation);
                    s.settled_trigger = Some(trigger);
                    s.last_error = None;
                });
            }
            Err(e) => self.fail(e),
        }
    }

    fn fail(&mut self, error: AmsError) {
        warn!("{}: fetch failed: {}", self.source.name(), error);
        self.notices.error(format!(
            "Failed to load {}: {}",
            self.source.name(),
            error.message()
        ));
        self.publisher.send_modify(|s| {
            s.phase = QueryPhase::Error;
            s.last_error = Some(error);
        });
    }
}

/// 列表查询协调器，drop 或 `close` 后停止
pub struct QueryCoordinator<T> {
    handle: CoordinatorHandle,
    snapshots: watch::Receiver<QuerySnapshot<T>>,
    task: Option<JoinHandle<()>>,
}

impl<T: Send + Sync + 'static> QueryCoordinator<T> {
    /// 启动协调器任务，初始状态为 Idle，调用 `load` 开始首次取数
    pub fn spawn(
        source: Arc<dyn ListSource<T>>,
        initial: FilterState,
        config: &QueryConfig,
        notices: NoticeBoard,
    ) -> Self {
        let (commands, receiver) = mpsc::unbounded_channel();
        let (publisher, snapshots) = watch::channel(QuerySnapshot::initial(initial.clone()));

        let worker = Worker {
            source,
            debounce: config.debounce(),
            notices,
            publisher,
            filter: initial,
            generation: 0,
            pending_trigger: None,
            deadline: None,
            in_flight: JoinSet::new(),
        };
        let task = tokio::spawn(worker.run(receiver));

        Self {
            handle: CoordinatorHandle {
                commands,
                generation: Arc::new(AtomicU64::new(0)),
            },
            snapshots,
            task: Some(task),
        }
    }

    pub fn handle(&self) -> CoordinatorHandle {
        self.handle.clone()
    }

    pub fn load(&self) -> Result<u64> {
        self.handle.load()
    }

    pub fn update(&self, filter: FilterState) -> Result<u64> {
        self.handle.update(filter)
    }

    pub fn refresh(&self) -> Result<u64> {
        self.handle.refresh()
    }

    pub fn current_generation(&self) -> u64 {
        self.handle.current_generation()
    }

    pub fn snapshot(&self) -> QuerySnapshot<T> {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<QuerySnapshot<T>> {
        self.snapshots.clone()
    }

    /// 等待代数不小于 `target` 的请求结束
    pub async fn wait_resolved(&self, target: u64) -> Result<QuerySnapshot<T>> {
        let mut receiver = self.snapshots.clone();
        let resolved = receiver
            .wait_for(|s| s.is_resolved(target))
            .await
            .map(|s| s.clone());
        resolved.map_err(|_| AmsError::channel("query coordinator stopped"))
    }

    /// 等待最近一次请求结束
    pub async fn wait_settled(&self) -> Result<QuerySnapshot<T>> {
        self.wait_resolved(self.current_generation()).await
    }

    /// 停止协调器，之后不会再应用任何结果
    pub async fn close(mut self) {
        let _ = self.handle.commands.send(Command::Close);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Query coordinator task ended abnormally: {}", e);
            }
        }
    }
}

impl<T> Drop for QueryCoordinator<T> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
