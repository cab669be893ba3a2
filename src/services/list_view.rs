use std::sync::Arc;

use crate::backend::{Backend, ChangeKind, Subscription};
use crate::config::QueryConfig;
use crate::engine::{self, tags::FilterTag, tags::active_filter_tags};
use crate::errors::{AmsError, Result};
use crate::models::common::pagination::{PageCursor, PaginationInfo};
use crate::models::filters::{FilterKey, FilterState, FilterUpdate, ListKind};
use crate::services::notices::NoticeBoard;
use crate::services::query::{ListSource, QueryCoordinator, QueryPhase, QuerySnapshot};
use crate::services::refresh::RefreshBridge;

/// 分页策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationPolicy {
    /// 表格：结果变化时只夹紧页码
    Table,
    /// 卡片网格：用户触发的取数改变了结果数量时回到第一页
    Grid,
}

/// 当前页的渲染数据
#[derive(Debug, Clone)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
    pub phase: QueryPhase,
    pub loading: bool,
    pub tags: Vec<FilterTag>,
    pub active_filter_count: usize,
    pub error: Option<AmsError>,
}

/// 一个列表页面：过滤状态、分页游标与查询协调器
pub struct ListView<T> {
    kind: ListKind,
    filter: FilterState,
    cursor: PageCursor,
    policy: PaginationPolicy,
    coordinator: QueryCoordinator<T>,
    bridge: Option<RefreshBridge>,
    last_seen_resize: Option<u64>,
}

impl<T: Clone + Send + Sync + 'static> ListView<T> {
    /// 打开页面并立即开始首次取数
    pub fn open(
        kind: ListKind,
        source: Arc<dyn ListSource<T>>,
        config: &QueryConfig,
        notices: NoticeBoard,
        policy: PaginationPolicy,
    ) -> Result<Self> {
        let filter = FilterState::for_view(kind);
        let coordinator = QueryCoordinator::spawn(source, filter.clone(), config, notices);
        coordinator.load()?;
        Ok(Self {
            kind,
            filter,
            cursor: PageCursor::new(config.page_size),
            policy,
            coordinator,
            bridge: None,
            last_seen_resize: None,
        })
    }

    /// 订阅后端变更，事件到达时刷新列表
    pub fn with_live_refresh(mut self, backend: &dyn Backend, kinds: &[ChangeKind]) -> Result<Self> {
        let bridge = RefreshBridge::attach(backend, kinds, self.coordinator.handle())?;
        self.bridge = Some(bridge);
        Ok(self)
    }

    pub fn attach_subscription(&mut self, subscription: Subscription) {
        self.bridge = Some(RefreshBridge::spawn(
            subscription,
            self.coordinator.handle(),
        ));
    }

    pub fn kind(&self) -> ListKind {
        self.kind
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn coordinator(&self) -> &QueryCoordinator<T> {
        &self.coordinator
    }

    /// 排序字段必须属于当前视图，否则返回校验错误且不改变状态
    pub fn apply(&mut self, update: FilterUpdate) -> Result<()> {
        if let FilterUpdate::SortField(Some(field)) = &update {
            if !self.kind.sort_fields().contains(field) {
                return Err(AmsError::validation(format!(
                    "Cannot sort this list by {}",
                    field.label()
                )));
            }
        }
        let next = self.filter.update(update);
        self.set_filter(next)
    }

    /// 移除一个过滤标签
    pub fn remove_filter(&mut self, key: FilterKey) -> Result<()> {
        let next = self.filter.clear(key);
        self.set_filter(next)
    }

    pub fn clear_filters(&mut self) -> Result<()> {
        let next = self.filter.clear_all();
        self.set_filter(next)
    }

    fn set_filter(&mut self, next: FilterState) -> Result<()> {
        if next == self.filter {
            return Ok(());
        }
        // 仅排序变化时保留页码
        if !next.predicate_eq(&self.filter) {
            self.cursor.reset();
        }
        self.filter = next;
        self.coordinator.update(self.filter.clone())?;
        Ok(())
    }

    pub fn refresh(&self) -> Result<u64> {
        self.coordinator.refresh()
    }

    /// 根据最新结果修正页码
    fn sync(&mut self) -> QuerySnapshot<T> {
        let snapshot = self.coordinator.snapshot();
        let total = snapshot.items.len();
        // 协调器记录每次数量变化，两次渲染之间的后续刷新不会掩盖它
        if snapshot.last_user_resize != self.last_seen_resize {
            if self.policy == PaginationPolicy::Grid {
                self.cursor.reset();
            }
            self.last_seen_resize = snapshot.last_user_resize;
        }
        self.cursor.clamp(total);
        snapshot
    }

    pub fn go_to_page(&mut self, page: usize) -> ListPage<T> {
        let total = self.sync().items.len();
        self.cursor.go_to(page, total);
        self.current_page()
    }

    pub fn next_page(&mut self) -> ListPage<T> {
        let page = self.cursor.current_page + 1;
        self.go_to_page(page)
    }

    pub fn previous_page(&mut self) -> ListPage<T> {
        let page = self.cursor.current_page.saturating_sub(1);
        self.go_to_page(page)
    }

    pub fn current_page(&mut self) -> ListPage<T> {
        let snapshot = self.sync();
        let total = snapshot.items.len();
        let items =
            engine::page(&snapshot.items, self.cursor.current_page, self.cursor.page_size).to_vec();
        ListPage {
            items,
            pagination: self.cursor.info(total),
            phase: snapshot.phase,
            loading: snapshot.is_loading(),
            tags: active_filter_tags(&self.filter),
            active_filter_count: self.filter.active_filter_count(),
            error: snapshot.last_error.clone(),
        }
    }

    /// 等待最近一次请求结束后返回当前页
    pub async fn wait_settled(&mut self) -> Result<ListPage<T>> {
        self.coordinator.wait_settled().await?;
        Ok(self.current_page())
    }

    pub async fn close(mut self) {
        if let Some(bridge) = self.bridge.take() {
            bridge.detach();
        }
        self.coordinator.close().await;
    }
}
