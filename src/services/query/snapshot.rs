use std::sync::Arc;

use serde::Serialize;

use crate::errors::AmsError;
use crate::models::filters::FilterState;

/// 协调器所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryPhase {
    Idle,     // 尚未取数
    Pending,  // 等待静默窗口结束
    InFlight, // 请求已发出
    Settled,  // 最新请求已返回
    Error,    // 最新请求失败，保留上一次的结果
}

/// 触发取数的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchTrigger {
    Mount,   // 首次加载
    Filter,  // 用户修改了过滤条件
    Refresh, // 实时推送触发的刷新
}

impl FetchTrigger {
    /// 同一窗口内合并的触发原因，优先级 Mount > Filter > Refresh
    pub fn merge(self, other: FetchTrigger) -> FetchTrigger {
        fn rank(trigger: FetchTrigger) -> u8 {
            match trigger {
                FetchTrigger::Mount => 2,
                FetchTrigger::Filter => 1,
                FetchTrigger::Refresh => 0,
            }
        }
        if rank(other) > rank(self) { other } else { self }
    }

    pub fn is_user_driven(self) -> bool {
        !matches!(self, FetchTrigger::Refresh)
    }
}

/// 对外发布的只读状态
#[derive(Debug)]
pub struct QuerySnapshot<T> {
    pub phase: QueryPhase,
    /// 最新请求的过滤条件
    pub filter: FilterState,
    /// 最新请求的代数
    pub generation: u64,
    /// 最近一次成功应用的结果
    pub items: Arc<Vec<T>>,
    pub settled_filter: Option<FilterState>,
    pub settled_generation: Option<u64>,
    pub settled_trigger: Option<FetchTrigger>,
    /// 最近一次改变了结果数量的用户触发取数的代数
    pub last_user_resize: Option<u64>,
    pub last_error: Option<AmsError>,
}

impl<T> Clone for QuerySnapshot<T> {
    fn clone(&self) -> Self {
        Self {
            phase: self.phase,
            filter: self.filter.clone(),
            generation: self.generation,
            items: Arc::clone(&self.items),
            settled_filter: self.settled_filter.clone(),
            settled_generation: self.settled_generation,
            settled_trigger: self.settled_trigger,
            last_user_resize: self.last_user_resize,
            last_error: self.last_error.clone(),
        }
    }
}

impl<T> QuerySnapshot<T> {
    pub fn initial(filter: FilterState) -> Self {
        Self {
            phase: QueryPhase::Idle,
            filter,
            generation: 0,
            items: Arc::new(Vec::new()),
            settled_filter: None,
            settled_generation: None,
            settled_trigger: None,
            last_user_resize: None,
            last_error: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, QueryPhase::Pending | QueryPhase::InFlight)
    }

    /// 代数不小于 `target` 的请求已经结束（成功或失败）
    pub fn is_resolved(&self, target: u64) -> bool {
        self.generation >= target && matches!(self.phase, QueryPhase::Settled | QueryPhase::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_merge_prefers_user_intent() {
        assert_eq!(
            FetchTrigger::Refresh.merge(FetchTrigger::Filter),
            FetchTrigger::Filter
        );
        assert_eq!(
            FetchTrigger::Filter.merge(FetchTrigger::Refresh),
            FetchTrigger::Filter
        );
        assert_eq!(
            FetchTrigger::Mount.merge(FetchTrigger::Filter),
            FetchTrigger::Mount
        );
    }

    #[test]
    fn test_initial_snapshot_is_not_resolved() {
        let snapshot = QuerySnapshot::<u32>::initial(FilterState::unconstrained());
        assert_eq!(snapshot.phase, QueryPhase::Idle);
        assert!(!snapshot.is_resolved(0));
        assert!(!snapshot.is_loading());
    }
}
