use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::backend::{Backend, ChangeKind, Delivery, Subscription};
use crate::errors::Result;
use crate::services::query::CoordinatorHandle;

/// 把后端推送的变更事件转成协调器的刷新请求
///
/// 事件只作为“需要重新取数”的信号，不读取其中的数据。
/// 刷新走协调器的防抖窗口，连续的事件合并为一次请求。
pub struct RefreshBridge {
    task: Option<JoinHandle<()>>,
}

impl RefreshBridge {
    pub fn spawn(mut subscription: Subscription, coordinator: CoordinatorHandle) -> Self {
        let task = tokio::spawn(async move {
            while let Some(delivery) = subscription.recv().await {
                match &delivery {
                    Delivery::Event(event) => {
                        debug!("Change {:?} on {}, refreshing", event.kind, event.record_id);
                    }
                    Delivery::Missed(count) => {
                        warn!("Missed {} change events, refreshing", count);
                    }
                }
                if coordinator.refresh().is_err() {
                    debug!("Coordinator closed, refresh bridge stopping");
                    break;
                }
            }
        });
        Self { task: Some(task) }
    }

    /// 订阅指定类型的变更并连接到协调器
    pub fn attach(
        backend: &dyn Backend,
        kinds: &[ChangeKind],
        coordinator: CoordinatorHandle,
    ) -> Result<Self> {
        let subscription = backend.subscribe(kinds)?;
        Ok(Self::spawn(subscription, coordinator))
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// 取消订阅
    pub fn detach(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for RefreshBridge {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tokio::sync::broadcast;

    use crate::backend::ChangeEvent;
    use crate::config::QueryConfig;
    use crate::engine::fixtures;
    use crate::models::filters::FilterState;
    use crate::services::notices::NoticeBoard;
    use crate::services::query::tests::RecordingSource;
    use crate::services::query::{FetchTrigger, QueryCoordinator};

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_events_coalesces_into_one_refresh() {
        let source = RecordingSource::new(fixtures::sample_items(), Duration::ZERO);
        let coordinator = QueryCoordinator::spawn(
            source.clone(),
            FilterState::unconstrained(),
            &QueryConfig::default(),
            NoticeBoard::new(4),
        );
        coordinator.load().unwrap();
        coordinator.wait_settled().await.unwrap();

        let (tx, rx) = broadcast::channel(16);
        let bridge = RefreshBridge::spawn(
            Subscription::new(rx, &[ChangeKind::GradeChanged]),
            coordinator.handle(),
        );
        for i in 0..5 {
            tx.send(ChangeEvent::new(ChangeKind::GradeChanged, format!("g{i}")))
                .unwrap();
        }
        // 不关心的类型不会触发刷新
        tx.send(ChangeEvent::new(ChangeKind::UserChanged, "u1")).unwrap();

        tokio::time::sleep(Duration::from_millis(10)).await;
        let snapshot = coordinator.wait_settled().await.unwrap();
        assert_eq!(source.calls().len(), 2);
        assert_eq!(snapshot.settled_trigger, Some(FetchTrigger::Refresh));
        assert_eq!(snapshot.settled_generation, Some(6));
        assert!(bridge.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_bridge_stops_when_channel_closes() {
        let source = RecordingSource::new(Vec::new(), Duration::ZERO);
        let coordinator = QueryCoordinator::spawn(
            source,
            FilterState::unconstrained(),
            &QueryConfig::default(),
            NoticeBoard::new(4),
        );
        let (tx, rx) = broadcast::channel::<ChangeEvent>(4);
        let bridge = RefreshBridge::spawn(Subscription::new(rx, &[]), coordinator.handle());
        drop(tx);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!bridge.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_bridge_stops_when_coordinator_closes() {
        let source = RecordingSource::new(Vec::new(), Duration::ZERO);
        let coordinator = QueryCoordinator::spawn(
            source,
            FilterState::unconstrained(),
            &QueryConfig::default(),
            NoticeBoard::new(4),
        );
        let (tx, rx) = broadcast::channel(4);
        let bridge = RefreshBridge::spawn(Subscription::new(rx, &[]), coordinator.handle());
        coordinator.close().await;

        tx.send(ChangeEvent::new(ChangeKind::CourseChanged, "c1")).unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!bridge.is_running());
    }
}
