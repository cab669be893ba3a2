use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::warn;

/// 行级变更类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    CourseChanged,
    AssessmentChanged,
    SubmissionChanged,
    GradeChanged,
    UserChanged,
}

/// 推送通道上的事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub record_id: String,
    pub occurred_at: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind, record_id: impl Into<String>) -> Self {
        Self {
            kind,
            record_id: record_id.into(),
            occurred_at: Utc::now(),
        }
    }
}

/// 一次接收的结果
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Event(ChangeEvent),
    /// 接收端落后，丢失了若干事件
    Missed(u64),
}

/// 变更订阅，drop 即取消订阅
#[derive(Debug)]
pub struct Subscription {
    receiver: broadcast::Receiver<ChangeEvent>,
    kinds: Vec<ChangeKind>,
}

impl Subscription {
    /// `kinds` 为空时接收所有类型
    pub fn new(receiver: broadcast::Receiver<ChangeEvent>, kinds: &[ChangeKind]) -> Self {
        Self {
            receiver,
            kinds: kinds.to_vec(),
        }
    }

    fn wants(&self, kind: ChangeKind) -> bool {
        self.kinds.is_empty() || self.kinds.contains(&kind)
    }

    /// 等待下一条匹配的事件，通道关闭时返回 None
    pub async fn recv(&mut self) -> Option<Delivery> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.wants(event.kind) => return Some(Delivery::Event(event)),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("Change subscription lagged by {} events", n);
                    return Some(Delivery::Missed(n));
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
