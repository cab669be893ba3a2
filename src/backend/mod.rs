//! 外部后端协作者
//!
//! 持久化、认证与实时推送都由托管后端负责，这里只定义三类调用：
//! - `fetch_filtered`：按过滤状态取行，可在服务端下推谓词
//! - `subscribe`：订阅行级变更事件（至少一次投递）
//! - `mutate`：一次用户操作对应一次原子远程调用

pub mod actions;
pub mod memory;
pub mod register;
pub mod subscription;

use std::sync::Arc;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::errors::{AmsError, Result};
use crate::models::assessments::entities::{AssessmentItem, AssessmentRow};
use crate::models::courses::entities::{CourseItem, CourseRow};
use crate::models::filters::FilterState;
use crate::models::users::entities::Viewer;

pub use actions::{MutationAction, MutationOutcome};
pub use subscription::{ChangeEvent, ChangeKind, Delivery, Subscription};

/// 后端返回的一行（JSON 对象）
pub type Row = serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Assessment,
    Course,
}

impl EntityType {
    pub fn label(&self) -> &'static str {
        match self {
            EntityType::Assessment => "assessments",
            EntityType::Course => "courses",
        }
    }
}

/// 已登录会话的后端客户端
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    // 按过滤状态获取行
    async fn fetch_filtered(&self, entity: EntityType, filter: &FilterState) -> Result<Vec<Row>>;
    // 订阅变更事件，丢弃返回值即取消订阅
    fn subscribe(&self, kinds: &[ChangeKind]) -> Result<Subscription>;
    // 执行一次变更
    async fn mutate(&self, action: MutationAction) -> Result<MutationOutcome>;
}

/// 后端连接器：为不同身份创建会话
pub trait BackendConnector: Send + Sync {
    fn name(&self) -> &'static str;
    fn connect(&self, viewer: Viewer) -> Arc<dyn Backend>;
}

/// 可以从后端行构造的列表条目
pub trait RowProjection: Sized + From<Self::Row> {
    type Row: DeserializeOwned;
    const ENTITY: EntityType;
}

impl RowProjection for AssessmentItem {
    type Row = AssessmentRow;
    const ENTITY: EntityType = EntityType::Assessment;
}

impl RowProjection for CourseItem {
    type Row = CourseRow;
    const ENTITY: EntityType = EntityType::Course;
}

/// 把后端行解码为列表条目，每次取数都构造全新的条目
pub fn decode_rows<T: RowProjection>(rows: Vec<Row>) -> Result<Vec<T>> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value::<T::Row>(row)
                .map(T::from)
                .map_err(|e| {
                    AmsError::serialization(format!("invalid {} row: {e}", T::ENTITY.label()))
                })
        })
        .collect()
}
