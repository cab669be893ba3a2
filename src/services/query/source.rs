use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use crate::backend::{Backend, RowProjection, decode_rows};
use crate::config::ApplyMode;
use crate::engine::{self, Filterable};
use crate::errors::Result;
use crate::models::assessments::entities::AssessmentItem;
use crate::models::courses::entities::CourseItem;
use crate::models::filters::FilterState;

/// 协调器的数据来源
#[async_trait]
pub trait ListSource<T>: Send + Sync {
    /// 用于日志与提示
    fn name(&self) -> &str;
    async fn fetch(&self, filter: &FilterState) -> Result<Vec<T>>;
}

/// 通过后端取数的列表来源
pub struct BackendSource<T> {
    backend: Arc<dyn Backend>,
    mode: ApplyMode,
    _item: PhantomData<fn() -> T>,
}

pub type AssessmentSource = BackendSource<AssessmentItem>;
pub type CourseSource = BackendSource<CourseItem>;

impl<T> BackendSource<T> {
    pub fn new(backend: Arc<dyn Backend>, mode: ApplyMode) -> Self {
        Self {
            backend,
            mode,
            _item: PhantomData,
        }
    }
}

#[async_trait]
impl<T> ListSource<T> for BackendSource<T>
where
    T: RowProjection + Filterable + Clone + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        T::ENTITY.label()
    }

    async fn fetch(&self, filter: &FilterState) -> Result<Vec<T>> {
        match self.mode {
            ApplyMode::Server => {
                let rows = self.backend.fetch_filtered(T::ENTITY, filter).await?;
                decode_rows(rows)
            }
            ApplyMode::Client => {
                // 拉取全部候选集，本地过滤排序
                let rows = self
                    .backend
                    .fetch_filtered(T::ENTITY, &FilterState::unconstrained())
                    .await?;
                let items: Vec<T> = decode_rows(rows)?;
                Ok(engine::apply(&items, filter))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::{MemoryStore, seed};
    use crate::models::filters::{FilterUpdate, SortField, SortOrder};
    use crate::models::users::entities::{UserRole, Viewer};

    fn backend() -> Arc<dyn Backend> {
        let store = MemoryStore::new(8);
        seed::seed_demo_data(&store, seed::demo_now());
        Arc::new(store.session(Viewer::new(seed::DEMO_ADMIN, UserRole::Admin)))
    }

    #[tokio::test]
    async fn test_server_and_client_modes_agree() {
        let backend = backend();
        let filter = FilterState::unconstrained()
            .update(FilterUpdate::Search("midterm".into()))
            .update(FilterUpdate::SortField(Some(SortField::Date)))
            .update(FilterUpdate::SortOrder(SortOrder::Desc));

        let server = AssessmentSource::new(backend.clone(), ApplyMode::Server);
        let client = AssessmentSource::new(backend, ApplyMode::Client);
        let a = server.fetch(&filter).await.unwrap();
        let b = client.fetch(&filter).await.unwrap();

        assert_eq!(a.len(), 2);
        assert_eq!(a, b);
        assert!(a[0].due_date >= a[1].due_date);
        assert_eq!(server.name(), "assessments");
    }

    #[tokio::test]
    async fn test_course_source() {
        let source = CourseSource::new(backend(), ApplyMode::Server);
        let filter =
            FilterState::unconstrained().update(FilterUpdate::Search("mensah".into()));
        let courses = source.fetch(&filter).await.unwrap();
        let codes: Vec<_> = courses.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["CS101", "CS205"]);
    }
}
