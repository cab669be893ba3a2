//! 展示适配层
//!
//! 把引擎与协调器的输出转换为渲染用的视图模型，不包含任何业务判断。

pub mod badges;
pub mod cards;
pub mod groups;

pub use badges::{BadgeTone, StatusBadge};
pub use cards::{AssessmentCard, CourseCard, NO_VALUE, assessment_card, course_card};
pub use groups::{CourseGroup, group_by_course};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::engine::tags::FilterTag;
use crate::models::assessments::entities::AssessmentItem;
use crate::models::common::pagination::PaginationInfo;
use crate::models::courses::entities::CourseItem;
use crate::services::list_view::ListPage;

/// 一页卡片及其分页、过滤信息
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView<C> {
    pub cards: Vec<C>,
    pub pagination: PaginationInfo,
    pub active_filter_count: usize,
    pub tags: Vec<FilterTag>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<C> PageView<C> {
    fn from_page<T>(page: &ListPage<T>, render: impl Fn(&T) -> C) -> Self {
        Self {
            cards: page.items.iter().map(render).collect(),
            pagination: page.pagination.clone(),
            active_filter_count: page.active_filter_count,
            tags: page.tags.clone(),
            loading: page.loading,
            error: page.error.as_ref().map(|e| e.message().to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

pub fn assessment_page(page: &ListPage<AssessmentItem>, now: DateTime<Utc>) -> PageView<AssessmentCard> {
    PageView::from_page(page, |item| assessment_card(item, now))
}

pub fn course_page(page: &ListPage<CourseItem>) -> PageView<CourseCard> {
    PageView::from_page(page, course_card)
}

/// 当前页的分组表格
pub fn grouped_page(page: &ListPage<AssessmentItem>) -> Vec<CourseGroup<AssessmentItem>> {
    group_by_course(&page.items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures::{base_time, sample_items};
    use crate::models::common::pagination::PageCursor;
    use crate::services::query::QueryPhase;

    fn page() -> ListPage<AssessmentItem> {
        let items = sample_items();
        ListPage {
            pagination: PageCursor::new(12).info(items.len()),
            items,
            phase: QueryPhase::Settled,
            loading: false,
            tags: Vec::new(),
            active_filter_count: 0,
            error: None,
        }
    }

    #[test]
    fn test_assessment_page_renders_every_item() {
        let page = page();
        let view = assessment_page(&page, base_time());
        assert_eq!(view.cards.len(), page.items.len());
        assert_eq!(view.cards[0].id, page.items[0].id);
        assert_eq!(view.pagination.total, page.items.len());
        assert!(!view.is_empty());
    }

    #[test]
    fn test_grouped_page_covers_all_rows() {
        let page = page();
        let groups = grouped_page(&page);
        let total: usize = groups.iter().map(|g| g.rows.len()).sum();
        assert_eq!(total, page.items.len());
    }
}
