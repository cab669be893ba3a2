use serde::{Deserialize, Serialize};

/// 列表默认每页条目数
pub const DEFAULT_PAGE_SIZE: usize = 12;

// 分页响应信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// 分页游标
///
/// `current_page` 从 1 开始；总页数由外部传入的条目数推导。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    pub current_page: usize,
    pub page_size: usize,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PageCursor {
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// 跳转到指定页，超出范围时夹到 [1, total_pages]
    pub fn go_to(&mut self, page: usize, total: usize) {
        self.current_page = page;
        self.clamp(total);
    }

    /// 当前页超出末页时回退到最后一个有效页
    pub fn clamp(&mut self, total: usize) {
        let last = crate::engine::total_pages(total, self.page_size).max(1);
        self.current_page = self.current_page.clamp(1, last);
    }

    /// 当前页第一条的偏移量
    pub fn offset(&self) -> usize {
        (self.current_page.max(1) - 1) * self.page_size
    }

    pub fn info(&self, total: usize) -> PaginationInfo {
        PaginationInfo {
            page: self.current_page,
            page_size: self.page_size,
            total,
            total_pages: crate::engine::total_pages(total, self.page_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page_size() {
        let cursor = PageCursor::default();
        assert_eq!(cursor.current_page, 1);
        assert_eq!(cursor.page_size, 12);
    }

    #[test]
    fn test_clamp_to_last_valid_page() {
        let mut cursor = PageCursor::new(12);
        cursor.current_page = 3;
        cursor.clamp(24);
        assert_eq!(cursor.current_page, 2);

        cursor.clamp(0);
        assert_eq!(cursor.current_page, 1);
    }

    #[test]
    fn test_go_to_and_offset() {
        let mut cursor = PageCursor::new(10);
        cursor.go_to(3, 25);
        assert_eq!(cursor.current_page, 3);
        assert_eq!(cursor.offset(), 20);
        cursor.go_to(9, 25);
        assert_eq!(cursor.current_page, 3);
        cursor.go_to(0, 25);
        assert_eq!(cursor.current_page, 1);
    }

    #[test]
    fn test_info() {
        let cursor = PageCursor::new(12);
        let info = cursor.info(25);
        assert_eq!(info.total_pages, 3);
        assert_eq!(info.total, 25);
        assert_eq!(cursor.info(0).total_pages, 0);
    }
}
