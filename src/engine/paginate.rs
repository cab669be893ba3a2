/// `ceil(count / page_size)`，空集合为 0 页
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// 取第 `page_number` 页（从 1 开始）
///
/// 页码越界时返回空切片而不是报错；需要夹紧页码的调用方自己处理。
pub fn page<T>(items: &[T], page_number: usize, page_size: usize) -> &[T] {
    if page_number == 0 || page_size == 0 {
        return &[];
    }
    let start = (page_number - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 12), 0);
        assert_eq!(total_pages(1, 12), 1);
        assert_eq!(total_pages(12, 12), 1);
        assert_eq!(total_pages(13, 12), 2);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_page_slices() {
        let items: Vec<u32> = (1..=25).collect();
        assert_eq!(page(&items, 1, 12), &items[0..12]);
        assert_eq!(page(&items, 3, 12), &[25]);
    }

    #[test]
    fn test_out_of_range_page_is_empty() {
        let items: Vec<u32> = (1..=25).collect();
        assert!(page(&items, 4, 12).is_empty());
        assert!(page(&items, 0, 12).is_empty());
        assert!(page(&items, usize::MAX, 12).is_empty());
        assert!(page::<u32>(&[], 1, 12).is_empty());
    }
}
