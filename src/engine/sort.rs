use std::cmp::Ordering;

use super::{Filterable, SortKey};
use crate::models::filters::{SortField, SortOrder};

/// 稳定排序；降序只是把比较结果取反，相等的条目仍保持输入顺序
pub fn sort_items<T: Filterable>(items: Vec<T>, field: SortField, order: SortOrder) -> Vec<T> {
    // 先取出排序键，避免比较时反复构造字符串
    let mut keyed: Vec<(SortKey, T)> = items
        .into_iter()
        .map(|item| (item.sort_key(field), item))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        let ordering = compare_keys(a, b);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    keyed.into_iter().map(|(_, item)| item).collect()
}

/// 缺失值最小；数字、日期按值比较；文本按不区分大小写的顺序比较
pub fn compare_keys(a: &SortKey, b: &SortKey) -> Ordering {
    match (a, b) {
        (SortKey::Missing, SortKey::Missing) => Ordering::Equal,
        (SortKey::Missing, _) => Ordering::Less,
        (_, SortKey::Missing) => Ordering::Greater,
        (SortKey::Number(x), SortKey::Number(y)) => x.total_cmp(y),
        (SortKey::Date(x), SortKey::Date(y)) => x.cmp(y),
        (SortKey::Text(x), SortKey::Text(y)) => compare_text(x, y),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

fn kind_rank(key: &SortKey) -> u8 {
    match key {
        SortKey::Missing => 0,
        SortKey::Number(_) => 1,
        SortKey::Date(_) => 2,
        SortKey::Text(_) => 3,
    }
}

/// 近似区域化比较：先忽略大小写，再让小写排在大写之前
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| {
            a.chars()
                .zip(b.chars())
                .find(|(x, y)| x != y)
                .map_or(Ordering::Equal, |(x, _)| {
                    if x.is_lowercase() {
                        Ordering::Less
                    } else {
                        Ordering::Greater
                    }
                })
        })
        .then_with(|| a.len().cmp(&b.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures::{assessment, base_time};
    use chrono::Duration;

    #[test]
    fn test_compare_text_ignores_case_first() {
        assert_eq!(compare_text("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_text("Zebra", "apple"), Ordering::Greater);
        assert_eq!(compare_text("quiz", "Quiz"), Ordering::Less);
        assert_eq!(compare_text("Quiz", "Quiz"), Ordering::Equal);
    }

    #[test]
    fn test_missing_is_lowest() {
        assert_eq!(
            compare_keys(&SortKey::Missing, &SortKey::Number(-1.0)),
            Ordering::Less
        );
        assert_eq!(
            compare_keys(&SortKey::Text("a".into()), &SortKey::Missing),
            Ordering::Greater
        );
    }

    #[test]
    fn test_sort_by_title() {
        let items = vec![
            assessment("1", "project", 0),
            assessment("2", "Essay", 0),
            assessment("3", "lab", 0),
        ];
        let sorted = sort_items(items, SortField::Title, SortOrder::Asc);
        let titles: Vec<_> = sorted.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Essay", "lab", "project"]);
    }

    #[test]
    fn test_sort_by_status_keeps_ties_in_input_order() {
        let mut a = assessment("a", "A", 0);
        a.submission_status = crate::models::assessments::entities::SubmissionStatus::Graded;
        let b = assessment("b", "B", 0);
        let c = assessment("c", "C", 0);
        let sorted = sort_items(vec![b, a, c], SortField::Status, SortOrder::Desc);
        let ids: Vec<_> = sorted.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_sort_newest_first() {
        let mut old = assessment("old", "Old", 0);
        old.created_at = base_time() - Duration::days(10);
        let mut new = assessment("new", "New", 0);
        new.created_at = base_time();
        let sorted = sort_items(vec![old, new], SortField::Newest, SortOrder::Desc);
        assert_eq!(sorted[0].id, "new");
    }
}
