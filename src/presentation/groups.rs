use std::collections::HashMap;

use serde::Serialize;

use crate::models::assessments::entities::AssessmentItem;

/// 按课程分组的考核表
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseGroup<R> {
    pub course_id: String,
    pub course_code: String,
    pub course_title: String,
    pub rows: Vec<R>,
}

/// 分组顺序按课程首次出现的位置，组内保持输入顺序
pub fn group_by_course(items: &[AssessmentItem]) -> Vec<CourseGroup<AssessmentItem>> {
    let mut groups: Vec<CourseGroup<AssessmentItem>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for item in items {
        let position = *index.entry(item.course_id.as_str()).or_insert_with(|| {
            groups.push(CourseGroup {
                course_id: item.course_id.clone(),
                course_code: item.course_code.clone(),
                course_title: item.course_title.clone(),
                rows: Vec::new(),
            });
            groups.len() - 1
        });
        groups[position].rows.push(item.clone());
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures::assessment;

    #[test]
    fn test_groups_keep_first_appearance_order() {
        let mut items = vec![
            assessment("a1", "Quiz 1", 1),
            assessment("a2", "Midterm", 2),
            assessment("a3", "Quiz 2", 3),
        ];
        items[1].course_id = "c2".into();
        items[1].course_code = "MATH201".into();

        let groups = group_by_course(&items);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].course_code, "CS101");
        let ids: Vec<_> = groups[0].rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a3"]);
        assert_eq!(groups[1].rows[0].id, "a2");
    }

    #[test]
    fn test_empty_input() {
        assert!(group_by_course(&[]).is_empty());
    }
}
