use chrono::{DateTime, Utc};

use super::{Filterable, SortKey};
use crate::models::assessments::entities::{
    AssessmentItem, AssessmentType, ResultsStatus, SubmissionStatus,
};
use crate::models::courses::entities::CourseItem;
use crate::models::filters::SortField;
// 按未取整的比例排序，显示用的百分比会把相近的值并列
fn number_or_missing(value: Option<f64>) -> SortKey {
    value.map_or(SortKey::Missing, SortKey::Number)
}

impl Filterable for AssessmentItem {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.course_code.as_str(),
            self.course_title.as_str(),
        ]
    }

    fn course_id(&self) -> Option<&str> {
        Some(self.course_id.as_str())
    }

    fn assessment_type(&self) -> Option<AssessmentType> {
        Some(self.assessment_type)
    }

    fn submission_status(&self) -> Option<SubmissionStatus> {
        Some(self.submission_status)
    }

    fn results_status(&self) -> Option<ResultsStatus> {
        Some(self.results_status)
    }

    fn due_date(&self) -> Option<DateTime<Utc>> {
        Some(self.due_date)
    }

    fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    fn sort_key(&self, field: SortField) -> SortKey {
        match field {
            SortField::Date => SortKey::Date(self.due_date),
            SortField::Title | SortField::Name => SortKey::Text(self.title.clone()),
            SortField::Grade => number_or_missing(self.grade_ratio()),
            SortField::Status => SortKey::Number(f64::from(self.submission_status.rank())),
            SortField::Newest => SortKey::Date(self.created_at),
            SortField::Updated => SortKey::Date(self.updated_at),
            // 教师视角：已批改 / 已提交
            SortField::Progress => number_or_missing(self.marking_ratio()),
            SortField::Code => SortKey::Text(self.course_code.clone()),
            SortField::Assessments => SortKey::Missing,
        }
    }
}

impl Filterable for CourseItem {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.code.as_str()];
        if let Some(instructor) = &self.instructor_name {
            fields.push(instructor.as_str());
        }
        fields
    }

    fn course_id(&self) -> Option<&str> {
        Some(self.id.as_str())
    }

    fn sort_key(&self, field: SortField) -> SortKey {
        match field {
            SortField::Title | SortField::Name => SortKey::Text(self.name.clone()),
            SortField::Code => SortKey::Text(self.code.clone()),
            SortField::Newest => SortKey::Date(self.created_at),
            SortField::Updated => SortKey::Date(self.updated_at),
            SortField::Progress => number_or_missing(self.progress_ratio()),
            SortField::Assessments => SortKey::Number(f64::from(self.assessment_count)),
            SortField::Date | SortField::Grade | SortField::Status => SortKey::Missing,
        }
    }
}
