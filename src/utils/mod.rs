pub mod status;
pub mod validate;

pub use status::{
    SubmissionTiming, Urgency, classify_results, classify_submission, is_overdue, late_duration,
    percentage, ratio, urgency,
};
