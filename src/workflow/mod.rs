pub mod assessment_flow;
pub mod attempt_ctx;
pub mod notice;

pub use assessment_flow::{AssessmentFlow, AttemptReport};
pub use attempt_ctx::AttemptCtx;
pub use notice::{UserNotice, WorkflowError};
