pub mod attempt;
pub mod draft;
pub mod loaders;
pub mod skill;
pub mod submission;

pub use attempt::{
    AnswerInput, AnswerRecord, Attempt, AttemptStatus, GradedAnswer, SubmitAttemptRequest,
    SubmittedAttempt,
};
pub use draft::{AnswerDraft, AttemptDraft, AudioClip};
pub use loaders::{load_all_drafts, load_draft};
pub use skill::{QuestionType, Skill};
pub use submission::{
    AssessmentOutcome, AssessmentResult, PendingAssessment, Submission, SubmissionTicket,
};
