pub mod grading_poller;
pub mod pending_writer;
pub mod submission_service;

pub use grading_poller::{poll_interval, GradingPoller, PollPolicy};
pub use pending_writer::PendingWriter;
pub use submission_service::SubmissionService;
