pub mod lms_client;
pub mod session;

pub use lms_client::LmsClient;
pub use session::{AuthUser, Session};
