//! 用户提示与流程错误
//!
//! 面向用户的提示文案统一使用越南语

use thiserror::Error;

/// 面向用户的提示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserNotice {
    /// 整张答卷提交失败，可重新提交
    SubmitFailed,
    /// 已评分答案加载失败
    LoadAnswersFailed,
    /// 单题重新提交失败
    RetryFailed,
    /// 单题重新提交成功
    RetrySucceeded,
    /// 评分尚未完成
    GradingPending,
}

impl UserNotice {
    pub fn message(self) -> &'static str {
        match self {
            UserNotice::SubmitFailed => "Nộp bài thất bại. Vui lòng thử lại.",
            UserNotice::LoadAnswersFailed => "Không thể tải kết quả bài làm.",
            UserNotice::RetryFailed => "Gửi lại câu trả lời thất bại. Vui lòng thử lại sau.",
            UserNotice::RetrySucceeded => "Gửi lại câu trả lời thành công.",
            UserNotice::GradingPending => "Đang chấm điểm, kết quả chưa sẵn sàng.",
        }
    }

    /// 是否允许用户重试整个操作
    pub fn is_retryable(self) -> bool {
        matches!(self, UserNotice::SubmitFailed | UserNotice::RetryFailed)
    }
}

impl std::fmt::Display for UserNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// 流程级错误（会中断整个流程）
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("{}: {reason}", UserNotice::SubmitFailed)]
    SubmitFailed { reason: String },

    #[error("{}: {reason}", UserNotice::LoadAnswersFailed)]
    LoadAnswersFailed { attempt_id: String, reason: String },

    #[error("{}: {reason}", UserNotice::RetryFailed)]
    RetryFailed { question_id: String, reason: String },

    #[error(transparent)]
    Invalid(#[from] crate::error::AppError),
}

impl WorkflowError {
    /// 对应的用户提示
    pub fn notice(&self) -> UserNotice {
        match self {
            WorkflowError::SubmitFailed { .. } | WorkflowError::Invalid(_) => {
                UserNotice::SubmitFailed
            }
            WorkflowError::LoadAnswersFailed { .. } => UserNotice::LoadAnswersFailed,
            WorkflowError::RetryFailed { .. } => UserNotice::RetryFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_starts_with_notice() {
        let err = WorkflowError::SubmitFailed {
            reason: "HTTP 500".to_string(),
        };
        assert_eq!(err.notice(), UserNotice::SubmitFailed);
        assert!(err.to_string().starts_with("Nộp bài thất bại"));
        assert!(err.notice().is_retryable());
    }

    #[test]
    fn pending_notice_is_not_an_error() {
        assert!(!UserNotice::GradingPending.is_retryable());
        assert!(!UserNotice::GradingPending.message().is_empty());
    }
}
