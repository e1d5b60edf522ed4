//! API 模块
//!
//! 定义工作流依赖的后端接口，以及所有接口统一的返回结构

pub mod result;

pub use result::ApiResult;

use std::future::Future;

use crate::models::{
    AudioClip, GradedAnswer, Submission, SubmissionTicket, SubmitAttemptRequest, SubmittedAttempt,
};

/// 评分相关的后端接口
///
/// 每个方法自行处理网络、状态码、解析错误，统一返回 `ApiResult`，不会 panic
pub trait GradingApi: Send + Sync {
    /// 一次性提交整张答卷
    fn submit_attempt(
        &self,
        request: &SubmitAttemptRequest,
    ) -> impl Future<Output = ApiResult<SubmittedAttempt>> + Send;

    /// 为口语答案上传录音并创建评分任务
    fn create_speaking_submission(
        &self,
        attempt_id: &str,
        answer_id: &str,
        audio: &AudioClip,
    ) -> impl Future<Output = ApiResult<SubmissionTicket>> + Send;

    /// 为写作答案创建评分任务
    fn create_writing_submission(
        &self,
        attempt_id: &str,
        answer_id: &str,
    ) -> impl Future<Output = ApiResult<SubmissionTicket>> + Send;

    /// 查询口语评分任务当前状态
    fn get_speaking_submission(
        &self,
        submission_id: &str,
    ) -> impl Future<Output = ApiResult<Submission>> + Send;

    /// 查询写作评分任务当前状态
    fn get_writing_submission(
        &self,
        submission_id: &str,
    ) -> impl Future<Output = ApiResult<Submission>> + Send;

    /// 获取答卷中已评分的客观题答案
    fn get_attempt_answers(
        &self,
        attempt_id: &str,
    ) -> impl Future<Output = ApiResult<Vec<GradedAnswer>>> + Send;
}
