//! 评分任务创建服务 - 业务能力层
//!
//! 只负责为单个答案创建评分任务

use crate::api::{ApiResult, GradingApi};
use crate::models::{AnswerDraft, AnswerRecord, PendingAssessment, Skill, SubmissionTicket};
use tracing::{debug, error};

/// 评分任务创建服务
///
/// 职责：
/// - 口语：有录音才上传
/// - 写作：有非空文本才提交
/// - 创建失败返回 None，不影响其他题目
#[derive(Debug, Clone, Default)]
pub struct SubmissionService;

impl SubmissionService {
    pub fn new() -> Self {
        Self
    }

    /// 该答案是否有可提交的客户端载荷
    pub fn has_payload(skill: Skill, draft: &AnswerDraft) -> bool {
        match skill {
            Skill::Speaking => draft.audio.is_some(),
            Skill::Writing => draft.written_text().is_some(),
            Skill::Listening | Skill::Reading => false,
        }
    }

    /// 为单个答案创建评分任务
    ///
    /// # 返回
    /// 成功返回待轮询的任务；缺少载荷或接口失败返回 None
    pub async fn create<A: GradingApi>(
        &self,
        api: &A,
        skill: Skill,
        attempt_id: &str,
        record: &AnswerRecord,
        draft: &AnswerDraft,
    ) -> Option<PendingAssessment> {
        let result: ApiResult<SubmissionTicket> = match skill {
            Skill::Speaking => {
                let audio = match draft.audio.as_ref() {
                    Some(audio) => audio,
                    None => {
                        debug!("题目 {} 没有录音，跳过", record.question_id);
                        return None;
                    }
                };
                api.create_speaking_submission(attempt_id, &record.answer_id, audio)
                    .await
            }
            Skill::Writing => {
                if draft.written_text().is_none() {
                    debug!("题目 {} 作文为空，跳过", record.question_id);
                    return None;
                }
                api.create_writing_submission(attempt_id, &record.answer_id)
                    .await
            }
            Skill::Listening | Skill::Reading => return None,
        };

        match result.into_result("create-submission") {
            Ok(ticket) => {
                debug!(
                    "题目 {} 已创建评分任务 {}",
                    record.question_id, ticket.id
                );
                Some(PendingAssessment {
                    submission_id: ticket.id,
                    answer_id: record.answer_id.clone(),
                    question_id: record.question_id.clone(),
                    question_content: draft.question_content.clone(),
                    question_type: draft.question_type,
                })
            }
            Err(e) => {
                error!(
                    "❌ 题目 {} 创建评分任务失败: {}",
                    record.question_id, e
                );
                None
            }
        }
    }
}
