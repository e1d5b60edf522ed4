//! 答卷评分流程 - 流程层
//!
//! 核心职责：定义"一张答卷"从提交到拿到评分结果的完整流程
//!
//! 流程顺序：
//! 1. 一次性提交整张答卷
//! 2. 口语/写作：为每道有载荷的主观题创建评分任务并轮询，所有题目并发进行
//! 3. 等待全部题目出分或超时后汇总
//! 4. 听力/阅读：直接获取服务端已评分的答案

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::api::GradingApi;
use crate::clients::Session;
use crate::error::{AppError, BusinessError};
use crate::models::{
    AnswerDraft, AnswerRecord, AssessmentResult, Attempt, AttemptDraft, AttemptStatus,
    GradedAnswer, PendingAssessment, SubmitAttemptRequest,
};
use crate::services::{GradingPoller, PollPolicy, SubmissionService};
use crate::workflow::attempt_ctx::AttemptCtx;
use crate::workflow::notice::{UserNotice, WorkflowError};

/// 一张答卷的评分汇总
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptReport {
    pub attempt: Attempt,
    /// 服务端持久化的答案记录
    pub answers: Vec<AnswerRecord>,
    /// 已创建的评分任务，查看答卷时据此重新轮询
    pub pending: Vec<PendingAssessment>,
    pub assessments: Vec<AssessmentResult>,
    /// 客观题评分结果
    pub graded_answers: Vec<GradedAnswer>,
    /// 答卷已提交但评分结果加载失败时的原因
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_error: Option<String>,
}

impl AttemptReport {
    fn new(ctx: &AttemptCtx, answers: Vec<AnswerRecord>, started_at: DateTime<Utc>) -> Self {
        Self {
            attempt: Attempt {
                id: ctx.attempt_id.clone(),
                quiz_id: ctx.quiz_id.clone(),
                skill: ctx.skill,
                status: AttemptStatus::Submitted,
                started_at: Some(started_at),
                submitted_at: Some(Utc::now()),
                score: None,
                max_score: None,
            },
            answers,
            pending: Vec::new(),
            assessments: Vec::new(),
            graded_answers: Vec::new(),
            load_error: None,
        }
    }

    pub fn attempt_id(&self) -> &str {
        &self.attempt.id
    }

    pub fn graded_count(&self) -> usize {
        self.assessments.iter().filter(|a| !a.is_timeout()).count()
    }

    pub fn timed_out_count(&self) -> usize {
        self.assessments.iter().filter(|a| a.is_timeout()).count()
    }

    /// 超时未出分的评分任务
    pub fn timed_out_pending(&self) -> Vec<&PendingAssessment> {
        self.assessments
            .iter()
            .filter(|a| a.is_timeout())
            .filter_map(|a| self.pending.iter().find(|p| p.question_id == a.question_id))
            .collect()
    }

    /// 根据当前结果更新答卷状态与总分
    fn settle(&mut self) {
        let (status, score) = if self.attempt.skill.needs_async_grading() {
            let scores: Vec<f64> = self.assessments.iter().filter_map(|a| a.ai_score()).collect();
            let status = if self.assessments.is_empty() {
                AttemptStatus::Submitted
            } else if self.timed_out_count() > 0 {
                AttemptStatus::PendingReview
            } else {
                AttemptStatus::AutoGraded
            };
            (status, sum_scores(&scores))
        } else if self.load_error.is_some() {
            (AttemptStatus::Submitted, None)
        } else {
            let scores: Vec<f64> = self.graded_answers.iter().filter_map(|a| a.score).collect();
            (AttemptStatus::AutoGraded, sum_scores(&scores))
        };

        self.attempt.status = status;
        self.attempt.score = score;
    }

    fn ctx(&self) -> AttemptCtx {
        AttemptCtx::new(
            self.attempt.id.clone(),
            self.attempt.quiz_id.clone(),
            self.attempt.skill,
            0,
        )
    }
}

fn sum_scores(scores: &[f64]) -> Option<f64> {
    if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum())
    }
}

/// 答卷评分流程
///
/// - 编排完整的答卷评分流程
/// - 不持有文件等资源，只依赖后端接口和业务能力（services）
/// - 没有取消机制，一旦开始就会等到所有题目出分或超时
pub struct AssessmentFlow<A: GradingApi> {
    api: Arc<A>,
    submissions: SubmissionService,
    poller: GradingPoller,
    user_id: Option<String>,
}

impl<A: GradingApi> AssessmentFlow<A> {
    pub fn new(api: Arc<A>, policy: PollPolicy) -> Self {
        Self {
            api,
            submissions: SubmissionService::new(),
            poller: GradingPoller::new(policy),
            user_id: None,
        }
    }

    /// 绑定当前登录用户
    pub fn with_session(mut self, session: &Session) -> Self {
        self.user_id = session.user_id().map(str::to_string);
        self
    }

    /// 提交答卷并等待评分结果
    ///
    /// 整张答卷提交失败是致命错误，不会进行任何轮询。
    /// 提交成功后的任何失败都记录在报告中，答卷本身已存在于服务端
    pub async fn submit(
        &self,
        draft: &AttemptDraft,
        index: usize,
    ) -> Result<AttemptReport, WorkflowError> {
        if draft.answers.is_empty() {
            return Err(AppError::from(BusinessError::EmptyAttempt {
                quiz_id: draft.quiz_id.clone(),
            })
            .into());
        }

        let started_at = Utc::now();
        let request = SubmitAttemptRequest {
            quiz_id: draft.quiz_id.clone(),
            skill: draft.skill,
            user_id: self.user_id.clone(),
            started_at,
            answers: draft.answers.iter().map(AnswerDraft::to_input).collect(),
        };

        info!("[答卷 {}] 📤 正在提交答卷: {}", index, draft.display_name());

        let submitted = self
            .api
            .submit_attempt(&request)
            .await
            .into_result("api/attempts")
            .map_err(|e| {
                error!("[答卷 {}] ❌ 答卷提交失败: {}", index, e);
                WorkflowError::SubmitFailed {
                    reason: e.to_string(),
                }
            })?;

        let ctx = AttemptCtx::new(submitted.id.clone(), draft.quiz_id.clone(), draft.skill, index);
        info!("{} ✓ 答卷提交成功，共 {} 个答案", ctx, submitted.answers.len());

        let mut report = AttemptReport::new(&ctx, submitted.answers, started_at);

        if ctx.skill.needs_async_grading() {
            let settled = self.assess_answers(&ctx, &report.answers, draft).await;
            for (pending, result) in settled {
                report.pending.push(pending);
                report.assessments.push(result);
            }
        } else {
            match self.load_graded_answers(&ctx).await {
                Ok(answers) => report.graded_answers = answers,
                Err(e) => report.load_error = Some(e.to_string()),
            }
        }

        report.settle();
        self.log_report(&ctx, &report);

        Ok(report)
    }

    /// 为所有有载荷的主观题创建评分任务并并发轮询
    ///
    /// 创建失败的题目直接丢弃，不影响其他题目；结果保持答案顺序
    async fn assess_answers(
        &self,
        ctx: &AttemptCtx,
        records: &[AnswerRecord],
        draft: &AttemptDraft,
    ) -> Vec<(PendingAssessment, AssessmentResult)> {
        let tasks: Vec<(&AnswerRecord, &AnswerDraft)> = records
            .iter()
            .filter_map(|record| {
                let answer = draft.answer_for(&record.question_id)?;
                if !answer.question_type.is_constructed_response() {
                    return None;
                }
                if !SubmissionService::has_payload(ctx.skill, answer) {
                    debug!("{} 题目 {} 没有可提交的内容，跳过", ctx, record.question_id);
                    return None;
                }
                Some((record, answer))
            })
            .collect();

        let total = tasks.len();
        if total == 0 {
            warn!("{} ⚠️ 没有需要评分的主观题", ctx);
            return Vec::new();
        }

        info!(
            "{} 🔍 开始评分 {} 道题，轮询间隔 {:?}",
            ctx,
            total,
            crate::services::poll_interval(total, self.poller.policy())
        );

        let api = self.api.as_ref();
        let tasks: Vec<_> = tasks
            .into_iter()
            .map(|(record, answer)| async move {
                let pending = self
                    .submissions
                    .create(api, ctx.skill, &ctx.attempt_id, record, answer)
                    .await?;
                let result = self.poller.poll(api, ctx.skill, &pending, total).await;
                Some((pending, result))
            })
            .collect();

        join_all(tasks).await.into_iter().flatten().collect()
    }

    /// 对已存在的评分任务重新轮询（查看历史答卷）
    ///
    /// 已出分的任务第一次查询就会返回
    pub async fn poll_all(
        &self,
        ctx: &AttemptCtx,
        pending: &[PendingAssessment],
    ) -> Vec<AssessmentResult> {
        let total = pending.len();
        let api = self.api.as_ref();
        let tasks: Vec<_> = pending
            .iter()
            .map(|p| self.poller.poll(api, ctx.skill, p, total))
            .collect();

        join_all(tasks).await
    }

    /// 查看答卷：刷新报告中的评分结果
    ///
    /// 客观题答卷重新获取已评分答案
    pub async fn view_attempt(&self, report: &mut AttemptReport) -> Result<(), WorkflowError> {
        let ctx = report.ctx();
        info!("{} 👀 查看答卷", ctx);

        if ctx.skill.needs_async_grading() {
            report.assessments = self.poll_all(&ctx, &report.pending).await;
        } else {
            report.graded_answers = self.load_graded_answers(&ctx).await?;
            report.load_error = None;
        }

        report.settle();
        self.log_report(&ctx, report);
        Ok(())
    }

    /// 重新提交单道主观题，成功后刷新整张答卷的评分结果
    pub async fn retry_submission(
        &self,
        report: &mut AttemptReport,
        answer: &AnswerDraft,
    ) -> Result<(), WorkflowError> {
        let ctx = report.ctx();

        let record = report
            .answers
            .iter()
            .find(|r| r.question_id == answer.question_id)
            .cloned()
            .ok_or_else(|| {
                AppError::from(BusinessError::AnswerNotInAttempt {
                    attempt_id: ctx.attempt_id.clone(),
                    question_id: answer.question_id.clone(),
                })
            })?;

        if !ctx.skill.needs_async_grading() || !answer.question_type.is_constructed_response() {
            return Err(WorkflowError::RetryFailed {
                question_id: record.question_id,
                reason: "không phải câu hỏi tự luận".to_string(),
            });
        }

        info!("{} 🔁 重新提交题目 {}", ctx, record.question_id);

        let created = self
            .submissions
            .create(self.api.as_ref(), ctx.skill, &ctx.attempt_id, &record, answer)
            .await;

        let Some(created) = created else {
            warn!("{} ⚠️ {}", ctx, UserNotice::RetryFailed);
            return Err(WorkflowError::RetryFailed {
                question_id: record.question_id,
                reason: "không tạo được yêu cầu chấm điểm".to_string(),
            });
        };

        info!("{} ✓ {}", ctx, UserNotice::RetrySucceeded);

        // 同一答案只保留最新的评分任务
        report.pending.retain(|p| p.answer_id != created.answer_id);
        report.pending.push(created);
        report.assessments = self.poll_all(&ctx, &report.pending).await;

        report.settle();
        self.log_report(&ctx, report);
        Ok(())
    }

    /// 客观题：获取服务端已评分的答案
    async fn load_graded_answers(
        &self,
        ctx: &AttemptCtx,
    ) -> Result<Vec<GradedAnswer>, WorkflowError> {
        let answers = self
            .api
            .get_attempt_answers(&ctx.attempt_id)
            .await
            .into_result("api/attempts/answers")
            .map_err(|e| {
                error!("{} ❌ 获取评分结果失败: {}", ctx, e);
                WorkflowError::LoadAnswersFailed {
                    attempt_id: ctx.attempt_id.clone(),
                    reason: e.to_string(),
                }
            })?;

        info!("{} ✓ 获取到 {} 个已评分答案", ctx, answers.len());
        Ok(answers)
    }

    // ========== 日志辅助方法 ==========

    fn log_report(&self, ctx: &AttemptCtx, report: &AttemptReport) {
        if ctx.skill.needs_async_grading() {
            info!(
                "{} 📊 评分完成: 出分 {} / 超时 {} (状态: {:?}, 总分: {:?})",
                ctx,
                report.graded_count(),
                report.timed_out_count(),
                report.attempt.status,
                report.attempt.score
            );
            if report.timed_out_count() > 0 {
                warn!("{} ⚠️ {}", ctx, UserNotice::GradingPending);
            }
        } else if let Some(reason) = &report.load_error {
            warn!("{} ⚠️ 答卷已提交，但评分结果加载失败: {}", ctx, reason);
        } else {
            info!(
                "{} 📊 客观题 {} 个 (总分: {:?})",
                ctx,
                report.graded_answers.len(),
                report.attempt.score
            );
        }
    }
}
