//! 评分轮询服务 - 业务能力层
//!
//! 只负责"等一个评分任务出分"，不关心答卷流程

use crate::api::GradingApi;
use crate::config::Config;
use crate::models::{AssessmentResult, PendingAssessment, Skill, Submission};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// 轮询参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// 单个任务最多查询次数
    pub max_attempts: u32,
    pub base_interval: Duration,
    /// 同一答卷中每多一个并发评分题目增加的间隔
    pub step: Duration,
    pub max_interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 40,
            base_interval: Duration::from_millis(3000),
            step: Duration::from_millis(1000),
            max_interval: Duration::from_millis(10000),
        }
    }
}

impl PollPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_attempts: config.poll_max_attempts,
            base_interval: Duration::from_millis(config.poll_base_interval_ms),
            step: Duration::from_millis(config.poll_step_ms),
            max_interval: Duration::from_millis(config.poll_max_interval_ms),
        }
    }
}

/// 计算轮询间隔：`min(base + (total - 1) * step, max)`
///
/// 同一答卷并发评分的题目越多，间隔越长，避免压垮评分服务
pub fn poll_interval(total_assessments: usize, policy: &PollPolicy) -> Duration {
    let extra = total_assessments.saturating_sub(1) as u32;
    let interval = policy.base_interval.saturating_add(policy.step.saturating_mul(extra));
    interval.min(policy.max_interval)
}

/// 单个任务的轮询状态
#[derive(Debug)]
enum PollState {
    Polling { attempt: u32 },
    Graded(Submission),
    TimedOut,
}

/// 评分轮询服务
///
/// 职责：
/// - 反复查询单个评分任务，直到出分或次数用尽
/// - 查询失败只记录日志，继续下一次
/// - 超时作为正常结果返回，不是错误
#[derive(Debug, Clone)]
pub struct GradingPoller {
    policy: PollPolicy,
}

impl GradingPoller {
    pub fn new(policy: PollPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// 轮询一个评分任务
    ///
    /// # 参数
    /// - `api`: 后端接口
    /// - `skill`: 决定查询口语还是写作接口
    /// - `pending`: 已创建的评分任务
    /// - `total_assessments`: 本答卷同时评分的题目数，用于计算间隔
    pub async fn poll<A: GradingApi>(
        &self,
        api: &A,
        skill: Skill,
        pending: &PendingAssessment,
        total_assessments: usize,
    ) -> AssessmentResult {
        let interval = poll_interval(total_assessments, &self.policy);
        let mut state = PollState::Polling { attempt: 1 };

        loop {
            state = match state {
                PollState::Polling { attempt } => {
                    match self.fetch(api, skill, &pending.submission_id).await {
                        Some(submission) if submission.is_graded() => {
                            PollState::Graded(submission)
                        }
                        _ if attempt >= self.policy.max_attempts => PollState::TimedOut,
                        _ => {
                            debug!(
                                "题目 {} 尚未出分 ({}/{})，{:?} 后重试",
                                pending.question_id, attempt, self.policy.max_attempts, interval
                            );
                            sleep(interval).await;
                            PollState::Polling {
                                attempt: attempt + 1,
                            }
                        }
                    }
                }
                PollState::Graded(submission) => {
                    info!(
                        "✓ 题目 {} 已出分: {:?}",
                        pending.question_id, submission.ai_score
                    );
                    return AssessmentResult::graded(pending, submission);
                }
                PollState::TimedOut => {
                    warn!(
                        "⚠️ 题目 {} 轮询 {} 次仍未出分 (submission: {})",
                        pending.question_id, self.policy.max_attempts, pending.submission_id
                    );
                    return AssessmentResult::timed_out(pending);
                }
            };
        }
    }

    /// 查询一次，失败返回 None
    async fn fetch<A: GradingApi>(
        &self,
        api: &A,
        skill: Skill,
        submission_id: &str,
    ) -> Option<Submission> {
        let (endpoint, result) = match skill {
            Skill::Writing => (
                "api/writing-submissions",
                api.get_writing_submission(submission_id).await,
            ),
            _ => (
                "api/speaking-submissions",
                api.get_speaking_submission(submission_id).await,
            ),
        };

        match result.into_result(endpoint) {
            Ok(submission) => Some(submission),
            Err(e) => {
                warn!("查询评分任务 {} 失败: {}", submission_id, e);
                None
            }
        }
    }
}

impl Default for GradingPoller {
    fn default() -> Self {
        Self::new(PollPolicy::default())
    }
}
