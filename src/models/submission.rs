use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::models::skill::QuestionType;

/// 创建评分任务接口的返回
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionTicket {
    pub id: String,
}

/// 口语/写作评分任务
///
/// 由后端评分 worker 异步写入 `ai_score`，客户端只读取不修改。
/// `ai_score` 只会从空变为有值，不会回退。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    #[serde(default)]
    pub answer_id: Option<String>,
    #[serde(default)]
    pub ai_score: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// 其余字段（评语、分项得分等）原样保留
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Submission {
    pub fn is_graded(&self) -> bool {
        self.ai_score.is_some()
    }
}

/// 已创建、等待评分的任务
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingAssessment {
    pub submission_id: String,
    pub answer_id: String,
    pub question_id: String,
    pub question_content: String,
    pub question_type: QuestionType,
}

/// 单题评分结果
#[derive(Debug, Clone, PartialEq, Serialize)]
/// 标签名不用 `status`，评分任务自带的字段会原样展开到同一层
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AssessmentOutcome {
    /// 已拿到 AI 评分
    Graded(Submission),
    /// 轮询次数用尽仍未出分
    TimedOut { timeout: bool },
}

/// 题目与其评分结果的组合，仅存在于一次查看过程中
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    pub question_id: String,
    pub question_content: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(flatten)]
    pub outcome: AssessmentOutcome,
}

impl AssessmentResult {
    pub fn graded(pending: &PendingAssessment, submission: Submission) -> Self {
        Self {
            question_id: pending.question_id.clone(),
            question_content: pending.question_content.clone(),
            question_type: pending.question_type,
            outcome: AssessmentOutcome::Graded(submission),
        }
    }

    pub fn timed_out(pending: &PendingAssessment) -> Self {
        Self {
            question_id: pending.question_id.clone(),
            question_content: pending.question_content.clone(),
            question_type: pending.question_type,
            outcome: AssessmentOutcome::TimedOut { timeout: true },
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.outcome, AssessmentOutcome::TimedOut { .. })
    }

    pub fn ai_score(&self) -> Option<f64> {
        match &self.outcome {
            AssessmentOutcome::Graded(submission) => submission.ai_score,
            AssessmentOutcome::TimedOut { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pending() -> PendingAssessment {
        PendingAssessment {
            submission_id: "s1".to_string(),
            answer_id: "a1".to_string(),
            question_id: "q1".to_string(),
            question_content: "Describe your hometown".to_string(),
            question_type: QuestionType::Speaking,
        }
    }

    #[test]
    fn graded_result_merges_submission_fields() {
        let submission: Submission =
            serde_json::from_value(json!({"id": "s1", "aiScore": 6.5, "feedback": "good"})).unwrap();
        let result = AssessmentResult::graded(&pending(), submission);

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["questionId"], "q1");
        assert_eq!(value["type"], "SPEAKING");
        assert_eq!(value["aiScore"], 6.5);
        assert_eq!(value["feedback"], "good");
        assert!(value.get("timeout").is_none());
    }

    #[test]
    fn backend_status_field_is_kept_once() {
        let submission: Submission = serde_json::from_value(
            json!({"id": "s1", "aiScore": 7.0, "status": "COMPLETED"}),
        )
        .unwrap();
        let result = AssessmentResult::graded(&pending(), submission);

        let text = serde_json::to_string(&result).unwrap();
        assert_eq!(text.matches("\"status\"").count(), 1);

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["status"], "COMPLETED");
        assert_eq!(value["outcome"], "graded");
    }

    #[test]
    fn timed_out_result_carries_marker() {
        let result = AssessmentResult::timed_out(&pending());
        assert!(result.is_timeout());
        assert_eq!(result.ai_score(), None);

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["timeout"], true);
        assert_eq!(value["outcome"], "timed_out");
        assert_eq!(value["questionContent"], "Describe your hometown");
    }

    #[test]
    fn null_score_means_not_graded() {
        let submission: Submission =
            serde_json::from_value(json!({"id": "s1", "aiScore": null})).unwrap();
        assert!(!submission.is_graded());
    }
}
