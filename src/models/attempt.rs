use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::models::skill::Skill;

/// 答卷状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttemptStatus {
    Started,
    Submitted,
    AutoGraded,
    PendingReview,
}

/// 一次答卷（用户对某个测验的一次提交）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub id: String,
    pub quiz_id: String,
    pub skill: Skill,
    pub status: AttemptStatus,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub max_score: Option<f64>,
}

/// 提交答卷时的单个答案
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerInput {
    pub question_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_option_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// 提交答卷请求体
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAttemptRequest {
    pub quiz_id: String,
    pub skill: Skill,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub started_at: DateTime<Utc>,
    pub answers: Vec<AnswerInput>,
}

/// 服务端持久化后的答案记录（提交后不可变）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub answer_id: String,
    pub question_id: String,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl AnswerRecord {
    pub fn new(answer_id: impl Into<String>, question_id: impl Into<String>) -> Self {
        Self {
            answer_id: answer_id.into(),
            question_id: question_id.into(),
            extra: Map::new(),
        }
    }
}

/// 提交答卷接口的返回
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAttempt {
    pub id: String,
    #[serde(default)]
    pub answers: Vec<AnswerRecord>,
}

/// 已由服务端同步评分的客观题答案
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedAnswer {
    pub answer_id: String,
    pub question_id: String,
    #[serde(default)]
    pub selected_option_id: Option<String>,
    #[serde(default)]
    pub is_correct: Option<bool>,
    #[serde(default)]
    pub score: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_record_keeps_unknown_fields() {
        let json = r#"{"answerId":"a1","questionId":"q1","content":"hello","points":2}"#;
        let record: AnswerRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.answer_id, "a1");
        assert_eq!(record.question_id, "q1");
        assert_eq!(record.extra.get("points"), Some(&serde_json::json!(2)));
    }

    #[test]
    fn submitted_attempt_tolerates_missing_answers() {
        let attempt: SubmittedAttempt = serde_json::from_str(r#"{"id":"att-9"}"#).unwrap();
        assert_eq!(attempt.id, "att-9");
        assert!(attempt.answers.is_empty());
    }

    #[test]
    fn attempt_status_wire_names() {
        let attempt: Attempt = serde_json::from_str(
            r#"{"id":"1","quizId":"q","skill":"READING","status":"AUTO_GRADED","score":7.5,"maxScore":10}"#,
        )
        .unwrap();
        assert_eq!(attempt.status, AttemptStatus::AutoGraded);
        assert_eq!(attempt.max_score, Some(10.0));
        assert!(attempt.started_at.is_none());
    }
}
