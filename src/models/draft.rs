use serde::{Deserialize, Serialize};

use crate::error::BusinessError;
use crate::models::attempt::AnswerInput;
use crate::models::skill::{QuestionType, Skill};

/// 录音数据（口语题的客户端载荷）
#[derive(Clone)]
pub struct AudioClip {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl AudioClip {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// 根据扩展名推断 MIME 类型
    pub fn mime_for(file_name: &str) -> &'static str {
        let ext = file_name.rsplit('.').next().unwrap_or_default().to_lowercase();
        match ext.as_str() {
            "webm" => "audio/webm",
            "wav" => "audio/wav",
            "mp3" => "audio/mpeg",
            "m4a" => "audio/mp4",
            "ogg" => "audio/ogg",
            _ => "application/octet-stream",
        }
    }
}

impl std::fmt::Debug for AudioClip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioClip")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// 单题作答草稿
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerDraft {
    pub question_id: String,
    #[serde(default)]
    pub question_content: String,
    pub question_type: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_option_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// 录音文件路径（相对于草稿文件）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_file: Option<String>,
    #[serde(skip)]
    pub audio: Option<AudioClip>,
}

impl AnswerDraft {
    /// 写作题：非空文本
    pub fn written_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }

    /// 转换为提交答卷时的答案
    pub fn to_input(&self) -> AnswerInput {
        AnswerInput {
            question_id: self.question_id.clone(),
            selected_option_id: self.selected_option_id.clone(),
            text: self.written_text().map(str::to_string),
        }
    }
}

/// 一次答卷的完整草稿
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptDraft {
    pub quiz_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(deserialize_with = "deserialize_skill")]
    pub skill: Skill,
    #[serde(default)]
    pub answers: Vec<AnswerDraft>,
    #[serde(skip)]
    pub file_path: Option<String>,
}

impl AttemptDraft {
    /// 用于日志显示的名称
    pub fn display_name(&self) -> &str {
        if self.title.is_empty() {
            &self.quiz_id
        } else {
            &self.title
        }
    }

    /// 按题目 ID 查找草稿
    pub fn answer_for(&self, question_id: &str) -> Option<&AnswerDraft> {
        self.answers.iter().find(|a| a.question_id == question_id)
    }

    pub fn with_file_path(mut self, file_path: String) -> Self {
        self.file_path = Some(file_path);
        self
    }
}

// 技能字段既可以写接口名称，也可以写越南语名称
fn deserialize_skill<'de, D>(deserializer: D) -> Result<Skill, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Skill::from_str(&raw).ok_or_else(|| {
        serde::de::Error::custom(BusinessError::SkillParseFailed { skill: raw })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writing(text: Option<&str>) -> AnswerDraft {
        AnswerDraft {
            question_id: "q1".to_string(),
            question_content: String::new(),
            question_type: QuestionType::Writing,
            selected_option_id: None,
            text: text.map(str::to_string),
            audio_file: None,
            audio: None,
        }
    }

    #[test]
    fn blank_text_is_not_a_payload() {
        assert_eq!(writing(Some("   \n")).written_text(), None);
        assert_eq!(writing(None).written_text(), None);
        assert_eq!(writing(Some("My essay")).written_text(), Some("My essay"));
    }

    #[test]
    fn mime_is_inferred_from_extension() {
        assert_eq!(AudioClip::mime_for("rec.WEBM"), "audio/webm");
        assert_eq!(AudioClip::mime_for("rec.wav"), "audio/wav");
        assert_eq!(AudioClip::mime_for("rec"), "application/octet-stream");
    }
}
