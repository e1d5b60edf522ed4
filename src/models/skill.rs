use serde::{Deserialize, Serialize};

/// 测验技能枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Skill {
    /// 听力
    Listening,
    /// 阅读
    Reading,
    /// 口语
    Speaking,
    /// 写作
    Writing,
}

impl Skill {
    /// 获取接口使用的名称
    pub fn code(self) -> &'static str {
        match self {
            Skill::Listening => "LISTENING",
            Skill::Reading => "READING",
            Skill::Speaking => "SPEAKING",
            Skill::Writing => "WRITING",
        }
    }

    /// 获取越南语显示名称
    pub fn label(self) -> &'static str {
        match self {
            Skill::Listening => "Nghe",
            Skill::Reading => "Đọc",
            Skill::Speaking => "Nói",
            Skill::Writing => "Viết",
        }
    }

    /// 口语和写作需要异步 AI 评分，听力和阅读由服务端同步评分
    pub fn needs_async_grading(self) -> bool {
        matches!(self, Skill::Speaking | Skill::Writing)
    }

    /// 尝试从字符串解析技能（忽略大小写，支持越南语名称）
    pub fn from_str(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "listening" | "nghe" => Some(Skill::Listening),
            "reading" | "đọc" | "doc" => Some(Skill::Reading),
            "speaking" | "nói" | "noi" => Some(Skill::Speaking),
            "writing" | "viết" | "viet" => Some(Skill::Writing),
            _ => None,
        }
    }
}

impl std::fmt::Display for Skill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// 题目类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    SingleChoice,
    MultipleChoice,
    FillBlank,
    Speaking,
    Writing,
}

impl QuestionType {
    /// 是否为主观题（需要录音或作文，异步评分）
    pub fn is_constructed_response(self) -> bool {
        matches!(self, QuestionType::Speaking | QuestionType::Writing)
    }
}
