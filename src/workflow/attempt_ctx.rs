//! 答卷处理上下文
//!
//! 封装"我正在处理哪一张答卷"这一信息

use std::fmt::Display;

use crate::models::Skill;

/// 答卷处理上下文
#[derive(Debug, Clone)]
pub struct AttemptCtx {
    /// 服务端答卷ID
    pub attempt_id: String,

    /// 测验ID
    pub quiz_id: String,

    pub skill: Skill,

    /// 答卷序号（仅用于日志显示）
    pub index: usize,
}

impl AttemptCtx {
    pub fn new(attempt_id: String, quiz_id: String, skill: Skill, index: usize) -> Self {
        Self {
            attempt_id,
            quiz_id,
            skill,
            index,
        }
    }
}

impl Display for AttemptCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[答卷 #{} ID#{} 测验#{} 技能#{}]",
            self.index, self.attempt_id, self.quiz_id, self.skill
        )
    }
}
