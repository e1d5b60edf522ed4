//! 待评分记录服务 - 业务能力层
//!
//! 只负责"写 pending.txt"能力，不关心流程

use crate::error::{AppError, AppResult};
use crate::models::PendingAssessment;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// 待评分记录服务
///
/// 将轮询超时的题目追加写入文件，之后可以通过"查看答卷"重新轮询
pub struct PendingWriter {
    pending_file_path: String,
}

impl PendingWriter {
    pub fn new() -> Self {
        Self {
            pending_file_path: "pending.txt".to_string(),
        }
    }

    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            pending_file_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.pending_file_path
    }

    /// 写入一条超时记录
    ///
    /// 格式：`答卷 | 答案 | 题目 | 评分任务`
    pub async fn write(&self, attempt_id: &str, pending: &PendingAssessment) -> AppResult<()> {
        debug!(
            "写入待评分记录: 答卷 {} | 题目 {}",
            attempt_id, pending.question_id
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.pending_file_path)
            .await
            .map_err(|e| AppError::file_write_failed(&self.pending_file_path, e))?;

        let line = format!(
            "{} | {} | {} | {}\n",
            attempt_id, pending.answer_id, pending.question_id, pending.submission_id
        );

        file.write_all(line.as_bytes())
            .await
            .map_err(|e| AppError::file_write_failed(&self.pending_file_path, e))?;

        Ok(())
    }
}

impl Default for PendingWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionType;

    #[tokio::test]
    async fn appends_one_line_per_timeout() {
        let path = std::env::temp_dir().join(format!("pending_{}.txt", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let writer = PendingWriter::with_path(path.display().to_string());

        let pending = PendingAssessment {
            submission_id: "s1".to_string(),
            answer_id: "a1".to_string(),
            question_id: "q1".to_string(),
            question_content: String::new(),
            question_type: QuestionType::Writing,
        };
        writer.write("att-1", &pending).await.unwrap();
        writer.write("att-1", &pending).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert_eq!(content.lines().next(), Some("att-1 | a1 | q1 | s1"));

        std::fs::remove_file(path).ok();
    }
}
