//! 运行日志辅助函数
//!
//! 批量运行的开头、结尾横幅以及日志文件头

use crate::config::Config;
use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use tracing::info;

const BANNER_WIDTH: usize = 60;

fn banner() -> String {
    "=".repeat(BANNER_WIDTH)
}

fn now() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// 覆盖写入运行日志文件头
pub fn init_log_file(config: &Config) -> Result<()> {
    let header = format!(
        "{rule}\n答卷评分日志 - {time}\n后端: {api}\n草稿目录: {drafts}\n{rule}\n\n",
        rule = banner(),
        time = now(),
        api = config.api_base_url,
        drafts = config.draft_folder,
    );
    fs::write(&config.output_log_file, header)
        .with_context(|| format!("无法写入日志文件: {}", config.output_log_file))
}

/// 启动横幅，列出本次运行的关键参数
pub fn log_startup(config: &Config) {
    info!("{}", banner());
    info!("🚀 答卷提交与评分轮询 启动");
    info!("🌐 后端地址: {}", config.api_base_url);
    info!("📊 最大并发答卷数: {}", config.max_concurrent_attempts);
    info!(
        "⏱️ 轮询: 最多 {} 次, 间隔 {}ms + {}ms/题, 上限 {}ms",
        config.poll_max_attempts,
        config.poll_base_interval_ms,
        config.poll_step_ms,
        config.poll_max_interval_ms
    );
    info!("{}", banner());
}

pub fn log_drafts_loaded(total: usize, folder: &str) {
    info!("✓ {} 中找到 {} 份待提交的答卷", folder, total);
}

/// 结束横幅
///
/// `submitted` 为整张答卷提交成功的数量，不代表所有题目都已出分
pub fn print_final_stats(submitted: usize, failed: usize, total: usize, config: &Config) {
    info!("\n{}", banner());
    info!("📊 批量处理结束 ({})", now());
    info!("✅ 已提交: {}/{}", submitted, total);
    if failed > 0 {
        info!("❌ 失败: {} (草稿保留，可重新运行)", failed);
    }
    info!("📝 评分报告: {}", config.report_folder);
    info!("⏳ 超时题目记录: {}", config.pending_file);
    info!("{}", banner());
    info!("日志文件: {}", config.output_log_file);
}

/// 按字符截断长文本，超出部分以 `...` 结尾
pub fn truncate_text(text: &str, max_len: usize) -> String {
    match text.char_indices().nth(max_len) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_by_chars_not_bytes() {
        assert_eq!(truncate_text("Xin chào các bạn", 8), "Xin chào...");
        assert_eq!(truncate_text("ngắn", 10), "ngắn");
        assert_eq!(truncate_text("đúng", 4), "đúng");
    }

    #[test]
    fn log_file_header_mentions_backend() {
        let path = std::env::temp_dir().join(format!("practice_grading_log_{}.txt", std::process::id()));
        let config = Config {
            output_log_file: path.to_string_lossy().into_owned(),
            api_base_url: "https://lms.example.com".to_string(),
            ..Config::default()
        };

        init_log_file(&config).unwrap();
        let header = fs::read_to_string(&path).unwrap();
        assert!(header.contains("https://lms.example.com"));

        fs::remove_file(&path).ok();
    }
}
