//! 单张答卷处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **流程调度**：把草稿交给 `AssessmentFlow`
//! 2. **文件标记**：提交成功后立即把草稿重命名为 `*.toml.done`
//! 3. **超时记录**：把超时未出分的题目写入 pending 文件
//! 4. **报告输出**：把评分汇总写成 JSON

use crate::api::GradingApi;
use crate::config::Config;
use crate::models::AttemptDraft;
use crate::services::PendingWriter;
use crate::utils::logging::truncate_text;
use crate::workflow::{AssessmentFlow, AttemptReport};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, warn};

/// 处理单张答卷
///
/// # 参数
/// - `flow`: 评分流程
/// - `draft`: 答卷草稿
/// - `index`: 答卷序号（用于日志）
/// - `config`: 配置
///
/// # 返回
/// 返回是否提交成功；提交之后的步骤失败只记录日志
pub async fn process_attempt<A: GradingApi>(
    flow: &AssessmentFlow<A>,
    draft: AttemptDraft,
    index: usize,
    config: &Config,
) -> Result<bool> {
    log_attempt_start(index, &draft);

    let report = match flow.submit(&draft, index).await {
        Ok(report) => report,
        Err(e) => {
            // 整张答卷提交失败：保留草稿，下次可重新提交
            error!("[答卷 {}] ❌ {} ({:?})", index, e, e.notice());
            return Ok(false);
        }
    };

    // 答卷已存在于服务端，先标记草稿，避免下次重复提交
    if let Err(e) = mark_done(draft.file_path.as_deref(), index).await {
        error!("[答卷 {}] ❌ 草稿标记失败 (答卷 {}): {:#}", index, report.attempt_id(), e);
    }

    record_pending(&report, config, index).await;

    match write_report(&report, &config.report_folder).await {
        Ok(path) => info!("[答卷 {}] 📝 报告已保存: {}", index, path.display()),
        Err(e) => error!(
            "[答卷 {}] ❌ 报告写入失败 (答卷 {}): {:#}",
            index,
            report.attempt_id(),
            e
        ),
    }

    if config.verbose_logging {
        log_assessment_details(index, &report);
    }
    log_attempt_complete(index, &report);

    Ok(true)
}

/// 记录超时题目，写入失败只记录日志
async fn record_pending(report: &AttemptReport, config: &Config, index: usize) {
    let writer = PendingWriter::with_path(&config.pending_file);

    for pending in report.timed_out_pending() {
        match writer.write(report.attempt_id(), pending).await {
            Ok(()) => warn!(
                "[答卷 {}] ⚠️ 已写入 {}: 题目 {}",
                index,
                writer.path(),
                pending.question_id
            ),
            Err(e) => error!("[答卷 {}] 写入待评分记录失败: {}", index, e),
        }
    }
}

/// 写入 JSON 报告
pub async fn write_report(report: &AttemptReport, folder: &str) -> Result<PathBuf> {
    fs::create_dir_all(folder)
        .await
        .with_context(|| format!("无法创建报告目录: {}", folder))?;

    let path = Path::new(folder).join(format!("{}.json", report.attempt_id()));
    let json = serde_json::to_string_pretty(report)?;

    fs::write(&path, json)
        .await
        .with_context(|| format!("无法写入报告: {}", path.display()))?;

    Ok(path)
}

/// 把已处理的草稿标记为完成
async fn mark_done(file_path: Option<&str>, index: usize) -> Result<()> {
    let Some(file_path) = file_path else {
        warn!("[答卷 {}] ⚠️ 文件路径未设置", index);
        return Ok(());
    };

    if !Path::new(file_path).exists() {
        warn!("[答卷 {}] ⚠️ 文件不存在: {}", index, file_path);
        return Ok(());
    }

    let done_path = format!("{}.done", file_path);
    fs::rename(file_path, &done_path)
        .await
        .with_context(|| format!("无法重命名文件: {}", file_path))?;
    info!("[答卷 {}] ✓ 草稿已标记完成: {}", index, done_path);

    Ok(())
}

// ========== 日志辅助函数 ==========

fn log_attempt_start(index: usize, draft: &AttemptDraft) {
    info!("[答卷 {}] 开始处理", index);
    info!("[答卷 {}] 名称: {}", index, truncate_text(draft.display_name(), 60));
    info!("[答卷 {}] 技能: {} ({})", index, draft.skill, draft.skill.label());
    info!("[答卷 {}] 答案总数: {}", index, draft.answers.len());
}

fn log_assessment_details(index: usize, report: &AttemptReport) {
    for result in &report.assessments {
        match result.ai_score() {
            Some(score) => info!(
                "[答卷 {}]   - {} {}: {}",
                index,
                result.question_id,
                truncate_text(&result.question_content, 40),
                score
            ),
            None => info!(
                "[答卷 {}]   - {} {}: 未出分",
                index,
                result.question_id,
                truncate_text(&result.question_content, 40)
            ),
        }
    }
}

fn log_attempt_complete(index: usize, report: &AttemptReport) {
    info!(
        "[答卷 {}] 统计: 出分 {}, 超时 {}, 客观题 {}",
        index,
        report.graded_count(),
        report.timed_out_count(),
        report.graded_answers.len()
    );
    info!("\n[答卷 {}] ✅ 答卷处理完成\n", index);
}
