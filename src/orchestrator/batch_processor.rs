//! 批量答卷处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量答卷的处理和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：初始化日志文件、创建 HTTP 客户端和评分流程
//! 2. **批量加载**：扫描并加载所有待提交的答卷草稿（`Vec<AttemptDraft>`）
//! 3. **并发控制**：使用 Semaphore 限制同时处理的答卷数量
//! 4. **全局统计**：汇总所有答卷的处理结果

use crate::clients::{LmsClient, Session};
use crate::config::Config;
use crate::models::AttemptDraft;
use crate::orchestrator::attempt_processor;
use crate::services::PollPolicy;
use crate::utils::logging;
use crate::workflow::AssessmentFlow;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    flow: Arc<AssessmentFlow<LmsClient>>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        logging::init_log_file(&config)?;
        logging::log_startup(&config);

        let session = Session::from_config(&config);
        if !session.is_authenticated() {
            warn!("⚠️ 未设置 LMS_ACCESS_TOKEN，将以匿名身份请求");
        }

        let client = LmsClient::new(&config, session.clone())?;
        let flow = AssessmentFlow::new(Arc::new(client), PollPolicy::from_config(&config))
            .with_session(&session);

        Ok(Self {
            config,
            flow: Arc::new(flow),
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        let drafts = self.load_drafts().await?;

        if drafts.is_empty() {
            warn!("⚠️ 没有找到待提交的答卷草稿，程序结束");
            return Ok(());
        }

        let total = drafts.len();
        logging::log_drafts_loaded(total, &self.config.draft_folder);

        let stats = self.process_all(drafts).await?;

        logging::print_final_stats(
            stats.success,
            stats.failed,
            stats.total,
            &self.config,
        );

        Ok(())
    }

    /// 加载答卷草稿
    async fn load_drafts(&self) -> Result<Vec<AttemptDraft>> {
        info!("\n📁 正在扫描待提交的答卷...");
        Ok(crate::models::load_all_drafts(&self.config.draft_folder).await?)
    }

    /// 并发处理所有答卷
    async fn process_all(&self, drafts: Vec<AttemptDraft>) -> Result<ProcessingStats> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_attempts));
        let mut stats = ProcessingStats {
            total: drafts.len(),
            ..Default::default()
        };

        let mut handles = Vec::new();

        for (idx, draft) in drafts.into_iter().enumerate() {
            let index = idx + 1;
            let permit = semaphore.clone().acquire_owned().await?;
            let flow = Arc::clone(&self.flow);
            let config = self.config.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                match attempt_processor::process_attempt(flow.as_ref(), draft, index, &config)
                    .await
                {
                    Ok(success) => Ok(success),
                    Err(e) => {
                        error!("[答卷 {}] ❌ 处理过程中发生错误: {}", index, e);
                        Err(e)
                    }
                }
            });
            handles.push((index, handle));
        }

        // 等待所有任务完成
        for (index, handle) in handles {
            match handle.await {
                Ok(Ok(true)) => stats.success += 1,
                Ok(Ok(false)) | Ok(Err(_)) => stats.failed += 1,
                Err(e) => {
                    error!("[答卷 {}] 任务执行失败: {}", index, e);
                    stats.failed += 1;
                }
            }
        }

        Ok(stats)
    }
}

/// 处理统计
#[derive(Debug, Default)]
struct ProcessingStats {
    success: usize,
    failed: usize,
    total: usize,
}
