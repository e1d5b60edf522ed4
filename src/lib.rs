//! # Practice Grading
//!
//! 练习测验的答卷提交与 AI 评分轮询客户端
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Clients）
//! - `clients/` - 持有 HTTP 连接池和登录会话，只暴露接口能力
//! - `LmsClient` - 实现 `GradingApi`，所有调用统一返回 `ApiResult`
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 只处理单道题
//! - `SubmissionService` - 为一个答案创建评分任务
//! - `GradingPoller` - 轮询一个评分任务直到出分或超时
//! - `PendingWriter` - 写 pending.txt 能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一张答卷"的完整流程
//! - `AttemptCtx` - 上下文封装（attempt_id + skill）
//! - `AssessmentFlow` - 流程编排（提交 → 并发评分 → 汇总）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量答卷处理器，管理资源和并发
//! - `orchestrator/attempt_processor` - 单张答卷处理器
//!
//! ## 模块结构

pub mod api;
pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use api::{ApiResult, GradingApi};
pub use clients::{AuthUser, LmsClient, Session};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{AssessmentResult, AttemptDraft, Skill};
pub use orchestrator::{process_attempt, App};
pub use services::{poll_interval, GradingPoller, PollPolicy};
pub use workflow::{AssessmentFlow, AttemptCtx, AttemptReport, UserNotice, WorkflowError};
