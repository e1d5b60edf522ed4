//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量答卷处理器
//! - 管理应用生命周期（初始化、运行）
//! - 批量加载答卷草稿（Vec<AttemptDraft>）
//! - 控制并发数量（Semaphore）
//! - 输出全局统计信息
//!
//! ### `attempt_processor` - 单张答卷处理器
//! - 调用 AssessmentFlow 提交并等待评分
//! - 记录超时题目、写出报告、标记草稿
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<AttemptDraft>)
//!     ↓
//! attempt_processor (处理单张答卷)
//!     ↓
//! workflow::AssessmentFlow (提交 → 并发评分 → 汇总)
//!     ↓
//! services (能力层：创建评分任务 / 轮询 / pending 记录)
//!     ↓
//! clients (基础设施：LmsClient)
//! ```

pub mod attempt_processor;
pub mod batch_processor;

pub use attempt_processor::{process_attempt, write_report};
pub use batch_processor::App;
