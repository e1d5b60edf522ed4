/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 同时处理的答卷数量
    pub max_concurrent_attempts: usize,
    /// 答卷草稿（TOML）存放目录
    pub draft_folder: String,
    /// 评分报告输出目录
    pub report_folder: String,
    /// 超时未评分题目记录文件
    pub pending_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    // --- 后端 API 配置 ---
    pub api_base_url: String,
    pub access_token: Option<String>,
    pub user_id: Option<String>,
    pub request_timeout_secs: u64,
    // --- 轮询配置 ---
    pub poll_max_attempts: u32,
    pub poll_base_interval_ms: u64,
    pub poll_step_ms: u64,
    pub poll_max_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_attempts: 4,
            draft_folder: "attempt_drafts".to_string(),
            report_folder: "reports".to_string(),
            pending_file: "pending.txt".to_string(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            api_base_url: "http://localhost:8080".to_string(),
            access_token: None,
            user_id: None,
            request_timeout_secs: 30,
            poll_max_attempts: 40,
            poll_base_interval_ms: 3000,
            poll_step_ms: 1000,
            poll_max_interval_ms: 10000,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            max_concurrent_attempts: env_parse("MAX_CONCURRENT_ATTEMPTS").filter(|v| *v > 0).unwrap_or(default.max_concurrent_attempts),
            draft_folder: std::env::var("DRAFT_FOLDER").unwrap_or(default.draft_folder),
            report_folder: std::env::var("REPORT_FOLDER").unwrap_or(default.report_folder),
            pending_file: std::env::var("PENDING_FILE").unwrap_or(default.pending_file),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            api_base_url: std::env::var("LMS_API_BASE_URL").unwrap_or(default.api_base_url),
            access_token: std::env::var("LMS_ACCESS_TOKEN").ok().filter(|v| !v.is_empty()),
            user_id: std::env::var("LMS_USER_ID").ok().filter(|v| !v.is_empty()),
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS").unwrap_or(default.request_timeout_secs),
            poll_max_attempts: env_parse("POLL_MAX_ATTEMPTS").filter(|v| *v > 0).unwrap_or(default.poll_max_attempts),
            poll_base_interval_ms: env_parse("POLL_BASE_INTERVAL_MS").unwrap_or(default.poll_base_interval_ms),
            poll_step_ms: env_parse("POLL_STEP_MS").unwrap_or(default.poll_step_ms),
            poll_max_interval_ms: env_parse("POLL_MAX_INTERVAL_MS").unwrap_or(default.poll_max_interval_ms),
        }
    }
}

/// 读取并解析环境变量，解析失败时返回 None（回退到默认值）
fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
