use serde::{Deserialize, Serialize};

use crate::error::{ApiError, AppError, AppResult};

/// 接口统一返回结构 `{success, data, error}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResult<T> {
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> ApiResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// 转换为 `AppResult`，`endpoint` 仅用于错误信息
    pub fn into_result(self, endpoint: &str) -> AppResult<T> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err(AppError::Api(ApiError::EmptyResponse {
                endpoint: endpoint.to_string(),
            })),
            (false, _) => Err(AppError::api_bad_response(
                endpoint,
                self.error.unwrap_or_else(|| "unknown error".to_string()),
            )),
        }
    }
}

impl<T> From<AppResult<T>> for ApiResult<T> {
    fn from(result: AppResult<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::fail(e.to_string()),
        }
    }
}
