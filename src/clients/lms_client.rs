//! 学习平台后端 API 客户端
//!
//! 封装所有与评分相关的 HTTP 调用，每个调用自行捕获错误并返回 `ApiResult`

use crate::api::{ApiResult, GradingApi};
use crate::clients::session::Session;
use crate::config::Config;
use crate::error::{AppError, AppResult, ConfigError};
use crate::models::{
    AudioClip, GradedAnswer, Submission, SubmissionTicket, SubmitAttemptRequest, SubmittedAttempt,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

/// 后端 API 客户端
#[derive(Clone)]
pub struct LmsClient {
    http: Client,
    base_url: String,
    session: Session,
}

impl LmsClient {
    /// 创建新的客户端
    pub fn new(config: &Config, session: Session) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::Config(ConfigError::HttpClientBuildFailed(e.to_string())))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// 附加鉴权头
    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.session.access_token.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// 发送请求并解析 JSON，所有错误都转换为失败的 `ApiResult`
    async fn send<T: DeserializeOwned>(&self, endpoint: &str, builder: RequestBuilder) -> ApiResult<T> {
        let response = match self.authorize(builder).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("请求失败 ({}): {}", endpoint, e);
                return failed(AppError::api_request_failed(endpoint, e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("接口返回错误 ({}): HTTP {} {}", endpoint, status.as_u16(), body);
            return ApiResult::fail(format!("HTTP {}: {}", status.as_u16(), body));
        }

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return failed(AppError::api_request_failed(endpoint, e)),
        };
        debug!("接口返回 ({}): {}", endpoint, text);

        match serde_json::from_str::<T>(&text) {
            Ok(data) => ApiResult::ok(data),
            Err(e) => failed(AppError::from(e)),
        }
    }
}

fn failed<T>(err: AppError) -> ApiResult<T> {
    ApiResult::from(Err(err))
}

impl GradingApi for LmsClient {
    async fn submit_attempt(&self, request: &SubmitAttemptRequest) -> ApiResult<SubmittedAttempt> {
        let endpoint = "api/attempts";
        debug!("提交答卷: quiz={} 答案数={}", request.quiz_id, request.answers.len());
        let builder = self.http.post(self.url(endpoint)).json(request);
        self.send(endpoint, builder).await
    }

    async fn create_speaking_submission(
        &self,
        attempt_id: &str,
        answer_id: &str,
        audio: &AudioClip,
    ) -> ApiResult<SubmissionTicket> {
        let endpoint = "api/speaking-submissions";

        let part = match Part::bytes(audio.bytes.clone())
            .file_name(audio.file_name.clone())
            .mime_str(&audio.mime_type)
        {
            Ok(part) => part,
            Err(e) => return failed(AppError::api_request_failed(endpoint, e)),
        };
        let form = Form::new()
            .text("attemptId", attempt_id.to_string())
            .text("answerId", answer_id.to_string())
            .part("audio", part);

        let builder = self.http.post(self.url(endpoint)).multipart(form);
        self.send(endpoint, builder).await
    }

    async fn create_writing_submission(
        &self,
        attempt_id: &str,
        answer_id: &str,
    ) -> ApiResult<SubmissionTicket> {
        let endpoint = "api/writing-submissions";
        let body = json!({
            "attemptId": attempt_id,
            "answerId": answer_id,
        });
        let builder = self.http.post(self.url(endpoint)).json(&body);
        self.send(endpoint, builder).await
    }

    async fn get_speaking_submission(&self, submission_id: &str) -> ApiResult<Submission> {
        let endpoint = format!("api/speaking-submissions/{}", submission_id);
        let builder = self.http.get(self.url(&endpoint));
        self.send(&endpoint, builder).await
    }

    async fn get_writing_submission(&self, submission_id: &str) -> ApiResult<Submission> {
        let endpoint = format!("api/writing-submissions/{}", submission_id);
        let builder = self.http.get(self.url(&endpoint));
        self.send(&endpoint, builder).await
    }

    async fn get_attempt_answers(&self, attempt_id: &str) -> ApiResult<Vec<GradedAnswer>> {
        let endpoint = format!("api/attempts/{}/answers", attempt_id);
        let builder = self.http.get(self.url(&endpoint));
        self.send(&endpoint, builder).await
    }
}
