/// 评分服务客户端
///
/// 封装所有与评分服务相关的 HTTP 调用
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::ApiError;
use crate::models::{OverridePayload, Question, RecommendationItem, ScoringRequest};

/// 提交覆盖数据提案后的回执
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalReceipt {
    pub status: String,
    #[serde(default)]
    pub proposal: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// 评分服务能力
///
/// 会话和实时预览只依赖这个 trait，测试时可替换为内存实现
#[async_trait]
pub trait ScoringApi: Send + Sync {
    /// 拉取题目列表
    async fn fetch_questions(&self) -> Result<Vec<Question>, ApiError>;

    /// 请求推荐结果
    async fn recommend(&self, request: &ScoringRequest)
        -> Result<Vec<RecommendationItem>, ApiError>;

    /// 拉取官方英雄数据
    async fn fetch_champions(&self) -> Result<OverridePayload, ApiError>;

    /// 提交覆盖数据提案
    async fn submit_proposal(&self, payload: &OverridePayload)
        -> Result<ProposalReceipt, ApiError>;
}

/// 基于 reqwest 的评分服务客户端
pub struct ScoringClient {
    http: reqwest::Client,
    base_url: String,
}

impl ScoringClient {
    /// 创建新的评分服务客户端
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// 检查状态码并解析 JSON
    async fn decode<T: DeserializeOwned>(
        endpoint: &str,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::BadStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::request_failed(endpoint, e))?;
        serde_json::from_slice(&body).map_err(|e| ApiError::json_parse_failed(endpoint, e))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let endpoint = self.endpoint(path);
        debug!("GET {}", endpoint);

        let response = self
            .http
            .get(&endpoint)
            .send()
            .await
            .map_err(|e| ApiError::request_failed(&endpoint, e))?;

        Self::decode(&endpoint, response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let endpoint = self.endpoint(path);
        debug!("POST {}", endpoint);

        let response = self
            .http
            .post(&endpoint)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::request_failed(&endpoint, e))?;

        Self::decode(&endpoint, response).await
    }
}

#[async_trait]
impl ScoringApi for ScoringClient {
    async fn fetch_questions(&self) -> Result<Vec<Question>, ApiError> {
        self.get_json("questions").await
    }

    async fn recommend(
        &self,
        request: &ScoringRequest,
    ) -> Result<Vec<RecommendationItem>, ApiError> {
        debug!(
            "评分请求: {} 个答案, max_results={}, 覆盖数据: {}",
            request.answers.len(),
            request.max_results,
            request.payload.as_ref().map_or(0, |p| p.len())
        );
        self.post_json("recommend", request).await
    }

    async fn fetch_champions(&self) -> Result<OverridePayload, ApiError> {
        self.get_json("api/champions").await
    }

    async fn submit_proposal(
        &self,
        payload: &OverridePayload,
    ) -> Result<ProposalReceipt, ApiError> {
        self.post_json("api/champions", payload).await
    }
}
