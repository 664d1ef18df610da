use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, header};
use serde_json::Value;

use super::endpoint::{Endpoint, UpstreamParameters};
use super::errors::UpstreamError;
use super::oauth::OAuthSigner;
use crate::config::Credentials;

/// 上游 feed API 的抽象，一次调用对应一个 (endpoint, 参数) 组合，不做重试
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn fetch(
        &self,
        endpoint: Endpoint,
        params: &UpstreamParameters,
    ) -> Result<Value, UpstreamError>;
}

/// 已签名的 Twitter REST 客户端
pub struct TwitterClient {
    http_client: ReqwestClient,
    base_url: String,
    signer: OAuthSigner,
}

impl TwitterClient {
    pub fn new(
        credentials: Credentials,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let http_client = ReqwestClient::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            signer: OAuthSigner::new(credentials),
        })
    }

    fn resource_url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}.json", self.base_url, endpoint.path())
    }
}

#[async_trait]
impl Upstream for TwitterClient {
    async fn fetch(
        &self,
        endpoint: Endpoint,
        params: &UpstreamParameters,
    ) -> Result<Value, UpstreamError> {
        let url = self.resource_url(endpoint);
        let signed_params: Vec<(&str, String)> =
            params.iter().map(|(k, v)| (k, v.to_string())).collect();
        let authorization = self.signer.authorization_header("GET", &url, &signed_params);

        let query = params.to_query_string();
        let full_url = if query.is_empty() {
            url
        } else {
            format!("{}?{}", url, query)
        };

        tracing::debug!("GET {}", full_url);
        let response = self
            .http_client
            .get(&full_url)
            .header(header::AUTHORIZATION, authorization)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(UpstreamError::from_status(status, body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}
