/// 静态数据 HTTP 客户端
///
/// 封装对 `{base_url}/data/...` 的 GET 请求
use crate::config::Config;
use crate::error::FetchError;
use crate::infrastructure::{RawResponse, Transport};
use tracing::debug;

/// 静态数据 HTTP 客户端
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    /// 创建新的 HTTP 客户端
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(&config.base_url)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 拼接完整请求地址
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl Transport for HttpClient {
    async fn get(&self, path: &str) -> Result<RawResponse, FetchError> {
        let url = self.url_for(path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Network {
                url: path.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        let reason = status.canonical_reason().unwrap_or_default().to_string();
        let body = response.bytes().await.map_err(|e| FetchError::Network {
            url: path.to_string(),
            message: e.to_string(),
        })?;

        debug!("GET {} -> {} ({} 字节)", url, status.as_u16(), body.len());

        Ok(RawResponse {
            status: status.as_u16(),
            reason,
            body: body.to_vec(),
        })
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}
