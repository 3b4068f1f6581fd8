//! 数据获取服务 - 业务能力层
//!
//! 只负责"按路径取到一份 JSON"：先查缓存，再走传输通道，失败按指数退避重试。
//! 不持有页面状态，不关心结果属于哪个页面。

use crate::config::Config;
use crate::error::FetchError;
use crate::infrastructure::Transport;
use crate::services::cache::CacheStore;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, warn};

/// 获取选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    pub enable_cache: bool,
    /// 首次失败后的额外尝试次数
    pub retry_attempts: u32,
    /// 退避基础延迟
    pub retry_delay: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            enable_cache: true,
            retry_attempts: 3,
            retry_delay: Duration::from_millis(1000),
        }
    }
}

impl FetchOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            enable_cache: config.enable_cache,
            retry_attempts: config.retry_attempts,
            retry_delay: config.retry_delay(),
        }
    }

    /// 第 `attempt` 次失败后的等待时间：`retry_delay * 2^attempt`
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.retry_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// 带缓存与重试的数据获取器
pub struct Fetcher<T> {
    transport: Arc<T>,
    cache: Arc<dyn CacheStore>,
    options: FetchOptions,
}

impl<T> Clone for Fetcher<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            cache: self.cache.clone(),
            options: self.options.clone(),
        }
    }
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: Arc<T>, cache: Arc<dyn CacheStore>, options: FetchOptions) -> Self {
        Self {
            transport,
            cache,
            options,
        }
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// 只查缓存，不发请求
    pub fn cached(&self, key: &str) -> Option<Arc<JsonValue>> {
        if !self.options.enable_cache {
            return None;
        }
        let hit = self.cache.get(key);
        if hit.is_some() {
            debug!("缓存命中: {}", key);
        }
        hit
    }

    /// 只查缓存并反序列化
    pub fn cached_as<D: DeserializeOwned>(&self, key: &str) -> Option<Result<D, FetchError>> {
        self.cached(key).map(|value| decode(key, &value))
    }

    /// 获取 JSON：缓存命中时不发请求，否则按重试策略请求
    pub async fn fetch(&self, key: &str) -> Result<Arc<JsonValue>, FetchError> {
        if let Some(hit) = self.cached(key) {
            return Ok(hit);
        }

        let mut attempt = 0;
        loop {
            match self.fetch_once(key).await {
                Ok(value) => {
                    let value = Arc::new(value);
                    if self.options.enable_cache {
                        self.cache.set(key, value.clone());
                    }
                    return Ok(value);
                }
                Err(err) if err.is_retryable() && attempt < self.options.retry_attempts => {
                    let delay = self.options.backoff(attempt);
                    warn!(
                        "获取 {} 失败 (尝试 {}/{}): {}，{}ms 后重试...",
                        key,
                        attempt + 1,
                        self.options.retry_attempts + 1,
                        err,
                        delay.as_millis()
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    error!("获取 {} 失败: {}", key, err);
                    return Err(err);
                }
            }
        }
    }

    /// 获取并反序列化为指定类型，结构不符视为解析错误
    pub async fn fetch_as<D: DeserializeOwned>(&self, key: &str) -> Result<D, FetchError> {
        let value = self.fetch(key).await?;
        decode(key, &value)
    }

    /// 删除缓存条目（缓存关闭时不做任何事）
    pub fn invalidate(&self, key: &str) -> bool {
        self.options.enable_cache && self.cache.delete(key)
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.size()
    }

    /// 单次请求，不重试
    async fn fetch_once(&self, key: &str) -> Result<JsonValue, FetchError> {
        let response = self.transport.get(key).await?;

        if !response.is_success() {
            return Err(FetchError::Http {
                url: key.to_string(),
                status: response.status,
                reason: response.reason,
            });
        }

        serde_json::from_slice(&response.body).map_err(|e| FetchError::Parse {
            url: key.to_string(),
            message: e.to_string(),
        })
    }
}

fn decode<D: DeserializeOwned>(key: &str, value: &JsonValue) -> Result<D, FetchError> {
    D::deserialize(value).map_err(|e| FetchError::Parse {
        url: key.to_string(),
        message: e.to_string(),
    })
}
