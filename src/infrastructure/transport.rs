use crate::error::FetchError;
use std::future::Future;

/// 原始响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub reason: String,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            reason: "OK".to_string(),
            body: body.into(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: 404,
            reason: "Not Found".to_string(),
            body: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 数据传输通道
///
/// 职责：
/// - 把 `/data/...` 形式的路径变成一次读取
/// - 只在请求本身失败时返回 `FetchError::Network`
/// - 不解释状态码，不解析 JSON，不做重试
pub trait Transport: Send + Sync + 'static {
    fn get(&self, path: &str) -> impl Future<Output = Result<RawResponse, FetchError>> + Send;

    /// 用于日志的数据源描述
    fn describe(&self) -> String;
}
