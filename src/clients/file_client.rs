/// 本地数据目录客户端
///
/// 把 `/data/...` 路径映射到本地目录，行为与静态文件服务器一致：
/// 文件不存在返回 404，其他读取失败视为网络错误
use crate::error::FetchError;
use crate::infrastructure::{RawResponse, Transport};
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// 数据路径前缀
const DATA_PREFIX: &str = "/data/";

#[derive(Debug, Clone)]
pub struct FileClient {
    root: PathBuf,
}

impl FileClient {
    /// `root` 对应站点中的 `/data` 目录
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 解析请求路径，越界或非 `/data/` 路径返回 `None`
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.strip_prefix(DATA_PREFIX)?);
        let safe = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if !safe {
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl Transport for FileClient {
    async fn get(&self, path: &str) -> Result<RawResponse, FetchError> {
        let Some(file_path) = self.resolve(path) else {
            debug!("拒绝数据目录之外的路径: {}", path);
            return Ok(RawResponse::not_found());
        };

        match fs::read(&file_path).await {
            Ok(body) => {
                debug!("读取 {} ({} 字节)", file_path.display(), body.len());
                Ok(RawResponse::ok(body))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("文件不存在: {}", file_path.display());
                Ok(RawResponse::not_found())
            }
            Err(e) => Err(FetchError::Network {
                url: path.to_string(),
                message: format!("无法读取 {}: {}", file_path.display(), e),
            }),
        }
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}
