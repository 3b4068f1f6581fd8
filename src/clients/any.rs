use crate::clients::{FileClient, HttpClient};
use crate::config::Config;
use crate::error::FetchError;
use crate::infrastructure::{RawResponse, Transport};

/// 运行时选择的数据源
#[derive(Debug, Clone)]
pub enum AnyClient {
    Http(HttpClient),
    File(FileClient),
}

impl AnyClient {
    /// 设置了 `data_dir` 时读取本地目录，否则走 HTTP
    pub fn from_config(config: &Config) -> Self {
        match &config.data_dir {
            Some(dir) => AnyClient::File(FileClient::new(dir.clone())),
            None => AnyClient::Http(HttpClient::new(config)),
        }
    }
}

impl Transport for AnyClient {
    async fn get(&self, path: &str) -> Result<RawResponse, FetchError> {
        match self {
            AnyClient::Http(client) => client.get(path).await,
            AnyClient::File(client) => client.get(path).await,
        }
    }

    fn describe(&self) -> String {
        match self {
            AnyClient::Http(client) => client.describe(),
            AnyClient::File(client) => client.describe(),
        }
    }
}
