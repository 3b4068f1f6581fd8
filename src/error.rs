use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 数据获取错误
    #[error("数据获取错误: {0}")]
    Fetch(#[from] FetchError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 页面错误
    #[error("页面错误: {0}")]
    Page(#[from] PageError),
    /// 其他错误（用于包装第三方库错误）
    #[error("错误: {0}")]
    Other(String),
}

/// 数据获取错误
///
/// `Network` 与 `Http` 会触发重试，`Parse` 直接终止本次获取
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// 请求未能发出或连接中断
    #[error("网络请求失败 ({url}): {message}")]
    Network { url: String, message: String },
    /// 服务端返回非 2xx 状态
    #[error("HTTP {status}: {reason}")]
    Http {
        url: String,
        status: u16,
        reason: String,
    },
    /// 响应体不是合法 JSON，或结构与预期不符
    #[error("JSON解析失败 ({url}): {message}")]
    Parse { url: String, message: String },
}

impl FetchError {
    /// 是否可以通过重试恢复
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Network { .. } | FetchError::Http { .. })
    }

    /// 出错的请求地址
    pub fn url(&self) -> &str {
        match self {
            FetchError::Network { url, .. }
            | FetchError::Http { url, .. }
            | FetchError::Parse { url, .. } => url,
        }
    }

    /// HTTP 状态码（仅 `Http` 变体）
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 配置值不合法
    #[error("配置项 {field} 不合法: {reason}")]
    Invalid { field: String, reason: String },
}

/// 页面错误
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PageError {
    /// 年级不在目录中
    #[error("未知年级: {grade_id}")]
    UnknownGrade { grade_id: String },
    /// 路由无法匹配
    #[error("页面不存在: {path}")]
    NotFound { path: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建网络请求失败错误
    pub fn network(url: impl Into<String>, source: impl std::fmt::Display) -> Self {
        AppError::Fetch(FetchError::Network {
            url: url.into(),
            message: source.to_string(),
        })
    }

    /// 创建 JSON 解析失败错误
    pub fn parse(url: impl Into<String>, source: impl std::fmt::Display) -> Self {
        AppError::Fetch(FetchError::Parse {
            url: url.into(),
            message: source.to_string(),
        })
    }

    /// 创建配置值不合法错误
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Config(ConfigError::Invalid {
            field: field.into(),
            reason: reason.into(),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
