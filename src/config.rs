use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 运行环境（对应构建时的 development / production 标志）
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Environment::Development),
            "production" | "prod" => Some(Environment::Production),
            _ => None,
        }
    }

    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 静态数据服务地址（`{base_url}/data/...`）
    pub base_url: String,
    /// 本地数据目录，设置后优先于 `base_url`
    pub data_dir: Option<PathBuf>,
    /// 是否启用内存缓存
    pub enable_cache: bool,
    /// 缓存有效期（秒）
    pub cache_ttl_secs: u64,
    /// 失败后的额外重试次数
    pub retry_attempts: u32,
    /// 重试基础延迟（毫秒），第 n 次重试等待 `retry_delay_ms * 2^n`
    pub retry_delay_ms: u64,
    /// 搜索输入防抖时间（毫秒）
    pub debounce_ms: u64,
    /// 终端渲染宽度
    pub render_width: usize,
    /// 运行环境
    pub environment: Environment,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5173".to_string(),
            data_dir: None,
            enable_cache: true,
            cache_ttl_secs: 5 * 60,
            retry_attempts: 3,
            retry_delay_ms: 1000,
            debounce_ms: 300,
            render_width: 80,
            environment: Environment::Production,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 只从环境变量构建配置
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// 先读取 TOML 配置文件（如果提供），再用环境变量覆盖
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        let config = base.with_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// 解析 TOML 配置文件，缺省字段使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
                path: path.display().to_string(),
                source,
            })?;
        toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(v) = std::env::var("QA_BASE_URL") {
            self.base_url = v;
        }
        if let Ok(v) = std::env::var("QA_DATA_DIR") {
            self.data_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = env_parsed("QA_ENABLE_CACHE", "bool")? {
            self.enable_cache = v;
        }
        if let Some(v) = env_parsed("QA_CACHE_TTL_SECS", "u64")? {
            self.cache_ttl_secs = v;
        }
        if let Some(v) = env_parsed("QA_RETRY_ATTEMPTS", "u32")? {
            self.retry_attempts = v;
        }
        if let Some(v) = env_parsed("QA_RETRY_DELAY_MS", "u64")? {
            self.retry_delay_ms = v;
        }
        if let Some(v) = env_parsed("QA_DEBOUNCE_MS", "u64")? {
            self.debounce_ms = v;
        }
        if let Some(v) = env_parsed("QA_RENDER_WIDTH", "usize")? {
            self.render_width = v;
        }
        if let Ok(v) = std::env::var("QA_ENV") {
            self.environment =
                Environment::parse(&v).ok_or_else(|| ConfigError::EnvVarParseFailed {
                    var_name: "QA_ENV".to_string(),
                    value: v.clone(),
                    expected_type: "development | production".to_string(),
                })?;
        }
        if let Some(v) = env_parsed("VERBOSE_LOGGING", "bool")? {
            self.verbose_logging = v;
        }
        Ok(self)
    }

    /// 校验配置取值
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.is_none() && self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "base_url".to_string(),
                reason: "未设置 data_dir 时 base_url 不能为空".to_string(),
            });
        }
        if self.render_width < 20 {
            return Err(ConfigError::Invalid {
                field: "render_width".to_string(),
                reason: format!("至少为 20，当前为 {}", self.render_width),
            });
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn env_parsed<T: std::str::FromStr>(
    var_name: &str,
    expected_type: &str,
) -> Result<Option<T>, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_fetch_contract() {
        let config = Config::default();
        assert!(config.enable_cache);
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.retry_delay(), Duration::from_millis(1000));
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert!(!config.environment.is_development());
    }

    #[test]
    fn test_toml_file_fills_missing_fields_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "base_url = \"http://example.test\"\nretry_attempts = 1\nenvironment = \"development\""
        )
        .unwrap();

        let config = Config::from_toml_file(file.path()).unwrap();
        assert_eq!(config.base_url, "http://example.test");
        assert_eq!(config.retry_attempts, 1);
        assert_eq!(config.debounce_ms, 300);
        assert!(config.environment.is_development());
    }

    #[test]
    fn test_malformed_toml_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "retry_attempts = \"many\"").unwrap();

        let err = Config::from_toml_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::TomlParseFailed { .. }));
    }

    #[test]
    fn test_validate_rejects_narrow_width() {
        let config = Config {
            render_width: 5,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse("DEV"), Some(Environment::Development));
        assert_eq!(Environment::parse("production"), Some(Environment::Production));
        assert_eq!(Environment::parse("staging"), None);
    }
}
