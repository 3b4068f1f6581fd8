/// 日志工具模块
///
/// 提供日志初始化、启动横幅和格式化辅助函数
use crate::config::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 默认级别 `info`（`verbose` 时为 `debug`），`RUST_LOG` 优先。
/// 日志写到 stderr，stdout 只输出页面内容。
///
/// # 参数
/// - `verbose`: 是否显示详细日志
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 重复初始化（例如测试中）时忽略
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 程序配置
/// - `source`: 数据源描述
pub fn log_startup(config: &Config, source: &str) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 程序启动 - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("📂 数据源: {}", source);
    info!(
        "💾 缓存: {} (有效期 {}s)",
        if config.enable_cache { "开启" } else { "关闭" },
        config.cache_ttl_secs
    );
    info!(
        "🔁 重试: {} 次，基础延迟 {}ms",
        config.retry_attempts, config.retry_delay_ms
    );
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
