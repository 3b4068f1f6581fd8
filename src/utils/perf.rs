//! 性能监控
//!
//! 开发环境下记录一段代码（通常是一次页面渲染）的耗时，
//! 生产环境下不输出任何内容

use std::time::{Duration, Instant};
use tracing::info;

pub struct PerfMonitor {
    name: String,
    start: Instant,
    enabled: bool,
}

impl PerfMonitor {
    /// 开始计时，`Drop` 时输出耗时
    pub fn start(name: impl Into<String>, enabled: bool) -> Self {
        Self {
            name: name.into(),
            start: Instant::now(),
            enabled,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Drop for PerfMonitor {
    fn drop(&mut self) {
        if self.enabled {
            info!(
                "Performance [{}]: {:.2}ms",
                self.name,
                self.elapsed().as_secs_f64() * 1000.0
            );
        }
    }
}

/// 对一次渲染计时
///
/// # 参数
/// - `name`: 渲染名称，日志中显示为 `Render-{name}`
/// - `enabled`: 是否输出耗时
/// - `render`: 渲染函数
pub fn measure_render<R>(name: &str, enabled: bool, render: impl FnOnce() -> R) -> R {
    let _monitor = PerfMonitor::start(format!("Render-{}", name), enabled);
    render()
}
