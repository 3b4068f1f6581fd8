pub mod logging;
pub mod perf;

pub use logging::{log_startup, truncate_text};
pub use perf::{measure_render, PerfMonitor};
