//! 基础设施层（Infrastructure）
//!
//! 只暴露能力，不认识 Question / Chapter：
//! - `Transport` - 按路径读取原始响应
//! - `Clock` - 可替换的时间源，缓存过期判断依赖它
//! - `ScopedTask` - 可取消的延迟任务（防抖定时器、重试退避）

pub mod clock;
pub mod scoped_task;
pub mod transport;

pub use clock::{Clock, ManualClock, SystemClock};
pub use scoped_task::ScopedTask;
pub use transport::{RawResponse, Transport};
