//! 可取消的延迟任务
//!
//! 防抖定时器和重试退避都是"输入时装填、被新输入或销毁时取消"的资源。
//! `ScopedTask` 持有唯一的 `JoinHandle`：
//! - `arm()` 会先取消旧任务再启动新任务
//! - `Drop` 时中止仍在运行的任务，挂起的定时器不会再触发

use std::future::Future;
use tokio::task::JoinHandle;

#[derive(Debug, Default)]
pub struct ScopedTask {
    handle: Option<JoinHandle<()>>,
}

impl ScopedTask {
    pub fn new() -> Self {
        Self { handle: None }
    }

    /// 装填新任务，正在运行的旧任务会被中止
    ///
    /// 必须在 tokio 运行时内调用
    pub fn arm<F>(&mut self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.handle = Some(tokio::spawn(future));
    }

    /// 取消任务，返回是否真的中止了一个未完成的任务
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                let was_running = !handle.is_finished();
                handle.abort();
                was_running
            }
            None => false,
        }
    }

    /// 是否有尚未完成的任务
    pub fn is_armed(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// 等待当前任务结束（完成或被中止）
    pub async fn join(&mut self) {
        if let Some(handle) = self.handle.as_mut() {
            let _ = handle.await;
            self.handle = None;
        }
    }
}

impl Drop for ScopedTask {
    fn drop(&mut self) {
        self.cancel();
    }
}
