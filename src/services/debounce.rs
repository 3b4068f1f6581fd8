//! 防抖搜索
//!
//! `search_value` 随每次输入立即更新；`debounced_value` 在静默 `delay` 之后才更新，
//! 静默期内的连续输入只产生一次发布（取最后一次的值）。

use crate::infrastructure::ScopedTask;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;

/// 默认静默期
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

pub struct DebouncedSearch {
    delay: Duration,
    search_value: String,
    sender: Arc<watch::Sender<String>>,
    receiver: watch::Receiver<String>,
    timer: ScopedTask,
}

impl DebouncedSearch {
    pub fn new(delay: Duration) -> Self {
        let (sender, receiver) = watch::channel(String::new());
        Self {
            delay,
            search_value: String::new(),
            sender: Arc::new(sender),
            receiver,
            timer: ScopedTask::new(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// 更新输入值并重新装填定时器，未触发的旧定时器被取消
    ///
    /// 必须在 tokio 运行时内调用
    pub fn set(&mut self, value: impl Into<String>) {
        self.search_value = value.into();

        let sender = self.sender.clone();
        let value = self.search_value.clone();
        let delay = self.delay;
        self.timer.arm(async move {
            tokio::time::sleep(delay).await;
            publish(&sender, value);
        });
    }

    /// 立即发布当前输入值，取消等待中的定时器
    ///
    /// 调用方已知新值，本次发布不会唤醒 `changed()`；其他订阅者照常收到通知
    pub fn flush(&mut self) {
        self.timer.cancel();
        publish(&self.sender, self.search_value.clone());
        drop(self.receiver.borrow_and_update());
    }

    /// 即时值（用于回显输入框）
    pub fn search_value(&self) -> &str {
        &self.search_value
    }

    /// 已稳定的值（用于触发筛选）
    pub fn debounced_value(&self) -> String {
        self.receiver.borrow().clone()
    }

    /// 是否有尚未发布的输入
    pub fn is_pending(&self) -> bool {
        self.timer.is_armed()
    }

    /// 订阅稳定值的变化
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.sender.subscribe()
    }

    /// 等待下一次发布并返回新值
    pub async fn changed(&mut self) -> String {
        // 发送端由 self 持有，不会关闭
        let _ = self.receiver.changed().await;
        self.receiver.borrow_and_update().clone()
    }
}

impl Default for DebouncedSearch {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

/// 值未变化时不通知订阅者
fn publish(sender: &watch::Sender<String>, value: String) {
    let modified = sender.send_if_modified(|current| {
        if *current == value {
            return false;
        }
        *current = value;
        true
    });
    if modified {
        debug!("搜索词已稳定: {:?}", *sender.borrow());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    fn count_emissions(mut rx: watch::Receiver<String>) -> Arc<AtomicUsize> {
        let counter = Arc::new(AtomicUsize::new(0));
        let task_counter = counter.clone();
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                task_counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        counter
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_updates_collapse_to_latest() {
        let mut search = DebouncedSearch::default();
        let emissions = count_emissions(search.subscribe());

        for value in ["h", "he", "hel", "hell", "hello"] {
            search.set(value);
            assert_eq!(search.search_value(), value);
            sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(search.debounced_value(), "");

        sleep(Duration::from_millis(300)).await;
        assert_eq!(search.debounced_value(), "hello");
        assert_eq!(emissions.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_changed_resolves_after_quiet_period() {
        let mut search = DebouncedSearch::new(Duration::from_millis(50));
        search.set("cpu");

        let started = tokio::time::Instant::now();
        assert_eq!(search.changed().await, "cpu");
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert!(!search.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_timer() {
        let mut search = DebouncedSearch::default();
        let rx = search.subscribe();
        search.set("never");
        drop(search);

        sleep(Duration::from_secs(1)).await;
        assert_eq!(*rx.borrow(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_publishes_immediately() {
        let mut search = DebouncedSearch::default();
        search.set("ram");
        search.flush();

        assert_eq!(search.debounced_value(), "ram");
        assert!(!search.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_value_is_not_republished() {
        let mut search = DebouncedSearch::new(Duration::from_millis(10));
        let emissions = count_emissions(search.subscribe());

        search.set("x");
        sleep(Duration::from_millis(20)).await;
        search.set("x");
        sleep(Duration::from_millis(20)).await;

        assert_eq!(emissions.load(Ordering::SeqCst), 1);
    }
}
