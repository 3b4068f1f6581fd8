//! 按键加载的数据资源 - 流程层
//!
//! 核心职责：把"当前页面需要哪份数据"变成 `data / loading / error` 三元状态
//!
//! - 键为空时保持空闲，不发请求
//! - 缓存命中时同步完成，不启动任务
//! - 每次加载运行在 `ScopedTask` 中；换键或 `refetch` 会中止旧任务，
//!   其尚未触发的退避等待也随之取消
//! - 提交结果前核对代号与键，过期结果一律丢弃
//! - 错误只体现在 `error` 字段，不会以 `Err` 或 panic 的形式传给调用方

use crate::infrastructure::{ScopedTask, Transport};
use crate::services::Fetcher;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// 加载状态快照
pub struct FetchState<D> {
    pub data: Option<Arc<D>>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<D> FetchState<D> {
    pub fn idle() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.data.is_none() && !self.loading && self.error.is_none()
    }
}

impl<D> Default for FetchState<D> {
    fn default() -> Self {
        Self::idle()
    }
}

impl<D> Clone for FetchState<D> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            loading: self.loading,
            error: self.error.clone(),
        }
    }
}

impl<D: fmt::Debug> fmt::Debug for FetchState<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchState")
            .field("data", &self.data)
            .field("loading", &self.loading)
            .field("error", &self.error)
            .finish()
    }
}

struct Shared<D> {
    key: Option<String>,
    generation: u64,
    state: FetchState<D>,
}

impl<D> Shared<D> {
    fn is_current(&self, key: &str, generation: u64) -> bool {
        self.generation == generation && self.key.as_deref() == Some(key)
    }
}

fn lock<D>(shared: &Mutex<Shared<D>>) -> MutexGuard<'_, Shared<D>> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// 按键加载并反序列化为 `D` 的资源
pub struct Resource<T, D> {
    fetcher: Fetcher<T>,
    shared: Arc<Mutex<Shared<D>>>,
    task: ScopedTask,
}

impl<T, D> Resource<T, D>
where
    T: Transport,
    D: DeserializeOwned + Send + Sync + 'static,
{
    pub fn new(fetcher: Fetcher<T>) -> Self {
        Self {
            fetcher,
            shared: Arc::new(Mutex::new(Shared {
                key: None,
                generation: 0,
                state: FetchState::idle(),
            })),
            task: ScopedTask::new(),
        }
    }

    /// 当前键
    pub fn key(&self) -> Option<String> {
        lock(&self.shared).key.clone()
    }

    /// 当前状态快照
    pub fn state(&self) -> FetchState<D> {
        lock(&self.shared).state.clone()
    }

    /// 切换键；与当前键相同时不做任何事
    ///
    /// 新键会清空旧数据；`None` 回到空闲状态
    pub fn set_key(&mut self, key: Option<String>) {
        let generation = {
            let mut shared = lock(&self.shared);
            if shared.key == key {
                return;
            }
            shared.generation += 1;
            shared.key = key.clone();
            shared.state = FetchState::idle();
            shared.generation
        };

        match key {
            Some(key) => self.load(key, generation),
            None => {
                self.task.cancel();
            }
        }
    }

    /// 删除当前键的缓存并从第 0 次尝试重新加载
    ///
    /// 加载期间保留已有数据
    pub fn refetch(&mut self) {
        let (key, generation) = {
            let mut shared = lock(&self.shared);
            let Some(key) = shared.key.clone() else {
                return;
            };
            shared.generation += 1;
            (key, shared.generation)
        };

        self.fetcher.invalidate(&key);
        info!("🔄 重新加载: {}", key);
        self.load(key, generation);
    }

    /// 等待当前加载任务结束并返回状态
    pub async fn wait(&mut self) -> FetchState<D> {
        self.task.join().await;
        self.state()
    }

    fn load(&mut self, key: String, generation: u64) {
        if let Some(cached) = self.fetcher.cached_as::<D>(&key) {
            self.task.cancel();
            commit(&self.shared, &key, generation, cached);
            return;
        }

        {
            let mut shared = lock(&self.shared);
            shared.state.loading = true;
            shared.state.error = None;
        }

        let fetcher = self.fetcher.clone();
        let shared = self.shared.clone();
        self.task.arm(async move {
            let result = fetcher.fetch_as::<D>(&key).await;
            commit(&shared, &key, generation, result);
        });
    }
}

fn commit<D, E: fmt::Display>(
    shared: &Mutex<Shared<D>>,
    key: &str,
    generation: u64,
    result: Result<D, E>,
) {
    let mut shared = lock(shared);
    if !shared.is_current(key, generation) {
        debug!("丢弃过期结果: {} (代号 {})", key, generation);
        return;
    }

    match result {
        Ok(data) => {
            shared.state = FetchState {
                data: Some(Arc::new(data)),
                loading: false,
                error: None,
            };
        }
        Err(e) => {
            shared.state.loading = false;
            shared.state.error = Some(e.to_string());
        }
    }
}
