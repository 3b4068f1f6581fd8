//! 响应缓存 - 业务能力层
//!
//! 以请求路径为键缓存解析后的 JSON，超过有效期的条目视为不存在

use crate::infrastructure::Clock;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

/// 默认缓存有效期：5 分钟
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// 缓存服务接口
pub trait CacheStore: Send + Sync {
    /// 读取未过期的条目；过期条目会被移除
    fn get(&self, key: &str) -> Option<Arc<JsonValue>>;
    fn set(&self, key: &str, data: Arc<JsonValue>);
    /// 删除条目，返回条目是否存在
    fn delete(&self, key: &str) -> bool;
    /// 当前保存的条目数（包括尚未被读取淘汰的过期条目）
    fn size(&self) -> usize;
    fn clear(&self);
}

/// 缓存条目
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub data: Arc<JsonValue>,
    pub timestamp: Instant,
}

/// 内存缓存
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl MemoryCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 移除所有过期条目，返回移除数量
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| self.is_fresh(entry, now));
        before - entries.len()
    }

    fn is_fresh(&self, entry: &CacheEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.timestamp) < self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<Arc<JsonValue>> {
        let now = self.clock.now();
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if self.is_fresh(entry, now) => Some(entry.data.clone()),
            Some(_) => {
                debug!("缓存已过期: {}", key);
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn set(&self, key: &str, data: Arc<JsonValue>) {
        let timestamp = self.clock.now();
        self.lock()
            .insert(key.to_string(), CacheEntry { data, timestamp });
    }

    fn delete(&self, key: &str) -> bool {
        self.lock().remove(key).is_some()
    }

    fn size(&self) -> usize {
        self.lock().len()
    }

    fn clear(&self) {
        self.lock().clear();
    }
}
