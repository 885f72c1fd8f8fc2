//! 幂等调用的结果缓存
//!
//! 同一个 [`CacheKey`] 的并发首次调用会等待同一个计算结果，不会重复请求。
//! 失败的结果不缓存，下一次调用会重新执行。条目在进程生命周期内不过期。

use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tracing::debug;

/// 缓存键：操作名 + 位置参数 + 排序后的命名参数 的稳定序列化
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn builder(operation: impl Into<String>) -> CacheKeyBuilder {
        CacheKeyBuilder {
            operation: operation.into(),
            args: Vec::new(),
            kwargs: BTreeMap::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub struct CacheKeyBuilder {
    operation: String,
    args: Vec<JsonValue>,
    kwargs: BTreeMap<String, JsonValue>,
}

impl CacheKeyBuilder {
    /// 追加位置参数
    pub fn arg(mut self, value: impl Into<JsonValue>) -> Self {
        self.args.push(value.into());
        self
    }

    /// 设置命名参数
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.kwargs.insert(name.into(), value.into());
        self
    }

    pub fn build(self) -> CacheKey {
        let kwargs: serde_json::Map<String, JsonValue> = self.kwargs.into_iter().collect();
        let encoded = serde_json::json!([self.operation, self.args, kwargs]);
        CacheKey(encoded.to_string())
    }
}

/// 缓存命中统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// 单飞缓存
pub struct MemoCache<V> {
    name: &'static str,
    entries: Mutex<HashMap<CacheKey, Arc<OnceCell<V>>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Clone> MemoCache<V> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// 取缓存，不存在时执行 `init` 计算并写入
    ///
    /// 并发调用同一个 key 时只有一个会执行 `init`，其余等待它的结果。
    /// `init` 返回错误时不写入缓存。
    pub async fn get_or_try_insert_with<E, F, Fut>(&self, key: CacheKey, init: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let cell = {
            let mut entries = self.entries.lock().await;
            entries
                .entry(key.clone())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };

        if let Some(value) = cell.get() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("[缓存 {}] 命中: {}", self.name, key);
            return Ok(value.clone());
        }

        let mut executed = false;
        let result = cell
            .get_or_try_init(|| {
                executed = true;
                init()
            })
            .await
            .map(|value| value.clone());

        if executed {
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!("[缓存 {}] 未命中，已执行: {}", self.name, key);
        } else {
            // 等待了其他调用方的计算结果
            self.hits.fetch_add(1, Ordering::Relaxed);
        }

        result
    }

    /// 只读查询
    pub async fn get(&self, key: &CacheKey) -> Option<V> {
        let entries = self.entries.lock().await;
        entries.get(key).and_then(|cell| cell.get().cloned())
    }

    /// 已缓存的条目数（不含计算中或失败的）
    pub async fn len(&self) -> usize {
        let entries = self.entries.lock().await;
        entries.values().filter(|cell| cell.initialized()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tokio_test::assert_err;

    #[test]
    fn key_is_stable_and_sorts_kwargs() {
        let a = CacheKey::builder("research_vendor")
            .arg("Acme")
            .kwarg("region", "")
            .kwarg("country", "US")
            .build();
        let b = CacheKey::builder("research_vendor")
            .arg("Acme")
            .kwarg("country", "US")
            .kwarg("region", "")
            .build();
        assert_eq!(a, b);

        let other_op = CacheKey::builder("disambiguate_term").arg("Acme").build();
        assert_ne!(a, other_op);

        let none: Option<&str> = None;
        let with_none = CacheKey::builder("op").arg(none).build();
        assert!(with_none.as_str().contains("null"));
    }

    #[tokio::test]
    async fn second_call_hits_cache() {
        let cache: MemoCache<String> = MemoCache::new("test");
        let calls = AtomicUsize::new(0);
        let key = CacheKey::builder("op").arg("x").build();

        for _ in 0..2 {
            let value: Result<String, String> = cache
                .get_or_try_insert_with(key.clone(), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("value".to_string())
                })
                .await;
            assert_eq!(value.unwrap(), "value");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
        assert_eq!(cache.get(&key).await.as_deref(), Some("value"));
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let cache: MemoCache<u32> = MemoCache::new("test");
        let key = CacheKey::builder("op").build();

        let first: Result<u32, &str> = cache
            .get_or_try_insert_with(key.clone(), || async { Err("down") })
            .await;
        assert_err!(first);
        assert!(cache.is_empty().await);

        let second: Result<u32, &str> = cache
            .get_or_try_insert_with(key, || async { Ok(7) })
            .await;
        assert_eq!(second, Ok(7));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_calls_run_once() {
        let cache: Arc<MemoCache<u32>> = Arc::new(MemoCache::new("test"));
        let calls = Arc::new(AtomicUsize::new(0));
        let key = CacheKey::builder("slow").arg(1).build();

        let mut handles = Vec::new();
        for _ in 0..10 {
            let cache = cache.clone();
            let calls = calls.clone();
            let key = key.clone();
            handles.push(tokio::spawn(async move {
                let result: Result<u32, String> = cache
                    .get_or_try_insert_with(key, || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Ok(42)
                    })
                    .await;
                result
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), Ok(42));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats().misses, 1);
        assert_eq!(cache.stats().hits, 9);
    }
}
