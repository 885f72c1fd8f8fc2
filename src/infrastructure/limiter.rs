//! 并发限制器

use std::future::Future;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::{AppError, AppResult};

/// 固定容量的并发限制器
///
/// 许可随 guard 释放，成功、失败、超时都会归还，不保证等待者的先后顺序。
/// clone 出来的实例共享同一组许可。
#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    name: &'static str,
    capacity: usize,
    semaphore: Arc<Semaphore>,
}

impl ConcurrencyLimiter {
    pub fn new(name: &'static str, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            name,
            capacity,
            semaphore: Arc::new(Semaphore::new(capacity)),
        }
    }

    /// 等待一个空闲名额
    pub async fn acquire(&self) -> AppResult<OwnedSemaphorePermit> {
        self.semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| AppError::Limiter(format!("{}: {}", self.name, e)))
    }

    /// 占用一个名额执行 `task`
    pub async fn run<T, Fut>(&self, task: Fut) -> AppResult<T>
    where
        Fut: Future<Output = T>,
    {
        let _permit = self.acquire().await?;
        Ok(task.await)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}
