//! 指数退避重试

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{error, warn};

use crate::config::Config;

/// 重试策略
///
/// 首次调用失败后最多再重试 `max_retries` 次，间隔从 `initial_backoff` 开始逐次翻倍。
/// 不区分错误类型，耗尽后把最后一次的错误原样返回给调用方。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_backoff: Duration) -> Self {
        Self {
            max_retries,
            initial_backoff,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.max_retries,
            Duration::from_millis(config.initial_backoff_ms),
        )
    }

    /// 第 `attempt` 次失败（从 0 开始）之后的等待时间
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.initial_backoff
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    /// 执行操作，失败时按退避间隔重试
    ///
    /// # 参数
    /// - `label`: 日志里标识这次调用
    /// - `operation`: 每次尝试都会重新调用以生成新的 future
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if attempt >= self.max_retries {
                        error!(
                            "❌ [{}] 重试 {} 次后仍然失败: {}",
                            label, self.max_retries, err
                        );
                        return Err(err);
                    }

                    let backoff = self.backoff_for(attempt);
                    warn!(
                        "⚠️ [{}] 第 {} 次尝试失败: {}，{:.2}秒后重试",
                        label,
                        attempt + 1,
                        err,
                        backoff.as_secs_f64()
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
            }
        }
    }
}
