//! 基础设施层（Infrastructure Layer）
//!
//! 只暴露能力，不认识供应商、类别这些业务概念：
//!
//! - `RetryPolicy` - 指数退避重试
//! - `MemoCache` - 幂等调用的单飞缓存
//! - `ConcurrencyLimiter` - 并发名额
//!
//! 业务层在调用点显式组合：限流 → 缓存 → 重试 → 客户端

pub mod limiter;
pub mod memo_cache;
pub mod retry;

pub use limiter::ConcurrencyLimiter;
pub use memo_cache::{CacheKey, CacheStats, MemoCache};
pub use retry::RetryPolicy;
