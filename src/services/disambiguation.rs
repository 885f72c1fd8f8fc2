//! 搜索词解读服务 - 业务能力层
//!
//! 把一个模糊的搜索词展开成若干种业务解读，结果按搜索词缓存

use std::sync::Arc;
use tracing::{info, warn};

use crate::clients::{CapabilityClient, GenerateRequest};
use crate::error::AppResult;
use crate::infrastructure::{CacheKey, CacheStats, MemoCache, RetryPolicy};
use crate::models::Interpretation;
use crate::services::prompts;
use crate::services::response_parser::parse_json;

/// 搜索词解读服务
///
/// - 调用失败会在重试耗尽后返回错误
/// - 响应无法解析或为空时返回一条默认解读，并且同样写入缓存
pub struct DisambiguationService {
    client: Arc<dyn CapabilityClient>,
    retry: RetryPolicy,
    cache: MemoCache<Vec<Interpretation>>,
    timeout_secs: u64,
}

impl DisambiguationService {
    pub fn new(client: Arc<dyn CapabilityClient>, retry: RetryPolicy, timeout_secs: u64) -> Self {
        Self {
            client,
            retry,
            cache: MemoCache::new("disambiguate"),
            timeout_secs,
        }
    }

    /// 获取搜索词的几种解读
    pub async fn disambiguate(&self, term: &str) -> AppResult<Vec<Interpretation>> {
        let key = CacheKey::builder("disambiguate_term").arg(term).build();

        self.cache
            .get_or_try_insert_with(key, || self.fetch(term))
            .await
    }

    async fn fetch(&self, term: &str) -> AppResult<Vec<Interpretation>> {
        info!("🔎 正在解读搜索词: {}", term);

        let request = GenerateRequest::new(prompts::disambiguation_prompt(term))
            .temperature(0.3)
            .timeout_secs(self.timeout_secs);

        let response = self
            .retry
            .run("disambiguate", || self.client.generate(&request))
            .await?;

        match parse_json::<Vec<Interpretation>>(&response, "disambiguation") {
            Ok(list) if !list.is_empty() => {
                info!("✓ 得到 {} 种解读", list.len());
                Ok(list)
            }
            Ok(_) => {
                warn!("⚠️ 解读结果为空，使用默认解读");
                Ok(vec![Interpretation::fallback(term)])
            }
            Err(_) => {
                warn!("⚠️ 解读结果无法解析，使用默认解读");
                Ok(vec![Interpretation::fallback(term)])
            }
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
