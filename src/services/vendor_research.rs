//! 供应商调研服务 - 业务能力层
//!
//! 单个供应商的资料调研。同一组 (名称, 搜索词, 类别, 国家, 地区) 只调用一次，
//! 并发的相同请求等待同一个结果；失败不缓存。

use std::sync::Arc;
use tracing::debug;

use crate::clients::{CapabilityClient, GenerateRequest};
use crate::error::AppResult;
use crate::infrastructure::{CacheKey, CacheStats, MemoCache, RetryPolicy};
use crate::models::{EnrichedRecord, ResearchPayload};
use crate::services::prompts;
use crate::services::response_parser::parse_json;
use crate::workflow::SearchCtx;

/// 供应商调研服务
pub struct VendorResearch {
    client: Arc<dyn CapabilityClient>,
    retry: RetryPolicy,
    cache: MemoCache<EnrichedRecord>,
    timeout_secs: u64,
}

impl VendorResearch {
    pub fn new(client: Arc<dyn CapabilityClient>, retry: RetryPolicy, timeout_secs: u64) -> Self {
        Self {
            client,
            retry,
            cache: MemoCache::new("research_vendor"),
            timeout_secs,
        }
    }

    /// 调研一个供应商
    ///
    /// 调用重试耗尽或响应无法解析时返回错误，由调用方决定兜底
    pub async fn research(
        &self,
        name: &str,
        category: &str,
        ctx: &SearchCtx,
    ) -> AppResult<EnrichedRecord> {
        let key = CacheKey::builder("research_vendor")
            .arg(name)
            .arg(ctx.term.as_str())
            .arg(category)
            .kwarg("country", ctx.country())
            .kwarg("region", ctx.region())
            .build();

        self.cache
            .get_or_try_insert_with(key, || self.fetch(name, category, ctx))
            .await
    }

    async fn fetch(&self, name: &str, category: &str, ctx: &SearchCtx) -> AppResult<EnrichedRecord> {
        debug!("{} 调研供应商: {} ({})", ctx, name, category);

        let request = GenerateRequest::new(prompts::research_prompt(name, category, ctx))
            .temperature(0.3)
            .timeout_secs(self.timeout_secs)
            .with_search(true);

        let label = format!("research_vendor:{}", name);
        let response = self
            .retry
            .run(&label, || self.client.generate(&request))
            .await?;

        let payload: ResearchPayload = parse_json(&response, "research_vendor")?;
        Ok(EnrichedRecord::from_payload(name, category, payload))
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
