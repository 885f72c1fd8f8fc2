//! 供应商发现引擎 - 编排层
//!
//! ## 职责
//!
//! 1. **批次规划**：按配比把目标数量拆成发现批次
//! 2. **分组并发**：每组最多 `discovery_concurrency` 个批次同时请求，组间短暂停顿
//! 3. **全局去重**：名称在写入本次运行的已发现集合时去重，并发批次之间也不会重复
//! 4. **补找一次**：去重后数量不足时换一个搜索词再找一次缺口
//!
//! 单个批次失败不影响其他批次，只会让最终数量少于目标。

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::infrastructure::ConcurrencyLimiter;
use crate::models::{CategoryMix, DiscoveredEntity, DiscoveredSet, WorkItem};
use crate::orchestrator::batch_planner::plan_batches;
use crate::services::VendorSearch;
use crate::workflow::SearchCtx;

/// 供应商发现引擎
pub struct DiscoveryEngine {
    search: Arc<VendorSearch>,
    limiter: ConcurrencyLimiter,
    discovered: DiscoveredSet,
    pause: Duration,
}

impl DiscoveryEngine {
    /// # 参数
    /// - `discovered`: 本次运行共享的已发现集合
    /// - `concurrency`: 同时请求的批次数
    /// - `pause`: 两组批次之间的停顿
    pub fn new(
        search: Arc<VendorSearch>,
        discovered: DiscoveredSet,
        concurrency: usize,
        pause: Duration,
    ) -> Self {
        Self {
            search,
            limiter: ConcurrencyLimiter::new("discovery", concurrency),
            discovered,
            pause,
        }
    }

    /// 发现 `total` 个供应商
    ///
    /// 输出按批次规划的顺序拼接，批次内保持模型返回的顺序
    pub async fn discover(
        &self,
        ctx: &SearchCtx,
        total: usize,
        mix: &CategoryMix,
    ) -> Vec<DiscoveredEntity> {
        let batches = plan_batches(total, mix);
        if batches.is_empty() {
            warn!("{} ⚠️ 没有可执行的发现批次", ctx);
            return Vec::new();
        }

        let group_size = self.limiter.capacity();
        let total_groups = batches.len().div_ceil(group_size);
        info!(
            "{} 🔍 共 {} 个发现批次，每组 {} 个，共 {} 组",
            ctx,
            batches.len(),
            group_size,
            total_groups
        );

        let mut entities = Vec::with_capacity(total);

        for (group_idx, group) in batches.chunks(group_size).enumerate() {
            let results = join_all(group.iter().map(|item| self.process_item(ctx, item))).await;

            for (item, names) in group.iter().zip(results) {
                entities.extend(
                    names
                        .into_iter()
                        .map(|name| DiscoveredEntity::new(name, item.category.as_str())),
                );
            }

            if group_idx + 1 < total_groups {
                tokio::time::sleep(self.pause).await;
            }
        }

        info!("{} ✓ 共发现 {} 个不重复的供应商", ctx, entities.len());
        entities
    }

    /// 处理单个批次，返回本批次新接受的名称
    async fn process_item(&self, ctx: &SearchCtx, item: &WorkItem) -> Vec<String> {
        let _permit = match self.limiter.acquire().await {
            Ok(permit) => permit,
            Err(e) => {
                error!("{} ❌ 批次 {} 无法获取并发名额: {}", ctx, item, e);
                return Vec::new();
            }
        };

        let names = match self
            .search
            .find_vendor_names(ctx, &item.category, item.count)
            .await
        {
            Ok(names) => names,
            Err(e) => {
                error!("{} ❌ 批次 {} 查找失败: {}", ctx, item, e);
                return Vec::new();
            }
        };

        let mut accepted = self.discovered.claim(names, item.count).await;
        if accepted.len() >= item.count {
            return accepted;
        }

        let shortfall = item.count - accepted.len();
        info!(
            "{} 批次 {} 去重后还缺 {} 个，换搜索词补找",
            ctx, item, shortfall
        );

        let retry_ctx = ctx.with_term(format!("{} alternative {}", ctx.term, item.category));
        match self
            .search
            .find_vendor_names(&retry_ctx, &item.category, shortfall)
            .await
        {
            Ok(more) => accepted.extend(self.discovered.claim(more, shortfall).await),
            Err(e) => error!("{} ❌ 批次 {} 补找失败: {}", ctx, item, e),
        }

        accepted
    }

    pub fn discovered(&self) -> &DiscoveredSet {
        &self.discovered
    }
}
