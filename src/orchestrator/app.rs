//! 应用入口 - 编排层
//!
//! ## 运行流程
//!
//! 1. **解读搜索词**：取第一种解读作为实际搜索词，解读失败时退回默认解读
//! 2. **发现**：按归一化后的配比发现供应商
//! 3. **调研**：逐个调研，进度通过通道上报
//! 4. **输出**：按相关度从高到低排序，写入 JSON 文件
//!
//! `App` 持有本进程的已发现集合，多次 `run` 之间名称不会重复。

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::clients::{CapabilityClient, LlmClient};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::{ConcurrencyLimiter, RetryPolicy};
use crate::models::{
    DiscoveredSet, EnrichedRecord, Interpretation, ProgressState, ProgressTracker,
};
use crate::orchestrator::{DiscoveryEngine, EnrichmentEngine};
use crate::services::{DisambiguationService, VendorResearch, VendorSearch};
use crate::utils::logging::{init_log_file, log_startup, print_final_stats};
use crate::workflow::{ResearchFlow, SearchCtx};

/// 一次运行的结果
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// 实际使用的解读
    pub interpretation: Interpretation,
    pub discovered: usize,
    pub success: usize,
    pub fallback: usize,
    /// 按相关度从高到低排序
    pub records: Vec<EnrichedRecord>,
}

/// 应用主结构
pub struct App {
    config: Config,
    disambiguation: DisambiguationService,
    discovery: DiscoveryEngine,
    enrichment: EnrichmentEngine,
}

impl App {
    /// 初始化应用：检查配置、初始化日志文件、创建 LLM 客户端
    pub fn initialize(config: Config) -> AppResult<Self> {
        config.validate()?;
        init_log_file(&config.log_file)?;
        log_startup(&config);

        let client: Arc<dyn CapabilityClient> = Arc::new(LlmClient::new(&config));
        Ok(Self::with_client(config, client))
    }

    /// 使用指定的客户端组装应用
    pub fn with_client(config: Config, client: Arc<dyn CapabilityClient>) -> Self {
        let retry = RetryPolicy::from_config(&config);

        let disambiguation =
            DisambiguationService::new(client.clone(), retry, config.general_timeout_secs);

        let search = VendorSearch::new(client.clone(), retry, config.discovery_timeout_secs);
        let discovery = DiscoveryEngine::new(
            Arc::new(search),
            DiscoveredSet::new(),
            config.discovery_concurrency,
            Duration::from_millis(config.discovery_pause_ms),
        );

        let research = VendorResearch::new(client, retry, config.research_timeout_secs);
        let flow = ResearchFlow::new(
            Arc::new(research),
            ConcurrencyLimiter::new("enrichment", config.enrichment_concurrency),
        );
        let enrichment = EnrichmentEngine::new(
            Arc::new(flow),
            Duration::from_millis(config.enrichment_pause_ms),
        );

        Self {
            config,
            disambiguation,
            discovery,
            enrichment,
        }
    }

    /// 运行一次完整的发现与调研
    pub async fn run(&self, term: &str) -> AppResult<RunSummary> {
        let started = Instant::now();
        let interpretation = self.pick_interpretation(term).await;
        info!(
            "📌 使用解读: {} ({})",
            interpretation.interpretation, interpretation.description
        );

        let ctx = SearchCtx::new(
            interpretation.interpretation.as_str(),
            Some(self.config.country.as_str()),
            Some(self.config.region.as_str()),
        );
        let mix = self.config.mix.normalized();

        // ========== 发现 ==========
        let entities = self
            .discovery
            .discover(&ctx, self.config.vendor_count, &mix)
            .await;
        let discovered = entities.len();
        if discovered < self.config.vendor_count {
            warn!(
                "{} ⚠️ 只发现了 {}/{} 个供应商",
                ctx, discovered, self.config.vendor_count
            );
        }

        // ========== 调研 ==========
        let (tracker, mut progress_rx) = ProgressTracker::channel(discovered);
        let progress_task = tokio::spawn(async move {
            while let Some(state) = progress_rx.recv().await {
                log_progress(state);
            }
        });

        let report = self
            .enrichment
            .enrich(entities, &ctx, Arc::new(tracker))
            .await;
        if let Err(e) = progress_task.await {
            warn!("进度任务异常退出: {}", e);
        }

        let stats = self.enrichment.cache_stats();
        info!(
            "调研缓存: 命中 {}，未命中 {} ({:.0}%)",
            stats.hits,
            stats.misses,
            stats.hit_rate() * 100.0
        );

        // ========== 输出 ==========
        let mut records = report.records;
        records.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));

        if !self.config.output_file.is_empty() {
            write_records(Path::new(&self.config.output_file), &records).await?;
        }

        print_final_stats(
            discovered,
            report.success,
            report.fallback,
            &self.config.output_file,
            started.elapsed(),
        );

        Ok(RunSummary {
            interpretation,
            discovered,
            success: report.success,
            fallback: report.fallback,
            records,
        })
    }

    /// 搜索词的所有解读（供调用方展示）
    pub async fn interpretations(&self, term: &str) -> AppResult<Vec<Interpretation>> {
        self.disambiguation.disambiguate(term).await
    }

    async fn pick_interpretation(&self, term: &str) -> Interpretation {
        match self.interpretations(term).await {
            Ok(list) => list
                .into_iter()
                .next()
                .unwrap_or_else(|| Interpretation::fallback(term)),
            Err(e) => {
                warn!("⚠️ 解读搜索词失败，使用默认解读: {}", e);
                Interpretation::fallback(term)
            }
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

fn log_progress(state: ProgressState) {
    info!(
        "📈 调研进度: {}/{} ({:.0}%)",
        state.completed,
        state.total,
        state.fraction() * 100.0
    );
}

async fn write_records(path: &Path, records: &[EnrichedRecord]) -> AppResult<()> {
    let json = serde_json::to_string_pretty(records)
        .map_err(|e| AppError::Other(format!("结果序列化失败: {}", e)))?;
    tokio::fs::write(path, json).await?;
    info!("💾 已写入 {} 条记录: {}", records.len(), path.display());
    Ok(())
}
