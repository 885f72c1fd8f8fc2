//! 供应商调研流程 - 流程层
//!
//! 核心职责：定义"一个供应商"的完整调研流程
//!
//! 流程顺序：
//! 1. 占用一个调研名额
//! 2. 调研（缓存 → 重试 → 模型调用 → 解析）
//! 3. 任何失败都换成兜底记录，不向上返回错误

use std::sync::Arc;
use tracing::{debug, warn};

use crate::infrastructure::ConcurrencyLimiter;
use crate::models::{DiscoveredEntity, EnrichedRecord};
use crate::services::VendorResearch;
use crate::workflow::SearchCtx;

/// 单个供应商的调研结果
#[derive(Debug, Clone, PartialEq)]
pub enum ResearchOutcome {
    /// 调研成功
    Success(EnrichedRecord),
    /// 调研失败，使用兜底记录
    Fallback {
        record: EnrichedRecord,
        reason: String,
    },
}

impl ResearchOutcome {
    pub fn into_record(self) -> EnrichedRecord {
        match self {
            ResearchOutcome::Success(record) => record,
            ResearchOutcome::Fallback { record, .. } => record,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ResearchOutcome::Fallback { .. })
    }
}

/// 供应商调研流程
///
/// - 不持有进度和批次信息
/// - 名额在调研结束时归还（成功、失败、超时都一样）
pub struct ResearchFlow {
    research: Arc<VendorResearch>,
    limiter: ConcurrencyLimiter,
}

impl ResearchFlow {
    pub fn new(research: Arc<VendorResearch>, limiter: ConcurrencyLimiter) -> Self {
        Self { research, limiter }
    }

    pub async fn run(&self, entity: &DiscoveredEntity, ctx: &SearchCtx) -> ResearchOutcome {
        let result = self
            .limiter
            .run(self.research.research(&entity.name, &entity.category, ctx))
            .await
            .and_then(|inner| inner);

        match result {
            Ok(record) => {
                debug!("{} ✓ 调研完成: {}", ctx, entity.name);
                ResearchOutcome::Success(record)
            }
            Err(e) => {
                warn!("{} ⚠️ 调研 {} 失败，使用兜底记录: {}", ctx, entity.name, e);
                ResearchOutcome::Fallback {
                    record: EnrichedRecord::fallback(&entity.name, &entity.category, &ctx.term),
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn research(&self) -> &VendorResearch {
        &self.research
    }
}
