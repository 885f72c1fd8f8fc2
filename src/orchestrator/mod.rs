//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批次规划、并发调度和全局统计，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_planner` - 发现批次规划
//! - 按总数和类别配比生成发现批次
//!
//! ### `discovery_engine` - 供应商发现引擎
//! - 分组并发执行发现批次
//! - 维护本次运行的已发现集合（全局去重）
//! - 数量不足时补找一次
//!
//! ### `enrichment_engine` - 供应商调研引擎
//! - 分块创建调研任务
//! - 失败兜底，保证输出数量等于输入数量
//! - 上报进度
//!
//! ### `app` - 应用入口
//! - 组装各层，串起 解读 → 发现 → 调研 → 输出
//!
//! ## 层次关系
//!
//! ```text
//! app
//!     ↓
//! discovery_engine / enrichment_engine (处理 Vec<DiscoveredEntity>)
//!     ↓
//! workflow::ResearchFlow (处理单个供应商)
//!     ↓
//! services (能力层：解读 / 搜索 / 调研)
//!     ↓
//! infrastructure (基础设施：重试 / 缓存 / 并发限制)
//!     ↓
//! clients (CapabilityClient)
//! ```

pub mod app;
pub mod batch_planner;
pub mod discovery_engine;
pub mod enrichment_engine;

// 重新导出主要类型
pub use app::{App, RunSummary};
pub use batch_planner::plan_batches;
pub use discovery_engine::DiscoveryEngine;
pub use enrichment_engine::{chunk_size_for, EnrichmentEngine, EnrichmentReport};
