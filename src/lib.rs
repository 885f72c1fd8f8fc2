//! # Vendor Scout
//!
//! 通过文本生成服务发现并调研供应商的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用分层架构，依赖只向下：
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 外部生成服务，唯一的抽象 `CapabilityClient`
//! - `LlmClient` - 基于 OpenAI 兼容接口的实现
//!
//! ### ② 基础设施层（Infrastructure）
//! - `infrastructure/` - 与业务无关的调用包装
//! - `RetryPolicy` - 指数退避重试
//! - `MemoCache` - 单飞结果缓存
//! - `ConcurrencyLimiter` - 并发名额
//!
//! ### ③ 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个请求
//! - `DisambiguationService` - 搜索词解读
//! - `VendorSearch` - 按类别查找名称
//! - `VendorResearch` - 调研单个供应商
//!
//! ### ④ 流程层（Workflow）
//! - `workflow/` - 定义"一个供应商"的完整调研流程
//! - `SearchCtx` - 上下文封装（搜索词 + 地区）
//! - `ResearchFlow` - 名额 → 调研 → 兜底
//!
//! ### ⑤ 编排层（Orchestration）
//! - `orchestrator/batch_planner` - 发现批次规划
//! - `orchestrator/discovery_engine` - 分组发现与全局去重
//! - `orchestrator/enrichment_engine` - 分块调研与进度上报
//! - `orchestrator/app` - 组装与运行
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{CapabilityClient, GenerateRequest, LlmClient};
pub use config::Config;
pub use error::{AppError, AppResult, ConfigError, ServiceError};
pub use models::{CategoryMix, DiscoveredEntity, EnrichedRecord, ProgressState, WorkItem};
pub use orchestrator::{plan_batches, App, DiscoveryEngine, EnrichmentEngine, RunSummary};
pub use workflow::{ResearchFlow, SearchCtx};
