//! 外部生成服务客户端
//!
//! `CapabilityClient` 是业务层唯一依赖的外部能力：给一段 prompt，返回一段文本。
//! `LlmClient` 是基于 OpenAI 兼容接口的实现，测试中可以替换为脚本化的实现。

pub mod llm_client;

use async_trait::async_trait;
use std::time::Duration;

use crate::error::ServiceError;

pub use llm_client::LlmClient;

/// 一次生成请求
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub prompt: String,
    pub temperature: f32,
    pub timeout: Duration,
    /// 是否启用联网搜索
    pub use_search: bool,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: 0.7,
            timeout: Duration::from_secs(300),
            use_search: false,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn timeout_secs(mut self, seconds: u64) -> Self {
        self.timeout = Duration::from_secs(seconds);
        self
    }

    pub fn with_search(mut self, use_search: bool) -> Self {
        self.use_search = use_search;
        self
    }
}

/// 文本生成能力
#[async_trait]
pub trait CapabilityClient: Send + Sync {
    /// 发送 prompt，返回模型输出的原始文本
    async fn generate(&self, request: &GenerateRequest) -> Result<String, ServiceError>;
}
