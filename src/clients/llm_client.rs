//! LLM 客户端
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 兼容 OpenAI API 的服务（如 Azure, Gemini, Doubao 等）
//! - 联网搜索通过切换到支持搜索的模型实现

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::clients::{CapabilityClient, GenerateRequest};
use crate::config::Config;
use crate::error::ServiceError;

/// LLM 客户端
pub struct LlmClient {
    client: Client<OpenAIConfig>,
    model_name: String,
    search_model_name: String,
}

impl LlmClient {
    /// 创建新的 LLM 客户端
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
            search_model_name: config.llm_search_model_name.clone(),
        }
    }

    fn model_for(&self, request: &GenerateRequest) -> &str {
        if request.use_search {
            &self.search_model_name
        } else {
            &self.model_name
        }
    }

    async fn send(&self, model: &str, request: &GenerateRequest) -> Result<String, ServiceError> {
        let api_failed = |message: String| ServiceError::ApiCallFailed {
            model: model.to_string(),
            message,
        };

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(request.prompt.as_str())
            .build()
            .map_err(|e| api_failed(e.to_string()))?;

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(model)
            .messages(vec![ChatCompletionRequestMessage::User(user_msg)]);
        // 搜索模型不接受 temperature
        if !request.use_search {
            args.temperature(request.temperature);
        }
        let chat_request = args.build().map_err(|e| api_failed(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .map_err(|e| {
                warn!("LLM API 调用失败: {}", e);
                api_failed(e.to_string())
            })?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ServiceError::EmptyContent {
                model: model.to_string(),
            })?;

        Ok(content.trim().to_string())
    }
}

#[async_trait]
impl CapabilityClient for LlmClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, ServiceError> {
        let model = self.model_for(request);
        debug!(
            "调用 LLM API，模型: {}，搜索: {}，prompt 长度: {} 字符",
            model,
            request.use_search,
            request.prompt.len()
        );

        match tokio::time::timeout(request.timeout, self.send(model, request)).await {
            Ok(result) => {
                if result.is_ok() {
                    debug!("LLM API 调用成功");
                }
                result
            }
            Err(_) => {
                warn!("LLM 请求超时 ({}秒)", request.timeout.as_secs());
                Err(ServiceError::Timeout {
                    model: model.to_string(),
                    seconds: request.timeout.as_secs(),
                })
            }
        }
    }
}
