use thiserror::Error;

/// 外部生成服务错误
///
/// 超时、网络、服务端错误统一归为这一种，重试层不做区分
#[derive(Debug, Error)]
pub enum ServiceError {
    /// 调用超时
    #[error("LLM 调用超时 (模型: {model}, 超时: {seconds}秒)")]
    Timeout { model: String, seconds: u64 },

    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {message}")]
    ApiCallFailed { model: String, message: String },

    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },

    /// 环境变量不存在
    #[error("环境变量 {var_name} 不存在")]
    EnvVarNotFound { var_name: String },

    /// 配置文件解析失败
    #[error("配置文件解析失败 ({path}): {message}")]
    FileParseFailed { path: String, message: String },

    /// 类别配比格式错误
    #[error("无法解析类别配比: '{value}' (格式应为 manufacturer:40,retailer:60)")]
    InvalidMix { value: String },

    /// 配置值不合法
    #[error("配置项 {field} 不合法: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 外部服务错误（可重试）
    #[error("服务错误: {0}")]
    Service(#[from] ServiceError),

    /// 响应无法解析为期望的 JSON 结构
    #[error("响应解析失败 ({context}): {source}")]
    MalformedResponse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 并发限制器已关闭
    #[error("并发限制器不可用: {0}")]
    Limiter(String),

    /// 文件读写错误
    #[error("文件错误: {0}")]
    Io(#[from] std::io::Error),

    /// 其他错误
    #[error("错误: {0}")]
    Other(String),
}

impl AppError {
    /// 创建响应解析错误
    pub fn malformed(context: impl Into<String>, source: serde_json::Error) -> Self {
        AppError::MalformedResponse {
            context: context.into(),
            source,
        }
    }

    /// 是否为外部服务错误（重试耗尽后仍然失败）
    pub fn is_service(&self) -> bool {
        matches!(self, AppError::Service(_))
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
