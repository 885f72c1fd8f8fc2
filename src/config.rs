use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::error::{AppError, AppResult, ConfigError};
use crate::models::CategoryMix;

/// 程序配置
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// 需要联网搜索时使用的模型
    pub llm_search_model_name: String,

    // --- 重试 ---
    pub max_retries: u32,
    pub initial_backoff_ms: u64,

    // --- 超时（秒） ---
    pub general_timeout_secs: u64,
    pub discovery_timeout_secs: u64,
    pub research_timeout_secs: u64,

    // --- 并发 ---
    /// 同时进行的发现批次数量
    pub discovery_concurrency: usize,
    /// 同时调研的供应商数量
    pub enrichment_concurrency: usize,
    pub discovery_pause_ms: u64,
    pub enrichment_pause_ms: u64,

    // --- 本次搜索 ---
    pub vendor_count: usize,
    pub mix: CategoryMix,
    pub country: String,
    pub region: String,

    /// 结果输出文件
    pub output_file: String,
    /// 运行日志文件
    pub log_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            llm_search_model_name: "gpt-4o-mini-search-preview".to_string(),
            max_retries: 3,
            initial_backoff_ms: 1000,
            general_timeout_secs: 300,
            discovery_timeout_secs: 600,
            research_timeout_secs: 300,
            discovery_concurrency: 3,
            enrichment_concurrency: 25,
            discovery_pause_ms: 200,
            enrichment_pause_ms: 200,
            vendor_count: 20,
            mix: CategoryMix::new()
                .with("manufacturer", 40)
                .with("distributor", 30)
                .with("retailer", 30),
            country: "United States".to_string(),
            region: String::new(),
            output_file: "vendors.json".to_string(),
            log_file: "vendor_scout.log".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 加载配置
    ///
    /// `VENDOR_SCOUT_CONFIG` 指向 TOML 文件时先读文件，再用环境变量覆盖
    pub fn load() -> AppResult<Self> {
        let base = match std::env::var("VENDOR_SCOUT_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Self::from_file(Path::new(&path))?,
            _ => Self::default(),
        };
        base.with_env_overrides()
    }

    /// 只从环境变量读取（缺省值见 [`Config::default`]）
    pub fn from_env() -> AppResult<Self> {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件读取，未出现的字段使用默认值
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| -> AppError {
            match e {
                ConfigError::FileParseFailed { message, .. } => ConfigError::FileParseFailed {
                    path: path.display().to_string(),
                    message,
                }
                .into(),
                other => other.into(),
            }
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::FileParseFailed {
            path: String::new(),
            message: e.to_string(),
        })
    }

    fn with_env_overrides(mut self) -> AppResult<Self> {
        override_string(&mut self.llm_api_key, "LLM_API_KEY");
        override_string(&mut self.llm_api_base_url, "LLM_API_BASE_URL");
        override_string(&mut self.llm_model_name, "LLM_MODEL_NAME");
        override_string(&mut self.llm_search_model_name, "LLM_SEARCH_MODEL_NAME");
        override_parsed(&mut self.max_retries, "MAX_RETRIES", "u32")?;
        override_parsed(&mut self.initial_backoff_ms, "INITIAL_BACKOFF_MS", "u64")?;
        override_parsed(&mut self.general_timeout_secs, "GENERAL_TIMEOUT_SECS", "u64")?;
        override_parsed(&mut self.discovery_timeout_secs, "DISCOVERY_TIMEOUT_SECS", "u64")?;
        override_parsed(&mut self.research_timeout_secs, "RESEARCH_TIMEOUT_SECS", "u64")?;
        override_parsed(&mut self.discovery_concurrency, "DISCOVERY_CONCURRENCY", "usize")?;
        override_parsed(&mut self.enrichment_concurrency, "ENRICHMENT_CONCURRENCY", "usize")?;
        override_parsed(&mut self.discovery_pause_ms, "DISCOVERY_PAUSE_MS", "u64")?;
        override_parsed(&mut self.enrichment_pause_ms, "ENRICHMENT_PAUSE_MS", "u64")?;
        override_parsed(&mut self.vendor_count, "VENDOR_COUNT", "usize")?;
        override_parsed(&mut self.mix, "VENDOR_MIX", "category mix")?;
        override_string(&mut self.country, "VENDOR_COUNTRY");
        override_string(&mut self.region, "VENDOR_REGION");
        override_string(&mut self.output_file, "OUTPUT_FILE");
        override_string(&mut self.log_file, "LOG_FILE");
        override_parsed(&mut self.verbose_logging, "VERBOSE_LOGGING", "bool")?;
        Ok(self)
    }

    /// 检查运行前必须满足的配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm_api_key.trim().is_empty() {
            return Err(ConfigError::EnvVarNotFound {
                var_name: "LLM_API_KEY".to_string(),
            });
        }
        if self.discovery_concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "discovery_concurrency".to_string(),
                reason: "必须大于 0".to_string(),
            });
        }
        if self.enrichment_concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "enrichment_concurrency".to_string(),
                reason: "必须大于 0".to_string(),
            });
        }
        if self.mix.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "mix".to_string(),
                reason: "至少需要一个类别".to_string(),
            });
        }
        Ok(())
    }
}

fn override_string(target: &mut String, var_name: &str) {
    if let Ok(value) = std::env::var(var_name) {
        *target = value;
    }
}

fn override_parsed<T: FromStr>(
    target: &mut T,
    var_name: &str,
    expected_type: &str,
) -> Result<(), ConfigError> {
    if let Ok(value) = std::env::var(var_name) {
        *target = value
            .trim()
            .parse()
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value: value.clone(),
                expected_type: expected_type.to_string(),
            })?;
    }
    Ok(())
}
