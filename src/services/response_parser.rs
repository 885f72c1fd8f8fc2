//! 模型响应解析
//!
//! 模型有时会把 JSON 包在 ``` 代码块里（可能带语言标记），先剥掉第一对代码块再解析。

use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;
use tracing::error;

use crate::error::{AppError, AppResult};
use crate::utils::logging::truncate_text;

static FENCE_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json\b|[A-Za-z0-9_+-]*[ \t]*\r?\n)?(.*?)(?:```|\z)").ok()
});

/// 去掉第一对代码块标记，没有代码块时原样返回（去首尾空白）
pub fn strip_code_fence(response: &str) -> &str {
    let inner = FENCE_RE
        .as_ref()
        .and_then(|re| re.captures(response))
        .and_then(|caps| caps.get(1));
    match inner {
        Some(inner) => inner.as_str().trim(),
        None => response.trim(),
    }
}

/// 剥离代码块后解析为 `T`
///
/// # 参数
/// - `response`: 模型原始输出
/// - `context`: 错误信息和日志里标识调用类型
pub fn parse_json<T: DeserializeOwned>(response: &str, context: &str) -> AppResult<T> {
    let cleaned = strip_code_fence(response);
    serde_json::from_str(cleaned).map_err(|e| {
        error!(
            "无法解析 LLM 返回的 JSON ({}): {} | 响应: {}",
            context,
            e,
            truncate_text(response, 200)
        );
        AppError::malformed(context, e)
    })
}
