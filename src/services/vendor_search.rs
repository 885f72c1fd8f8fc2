//! 供应商搜索服务 - 业务能力层
//!
//! 只负责"按类别找一批名称"这一能力，去重和补找由发现引擎负责

use std::sync::Arc;
use tracing::{debug, warn};

use crate::clients::{CapabilityClient, GenerateRequest};
use crate::error::AppResult;
use crate::infrastructure::RetryPolicy;
use crate::services::prompts;
use crate::services::response_parser::parse_json;
use crate::workflow::SearchCtx;

/// 供应商搜索服务
pub struct VendorSearch {
    client: Arc<dyn CapabilityClient>,
    retry: RetryPolicy,
    timeout_secs: u64,
}

impl VendorSearch {
    pub fn new(client: Arc<dyn CapabilityClient>, retry: RetryPolicy, timeout_secs: u64) -> Self {
        Self {
            client,
            retry,
            timeout_secs,
        }
    }

    /// 查找某个类别的供应商名称
    ///
    /// # 返回
    /// - 重试耗尽时返回错误
    /// - 响应无法解析时返回 `count` 个占位名称
    pub async fn find_vendor_names(
        &self,
        ctx: &SearchCtx,
        category: &str,
        count: usize,
    ) -> AppResult<Vec<String>> {
        debug!("{} 查找 {} 个 {}", ctx, count, category);

        let request =
            GenerateRequest::new(prompts::discovery_prompt(&ctx.term, category, count, ctx))
                .temperature(0.2)
                .timeout_secs(self.timeout_secs)
                .with_search(true);

        let label = format!("find_vendor_names:{}", category);
        let response = self
            .retry
            .run(&label, || self.client.generate(&request))
            .await?;

        match parse_json::<Vec<String>>(&response, "vendor_names") {
            Ok(names) => Ok(names),
            Err(_) => {
                warn!("{} ⚠️ 名称列表无法解析，使用占位名称", ctx);
                Ok(placeholder_names(&ctx.term, category, count))
            }
        }
    }
}

/// 占位名称：`"<Term> <Category> <序号>"`
pub fn placeholder_names(term: &str, category: &str, count: usize) -> Vec<String> {
    let term = capitalize(term);
    let category = capitalize(category);
    (1..=count)
        .map(|i| format!("{} {} {}", term, category, i))
        .collect()
}

// 首字母大写，其余小写
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
