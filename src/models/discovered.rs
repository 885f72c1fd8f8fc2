//! 全程去重的供应商名称集合

use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

/// 本次运行已发现的名称（精确匹配，区分大小写）
///
/// 只增不减；过滤与插入在同一把锁内完成，并发批次不会接受同一个名称
#[derive(Debug, Clone, Default)]
pub struct DiscoveredSet {
    names: Arc<Mutex<HashSet<String>>>,
}

impl DiscoveredSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 认领一组候选名称，最多接受 `limit` 个未出现过的名称
///
/// 名称按原样比较和保存，只跳过空白名称
    ///
    /// 返回被接受的名称，保持候选顺序；超出 `limit` 的名称不会写入集合
    pub async fn claim(&self, candidates: Vec<String>, limit: usize) -> Vec<String> {
        let mut names = self.names.lock().await;
        let mut accepted = Vec::new();

        for candidate in candidates {
            if accepted.len() >= limit {
                break;
            }
            if candidate.trim().is_empty() {
                continue;
            }
            if names.insert(candidate.clone()) {
                accepted.push(candidate);
            }
        }

        accepted
    }

    pub async fn contains(&self, name: &str) -> bool {
        self.names.lock().await.contains(name)
    }

    pub async fn len(&self) -> usize {
        self.names.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.names.lock().await.is_empty()
    }
}
