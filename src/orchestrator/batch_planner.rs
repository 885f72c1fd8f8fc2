//! 发现批次规划
//!
//! 把 (总数, 类别配比) 拆成一组大小适中的发现批次：
//!
//! 1. 每个类别分到 `floor(N * 权重 / 100)` 个（权重和超过 100 时按权重和折算）
//! 2. 每个类别按 `clamp(类别数量 / 3, 10, 20)` 切成整批，余数单独成批
//! 3. 取整丢掉的数量追加为最后一批，归到权重最大的类别（并列取最先出现的）
//!
//! 批次顺序：按配比顺序，类别内整批在前、余数批在后，取整补齐批在最后。

use tracing::debug;

use crate::models::{CategoryMix, WorkItem};

/// 单批最少数量
pub const MIN_BATCH_SIZE: usize = 10;
/// 单批最多数量
pub const MAX_BATCH_SIZE: usize = 20;

/// 规划发现批次
///
/// 所有批次数量之和恰好等于 `total`。配比为空或权重全为 0 时返回空列表。
pub fn plan_batches(total: usize, mix: &CategoryMix) -> Vec<WorkItem> {
    if mix.first_active().is_none() {
        return Vec::new();
    }
    let largest = mix.largest().unwrap_or_default().to_string();

    let denominator = mix.total_weight().max(100);
    let mut batches = Vec::new();
    let mut planned = 0usize;

    for (category, weight) in mix.iter() {
        let type_count = (total as u64 * u64::from(weight) / denominator) as usize;
        if type_count == 0 {
            continue;
        }

        let size = batch_size_for(type_count);
        for _ in 0..type_count / size {
            batches.push(WorkItem::new(category, size));
        }
        if type_count % size > 0 {
            batches.push(WorkItem::new(category, type_count % size));
        }
        planned += type_count;
    }

    let remaining = total.saturating_sub(planned);
    if remaining > 0 {
        batches.push(WorkItem::new(largest, remaining));
    }

    debug!(
        "规划了 {} 个发现批次: {}",
        batches.len(),
        batches
            .iter()
            .map(|b| b.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );

    batches
}

/// 某个类别的单批大小，限制在 [10, 20]
pub fn batch_size_for(type_count: usize) -> usize {
    (type_count / 3).clamp(MIN_BATCH_SIZE, MAX_BATCH_SIZE)
}
