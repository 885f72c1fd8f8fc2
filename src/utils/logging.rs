//! 日志工具模块
//!
//! 提供日志初始化、格式化和输出的辅助函数
use std::fs;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::AppResult;

/// 初始化 tracing 订阅器
///
/// 优先使用 `RUST_LOG`，未设置时 `verbose` 决定默认级别。重复调用时忽略。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> AppResult<()> {
    let log_header = format!(
        "{}\n供应商调研日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 供应商发现与调研");
    info!("🤖 模型: {} / 搜索模型: {}", config.llm_model_name, config.llm_search_model_name);
    info!(
        "📊 发现并发: {}，调研并发: {}",
        config.discovery_concurrency, config.enrichment_concurrency
    );
    info!("📋 目标数量: {}，类别配比: {}", config.vendor_count, config.mix);
    info!("{}", "=".repeat(60));
}

/// 记录调研分块开始信息
///
/// # 参数
/// - `chunk_num`: 分块编号
/// - `total_chunks`: 分块总数
/// - `start`: 起始供应商编号
/// - `end`: 结束供应商编号
/// - `total`: 供应商总数
pub fn log_chunk_start(chunk_num: usize, total_chunks: usize, start: usize, end: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始调研第 {}/{} 块", chunk_num, total_chunks);
    info!("📄 本块供应商: {}-{} / 共 {} 个", start, end, total);
    info!("{}", "=".repeat(60));
}

/// 记录调研分块完成信息
///
/// # 参数
/// - `chunk_num`: 分块编号
/// - `success`: 调研成功数量
/// - `total`: 本块数量
pub fn log_chunk_complete(chunk_num: usize, success: usize, total: usize) {
    info!("\n{}", "─".repeat(60));
    info!("✓ 第 {} 块完成: 成功 {}/{}", chunk_num, success, total);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `discovered`: 发现的供应商数量
/// - `success`: 调研成功数量
/// - `fallback`: 使用兜底记录的数量
/// - `output_file`: 结果文件路径
/// - `elapsed`: 总耗时
pub fn print_final_stats(
    discovered: usize,
    success: usize,
    fallback: usize,
    output_file: &str,
    elapsed: Duration,
) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("🔎 发现: {}", discovered);
    info!("✅ 调研成功: {}/{}", success, discovered);
    info!("⚠️ 兜底记录: {}", fallback);
    info!("⏱️ 总耗时: {:.1}秒", elapsed.as_secs_f64());
    info!("{}", "=".repeat(60));
    info!("\n结果已保存至: {}", output_file);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_by_characters() {
        assert_eq!(truncate_text("供应商调研", 2), "供应...");
        assert_eq!(truncate_text("short", 10), "short");
    }
}
