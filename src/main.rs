use anyhow::{Context, Result};
use vendor_scout::utils::logging;
use vendor_scout::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    let term = std::env::args()
        .nth(1)
        .filter(|t| !t.trim().is_empty())
        .context("用法: vendor_scout <搜索词>")?;

    // 初始化并运行应用
    let app = App::initialize(config)?;
    app.run(&term).await?;

    Ok(())
}
