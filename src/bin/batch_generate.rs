//! 批量输入文件生成脚本
//!
//! 读取事件数据集，为每个事件生成一行批量请求

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::warn;

use history_content_gen::models::load_events_toml;
use history_content_gen::services::BatchFileService;
use history_content_gen::utils::logging;
use history_content_gen::Config;

#[derive(Parser)]
#[command(about = "生成 OpenAI 批量输入文件")]
struct Args {
    /// 事件数据集 TOML 文件
    #[arg(long, default_value = "events.toml")]
    events: PathBuf,

    /// 输出的 JSONL 文件
    #[arg(long, default_value = "batchinput.jsonl")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let args = Args::parse();
    logging::log_banner("批量输入文件生成器");

    let config = Config::from_env();

    let events = load_events_toml(&args.events).await?;
    if events.is_empty() {
        warn!("⚠️ 数据集为空，没有生成任何请求");
        return Ok(());
    }

    let service = BatchFileService::new(&config);
    service.generate(&events, &args.output).await?;

    Ok(())
}
