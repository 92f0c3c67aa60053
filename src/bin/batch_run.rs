//! 批量任务提交脚本
//!
//! 上传输入文件并创建批量任务

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use history_content_gen::services::BatchService;
use history_content_gen::utils::logging;
use history_content_gen::Config;

#[derive(Parser)]
#[command(about = "提交 OpenAI 批量任务")]
struct Args {
    /// 批量输入文件
    #[arg(long, default_value = "batchinput.jsonl")]
    file: PathBuf,

    /// 任务描述
    #[arg(long, default_value = "History content generation")]
    description: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let args = Args::parse();
    logging::log_banner("批量任务执行器");

    let config = Config::from_env();
    config.require_openai_key()?;

    if !args.file.exists() {
        anyhow::bail!(
            "批量输入文件不存在: {}\n请先运行 batch_generate 生成文件",
            args.file.display()
        );
    }

    info!("📁 批量文件: {}", args.file.display());
    info!("🤖 使用模型: {}", config.batch_model);
    info!("📝 任务描述: {}", args.description);

    let service = BatchService::new(&config);
    let batch = service.submit(&args.file, &args.description).await?;

    info!("\n✅ 批量任务已成功启动!");
    info!("📋 批量 ID: {}", batch.id);
    info!("\n📊 状态查询方式:");
    info!("cargo run --bin batch_status -- --batch-id {}", batch.id);
    info!("\n⏰ 批量任务最长需要 24 小时完成，请稍后查询。");

    Ok(())
}
