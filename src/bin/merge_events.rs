//! 季度事件文件合并脚本

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use history_content_gen::dataset::merge::merge_quarter_files;
use history_content_gen::utils::logging;

#[derive(Parser)]
#[command(about = "合并四个季度的历史事件 JSON 文件")]
struct Args {
    /// 季度文件所在文件夹
    #[arg(default_value = "input")]
    input: PathBuf,

    /// 输出文件夹
    #[arg(short, long, default_value = "output")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let args = Args::parse();

    info!("🔄 开始合并历史事件文件...");
    info!("📂 输入文件夹: {}", args.input.display());

    merge_quarter_files(&args.input, &args.output).await?;

    Ok(())
}
