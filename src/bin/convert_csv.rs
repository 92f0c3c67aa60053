//! 事件 JSON 转 CSV 脚本（Supabase 导入用）

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use history_content_gen::dataset::csv_export::convert_json_to_csv;
use history_content_gen::utils::logging;

#[derive(Parser)]
#[command(about = "把事件 JSON 转成 Supabase 可导入的 CSV")]
struct Args {
    /// 输入 JSON 文件
    #[arg(long, default_value = "input/history_noti.json")]
    input: PathBuf,

    /// 输出 CSV 文件
    #[arg(long, default_value = "output_for_supabase.csv")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let args = Args::parse();

    if !args.input.exists() {
        anyhow::bail!(
            "找不到 '{}' 文件\n请在脚本同级目录创建 input 文件夹并放入 history_noti.json",
            args.input.display()
        );
    }

    convert_json_to_csv(&args.input, &args.output).await?;

    info!("现在可以在 Supabase 控制台导入这个文件了。");

    Ok(())
}
