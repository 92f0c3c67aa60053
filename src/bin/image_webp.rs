//! 图片批量转 WebP 脚本

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use history_content_gen::media::webp::process_images;
use history_content_gen::utils::logging;

#[derive(Parser)]
#[command(about = "把 jpg / jpeg / png 图片批量转成 WebP")]
struct Args {
    /// 待转换图片所在的文件夹
    #[arg(default_value = "image_files")]
    folder: PathBuf,

    /// WebP 质量 (1-100)
    #[arg(short, long, default_value_t = 85, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// 同时处理的任务数
    #[arg(short, long, default_value_t = 4)]
    workers: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let args = Args::parse();

    process_images(&args.folder, args.quality, args.workers).await?;

    Ok(())
}
