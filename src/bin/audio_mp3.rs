//! 音频批量转 MP3 脚本

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

use history_content_gen::media::audio::{convert_folder, AudioFormat};
use history_content_gen::utils::logging;

#[derive(Parser)]
#[command(about = "把 m4a / wav 音频批量转成 MP3（依赖系统 ffmpeg）")]
struct Args {
    /// 待转换音频所在的文件夹
    #[arg(default_value = "m4a_files")]
    folder: PathBuf,

    /// MP3 输出文件夹
    #[arg(short, long, default_value = "mp3_files")]
    output: PathBuf,

    /// MP3 比特率（如 128k, 192k, 256k）
    #[arg(short, long, default_value = "192k")]
    bitrate: String,

    /// 源音频格式（m4a 或 wav）
    #[arg(short, long, default_value = "m4a")]
    format: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let args = Args::parse();
    let format = AudioFormat::from_str(&args.format).map_err(|e| anyhow::anyhow!(e))?;

    convert_folder(&args.folder, &args.output, &args.bitrate, format).await?;

    info!("输出文件夹: {}", args.output.display());

    Ok(())
}
