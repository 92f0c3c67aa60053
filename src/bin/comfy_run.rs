//! ComfyUI 工作流执行脚本
//!
//! 提交导出的工作流 JSON，等待完成后把生成的图片保存到本地

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use history_content_gen::services::workflow_template::PromptData;
use history_content_gen::services::ComfyService;
use history_content_gen::utils::logging;
use history_content_gen::Config;

#[derive(Parser)]
#[command(about = "执行 ComfyUI 工作流并保存生成的图片")]
struct Args {
    /// 导出的工作流 JSON 文件
    #[arg(long)]
    workflow: PathBuf,

    /// 覆盖默认的 ComfyUI 服务地址（如 192.168.50.213:8188）
    #[arg(long)]
    server: Option<String>,

    /// 输入图片（本地路径，上传后写入工作流）
    #[arg(long)]
    image: Option<String>,

    /// 正向提示词
    #[arg(long)]
    positive: Option<String>,

    /// 负向提示词
    #[arg(long)]
    negative: Option<String>,

    /// 输出文件名前缀
    #[arg(long, default_value = "output")]
    output_prefix: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let args = Args::parse();

    let config = Config::from_env();
    let server = args.server.unwrap_or_else(|| config.comfy_server_address.clone());

    // 任一改写参数出现时才走模板改写
    let prompt_data = if args.image.is_some() || args.positive.is_some() || args.negative.is_some()
    {
        Some(PromptData {
            image: args.image,
            positive_prompt: args.positive,
            negative_prompt: args.negative,
        })
    } else {
        None
    };

    info!("🖥️ ComfyUI 服务: {}", server);
    info!("📄 工作流文件: {}", args.workflow.display());

    let service = ComfyService::new(&server);
    let images = service.generate_images(&args.workflow, prompt_data).await?;

    for (idx, image_data) in images.iter().enumerate() {
        let file_name = format!("{}_{}.png", args.output_prefix, idx);
        tokio::fs::write(&file_name, image_data).await?;
        info!("图片已保存: {}", file_name);
    }

    if images.is_empty() {
        info!("工作流没有产生图片输出");
    }

    Ok(())
}
