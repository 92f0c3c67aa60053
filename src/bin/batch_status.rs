//! 批量状态查询脚本
//!
//! 查询任务状态；已完成时下载并解析结果。
//! 本地已有结果文件时直接复用，不重复下载。

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use history_content_gen::models::{BatchStatus, ParsedResult};
use history_content_gen::services::batch_service::{load_results, save_results};
use history_content_gen::services::BatchService;
use history_content_gen::utils::logging::{self, truncate_text};
use history_content_gen::Config;

#[derive(Parser)]
#[command(about = "查询批量任务状态并下载结果")]
struct Args {
    /// 批量任务 ID
    #[arg(long)]
    batch_id: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let args = Args::parse();
    logging::log_banner("批量状态查询器");

    let config = Config::from_env();
    config.require_openai_key()?;

    info!("📋 批量 ID: {}", args.batch_id);

    let service = BatchService::new(&config);
    let status = service.check_status(&args.batch_id).await?;

    if status.is_completed() {
        info!("🎉 批量任务完成!");

        let result_file = PathBuf::from(format!("processed_results_{}.json", args.batch_id));

        if result_file.exists() {
            info!("📁 结果文件已存在: {}", result_file.display());
            info!("💡 复用已有文件，不重新下载。");

            match load_results(&result_file).await {
                Ok(results) => {
                    info!("✅ 从已有文件加载了 {} 个结果", results.len());
                    preview_results(&results);
                }
                Err(e) => {
                    error!("❌ 已有文件读取失败: {}", e);
                    info!("📥 尝试重新下载...");
                    download_and_save(&service, &args.batch_id, &result_file).await?;
                }
            }
        } else {
            info!("📥 下载结果中...");
            download_and_save(&service, &args.batch_id, &result_file).await?;
        }
    } else {
        print_status_detail(&status);
        info!("\n⏳ 批量任务尚未完成，请稍后再查询。");
    }

    Ok(())
}

/// 下载、保存并预览结果
async fn download_and_save(
    service: &BatchService,
    batch_id: &str,
    result_file: &PathBuf,
) -> Result<()> {
    let results = service.download_results(batch_id).await?;

    if results.is_empty() {
        error!("❌ 结果下载失败或没有成功的结果");
        return Ok(());
    }

    save_results(&results, result_file).await?;
    info!("✅ 共处理 {} 个结果", results.len());
    preview_results(&results);

    Ok(())
}

/// 预览前两条结果
fn preview_results(results: &[ParsedResult]) {
    info!("\n📋 结果预览:");
    for (i, result) in results.iter().take(2).enumerate() {
        info!("\n--- 结果 {} ---", i + 1);
        info!("Custom ID: {}", result.custom_id);
        info!("Simple: {}", truncate_text(&result.content.simple, 50));
        info!("Detail: {}", truncate_text(&result.content.detail, 50));
        info!("Year: {}", result.content.year);
        info!("Movies: {}", result.content.related_movies);
    }
}

/// 打印未完成任务的详细状态
fn print_status_detail(status: &BatchStatus) {
    let format_ts = |ts: Option<i64>| {
        ts.and_then(|t| chrono::DateTime::from_timestamp(t, 0))
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "N/A".to_string())
    };

    info!("\n📋 批量状态详情:");
    info!("{}", "-".repeat(50));
    info!("批量 ID: {}", status.id);
    info!("状态: {}", status.status);
    info!("创建时间: {}", format_ts(status.created_at));
    info!("完成时间: {}", format_ts(status.completed_at));
    info!("失败时间: {}", format_ts(status.failed_at));
    info!("输出文件 ID: {}", status.output_file_id.as_deref().unwrap_or("N/A"));
    info!("错误文件 ID: {}", status.error_file_id.as_deref().unwrap_or("N/A"));

    if let Some(counts) = &status.request_counts {
        info!("\n📊 请求处理状况:");
        info!("  总请求数: {}", counts.total);
        info!("  已完成: {}", counts.completed);
        info!("  已失败: {}", counts.failed);
        info!("  进度: {}/{}", counts.completed, counts.total);
    }

    if let Some(metadata) = &status.metadata {
        if !metadata.is_empty() {
            info!("\n🏷️ 元数据:");
            for (key, value) in metadata {
                info!("  {}: {}", key, value);
            }
        }
    }
}
