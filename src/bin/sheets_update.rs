//! 批量结果回填脚本
//!
//! 把解析后的结果文件按标识列写回工作表

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use history_content_gen::clients::google_auth::{GoogleAuth, SHEETS_SCOPE};
use history_content_gen::clients::SheetsClient;
use history_content_gen::services::batch_service::load_results;
use history_content_gen::services::SheetsUpdaterService;
use history_content_gen::utils::logging;
use history_content_gen::Config;

#[derive(Parser)]
#[command(about = "把批量结果回填到 Google Sheets")]
struct Args {
    /// 解析后的结果 JSON 文件
    #[arg(long)]
    json_file: PathBuf,

    /// 覆盖默认的 spreadsheet ID
    #[arg(long)]
    spreadsheet_id: Option<String>,

    /// 覆盖默认的工作表名称
    #[arg(long)]
    sheet_name: Option<String>,

    /// 覆盖默认的服务账号密钥文件
    #[arg(long)]
    credentials: Option<PathBuf>,

    /// 数据起始行（1 基）
    #[arg(long, default_value_t = 2)]
    start_row: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let args = Args::parse();
    logging::log_banner("Google Sheets 结果回填");

    let config = Config::from_env();
    let spreadsheet_id = args.spreadsheet_id.unwrap_or_else(|| config.spreadsheet_id.clone());
    let sheet_name = args.sheet_name.unwrap_or_else(|| config.sheet_name.clone());
    let credentials = args
        .credentials
        .unwrap_or_else(|| PathBuf::from(&config.credentials_file));

    // 加载结果
    let results = load_results(&args.json_file).await?;
    if results.is_empty() {
        anyhow::bail!("没有可回填的数据: {}", args.json_file.display());
    }

    // 创建客户端
    let auth = Arc::new(GoogleAuth::from_file(&credentials, SHEETS_SCOPE)?);
    let sheets = SheetsClient::new(auth, spreadsheet_id);
    let updater = SheetsUpdaterService::new(sheets);

    let stats = updater
        .update_sheet(&sheet_name, &results, args.start_row)
        .await?;

    if stats.failed_cells > 0 {
        info!("⚠️ 有 {} 个单元格更新失败，请检查日志", stats.failed_cells);
    }

    Ok(())
}
