//! 工作表处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是实时填充工具的入口，负责整表遍历和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：加载配置、创建 Google 认证和 Sheets 客户端
//! 2. **整表遍历**：从数据起始行逐行处理到最后一行
//! 3. **统计汇总**：处理 / 跳过 / 失败行数
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单行的细节
//! - **资源所有者**：唯一持有 SheetsClient 的模块
//! - **向下委托**：委托 workflow::RowFlow 处理单行

use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::clients::google_auth::{GoogleAuth, SHEETS_SCOPE};
use crate::clients::SheetsClient;
use crate::config::{Config, DATA_START_ROW};
use crate::models::sheet::SheetRow;
use crate::workflow::{ProcessResult, RowCtx, RowFlow};

/// 应用主结构
pub struct App {
    config: Config,
    sheets: SheetsClient,
    row_flow: RowFlow,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        config.require_openai_key()?;

        // 创建 Google 认证（Sheets 权限）
        let auth = Arc::new(GoogleAuth::from_file(&config.credentials_file, SHEETS_SCOPE)?);
        let sheets = SheetsClient::new(auth, &config.spreadsheet_id);

        let row_flow = RowFlow::new(&config);

        Ok(Self {
            config,
            sheets,
            row_flow,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        // 默认只处理测试工作表；处理全部季度表时改用 process_multiple_sheets
        let stats = self.process_sheet(&self.config.sheet_name).await?;

        print_final_stats(&self.config.sheet_name, &stats);

        Ok(())
    }

    /// 处理单个工作表
    pub async fn process_sheet(&self, sheet_name: &str) -> Result<SheetStats> {
        info!("\n📋 '{}' 工作表处理开始...", sheet_name);

        let all_values = self.sheets.get_all_values(sheet_name).await?;
        let last_row = all_values.len();

        let mut stats = SheetStats::default();

        if last_row < DATA_START_ROW {
            warn!("⚠️ '{}' 工作表没有可处理的数据", sheet_name);
            return Ok(stats);
        }

        info!("📊 处理数据行: {} 行 ~ {} 行", DATA_START_ROW, last_row);

        for (idx, values) in all_values.iter().enumerate() {
            let row_num = idx + 1;
            if row_num < DATA_START_ROW {
                continue;
            }

            let row = SheetRow::from_values(values);
            let ctx = RowCtx::new(sheet_name, row_num);

            match self.row_flow.run(&self.sheets, &row, &ctx).await {
                Ok(ProcessResult::Updated) => stats.processed += 1,
                Ok(ProcessResult::Skipped) => stats.skipped += 1,
                Err(e) => {
                    error!("❌ 行 {} 处理失败: {}", row_num, e);
                    stats.failed += 1;
                }
            }
        }

        info!("✅ '{}' 工作表处理完成!", sheet_name);
        info!("   - 处理: {} 行", stats.processed);
        info!("   - 跳过: {} 行", stats.skipped);
        if stats.failed > 0 {
            info!("   - 失败: {} 行", stats.failed);
        }

        Ok(stats)
    }

    /// 批量处理多个工作表
    pub async fn process_multiple_sheets(&self, sheet_names: &[&str]) -> Result<()> {
        info!("🚀 工作表批量处理开始 (共 {} 个)", sheet_names.len());

        for sheet_name in sheet_names {
            if let Err(e) = self.process_sheet(sheet_name).await {
                error!("❌ '{}' 工作表处理出错: {}", sheet_name, e);
            }
        }

        info!("\n🎉 所有工作表处理完成!");
        Ok(())
    }
}

/// 单表处理统计
#[derive(Debug, Default)]
pub struct SheetStats {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(50));
    info!("📊 Google Sheets 内容自动生成器");
    info!("🤖 模型: {}", config.openai_model);
    info!("{}", "=".repeat(50));
}

fn print_final_stats(sheet_name: &str, stats: &SheetStats) {
    info!("\n{}", "=".repeat(50));
    info!("📊 '{}' 处理统计", sheet_name);
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("✅ 处理: {} 行", stats.processed);
    info!("⏭️ 跳过: {} 行", stats.skipped);
    info!("❌ 失败: {} 行", stats.failed);
    info!("{}", "=".repeat(50));
}
