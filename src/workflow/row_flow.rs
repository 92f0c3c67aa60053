//! 单行处理流程 - 流程层
//!
//! 核心职责：定义"一行数据"的完整处理流程
//!
//! 流程顺序：
//! 1. 检查 id / title → 检查是否已有内容
//! 2. 调用 LLM 生成 → 计算更新计划 → 写回空白列

use anyhow::Result;
use tracing::info;

use crate::clients::sheets_client::SheetsClient;
use crate::config::Config;
use crate::models::sheet::{SheetRow, COLUMN_LETTERS};
use crate::services::sheet_filler::plan_fill_updates;
use crate::services::LlmService;
use crate::utils::logging::truncate_text;
use crate::workflow::row_ctx::RowCtx;

/// 行处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessResult {
    /// 已更新
    Updated,
    /// 跳过（无需处理或无可写内容）
    Skipped,
}

/// 单行处理流程
///
/// - 编排一行数据从检查到写回的完整流程
/// - 不持有 SheetsClient（由编排层传入）
/// - 只依赖业务能力（services）
pub struct RowFlow {
    llm_service: LlmService,
    verbose_logging: bool,
}

impl RowFlow {
    /// 创建新的行处理流程
    pub fn new(config: &Config) -> Self {
        Self {
            llm_service: LlmService::new(config),
            verbose_logging: config.verbose_logging,
        }
    }

    pub async fn run(
        &self,
        sheets: &SheetsClient,
        row: &SheetRow,
        ctx: &RowCtx,
    ) -> Result<ProcessResult> {
        // ========== 检查 1: id / title ==========
        if !row.has_key_fields() {
            info!("⏭️ 行 {}: ID 或 TITLE 为空，跳过", ctx.row_num);
            return Ok(ProcessResult::Skipped);
        }

        // ========== 检查 2: 是否已有内容 ==========
        if !row.is_content_needed() {
            info!("⏭️ 行 {}: 内容已齐全，跳过", ctx.row_num);
            return Ok(ProcessResult::Skipped);
        }

        info!(
            "🔄 行 {} 处理中: '{}' (日期: {})",
            ctx.row_num,
            truncate_text(&row.title, 30),
            row.id
        );

        // ========== 生成内容 ==========
        let content = self.llm_service.generate_content(&row.title, &row.id).await?;

        if self.verbose_logging {
            info!(
                "[行 {}] simple {} 字 / detail {} 字 / 年份 {}",
                ctx.row_num,
                content.simple.chars().count(),
                content.detail.chars().count(),
                content.year
            );
        }

        // ========== 计算并写回 ==========
        let updates = plan_fill_updates(row, &content);
        if updates.is_empty() {
            info!("⏭️ 行 {}: 没有需要写入的内容", ctx.row_num);
            return Ok(ProcessResult::Skipped);
        }

        let mut written = Vec::new();
        for update in &updates {
            let cell = format!("{}{}", COLUMN_LETTERS[update.column], ctx.row_num);
            sheets
                .update_cell(&ctx.sheet_name, &cell, &update.value)
                .await?;
            written.push(cell);
        }

        info!("✅ 行 {} 更新完成: {:?}", ctx.row_num, written);

        Ok(ProcessResult::Updated)
    }
}
