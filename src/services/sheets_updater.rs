//! 批量结果回填 - 业务能力层
//!
//! 把解析好的批量结果按标识列匹配回工作表：
//! - A 列既可能存日期键（"06-02"）也可能直接存 custom_id，两种都认
//! - 已有内容的行整行跳过（见 sheet_filler）
//! - 更新按块提交 values:batchUpdate 以避开速率限制，
//!   某一块失败时降级为逐格串行更新

use anyhow::Result;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::clients::sheets_client::{SheetsClient, ValueRange};
use crate::models::content::{GeneratedContent, ParsedResult};
use crate::models::sheet::{SheetRow, COLUMN_LETTERS};
use crate::services::sheet_filler::{plan_result_updates, CellUpdate};

/// 每次 batchUpdate 提交的行数上限
const CHUNK_ROWS: usize = 20;

/// 回填统计
#[derive(Debug, Default)]
pub struct UpdateStats {
    /// 成功更新的行数
    pub updated: usize,
    /// 因已有内容而跳过的行数
    pub skipped: usize,
    /// 在结果中找不到对应数据的行数
    pub unmatched: usize,
    /// 降级后仍然失败的单元格数
    pub failed_cells: usize,
}

/// 批量结果回填服务
pub struct SheetsUpdaterService {
    sheets: SheetsClient,
}

impl SheetsUpdaterService {
    /// 创建新的回填服务
    pub fn new(sheets: SheetsClient) -> Self {
        Self { sheets }
    }

    /// 把结果回填到指定工作表
    ///
    /// # 参数
    /// - `sheet_name`: 工作表名称
    /// - `results`: 解析后的批量结果
    /// - `start_row`: 数据起始行（1 基，跳过表头）
    pub async fn update_sheet(
        &self,
        sheet_name: &str,
        results: &[ParsedResult],
        start_row: usize,
    ) -> Result<UpdateStats> {
        let map = results_to_map(results);
        info!("📂 结果数据: {} 个条目", map.len());

        let all_values = self.sheets.get_all_values(sheet_name).await?;
        info!("📊 工作表 '{}' 连接完成，共 {} 行", sheet_name, all_values.len());

        let mut stats = UpdateStats::default();
        let mut pending: Vec<(usize, Vec<CellUpdate>)> = Vec::new();

        for (idx, values) in all_values.iter().enumerate() {
            let row_num = idx + 1;
            if row_num < start_row {
                continue;
            }

            let row = SheetRow::from_values(values);
            if row.id.trim().is_empty() {
                continue;
            }

            let Some(content) = match_content(&map, row.id.trim()) else {
                warn!("⚠️ 行 {}: 找不到 '{}' 对应的数据", row_num, row.id);
                stats.unmatched += 1;
                continue;
            };

            let updates = plan_result_updates(&row, content);
            if updates.is_empty() {
                info!("⏭️ 行 {}: 已有内容，跳过", row_num);
                stats.skipped += 1;
                continue;
            }

            pending.push((row_num, updates));
        }

        // 分块提交，块内失败时降级为逐格更新
        for chunk in pending.chunks(CHUNK_ROWS) {
            let data: Vec<ValueRange> = chunk
                .iter()
                .flat_map(|(row_num, updates)| row_value_ranges(sheet_name, *row_num, updates))
                .collect();

            match self.sheets.batch_update(data).await {
                Ok(()) => {
                    for (row_num, _) in chunk {
                        info!("✅ 行 {} 更新完成", row_num);
                    }
                    stats.updated += chunk.len();
                }
                Err(e) => {
                    warn!("⚠️ 批量更新失败，降级为逐格更新: {}", e);
                    let (updated, failed) = self.update_serially(sheet_name, chunk).await;
                    stats.updated += updated;
                    stats.failed_cells += failed;
                }
            }
        }

        info!(
            "🎉 回填完成! 更新 {} 行，跳过 {} 行，未匹配 {} 行",
            stats.updated, stats.skipped, stats.unmatched
        );

        Ok(stats)
    }

    /// 逐格串行更新一个块
    ///
    /// # 返回
    /// 返回（完整更新成功的行数, 失败的单元格数）
    async fn update_serially(
        &self,
        sheet_name: &str,
        chunk: &[(usize, Vec<CellUpdate>)],
    ) -> (usize, usize) {
        let mut updated_rows = 0;
        let mut failed_cells = 0;

        for (row_num, updates) in chunk {
            let mut row_ok = true;
            for update in updates {
                let cell = format!("{}{}", COLUMN_LETTERS[update.column], row_num);
                if let Err(e) = self.sheets.update_cell(sheet_name, &cell, &update.value).await {
                    warn!("❌ 单元格 {} 更新失败: {}", cell, e);
                    failed_cells += 1;
                    row_ok = false;
                }
            }
            if row_ok {
                updated_rows += 1;
            }
        }

        (updated_rows, failed_cells)
    }
}

/// 把结果列表转成 custom_id → 内容 的映射
pub fn results_to_map(results: &[ParsedResult]) -> HashMap<String, GeneratedContent> {
    results
        .iter()
        .map(|r| (r.custom_id.clone(), r.content.clone()))
        .collect()
}

/// 按标识列的值查找结果
///
/// 先按原文匹配（A 列直接存 custom_id 的情况），
/// 再按日期键派生出的 custom_id 匹配（A 列存 "06-02" 的情况）
pub fn match_content<'a>(
    map: &'a HashMap<String, GeneratedContent>,
    cell: &str,
) -> Option<&'a GeneratedContent> {
    if let Some(content) = map.get(cell) {
        return Some(content);
    }
    let derived = format!("request-{}", cell.replace('-', ""));
    map.get(&derived)
}

/// 把一行的更新计划转成 A1 区间列表
fn row_value_ranges(sheet_name: &str, row_num: usize, updates: &[CellUpdate]) -> Vec<ValueRange> {
    updates
        .iter()
        .map(|update| ValueRange {
            range: format!("{}!{}{}", sheet_name, COLUMN_LETTERS[update.column], row_num),
            values: Some(vec![vec![serde_json::Value::String(update.value.clone())]]),
        })
        .collect()
}
