//! 填表决策 - 业务能力层
//!
//! 集中管理"哪些单元格可以写"的规则：
//! - 实时填充只写空着的目标列
//! - 批量回填遇到已有内容的行整行跳过
//!
//! 已有数据永远不会被覆盖。

use crate::models::content::GeneratedContent;
use crate::models::sheet::{SheetRow, COL_DETAIL, COL_MOVIES, COL_SIMPLE, COL_YEAR};

/// 一次单元格更新计划（列号 + 写入值）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellUpdate {
    /// 0 基列号
    pub column: usize,
    pub value: String,
}

/// 为实时填充计算更新计划
///
/// 只补 year / content_simple / content_detailed 三列中为空的部分
pub fn plan_fill_updates(row: &SheetRow, content: &GeneratedContent) -> Vec<CellUpdate> {
    let mut updates = Vec::new();

    if row.year.trim().is_empty() && !content.year.is_empty() {
        updates.push(CellUpdate {
            column: COL_YEAR,
            value: content.year.clone(),
        });
    }
    if row.content_simple.trim().is_empty() && !content.simple.is_empty() {
        updates.push(CellUpdate {
            column: COL_SIMPLE,
            value: content.simple.clone(),
        });
    }
    if row.content_detailed.trim().is_empty() && !content.detail.is_empty() {
        updates.push(CellUpdate {
            column: COL_DETAIL,
            value: content.detail.clone(),
        });
    }

    updates
}

/// 行的目标列（C-F）里是否已有任何内容
pub fn has_existing_content(row: &SheetRow) -> bool {
    !row.year.trim().is_empty()
        || !row.content_simple.trim().is_empty()
        || !row.content_detailed.trim().is_empty()
        || !row.related_movies.trim().is_empty()
}

/// 为批量回填计算更新计划
///
/// 目标列已有内容的行返回空计划（整行跳过），
/// 否则一次写满 C-F 四列
pub fn plan_result_updates(row: &SheetRow, content: &GeneratedContent) -> Vec<CellUpdate> {
    if has_existing_content(row) {
        return Vec::new();
    }

    vec![
        CellUpdate {
            column: COL_YEAR,
            value: content.year.clone(),
        },
        CellUpdate {
            column: COL_SIMPLE,
            value: content.simple.clone(),
        },
        CellUpdate {
            column: COL_DETAIL,
            value: content.detail.clone(),
        },
        CellUpdate {
            column: COL_MOVIES,
            value: content.related_movies.clone(),
        },
    ]
}
