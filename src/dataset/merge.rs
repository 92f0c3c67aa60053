//! 季度事件文件合并
//!
//! 把四个季度的 historical_events_*q.json 合并成一个文件。
//! 键为日期（"06-02"），重复键以后加载的文件为准。
//! 缺失或损坏的输入文件记录日志后继续。

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{error, info, warn};

use crate::models::event::EventContent;

/// 四个季度的输入文件名
pub const QUARTER_FILES: [&str; 4] = [
    "historical_events_1q.json",
    "historical_events_2q.json",
    "historical_events_3q.json",
    "historical_events_4q.json",
];

/// 合并后的输出文件名
pub const MERGED_FILE_NAME: &str = "historical_events.json";

/// 合并季度文件并写出结果
///
/// # 参数
/// - `input_folder`: 季度文件所在文件夹
/// - `output_folder`: 输出文件夹（不存在时创建）
///
/// # 返回
/// 返回合并后的事件映射
pub async fn merge_quarter_files(
    input_folder: &Path,
    output_folder: &Path,
) -> Result<BTreeMap<String, EventContent>> {
    let mut merged: BTreeMap<String, EventContent> = BTreeMap::new();

    for file_name in QUARTER_FILES {
        let path = input_folder.join(file_name);

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("⚠️ 警告: 找不到 {} 文件", path.display());
                continue;
            }
            Err(e) => {
                error!("❌ 错误: 读取 {} 失败: {}", path.display(), e);
                continue;
            }
        };

        match serde_json::from_str::<BTreeMap<String, EventContent>>(&content) {
            Ok(data) => {
                info!("✅ {} 文件加载完成 - {} 个事件", file_name, data.len());
                merged.extend(data);
            }
            Err(e) => {
                error!("❌ 错误: {} 不是合法的 JSON: {}", path.display(), e);
            }
        }
    }

    // 写出合并结果
    tokio::fs::create_dir_all(output_folder)
        .await
        .with_context(|| format!("无法创建输出文件夹: {}", output_folder.display()))?;

    let output_path = output_folder.join(MERGED_FILE_NAME);
    let json = serde_json::to_string_pretty(&merged)?;
    tokio::fs::write(&output_path, json)
        .await
        .with_context(|| format!("合并文件保存失败: {}", output_path.display()))?;

    info!("\n🎉 合并完成!");
    info!("📁 输出文件: {}", output_path.display());
    info!("📊 总事件数: {} 个", merged.len());

    // 月度分布
    info!("\n📅 月度事件分布:");
    for (month, count) in monthly_distribution(&merged) {
        info!("   {}月: {} 个", month, count);
    }

    Ok(merged)
}

/// 统计每个月的事件数量
///
/// 日期键形如 "06-02"，取 "-" 之前的部分作为月份
pub fn monthly_distribution(merged: &BTreeMap<String, EventContent>) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for key in merged.keys() {
        let month = key.split('-').next().unwrap_or(key).to_string();
        *counts.entry(month).or_insert(0) += 1;
    }
    counts
}
