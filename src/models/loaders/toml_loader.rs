use crate::models::event::HistoricalEvent;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// 事件数据集文件结构
///
/// ```toml
/// [[events]]
/// title = "伊丽莎白二世女王加冕"
/// date = "06-02"
/// ```
#[derive(Debug, Deserialize)]
struct EventFile {
    #[serde(default)]
    events: Vec<HistoricalEvent>,
}

/// 从 TOML 文件加载事件数据集
pub async fn load_events_toml(path: &Path) -> Result<Vec<HistoricalEvent>> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取数据集文件: {}", path.display()))?;

    let file: EventFile = toml::from_str(&content)
        .with_context(|| format!("无法解析数据集文件: {}", path.display()))?;

    tracing::info!("成功加载 {} 个事件", file.events.len());

    Ok(file.events)
}
