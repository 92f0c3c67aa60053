//! 生成内容数据模型

use serde::{Deserialize, Serialize};

/// 模型输出解析后的四个字段
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedContent {
    /// 简单版本（面向小学生，250-350 字）
    #[serde(default)]
    pub simple: String,
    /// 详细版本（面向初高中以上，1300-1700 字）
    #[serde(default)]
    pub detail: String,
    /// 事件发生年份
    #[serde(default)]
    pub year: String,
    /// 相关影视作品（逗号分隔）
    #[serde(default)]
    pub related_movies: String,
}

impl GeneratedContent {
    /// 判断内容是否完整（simple 和 detail 均非空）
    pub fn is_complete(&self) -> bool {
        !self.simple.trim().is_empty() && !self.detail.trim().is_empty()
    }
}

/// 批量结果文件中的一条解析结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedResult {
    /// 请求对应的 custom_id
    pub custom_id: String,
    /// 解析后的内容
    pub content: GeneratedContent,
    /// 在输出文件中的行号（从 1 开始）
    pub line_number: usize,
}
