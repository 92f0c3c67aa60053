//! 历史事件数据模型

use serde::{Deserialize, Serialize};

/// 单个历史事件（标题 + 日期）
///
/// 日期采用 `MM-DD` 形式（如 "06-02"），作为事件在全年中的唯一键
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalEvent {
    /// 事件标题
    pub title: String,
    /// 日期键（MM-DD）
    pub date: String,
}

impl HistoricalEvent {
    /// 生成批量请求的 custom_id
    ///
    /// 由日期键去掉连字符得到，形如 `request-0602`。
    /// 同一个日期键永远生成同一个 custom_id，用于把结果对应回事件。
    pub fn custom_id(&self) -> String {
        format!("request-{}", self.date.replace('-', ""))
    }

    /// 日期键的紧凑形式（MMDD）
    pub fn date_key(&self) -> String {
        self.date.replace('-', "")
    }
}

/// 合并文件中的单个事件内容（date_key → {title, body}）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventContent {
    pub title: String,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_id_is_deterministic() {
        let event = HistoricalEvent {
            title: "伊丽莎白二世女王加冕".to_string(),
            date: "06-02".to_string(),
        };
        assert_eq!(event.custom_id(), "request-0602");
        // 再次生成应完全一致
        assert_eq!(event.custom_id(), event.custom_id());
    }

    #[test]
    fn test_date_key() {
        let event = HistoricalEvent {
            title: "第一次鸦片战争爆发".to_string(),
            date: "06-03".to_string(),
        };
        assert_eq!(event.date_key(), "0603");
    }
}
