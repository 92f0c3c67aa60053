//! 批量输入文件生成 - 业务能力层
//!
//! 只负责"生成 batchinput.jsonl"能力：每个事件一行 JSON，
//! custom_id 由日期键确定。文件已存在时保留旧行、追加新行，
//! 除此之外不做去重。

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

use crate::config::Config;
use crate::models::batch::BatchRequestLine;
use crate::models::event::HistoricalEvent;
use crate::services::prompts;

/// 生成结果统计
#[derive(Debug, Default, PartialEq, Eq)]
pub struct GenerateStats {
    /// 文件中原有的请求数
    pub existing: usize,
    /// 本次新增的请求数
    pub added: usize,
}

impl GenerateStats {
    pub fn total(&self) -> usize {
        self.existing + self.added
    }
}

/// 批量输入文件服务
pub struct BatchFileService {
    model: String,
}

impl BatchFileService {
    /// 创建新的批量输入文件服务
    pub fn new(config: &Config) -> Self {
        Self {
            model: config.batch_model.clone(),
        }
    }

    /// 生成（或追加）批量输入文件
    ///
    /// # 参数
    /// - `events`: 事件列表
    /// - `path`: 输出文件路径
    ///
    /// # 返回
    /// 返回新旧请求数统计
    pub async fn generate(&self, events: &[HistoricalEvent], path: &Path) -> Result<GenerateStats> {
        // 读出已有内容（保留旧请求）
        let existing_content = match tokio::fs::read_to_string(path).await {
            Ok(content) => {
                let count = content.lines().filter(|l| !l.trim().is_empty()).count();
                info!("📂 发现已有文件: {} 个请求", count);
                content
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                warn!("⚠️ 读取已有文件失败: {}", e);
                String::new()
            }
        };
        let existing = existing_content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .count();

        // 生成新请求行
        let mut output = String::new();
        for line in existing_content.lines().filter(|l| !l.trim().is_empty()) {
            output.push_str(line);
            output.push('\n');
        }

        for event in events {
            let custom_id = event.custom_id();
            let user_content = prompts::build_user_prompt(&event.title, &event.date);
            let line = BatchRequestLine::chat_completion(
                &custom_id,
                &self.model,
                prompts::SYSTEM_PROMPT,
                &user_content,
            );

            output.push_str(&serde_json::to_string(&line)?);
            output.push('\n');

            info!("📝 生成请求: {} - {}", custom_id, event.title);
        }

        tokio::fs::write(path, output)
            .await
            .with_context(|| format!("写入批量输入文件失败: {}", path.display()))?;

        let stats = GenerateStats {
            existing,
            added: events.len(),
        };

        info!("✅ 批量输入文件生成完成: {}", path.display());
        info!("   - 原有请求: {} 个", stats.existing);
        info!("   - 新增请求: {} 个", stats.added);
        info!("   - 总计请求: {} 个", stats.total());

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::batch::BatchRequestLine;

    fn test_events() -> Vec<HistoricalEvent> {
        vec![
            HistoricalEvent {
                title: "伊丽莎白二世女王加冕".to_string(),
                date: "06-02".to_string(),
            },
            HistoricalEvent {
                title: "第一次鸦片战争爆发".to_string(),
                date: "06-03".to_string(),
            },
        ]
    }

    fn service() -> BatchFileService {
        BatchFileService::new(&Config::default())
    }

    #[tokio::test]
    async fn test_generate_one_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batchinput.jsonl");

        let stats = service().generate(&test_events(), &path).await.unwrap();
        assert_eq!(stats, GenerateStats { existing: 0, added: 2 });

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        // 每一行都能解析回请求结构，custom_id 稳定
        let first: BatchRequestLine = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.custom_id, "request-0602");
        assert_eq!(first.url, "/v1/chat/completions");
        let second: BatchRequestLine = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.custom_id, "request-0603");
    }

    #[tokio::test]
    async fn test_generate_appends_to_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batchinput.jsonl");

        let svc = service();
        svc.generate(&test_events(), &path).await.unwrap();

        let more = vec![HistoricalEvent {
            title: "诺曼底登陆".to_string(),
            date: "06-06".to_string(),
        }];
        let stats = svc.generate(&more, &path).await.unwrap();
        assert_eq!(stats.existing, 2);
        assert_eq!(stats.added, 1);
        assert_eq!(stats.total(), 3);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        // 旧行保持不变
        let first: BatchRequestLine = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.custom_id, "request-0602");
        let third: BatchRequestLine = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(third.custom_id, "request-0606");
    }

    #[tokio::test]
    async fn test_custom_id_is_stable_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path_a = dir.path().join("a.jsonl");
        let path_b = dir.path().join("b.jsonl");

        let svc = service();
        svc.generate(&test_events(), &path_a).await.unwrap();
        svc.generate(&test_events(), &path_b).await.unwrap();

        let a = std::fs::read_to_string(&path_a).unwrap();
        let b = std::fs::read_to_string(&path_b).unwrap();
        assert_eq!(a, b);
    }
}
