//! 批量任务服务 - 业务能力层
//!
//! 把批量客户端的四个端点组合成脚本需要的三个动作：
//! 提交（上传 + 创建）、状态查询、结果下载与解析。
//! 没有重试和退避，失败由人重新运行。

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{error, info, warn};

use crate::clients::openai_batch::OpenAiBatchClient;
use crate::config::Config;
use crate::models::batch::{BatchOutputLine, BatchStatus};
use crate::models::content::ParsedResult;
use crate::services::parser;

/// 批量任务服务
pub struct BatchService {
    client: OpenAiBatchClient,
}

impl BatchService {
    /// 创建新的批量任务服务
    pub fn new(config: &Config) -> Self {
        Self {
            client: OpenAiBatchClient::new(&config.openai_api_key, &config.openai_api_base),
        }
    }

    /// 提交批量任务（上传文件 + 创建任务）
    ///
    /// # 参数
    /// - `file_path`: 批量输入文件路径
    /// - `description`: 任务描述
    ///
    /// # 返回
    /// 返回创建后的任务状态（含 batch_id）
    pub async fn submit(&self, file_path: &Path, description: &str) -> Result<BatchStatus> {
        info!("🎯 批量流程开始");

        // 1. 上传文件
        info!("📤 上传批量文件: {}", file_path.display());
        let file_id = self
            .client
            .upload_file(file_path)
            .await
            .context("批量文件上传失败")?;
        info!("✅ 文件上传完成! File ID: {}", file_id);

        // 2. 创建批量任务
        info!("🚀 创建批量任务...");
        let batch = self
            .client
            .create_batch(&file_id, description)
            .await
            .context("批量任务创建失败")?;

        info!("✅ 批量任务创建完成!");
        info!("   Batch ID: {}", batch.id);
        info!("   状态: {}", batch.status);
        info!("   描述: {}", description);

        Ok(batch)
    }

    /// 查询批量任务状态
    pub async fn check_status(&self, batch_id: &str) -> Result<BatchStatus> {
        let batch = self
            .client
            .retrieve_batch(batch_id)
            .await
            .context("批量状态查询失败")?;

        info!("📊 批量状态: {}", batch.status);
        if let Some(counts) = &batch.request_counts {
            info!("   进度: {}/{} 完成", counts.completed, counts.total);
            if counts.failed > 0 {
                info!("   失败: {} 个", counts.failed);
            }
        }

        Ok(batch)
    }

    /// 下载并解析批量结果
    ///
    /// 任务未完成或没有输出文件时返回空列表（打印提示，不报错）
    pub async fn download_results(&self, batch_id: &str) -> Result<Vec<ParsedResult>> {
        let batch = self.client.retrieve_batch(batch_id).await?;

        if !batch.is_completed() {
            warn!("⚠️ 批量任务尚未完成，当前状态: {}", batch.status);
            return Ok(Vec::new());
        }

        let Some(output_file_id) = batch.output_file_id.as_deref() else {
            error!("❌ 批量任务没有输出文件");
            return Ok(Vec::new());
        };

        info!("📥 下载结果中...");
        let content = self.client.file_content(output_file_id).await?;

        let results = parse_output_lines(&content);
        info!("✅ 结果解析完成: {} 个成功", results.len());

        Ok(results)
    }
}

/// 解析输出文件的所有行
///
/// 只收集 status_code == 200 的行；失败行与无法解析的行记录日志后跳过
pub fn parse_output_lines(content: &str) -> Vec<ParsedResult> {
    let mut results = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_number = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        let output: BatchOutputLine = match serde_json::from_str(line) {
            Ok(output) => output,
            Err(e) => {
                error!("❌ 第 {} 行 JSON 解析失败: {}", line_number, e);
                continue;
            }
        };

        if !output.is_success() {
            error!("❌ 第 {} 行请求失败: {}", line_number, output.custom_id);
            if let Some(err) = &output.error {
                error!("   错误: {}", err);
            }
            continue;
        }

        let Some(content_text) = output.message_content() else {
            error!("❌ 第 {} 行缺少模型输出: {}", line_number, output.custom_id);
            continue;
        };

        let content = parser::parse_response(content_text);
        results.push(ParsedResult {
            custom_id: output.custom_id,
            content,
            line_number,
        });
    }

    results
}

/// 把解析结果保存为 JSON 文件
pub async fn save_results(results: &[ParsedResult], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(results)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("结果保存失败: {}", path.display()))?;

    info!("💾 处理结果已保存: {}", path.display());
    Ok(())
}

/// 从 JSON 文件加载解析结果
pub async fn load_results(path: &Path) -> Result<Vec<ParsedResult>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("结果文件读取失败: {}", path.display()))?;
    let results = serde_json::from_str(&content)
        .with_context(|| format!("结果文件格式错误: {}", path.display()))?;
    Ok(results)
}
