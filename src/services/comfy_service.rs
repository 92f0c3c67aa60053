//! ComfyUI 生成流程 - 业务能力层
//!
//! 完整的一次生成：加载工作流 → 按需改写节点 → 入队 → 等待完成 → 下载图片

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;
use tracing::info;

use crate::clients::comfy::{collect_output_images, ComfyClient};
use crate::services::workflow_template::{create_template, PromptData};

/// ComfyUI 生成服务
pub struct ComfyService {
    client: ComfyClient,
}

impl ComfyService {
    /// 创建新的生成服务
    ///
    /// # 参数
    /// - `server_address`: 形如 "127.0.0.1:8188" 的地址
    pub fn new(server_address: &str) -> Self {
        Self {
            client: ComfyClient::new(server_address),
        }
    }

    /// 执行一次工作流并返回所有生成的图片
    ///
    /// # 参数
    /// - `workflow_path`: 导出的工作流 JSON 文件
    /// - `prompt_data`: 可选的节点改写参数；带本地图片时会先上传
    pub async fn generate_images(
        &self,
        workflow_path: &Path,
        prompt_data: Option<PromptData>,
    ) -> Result<Vec<Vec<u8>>> {
        // 加载工作流
        let content = tokio::fs::read_to_string(workflow_path)
            .await
            .with_context(|| format!("无法读取工作流文件: {}", workflow_path.display()))?;
        let mut workflow: Value = serde_json::from_str(&content)
            .with_context(|| format!("工作流文件不是合法 JSON: {}", workflow_path.display()))?;

        // 按需改写节点
        if let Some(mut data) = prompt_data {
            let file_name = workflow_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let template = create_template(&file_name)?;

            // 本地图片先上传，再把服务端文件名写进工作流
            if let Some(image_path) = data.image.clone() {
                let local = Path::new(&image_path);
                if local.exists() {
                    info!("📤 上传输入图片: {}", image_path);
                    let uploaded = self
                        .client
                        .upload_image(local)
                        .await
                        .context("图片上传失败")?;
                    data.image = Some(uploaded);
                }
            }

            template.modify_prompt(&mut workflow, &data)?;
        }

        // 入队并等待完成
        let prompt_id = self
            .client
            .queue_prompt(&workflow)
            .await
            .context("工作流入队失败")?;
        info!("🚀 工作流已入队: {}", prompt_id);

        let history_entry = self
            .client
            .wait_for_completion(&prompt_id)
            .await
            .context("等待工作流完成失败")?;

        // 下载所有输出图片
        let image_refs = collect_output_images(&history_entry);
        info!("🖼️ 共 {} 张输出图片", image_refs.len());

        let mut images = Vec::new();
        for image_ref in &image_refs {
            let bytes = self
                .client
                .view_image(image_ref)
                .await
                .with_context(|| format!("图片下载失败: {}", image_ref.filename))?;
            images.push(bytes);
        }

        Ok(images)
    }
}
