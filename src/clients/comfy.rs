//! ComfyUI HTTP 客户端
//!
//! 对本地 ComfyUI 服务的四个接口封装：提交工作流、查询执行历史、
//! 下载生成图片、上传输入图片。生成完成与否通过轮询 /history 判断。

use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// ComfyUI 客户端错误
#[derive(Debug, thiserror::Error)]
pub enum ComfyError {
    /// 网络请求失败
    #[error("ComfyUI 请求失败: {0}")]
    Request(#[from] reqwest::Error),

    /// 服务返回了非 2xx 状态
    #[error("ComfyUI 返回错误状态 {status}: {body}")]
    BadStatus { status: u16, body: String },

    /// 响应中缺少预期字段
    #[error("ComfyUI 响应缺少字段: {0}")]
    MissingField(&'static str),

    /// 本地文件读取失败
    #[error("读取文件失败 ({path}): {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// 历史记录中的一张输出图片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputImage {
    pub filename: String,
    pub subfolder: String,
    pub folder_type: String,
}

/// ComfyUI 客户端
///
/// 每个客户端持有一个唯一的 client_id（UUID v4），
/// 便于服务端把消息对应回调用方
pub struct ComfyClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
}

/// 轮询 /history 的间隔
const POLL_INTERVAL: Duration = Duration::from_secs(1);

impl ComfyClient {
    /// 创建新的客户端
    ///
    /// # 参数
    /// - `server_address`: 形如 "127.0.0.1:8188" 的地址
    pub fn new(server_address: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: format!("http://{}", server_address),
            client_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// 把工作流提交到队列
    ///
    /// # 返回
    /// 返回服务端分配的 prompt_id
    pub async fn queue_prompt(&self, workflow: &Value) -> Result<String, ComfyError> {
        let url = format!("{}/prompt", self.base_url);
        let body = serde_json::json!({
            "prompt": workflow,
            "client_id": self.client_id,
        });

        let response = self.http.post(&url).json(&body).send().await?;
        let value = Self::check_json(response).await?;

        value
            .get("prompt_id")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or(ComfyError::MissingField("prompt_id"))
    }

    /// 查询执行历史
    pub async fn get_history(&self, prompt_id: &str) -> Result<Value, ComfyError> {
        let url = format!("{}/history/{}", self.base_url, prompt_id);
        let response = self.http.get(&url).send().await?;
        Self::check_json(response).await
    }

    /// 等待工作流执行完成
    ///
    /// 每秒轮询一次 /history，直到其中出现该 prompt_id 的条目
    pub async fn wait_for_completion(&self, prompt_id: &str) -> Result<Value, ComfyError> {
        loop {
            let history = self.get_history(prompt_id).await?;
            if let Some(entry) = history.get(prompt_id) {
                debug!("工作流执行完成: {}", prompt_id);
                return Ok(entry.clone());
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// 下载一张生成的图片
    pub async fn view_image(&self, image: &OutputImage) -> Result<Vec<u8>, ComfyError> {
        let url = format!("{}/view", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("filename", image.filename.as_str()),
                ("subfolder", image.subfolder.as_str()),
                ("type", image.folder_type.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ComfyError::BadStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// 上传一张输入图片
    ///
    /// # 返回
    /// 返回服务端保存后的文件名（写回工作流时使用）
    pub async fn upload_image(&self, path: &Path) -> Result<String, ComfyError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| ComfyError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "input.png".to_string());

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("image", part);

        let url = format!("{}/upload/image", self.base_url);
        let response = self.http.post(&url).multipart(form).send().await?;
        let value = Self::check_json(response).await?;

        value
            .get("name")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or(ComfyError::MissingField("name"))
    }

    /// 统一的状态检查 + JSON 解析
    async fn check_json(response: reqwest::Response) -> Result<Value, ComfyError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ComfyError::BadStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

/// 从历史条目中收集所有输出图片
pub fn collect_output_images(history_entry: &Value) -> Vec<OutputImage> {
    let mut images = Vec::new();

    let Some(outputs) = history_entry.get("outputs").and_then(|v| v.as_object()) else {
        return images;
    };

    for node_output in outputs.values() {
        let Some(list) = node_output.get("images").and_then(|v| v.as_array()) else {
            continue;
        };
        for image in list {
            let field = |key: &str| {
                image
                    .get(key)
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string()
            };
            images.push(OutputImage {
                filename: field("filename"),
                subfolder: field("subfolder"),
                folder_type: field("type"),
            });
        }
    }

    images
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_collect_output_images() {
        let entry = serde_json::json!({
            "outputs": {
                "9": {
                    "images": [
                        { "filename": "ComfyUI_00001_.png", "subfolder": "", "type": "output" },
                        { "filename": "ComfyUI_00002_.png", "subfolder": "sub", "type": "output" }
                    ]
                },
                "12": { "text": ["非图片输出"] }
            }
        });

        let images = collect_output_images(&entry);
        assert_eq!(images.len(), 2);
        assert!(images.iter().any(|i| i.filename == "ComfyUI_00002_.png" && i.subfolder == "sub"));
    }

    #[test]
    fn test_collect_output_images_empty() {
        let entry = serde_json::json!({ "status": "ok" });
        assert!(collect_output_images(&entry).is_empty());
    }

    #[tokio::test]
    async fn test_queue_prompt_returns_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/prompt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "prompt_id": "abc-123",
                "number": 1
            })))
            .mount(&server)
            .await;

        // 去掉 "http://" 前缀，ComfyClient 自己会补上
        let address = server.uri().trim_start_matches("http://").to_string();
        let client = ComfyClient::new(&address);
        let workflow = serde_json::json!({ "6": { "inputs": { "text": "a castle" } } });
        let prompt_id = client.queue_prompt(&workflow).await.unwrap();
        assert_eq!(prompt_id, "abc-123");
    }
}
