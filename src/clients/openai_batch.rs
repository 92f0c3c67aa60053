//! OpenAI Batch API 客户端
//!
//! 覆盖批量流程需要的四个端点：文件上传、任务创建、状态查询、结果下载。
//! 实时聊天走 async-openai（见 services::llm_service），这里的批量端点
//! 直接用 reqwest 调用。

use crate::error::{AppError, AppResult};
use crate::models::batch::{BatchStatus, FileObject};
use serde_json::json;
use std::path::Path;
use tracing::debug;

/// OpenAI Batch API 客户端
pub struct OpenAiBatchClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiBatchClient {
    /// 创建新的批量客户端
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// 上传批量输入文件（purpose=batch）
    ///
    /// # 返回
    /// 返回上传后的 file_id
    pub async fn upload_file(&self, path: &Path) -> AppResult<String> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::File(crate::error::FileError::ReadFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            }))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "batchinput.jsonl".to_string());

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new()
            .text("purpose", "batch")
            .part("file", part);

        let url = format!("{}/files", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(url.clone(), e))?;

        let file: FileObject = Self::parse_response(url, response).await?;
        debug!("文件上传完成: {}", file.id);

        Ok(file.id)
    }

    /// 创建批量任务
    ///
    /// # 参数
    /// - `input_file_id`: 已上传文件的 ID
    /// - `description`: 任务描述（写入 metadata）
    pub async fn create_batch(
        &self,
        input_file_id: &str,
        description: &str,
    ) -> AppResult<BatchStatus> {
        let url = format!("{}/batches", self.base_url);
        let body = json!({
            "input_file_id": input_file_id,
            "endpoint": "/v1/chat/completions",
            "completion_window": "24h",
            "metadata": { "description": description },
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(url.clone(), e))?;

        Self::parse_response(url, response).await
    }

    /// 查询批量任务状态
    pub async fn retrieve_batch(&self, batch_id: &str) -> AppResult<BatchStatus> {
        let url = format!("{}/batches/{}", self.base_url, batch_id);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(url.clone(), e))?;

        Self::parse_response(url, response).await
    }

    /// 下载文件内容（JSONL 文本）
    pub async fn file_content(&self, file_id: &str) -> AppResult<String> {
        let url = format!("{}/files/{}/content", self.base_url, file_id);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(url.clone(), e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.ok();
            return Err(AppError::bad_response(url, Some(status.as_u16()), message));
        }

        Ok(response.text().await?)
    }

    /// 统一的响应检查 + JSON 反序列化
    async fn parse_response<T: serde::de::DeserializeOwned>(
        url: String,
        response: reqwest::Response,
    ) -> AppResult<T> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.ok();
            return Err(AppError::bad_response(url, Some(status.as_u16()), message));
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_retrieve_batch_parses_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/batches/batch_abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "batch_abc",
                "status": "in_progress",
                "created_at": 1720000000,
                "output_file_id": null,
                "request_counts": { "total": 2, "completed": 1, "failed": 0 },
                "metadata": { "description": "History content generation" }
            })))
            .mount(&server)
            .await;

        let client = OpenAiBatchClient::new("sk-test", server.uri());
        let status = client.retrieve_batch("batch_abc").await.unwrap();

        assert_eq!(status.id, "batch_abc");
        assert!(!status.is_completed());
        assert_eq!(status.request_counts.unwrap().completed, 1);
    }

    #[tokio::test]
    async fn test_retrieve_batch_error_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/batches/batch_missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let client = OpenAiBatchClient::new("sk-test", server.uri());
        let result = client.retrieve_batch("batch_missing").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_file_content_returns_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/file_xyz/content"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("{\"custom_id\":\"request-0602\"}\n"),
            )
            .mount(&server)
            .await;

        let client = OpenAiBatchClient::new("sk-test", server.uri());
        let content = client.file_content("file_xyz").await.unwrap();
        assert!(content.contains("request-0602"));
    }

    #[tokio::test]
    async fn test_upload_file_sends_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/files"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "id": "file-123", "object": "file" })),
            )
            .mount(&server)
            .await;

        let mut input = tempfile::NamedTempFile::new().unwrap();
        writeln!(input, "{{\"custom_id\":\"request-0602\"}}").unwrap();

        let client = OpenAiBatchClient::new("sk-test", server.uri());
        let file_id = client.upload_file(input.path()).await.unwrap();
        assert_eq!(file_id, "file-123");
    }
}
