//! OpenAI Batch API 数据模型
//!
//! 覆盖批量输入文件的一行、批量任务状态和输出文件的一行三种线格式。
//! 任务状态由远端服务维护，本地只做轮询快照。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// 聊天消息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// 批量请求体
///
/// 普通模型使用 `max_tokens`；o 系列推理模型必须使用
/// `max_completion_tokens`，并支持 `reasoning_effort`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequestBody {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_effort: Option<String>,
}

/// 批量输入文件（JSONL）的一行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequestLine {
    pub custom_id: String,
    pub method: String,
    pub url: String,
    pub body: BatchRequestBody,
}

/// 普通模型的输出上限
const MAX_TOKENS: u32 = 2000;
/// 推理模型的输出上限（含推理 token）
const MAX_COMPLETION_TOKENS: u32 = 4000;

impl BatchRequestLine {
    /// 构建一条指向 /v1/chat/completions 的批量请求
    ///
    /// # 参数
    /// - `custom_id`: 调用方指定的请求标识
    /// - `model`: 模型名称
    /// - `system_content`: 系统提示词
    /// - `user_content`: 用户提示词
    pub fn chat_completion(
        custom_id: impl Into<String>,
        model: &str,
        system_content: &str,
        user_content: &str,
    ) -> Self {
        let messages = vec![
            ChatMessage {
                role: "system".to_string(),
                content: system_content.to_string(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: user_content.to_string(),
            },
        ];

        // o 系列推理模型的 token 参数与普通模型不同
        let body = if is_reasoning_model(model) {
            BatchRequestBody {
                model: model.to_string(),
                messages,
                max_tokens: None,
                max_completion_tokens: Some(MAX_COMPLETION_TOKENS),
                reasoning_effort: Some("medium".to_string()),
            }
        } else {
            BatchRequestBody {
                model: model.to_string(),
                messages,
                max_tokens: Some(MAX_TOKENS),
                max_completion_tokens: None,
                reasoning_effort: None,
            }
        };

        Self {
            custom_id: custom_id.into(),
            method: "POST".to_string(),
            url: "/v1/chat/completions".to_string(),
            body,
        }
    }
}

/// 判断是否为 o 系列推理模型（o3 / o4-mini 等）
pub fn is_reasoning_model(model: &str) -> bool {
    model.starts_with("o1") || model.starts_with("o3") || model.starts_with("o4")
}

/// 上传文件的响应
#[derive(Debug, Clone, Deserialize)]
pub struct FileObject {
    pub id: String,
}

/// 批量任务的请求计数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestCounts {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub completed: u64,
    #[serde(default)]
    pub failed: u64,
}

/// 批量任务状态快照
#[derive(Debug, Clone, Deserialize)]
pub struct BatchStatus {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub completed_at: Option<i64>,
    #[serde(default)]
    pub failed_at: Option<i64>,
    #[serde(default)]
    pub output_file_id: Option<String>,
    #[serde(default)]
    pub error_file_id: Option<String>,
    #[serde(default)]
    pub request_counts: Option<RequestCounts>,
    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,
}

impl BatchStatus {
    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }
}

/// 批量输出文件（JSONL）的一行
#[derive(Debug, Clone, Deserialize)]
pub struct BatchOutputLine {
    pub custom_id: String,
    #[serde(default)]
    pub response: Option<BatchOutputResponse>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

/// 输出行中的响应部分
#[derive(Debug, Clone, Deserialize)]
pub struct BatchOutputResponse {
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub body: serde_json::Value,
}

impl BatchOutputLine {
    /// 该行是否为成功响应
    pub fn is_success(&self) -> bool {
        self.response
            .as_ref()
            .and_then(|r| r.status_code)
            .map(|c| c == 200)
            .unwrap_or(false)
    }

    /// 提取模型输出文本（choices[0].message.content）
    pub fn message_content(&self) -> Option<&str> {
        self.response
            .as_ref()?
            .body
            .get("choices")?
            .get(0)?
            .get("message")?
            .get("content")?
            .as_str()
    }
}
