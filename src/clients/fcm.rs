//! Firebase Cloud Messaging 推送客户端
//!
//! 走 FCM HTTP v1 接口，认证复用 Google 服务账号令牌

use crate::clients::google_auth::GoogleAuth;
use crate::error::{AppError, AppResult};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// FCM API 基础地址
const FCM_API_BASE: &str = "https://fcm.googleapis.com";

/// messages:send 的响应
#[derive(Debug, Deserialize)]
struct SendResponse {
    name: String,
}

/// FCM 客户端
#[derive(Clone)]
pub struct FcmClient {
    auth: Arc<GoogleAuth>,
    http: reqwest::Client,
    base_url: String,
}

impl FcmClient {
    /// 创建新的 FCM 客户端
    pub fn new(auth: Arc<GoogleAuth>) -> Self {
        Self {
            auth,
            http: reqwest::Client::new(),
            base_url: FCM_API_BASE.to_string(),
        }
    }

    /// 向主题推送一条通知
    ///
    /// # 参数
    /// - `topic`: 订阅主题（不带 /topics/ 前缀）
    /// - `title`: 通知标题
    /// - `body`: 通知内容
    ///
    /// # 返回
    /// 返回 FCM 分配的消息名称
    pub async fn send_to_topic(&self, topic: &str, title: &str, body: &str) -> AppResult<String> {
        let project_id = self.auth.project_id().ok_or_else(|| {
            AppError::Other("服务账号密钥缺少 project_id，无法推送 FCM".to_string())
        })?;

        let url = format!(
            "{}/v1/projects/{}/messages:send",
            self.base_url, project_id
        );

        let payload = json!({
            "message": {
                "topic": topic,
                "notification": {
                    "title": title,
                    "body": body,
                },
            }
        });

        let token = self.auth.access_token().await?;
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(url.clone(), e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.ok();
            return Err(AppError::bad_response(url, Some(status.as_u16()), message));
        }

        let sent: SendResponse = response.json().await?;
        info!("📨 通知已推送: {}", sent.name);

        Ok(sent.name)
    }
}
