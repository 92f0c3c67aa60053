//! Supabase 查询客户端
//!
//! 通过 PostgREST 接口读取 daily_events 表

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// daily_events 表的一行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyEvent {
    pub title: String,
    pub body: String,
}

/// Supabase 客户端
#[derive(Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    /// 创建新的 Supabase 客户端
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            anon_key: anon_key.into(),
        }
    }

    /// 查询指定日期键（MMDD）的事件
    ///
    /// # 返回
    /// 当天没有数据时返回 None
    pub async fn fetch_event(&self, date_key: &str) -> AppResult<Option<DailyEvent>> {
        let url = format!(
            "{}/rest/v1/daily_events?select=title,body&date_key=eq.{}&limit=1",
            self.base_url, date_key
        );

        debug!("查询 Supabase: date_key={}", date_key);

        let response = self
            .http
            .get(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(url.clone(), e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.ok();
            return Err(AppError::bad_response(url, Some(status.as_u16()), message));
        }

        let mut rows: Vec<DailyEvent> = response.json().await?;
        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.remove(0)))
        }
    }

    /// 查询今天的事件
    pub async fn fetch_today_event(&self) -> AppResult<Option<DailyEvent>> {
        self.fetch_event(&today_key()).await
    }
}

/// 今天的日期键（MMDD，如 "0820"）
pub fn today_key() -> String {
    chrono::Local::now().format("%m%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_event_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/daily_events"))
            .and(query_param("date_key", "eq.0602"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "title": "伊丽莎白二世女王加冕", "body": "1953年的今天……" }
            ])))
            .mount(&server)
            .await;

        let client = SupabaseClient::new(server.uri(), "anon-key");
        let event = client.fetch_event("0602").await.unwrap().unwrap();
        assert_eq!(event.title, "伊丽莎白二世女王加冕");
    }

    #[tokio::test]
    async fn test_fetch_event_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/daily_events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let client = SupabaseClient::new(server.uri(), "anon-key");
        let event = client.fetch_event("0101").await.unwrap();
        assert!(event.is_none());
    }

    #[test]
    fn test_today_key_format() {
        let key = today_key();
        assert_eq!(key.len(), 4);
        assert!(key.chars().all(|c| c.is_ascii_digit()));
    }
}
