//! Google Sheets API 客户端
//!
//! 封装 values 读取 / 单元格更新 / 批量更新三种调用

use crate::clients::google_auth::GoogleAuth;
use crate::error::{AppError, AppResult, SheetError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Sheets API 基础地址
const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";

/// 一个区间的值（读写共用）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueRange {
    pub range: String,
    #[serde(default)]
    pub values: Option<Vec<Vec<Value>>>,
}

/// values:batchUpdate 请求体
#[derive(Debug, Serialize)]
struct BatchUpdateRequest {
    #[serde(rename = "valueInputOption")]
    value_input_option: String,
    data: Vec<ValueRange>,
}

/// Google Sheets 客户端
pub struct SheetsClient {
    auth: Arc<GoogleAuth>,
    http: reqwest::Client,
    base_url: String,
    spreadsheet_id: String,
}

impl SheetsClient {
    /// 创建新的 Sheets 客户端
    pub fn new(auth: Arc<GoogleAuth>, spreadsheet_id: impl Into<String>) -> Self {
        Self {
            auth,
            http: reqwest::Client::new(),
            base_url: SHEETS_API_BASE.to_string(),
            spreadsheet_id: spreadsheet_id.into(),
        }
    }

    /// 读取整个工作表的数据（A:F 列）
    ///
    /// # 返回
    /// 返回按行排列的单元格文本，缺失的单元格不补齐
    pub async fn get_all_values(&self, sheet_name: &str) -> AppResult<Vec<Vec<String>>> {
        let range = quote_range(sheet_name, "A:F");
        let url = format!(
            "{}/spreadsheets/{}/values/{}",
            self.base_url, self.spreadsheet_id, range
        );

        let token = self.auth.access_token().await?;
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(url.clone(), e))?;

        let status = response.status();
        // 工作表名错误时 Sheets API 返回 400（无法解析区间）
        if status == reqwest::StatusCode::BAD_REQUEST {
            return Err(AppError::Sheet(SheetError::WorksheetNotFound {
                name: sheet_name.to_string(),
            }));
        }
        if !status.is_success() {
            let message = response.text().await.ok();
            return Err(AppError::bad_response(url, Some(status.as_u16()), message));
        }

        let value_range: ValueRange = response.json().await?;
        let rows = value_range
            .values
            .unwrap_or_default()
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect();

        Ok(rows)
    }

    /// 更新单个单元格
    ///
    /// # 参数
    /// - `sheet_name`: 工作表名称
    /// - `cell`: 单元格地址（如 "C5"）
    /// - `value`: 写入的文本
    pub async fn update_cell(&self, sheet_name: &str, cell: &str, value: &str) -> AppResult<()> {
        let range = quote_range(sheet_name, cell);
        let url = format!(
            "{}/spreadsheets/{}/values/{}?valueInputOption=USER_ENTERED",
            self.base_url, self.spreadsheet_id, range
        );

        // body 里的区间要和 URL 中的区间一致（含工作表名引号）
        let body = ValueRange {
            range: format!("'{}'!{}", sheet_name, cell),
            values: Some(vec![vec![Value::String(value.to_string())]]),
        };

        let token = self.auth.access_token().await?;
        let response = self
            .http
            .put(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::Sheet(SheetError::UpdateFailed {
                    range: format!("{}!{}", sheet_name, cell),
                    source: Box::new(e),
                })
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.ok();
            return Err(AppError::bad_response(url, Some(status.as_u16()), message));
        }

        debug!("单元格更新完成: {}!{}", sheet_name, cell);
        Ok(())
    }

    /// 批量更新多个区间（values:batchUpdate）
    pub async fn batch_update(&self, data: Vec<ValueRange>) -> AppResult<()> {
        if data.is_empty() {
            return Ok(());
        }

        let url = format!(
            "{}/spreadsheets/{}/values:batchUpdate",
            self.base_url, self.spreadsheet_id
        );

        let body = BatchUpdateRequest {
            value_input_option: "USER_ENTERED".to_string(),
            data,
        };

        let token = self.auth.access_token().await?;
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(url.clone(), e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.ok();
            return Err(AppError::bad_response(url, Some(status.as_u16()), message));
        }

        Ok(())
    }
}

/// 拼接带工作表名的 A1 区间并做 URL 编码
///
/// 工作表名加单引号，避免中文 / 数字开头的表名被解析错
fn quote_range(sheet_name: &str, cells: &str) -> String {
    let raw = format!("'{}'!{}", sheet_name, cells);
    urlencoding_encode(&raw)
}

/// 最小化的 URL 编码（区间字符串只需处理这些字符）
fn urlencoding_encode(raw: &str) -> String {
    let mut encoded = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b':' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

/// 把单元格 JSON 值统一转为文本
fn cell_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_range_encodes_sheet_name() {
        let range = quote_range("test_quarter", "A:F");
        assert_eq!(range, "%27test_quarter%27%21A%3AF");
    }

    #[test]
    fn test_cell_to_string_variants() {
        assert_eq!(cell_to_string(Value::String("1953".to_string())), "1953");
        assert_eq!(cell_to_string(Value::Null), "");
        assert_eq!(cell_to_string(serde_json::json!(42)), "42");
    }
}
