//! 事件 JSON 转 CSV
//!
//! 把日期键 JSON（{"06-02": {"title": ..., "body": ...}}）转成
//! 三列 CSV（date_key,title,body），供 Supabase 导入

use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::event::EventContent;

/// 转换 JSON 文件为 CSV
///
/// # 参数
/// - `input`: 输入 JSON 文件
/// - `output`: 输出 CSV 文件
///
/// # 返回
/// 返回写入的数据行数（不含表头）
pub async fn convert_json_to_csv(input: &Path, output: &Path) -> AppResult<usize> {
    if !input.exists() {
        return Err(AppError::file_not_found(input.display().to_string()));
    }

    let content = tokio::fs::read_to_string(input).await?;
    let data: BTreeMap<String, EventContent> = serde_json::from_str(&content)?;

    let mut writer = csv::Writer::from_path(output)
        .map_err(|e| AppError::file_write_failed(output.display().to_string(), e))?;

    // 表头与 Supabase 列名一致
    writer
        .write_record(["date_key", "title", "body"])
        .map_err(|e| AppError::file_write_failed(output.display().to_string(), e))?;

    let mut rows = 0;
    for (date_key, event) in &data {
        writer
            .write_record([date_key.as_str(), event.title.as_str(), event.body.as_str()])
            .map_err(|e| AppError::file_write_failed(output.display().to_string(), e))?;
        rows += 1;
    }

    writer
        .flush()
        .map_err(|e| AppError::file_write_failed(output.display().to_string(), e))?;

    info!("成功! 已生成 '{}' ({} 行)", output.display(), rows);

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_convert_json_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("history_noti.json");
        let output = dir.path().join("output_for_supabase.csv");

        std::fs::write(
            &input,
            r#"{
                "06-02": { "title": "加冕典礼", "body": "正文,带逗号" },
                "09-01": { "title": "关东大地震", "body": "正文" }
            }"#,
        )
        .unwrap();

        let rows = convert_json_to_csv(&input, &output).await.unwrap();
        assert_eq!(rows, 2);

        let csv_content = std::fs::read_to_string(&output).unwrap();
        let mut lines = csv_content.lines();
        assert_eq!(lines.next().unwrap(), "date_key,title,body");
        // 含逗号的字段应被正确引用
        assert_eq!(lines.next().unwrap(), "06-02,加冕典礼,\"正文,带逗号\"");
        assert_eq!(lines.next().unwrap(), "09-01,关东大地震,正文");
    }

    #[tokio::test]
    async fn test_convert_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let result = convert_json_to_csv(
            &dir.path().join("no_such.json"),
            &dir.path().join("out.csv"),
        )
        .await;
        assert!(matches!(
            result,
            Err(AppError::File(crate::error::FileError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_convert_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.json");
        std::fs::write(&input, "{oops").unwrap();

        let result = convert_json_to_csv(&input, &dir.path().join("out.csv")).await;
        assert!(result.is_err());
    }
}
