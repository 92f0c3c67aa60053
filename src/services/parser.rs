//! 模型输出解析 - 业务能力层
//!
//! 两级解析策略：
//! 1. 去掉 Markdown 代码块标记后按严格 JSON 解析
//! 2. JSON 解析失败时，用正则从文本中逐字段提取
//!
//! 两级都失败也不会崩溃，返回占位内容，由调用方决定如何处理

use crate::models::content::GeneratedContent;
use regex::Regex;
use serde_json::Value;
use tracing::warn;

/// 字段提取失败时的占位值
const EXTRACT_FAILED: &str = "提取失败";
/// 完全无法解析时的占位值
const CONTENT_FAILED: &str = "内容提取失败";
const YEAR_FAILED: &str = "年份提取失败";
/// 没有相关影视作品时的默认值
const NO_MOVIES: &str = "暂无相关作品";

/// 解析模型输出
///
/// # 参数
/// - `content`: 模型返回的原始文本
///
/// # 返回
/// 永远返回一个 GeneratedContent，解析失败时字段为占位值
pub fn parse_response(content: &str) -> GeneratedContent {
    // 去掉 ```json ... ``` 形式的代码块标记
    let fence_open = Regex::new(r"```json\n?").expect("固定正则");
    let fence_close = Regex::new(r"```\n?").expect("固定正则");
    let fence_open_stripped = fence_open.replace_all(content, "");
    let stripped = fence_close.replace_all(&fence_open_stripped, "");

    match serde_json::from_str::<Value>(stripped.trim()) {
        Ok(parsed) => {
            let field = |key: &str| match parsed.get(key) {
                Some(Value::String(s)) => s.clone(),
                // 年份偶尔会被模型写成数字
                Some(Value::Number(n)) => n.to_string(),
                _ => String::new(),
            };
            GeneratedContent {
                simple: field("simple"),
                detail: field("detail"),
                year: field("year"),
                related_movies: field("related_movies"),
            }
        }
        Err(e) => {
            warn!("⚠️ JSON 解析失败: {}，转为正则提取", e);
            extract_from_text(&stripped)
        }
    }
}

/// 从非 JSON 文本中按字段正则提取
fn extract_from_text(content: &str) -> GeneratedContent {
    let extract = |key: &str| -> Option<String> {
        // 允许值里出现转义字符和换行
        let pattern = format!(r#"(?s)"{}":\s*"([^"\\]*(?:\\.[^"\\]*)*)""#, key);
        let re = Regex::new(&pattern).ok()?;
        re.captures(content)
            .and_then(|c| c.get(1))
            .map(|m| unescape(m.as_str()))
    };

    let simple = extract("simple");
    let detail = extract("detail");
    let year = extract("year");
    let movies = extract("related_movies");

    if simple.is_none() && detail.is_none() && year.is_none() {
        warn!("❌ 文本提取失败，返回占位内容");
        return GeneratedContent {
            simple: CONTENT_FAILED.to_string(),
            detail: CONTENT_FAILED.to_string(),
            year: YEAR_FAILED.to_string(),
            related_movies: NO_MOVIES.to_string(),
        };
    }

    GeneratedContent {
        simple: simple.unwrap_or_else(|| EXTRACT_FAILED.to_string()),
        detail: detail.unwrap_or_else(|| EXTRACT_FAILED.to_string()),
        year: year.unwrap_or_else(|| EXTRACT_FAILED.to_string()),
        related_movies: movies.unwrap_or_else(|| NO_MOVIES.to_string()),
    }
}

/// 还原常见的转义字符
fn unescape(text: &str) -> String {
    text.replace("\\\"", "\"").replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed_json_roundtrip() {
        let content = r#"{
            "simple": "1953年6月2日，伦敦迎来了一场盛大的加冕典礼。",
            "detail": "二战结束后的英国百废待兴……",
            "year": "1953",
            "related_movies": "王冠, 国王的演讲"
        }"#;

        let parsed = parse_response(content);
        assert_eq!(parsed.simple, "1953年6月2日，伦敦迎来了一场盛大的加冕典礼。");
        assert_eq!(parsed.detail, "二战结束后的英国百废待兴……");
        assert_eq!(parsed.year, "1953");
        assert_eq!(parsed.related_movies, "王冠, 国王的演讲");
    }

    #[test]
    fn test_parse_fenced_json() {
        let content = "```json\n{\"simple\": \"简\", \"detail\": \"详\", \"year\": \"1840\", \"related_movies\": \"鸦片战争\"}\n```";
        let parsed = parse_response(content);
        assert_eq!(parsed.simple, "简");
        assert_eq!(parsed.year, "1840");
    }

    #[test]
    fn test_parse_numeric_year() {
        let content = r#"{"simple": "简", "detail": "详", "year": 1953, "related_movies": ""}"#;
        let parsed = parse_response(content);
        assert_eq!(parsed.year, "1953");
    }

    #[test]
    fn test_fallback_extraction_on_malformed_json() {
        // 末尾多了一段说明文字，无法按 JSON 解析
        let content = r#"{
            "simple": "简单版本",
            "detail": "详细版本，\n带换行和\"引号\"",
            "year": "1923",
            "related_movies": "关东大地震"
        }
        以上就是生成的内容。"#;

        let parsed = parse_response(content);
        assert_eq!(parsed.simple, "简单版本");
        assert_eq!(parsed.detail, "详细版本，\n带换行和\"引号\"");
        assert_eq!(parsed.year, "1923");
        assert_eq!(parsed.related_movies, "关东大地震");
    }

    #[test]
    fn test_fallback_partial_fields() {
        let content = r#"回答如下："simple": "只有简单版本" 其余略"#;
        let parsed = parse_response(content);
        assert_eq!(parsed.simple, "只有简单版本");
        assert_eq!(parsed.detail, "提取失败");
        assert_eq!(parsed.related_movies, "暂无相关作品");
    }

    #[test]
    fn test_garbage_returns_placeholders_without_panic() {
        let parsed = parse_response("完全不是 JSON 的一段话");
        assert_eq!(parsed.simple, "内容提取失败");
        assert_eq!(parsed.detail, "内容提取失败");
        assert_eq!(parsed.year, "年份提取失败");
        assert_eq!(parsed.related_movies, "暂无相关作品");
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r#"带\"引号\"和\n换行"#), "带\"引号\"和\n换行");
    }
}
