/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use tracing_subscriber::EnvFilter;

/// 初始化全局日志
///
/// 默认级别为 info，可通过 RUST_LOG 环境变量覆盖
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("history_content_gen=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// 记录工具启动横幅
///
/// # 参数
/// - `name`: 工具名称
pub fn log_banner(name: &str) {
    tracing::info!("{}", "=".repeat(50));
    tracing::info!("🚀 {}", name);
    tracing::info!("{}", "=".repeat(50));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text() {
        assert_eq!(truncate_text("你好", 10), "你好");
    }

    #[test]
    fn test_truncate_long_text() {
        let text = "一二三四五六七八九十";
        assert_eq!(truncate_text(text, 5), "一二三四五...");
    }
}
