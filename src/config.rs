/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    // --- OpenAI 配置 ---
    pub openai_api_key: String,
    pub openai_api_base: String,
    /// 实时生成使用的模型
    pub openai_model: String,
    /// 批量任务使用的模型
    ///
    /// 可选模型参考：
    /// - gpt-4.1-nano-2025-04-14  最快的模型
    /// - o4-mini-2025-04-16       高性价比推理模型 (input 1.1, output 4.4)
    /// - gpt-4.1-mini-2025-04-14  高性价比均衡模型 (input 0.4, output 1.6)
    /// - gpt-4.1-2025-04-14       旗舰均衡模型 (input 2, output 8)
    /// - o3-2025-04-16            最强推理模型 (input 2, output 8)
    pub batch_model: String,
    // --- Google Sheets 配置 ---
    pub spreadsheet_id: String,
    /// 服务账号密钥文件路径
    pub credentials_file: String,
    /// 默认处理的工作表名称
    pub sheet_name: String,
    // --- Supabase 配置 ---
    pub supabase_url: String,
    pub supabase_anon_key: String,
    // --- FCM 配置 ---
    /// 通知推送的默认主题
    pub fcm_topic: String,
    // --- ComfyUI 配置 ---
    pub comfy_server_address: String,
    // --- 服务配置 ---
    /// HTTP 服务监听端口（Cloud Run 通过 PORT 注入）
    pub server_port: u16,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

/// 数据起始行（跳过表头）
pub const DATA_START_ROW: usize = 2;

/// 各季度工作表名称
pub const SHEET_NAMES: [&str; 4] = ["1q", "2q", "3q", "4q"];

/// 测试工作表名称
pub const TEST_SHEET_NAME: &str = "test_quarter";

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            openai_api_base: "https://api.openai.com/v1".to_string(),
            openai_model: "gpt-4.1-nano-2025-04-14".to_string(),
            batch_model: "gpt-4.1-mini-2025-04-14".to_string(),
            spreadsheet_id: "1n5swi9I4-04YZ6qAT3G0gQX9cB3QbBEv0DX5YYhvTuA".to_string(),
            credentials_file: "credentials.json".to_string(),
            sheet_name: TEST_SHEET_NAME.to_string(),
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            fcm_topic: "daily_history".to_string(),
            comfy_server_address: "127.0.0.1:8188".to_string(),
            server_port: 8080,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            openai_api_key: std::env::var("OPENAI_API_KEY").unwrap_or(default.openai_api_key),
            openai_api_base: std::env::var("OPENAI_API_BASE").unwrap_or(default.openai_api_base),
            openai_model: std::env::var("OPENAI_MODEL").unwrap_or(default.openai_model),
            batch_model: std::env::var("BATCH_MODEL").unwrap_or(default.batch_model),
            spreadsheet_id: std::env::var("SPREADSHEET_ID").unwrap_or(default.spreadsheet_id),
            credentials_file: std::env::var("GOOGLE_CREDENTIALS_FILE").unwrap_or(default.credentials_file),
            sheet_name: std::env::var("SHEET_NAME").unwrap_or(default.sheet_name),
            supabase_url: std::env::var("SUPABASE_URL").unwrap_or(default.supabase_url),
            supabase_anon_key: std::env::var("SUPABASE_ANON_KEY").unwrap_or(default.supabase_anon_key),
            fcm_topic: std::env::var("FCM_TOPIC").unwrap_or(default.fcm_topic),
            comfy_server_address: std::env::var("COMFY_SERVER_ADDRESS").unwrap_or(default.comfy_server_address),
            server_port: std::env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.server_port),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 校验 OpenAI 配置是否就绪
    pub fn require_openai_key(&self) -> crate::error::AppResult<()> {
        if self.openai_api_key.is_empty() {
            return Err(crate::error::AppError::Config(
                crate::error::ConfigError::EnvVarNotFound {
                    var_name: "OPENAI_API_KEY".to_string(),
                },
            ));
        }
        Ok(())
    }

    /// 校验 Supabase 配置是否就绪
    pub fn require_supabase(&self) -> crate::error::AppResult<()> {
        for (name, value) in [
            ("SUPABASE_URL", &self.supabase_url),
            ("SUPABASE_ANON_KEY", &self.supabase_anon_key),
        ] {
            if value.is_empty() {
                return Err(crate::error::AppError::Config(
                    crate::error::ConfigError::EnvVarNotFound {
                        var_name: name.to_string(),
                    },
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.batch_model, "gpt-4.1-mini-2025-04-14");
        assert_eq!(config.sheet_name, TEST_SHEET_NAME);
        assert_eq!(config.server_port, 8080);
    }

    #[test]
    fn test_require_openai_key_missing() {
        let config = Config::default();
        assert!(config.require_openai_key().is_err());
    }

    #[test]
    fn test_require_openai_key_present() {
        let config = Config {
            openai_api_key: "sk-test".to_string(),
            ..Config::default()
        };
        assert!(config.require_openai_key().is_ok());
    }
}
