//! LLM 服务 - 业务能力层
//!
//! 只负责"实时生成内容"能力，不关心流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::content::GeneratedContent;
use crate::services::parser;
use crate::services::prompts;

/// LLM 服务
///
/// 职责：
/// - 调用 LLM API 生成单个事件的内容
/// - 提供通用的 LLM 调用接口
/// - 只处理单个事件
/// - 不出现 Vec<HistoricalEvent>
/// - 不关心流程顺序
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.openai_api_key)
            .with_api_base(&config.openai_api_base);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model_name: config.openai_model.clone(),
        }
    }

    /// 通用的 LLM 调用函数
    ///
    /// 这是最基础的 LLM 调用接口，其他所有 LLM 相关功能都应该基于此函数。
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    ///
    /// # 返回
    /// 返回 LLM 的响应内容（字符串）
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
    ) -> Result<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        // 构建消息列表
        let mut messages = Vec::new();

        // 添加系统消息（如果提供）
        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        // 添加用户消息
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        // 构建请求
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.7)
            .max_tokens(2000u32)
            .build()?;

        // 调用 API
        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            anyhow::anyhow!("LLM API 调用失败: {}", e)
        })?;

        debug!("LLM API 调用成功");

        // 提取响应内容
        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| anyhow::anyhow!("LLM 返回内容为空"))?;

        Ok(content.trim().to_string())
    }

    /// 生成一个事件的两版内容
    ///
    /// 这个函数基于 `send_to_llm` 实现，内部完成提示词构建和响应解析。
    ///
    /// # 参数
    /// - `title`: 事件主题
    /// - `date`: 日期键（如 "06-02"）
    ///
    /// # 返回
    /// 返回解析后的内容；simple 或 detail 为空视为失败
    pub async fn generate_content(&self, title: &str, date: &str) -> Result<GeneratedContent> {
        debug!("开始生成内容: {} ({})", title, date);

        let user_message = prompts::build_user_prompt(title, date);
        let response = self
            .send_to_llm(&user_message, Some(prompts::SYSTEM_PROMPT))
            .await?;

        let content = parser::parse_response(&response);

        if !content.is_complete() {
            anyhow::bail!("LLM 未返回有效内容 (主题: {})", title);
        }

        debug!(
            "内容生成完成: simple {} 字 / detail {} 字 / 年份 {}",
            content.simple.chars().count(),
            content.detail.chars().count(),
            content.year
        );

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 创建测试用的 LlmService
    fn create_test_service() -> LlmService {
        let config = Config {
            openai_api_key: "sk-test".to_string(),
            ..Config::default()
        };
        LlmService::new(&config)
    }

    #[test]
    fn test_service_uses_configured_model() {
        let service = create_test_service();
        assert_eq!(service.model_name, "gpt-4.1-nano-2025-04-14");
    }

    /// 测试通用 LLM 调用
    ///
    /// 运行方式：
    /// ```bash
    /// cargo test test_send_to_llm_simple -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_send_to_llm_simple() {
        let _ = tracing_subscriber::fmt::try_init();

        let config = Config::from_env();
        let service = LlmService::new(&config);

        let result = service
            .send_to_llm("请用一句话介绍你自己", Some("你是一个简洁的助手。"))
            .await;

        match result {
            Ok(response) => {
                println!("\n========== LLM 响应 ==========");
                println!("{}", response);
                println!("==============================\n");
                assert!(!response.is_empty());
            }
            Err(e) => panic!("LLM 调用失败: {}", e),
        }
    }

    /// 测试完整的内容生成流程（真实 API）
    #[tokio::test]
    #[ignore]
    async fn test_generate_content() {
        let _ = tracing_subscriber::fmt::try_init();

        let config = Config::from_env();
        let service = LlmService::new(&config);

        let result = service.generate_content("关东大地震", "09-01").await;

        match result {
            Ok(content) => {
                println!("Simple: {}", content.simple);
                println!("Detail 长度: {} 字", content.detail.chars().count());
                println!("Year: {}", content.year);
                assert!(content.is_complete());
            }
            Err(e) => panic!("内容生成失败: {}", e),
        }
    }
}
