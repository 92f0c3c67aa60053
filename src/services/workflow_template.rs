//! ComfyUI 工作流模板 - 业务能力层
//!
//! 每种导出的工作流 JSON 的提示词 / 图片输入挂在不同的节点上，
//! 模板负责把外部参数写进正确的节点。不认识的工作流文件直接报错。

use anyhow::{anyhow, Result};
use serde_json::Value;

/// 外部传入的提示词参数
#[derive(Debug, Clone, Default)]
pub struct PromptData {
    /// 输入图片（服务端文件名）
    pub image: Option<String>,
    pub positive_prompt: Option<String>,
    pub negative_prompt: Option<String>,
}

/// 工作流模板
pub trait WorkflowTemplate: Send + Sync {
    /// 把参数写进工作流对应的节点
    fn modify_prompt(&self, workflow: &mut Value, data: &PromptData) -> Result<()>;
}

/// text_01.json：文生图工作流
///
/// 正向提示词在节点 6，负向提示词在节点 3
pub struct Text2ImageTemplate;

impl WorkflowTemplate for Text2ImageTemplate {
    fn modify_prompt(&self, workflow: &mut Value, data: &PromptData) -> Result<()> {
        if let Some(positive) = &data.positive_prompt {
            set_node_input(workflow, "6", "text", positive)?;
        }
        if let Some(negative) = &data.negative_prompt {
            set_node_input(workflow, "3", "text", negative)?;
        }
        Ok(())
    }
}

/// wildcard_animation.json：图生动画工作流
///
/// 图片在节点 7，正 / 负提示词在节点 5 / 6
pub struct WildcardAnimationTemplate;

impl WorkflowTemplate for WildcardAnimationTemplate {
    fn modify_prompt(&self, workflow: &mut Value, data: &PromptData) -> Result<()> {
        if let Some(image) = &data.image {
            set_node_input(workflow, "7", "image", image)?;
        }
        if let Some(positive) = &data.positive_prompt {
            set_node_input(workflow, "5", "prompt", positive)?;
        }
        if let Some(negative) = &data.negative_prompt {
            set_node_input(workflow, "6", "prompt", negative)?;
        }
        Ok(())
    }
}

/// 按工作流文件名创建对应的模板
pub fn create_template(file_name: &str) -> Result<Box<dyn WorkflowTemplate>> {
    match file_name {
        "test_01.json" => Ok(Box::new(Text2ImageTemplate)),
        "wildcard_animation.json" => Ok(Box::new(WildcardAnimationTemplate)),
        other => Err(anyhow!("不支持的工作流文件: {}", other)),
    }
}

/// 写入某个节点的一项输入
fn set_node_input(workflow: &mut Value, node_id: &str, key: &str, value: &str) -> Result<()> {
    let inputs = workflow
        .get_mut(node_id)
        .and_then(|n| n.get_mut("inputs"))
        .and_then(|i| i.as_object_mut())
        .ok_or_else(|| anyhow!("工作流中找不到节点 {} 的 inputs", node_id))?;

    inputs.insert(key.to_string(), Value::String(value.to_string()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text2image_workflow() -> Value {
        serde_json::json!({
            "3": { "inputs": { "text": "旧的负向提示词" } },
            "6": { "inputs": { "text": "旧的正向提示词" } }
        })
    }

    #[test]
    fn test_text2image_rewrites_prompt_nodes() {
        let mut workflow = text2image_workflow();
        let data = PromptData {
            image: None,
            positive_prompt: Some("a misty castle".to_string()),
            negative_prompt: Some("blurry".to_string()),
        };

        Text2ImageTemplate.modify_prompt(&mut workflow, &data).unwrap();

        assert_eq!(workflow["6"]["inputs"]["text"], "a misty castle");
        assert_eq!(workflow["3"]["inputs"]["text"], "blurry");
    }

    #[test]
    fn test_wildcard_animation_rewrites_image_node() {
        let mut workflow = serde_json::json!({
            "5": { "inputs": { "prompt": "" } },
            "6": { "inputs": { "prompt": "" } },
            "7": { "inputs": { "image": "base_img.png" } }
        });
        let data = PromptData {
            image: Some("uploaded_image.png".to_string()),
            positive_prompt: Some("dancing".to_string()),
            negative_prompt: None,
        };

        WildcardAnimationTemplate.modify_prompt(&mut workflow, &data).unwrap();

        assert_eq!(workflow["7"]["inputs"]["image"], "uploaded_image.png");
        assert_eq!(workflow["5"]["inputs"]["prompt"], "dancing");
        // 未提供的参数保持原样
        assert_eq!(workflow["6"]["inputs"]["prompt"], "");
    }

    #[test]
    fn test_missing_node_is_an_error() {
        let mut workflow = serde_json::json!({ "1": { "inputs": {} } });
        let data = PromptData {
            positive_prompt: Some("x".to_string()),
            ..PromptData::default()
        };
        assert!(Text2ImageTemplate.modify_prompt(&mut workflow, &data).is_err());
    }

    #[test]
    fn test_create_template_unknown_file() {
        assert!(create_template("test_01.json").is_ok());
        assert!(create_template("wildcard_animation.json").is_ok());
        assert!(create_template("unknown.json").is_err());
    }
}
