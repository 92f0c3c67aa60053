//! 提示词构建
//!
//! 实时生成和批量生成共用同一套提示词

/// 系统提示词
pub const SYSTEM_PROMPT: &str = "角色：
- 把复杂历史讲成引人入胜故事的历史解说者
- 让从孩子到成人的所有年龄层都能听懂的教育者
- 连接过去与现在、帮读者找到历史意义的向导

目标：
- 让读者发出\"原来发生过这样的事！\"的感叹
- 把历史事实讲得既准确又有趣
- 让读者真切感受到那个时代的处境与情感
";

/// 构建用户提示词
///
/// # 参数
/// - `topic`: 事件主题（如 "伊丽莎白二世女王加冕"）
/// - `date`: 日期键（如 "06-02"，可为空）
pub fn build_user_prompt(topic: &str, date: &str) -> String {
    let date_info = if date.is_empty() {
        String::new()
    } else {
        format!("<DATE>{}</DATE>\n", date)
    };

    format!(
        r#"{date_info}请以"{topic}"为素材，围绕今天 {date} 发生的历史事件或人物，写出两个版本的文章。

📝 写作原则
- 像亲临现场一样生动具体地叙述
- 描写出当时人们的情绪和处境，让读者能够想象
- 自然地带出与当下生活的关联或启示
- 不用编号和项目符号，只用自然的段落
- 适当加入表情符号增加趣味

📚 两个版本的要求

**简单版本 (Simple)**
- 对象：小学生也能看懂的水平
- 长度：250-350 字（适合手机阅读的篇幅）
- 特点：只留核心、激发好奇心的"今日历史一口餐"
- 开头：以日期开场，用有趣的第一句话引入

**详细版本 (Detail)**
- 对象：初高中以上水平
- 长度：1300-1700 字（包含充分的背景说明）
- 结构：背景情况 → 事件经过 → 结果与影响 → 现实意义
- 特点：深入到历史脉络和人物心理

🎯 输出格式
务必严格按照下面的 JSON 格式输出：

{{
 "simple": "<简单版本内容>",
 "detail": "<详细版本内容>",
 "year": "<准确的年份>",
 "related_movies": "<用逗号分隔的 3-5 部相关影视作品（例：电影1, 电视剧2, 电影3）>"
}}

💡 注意事项
- 以准确的历史事实为基础，用讲故事的方式有趣地传达
- 有争议的事件要以平衡的视角叙述
- 相关影视作品只选直接刻画该事件或人物的作品
- 没有相关作品或难以确定时填写"暂无相关作品""#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_user_prompt_includes_topic_and_date() {
        let prompt = build_user_prompt("伊丽莎白二世女王加冕", "06-02");
        assert!(prompt.contains("<DATE>06-02</DATE>"));
        assert!(prompt.contains("伊丽莎白二世女王加冕"));
        assert!(prompt.contains("related_movies"));
    }

    #[test]
    fn test_build_user_prompt_without_date() {
        let prompt = build_user_prompt("关东大地震", "");
        assert!(!prompt.contains("<DATE>"));
    }
}
