//! # History Content Gen
//!
//! 围绕"每日历史"内容产品的一组独立小工具和一个薄 HTTP 服务
//!
//! ## 架构设计
//!
//! 库部分采用分层结构：
//!
//! ### ① 模型层（Models）
//! - `models/` - 数据结构与线格式
//! - `HistoricalEvent` / `GeneratedContent` / 批量任务线格式
//!
//! ### ② 客户端层（Clients）
//! - `clients/` - 对外部服务的直接封装
//! - OpenAI Batch / Google Sheets / Supabase / FCM / ComfyUI
//!
//! ### ③ 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个对象
//! - `LlmService` - 实时生成能力
//! - `parser` - 两级解析能力（JSON → 正则兜底）
//! - `BatchFileService` / `BatchService` - 批量文件与任务能力
//! - `SheetsUpdaterService` / `sheet_filler` - 回填决策与执行
//!
//! ### ④ 流程层（Workflow）
//! - `workflow/` - 定义"一行数据"的完整处理流程
//! - `RowCtx` - 上下文封装（sheet_name + row_num）
//! - `RowFlow` - 流程编排（检查 → 生成 → 写回）
//!
//! ### ⑤ 编排层（Orchestration）
//! - `orchestrator/sheet_processor` - 整表遍历器，管理客户端资源
//!
//! 工具专用的部分（media / dataset / server）彼此独立，
//! 各自对应 src/bin 下的一个入口。

pub mod clients;
pub mod config;
pub mod dataset;
pub mod error;
pub mod media;
pub mod models;
pub mod orchestrator;
pub mod server;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{GeneratedContent, HistoricalEvent, ParsedResult};
pub use orchestrator::App;
pub use workflow::{ProcessResult, RowCtx, RowFlow};
