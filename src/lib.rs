//! # Wild Drafter
//!
//! 是非题问答客户端：把累积的回答发给远程评分服务，得到英雄推荐。
//! 作答过程中实时预览推荐，答完后给出最终排名。
//!
//! ## 架构设计
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 评分服务的 HTTP 调用，`ScoringApi` 是唯一接缝
//!
//! ### ② 业务能力层（Services）
//! - `OverrideStore` - 本地覆盖数据的读写，读取永不报错
//! - `LivePreviewController` - 防抖 + 序号比较的实时预览
//! - `OverrideEditor` - 本地覆盖数据的增删和提交
//! - `IconResolver` / `RenderModel` - 图标推导与渲染模型
//!
//! ### ③ 流程层（Workflow）
//! - `QuizSession` - 状态机：Idle → Asking → Finalizing → Done
//!
//! ### ④ 编排层（Orchestration）
//! - `App` - 终端输入循环
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{ScoringApi, ScoringClient};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{AnswerSet, OverridePayload, Question, RecommendationItem};
pub use orchestrator::App;
pub use services::{LivePreviewController, OverrideStore, RenderModel, ResultView};
pub use workflow::{QuizSession, SessionState};
