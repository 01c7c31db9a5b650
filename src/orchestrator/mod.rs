//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 终端问答应用
//! - 管理应用生命周期（初始化、运行）
//! - 组装评分客户端、覆盖数据存储、实时预览和会话
//! - 读取终端命令并转交给会话
//!
//! ### `console_view` - 终端视图
//! - `ResultView` 的终端实现
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (终端输入循环)
//!     ↓
//! workflow::QuizSession (单个问答会话)
//!     ↓
//! services (能力层：实时预览 / 覆盖数据 / 图标 / 渲染模型)
//!     ↓
//! clients (评分服务 HTTP 调用)
//! ```

pub mod app;
pub mod console_view;

pub use app::{App, Command};
pub use console_view::ConsoleView;
