//! 终端问答应用 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：创建评分客户端、加载本地覆盖数据、组装会话
//! 2. **输入循环**：从标准输入读取命令，转交给 `QuizSession`
//! 3. **资源管理**：持有所有协作者，确保生命周期正确
//!
//! 不做任何业务判断，只做调度和输出

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::clients::{ScoringApi, ScoringClient};
use crate::config::Config;
use crate::orchestrator::console_view::ConsoleView;
use crate::services::{FileKeyValueStore, IconResolver, LivePreviewController, OverrideStore};
use crate::utils::logging::{log_session_complete, log_startup, truncate_text};
use crate::workflow::{AnswerOutcome, QuizSession, SessionState};

/// 终端命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Answer(bool),
    Reset,
    TogglePreview,
    MaxResults(u32),
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let mut parts = input.split_whitespace();
        match (parts.next().map(str::to_lowercase).as_deref(), parts.next()) {
            (Some("y" | "yes" | "o" | "oui"), None) => Command::Answer(true),
            (Some("n" | "no" | "non"), None) => Command::Answer(false),
            (Some("r" | "reset"), None) => Command::Reset,
            (Some("p" | "preview"), None) => Command::TogglePreview,
            (Some("m" | "max"), Some(value)) => match value.parse() {
                Ok(n) => Command::MaxResults(n),
                Err(_) => Command::Unknown(input.to_string()),
            },
            (Some("q" | "quit"), None) => Command::Quit,
            _ => Command::Unknown(input.to_string()),
        }
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    session: QuizSession,
    view: Arc<ConsoleView>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let api: Arc<dyn ScoringApi> = Arc::new(ScoringClient::new(&config));
        let overrides = Arc::new(OverrideStore::new(FileKeyValueStore::new(
            &config.override_store_dir,
        )));
        let local = overrides.load();
        if !local.is_empty() {
            info!("📦 使用本地覆盖数据: {} 个英雄", local.len());
        }

        let view = Arc::new(ConsoleView::new());
        let icons = IconResolver::new(&config);
        let preview = LivePreviewController::new(
            api.clone(),
            overrides.clone(),
            view.clone(),
            icons.clone(),
            Duration::from_millis(config.preview_debounce_ms),
            config.max_results,
        );

        let mut session = QuizSession::new(
            api,
            preview,
            overrides,
            view.clone(),
            icons,
            config.max_results,
        );
        session
            .load_from_service()
            .await
            .with_context(|| format!("无法从 {} 加载题目", config.api_base_url))?;

        Ok(Self {
            config,
            session,
            view,
        })
    }

    /// 运行输入循环，直到 `q` 或输入结束
    pub async fn run(mut self) -> Result<()> {
        print_help();
        self.prompt();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await.context("读取输入失败")? {
            match Command::parse(&line) {
                Command::Answer(value) => self.handle_answer(value).await,
                Command::Reset => self.session.reset(),
                Command::TogglePreview => {
                    if self.view.toggle_preview() {
                        self.session.resync_preview();
                    }
                }
                Command::MaxResults(n) => {
                    self.session.change_max_results(n).await;
                    info!("推荐数量: {}", self.session.max_results());
                }
                Command::Quit => break,
                Command::Unknown(input) => {
                    warn!("未知命令: {}", truncate_text(&input, 40));
                    print_help();
                }
            }
            self.prompt();
        }

        info!("👋 退出 (服务: {})", self.config.api_base_url);
        Ok(())
    }

    async fn handle_answer(&mut self, value: bool) {
        match self.session.answer(value).await {
            AnswerOutcome::Completed => {
                log_session_complete(self.session.answers().len(), self.session.results().len());
            }
            AnswerOutcome::Ignored => println!("问答已结束，输入 r 重新开始"),
            AnswerOutcome::Next => {}
        }
    }

    fn prompt(&self) {
        if self.session.state() != SessionState::Asking {
            return;
        }
        if let (Some(question), Some(progress)) =
            (self.session.current_question(), self.session.progress())
        {
            println!(
                "[{}/{} {:>3.0}%] {} (y/n)",
                progress.current,
                progress.total,
                progress.ratio * 100.0,
                question.text
            );
        }
    }
}

fn print_help() {
    println!("命令: y 是 | n 否 | r 重新开始 | p 显示/隐藏预览 | m <数量> 推荐数量 | q 退出");
}
