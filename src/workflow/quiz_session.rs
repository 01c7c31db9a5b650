//! 问答会话 - 流程层
//!
//! 核心职责：管理题目顺序、当前位置和答案集合，驱动状态迁移
//!
//! ```text
//! Idle -(load)-> Asking -(answer×N)-> Finalizing -(响应|失败)-> Done -(reset)-> Asking
//! ```
//!
//! 每次作答都会触发实时预览（不等待），答完最后一题后发出唯一一次
//! 最终评分请求并等待结果；失败时以空结果结束，不重试。

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::clients::ScoringApi;
use crate::config::clamp_max_results;
use crate::error::SessionError;
use crate::models::{AnswerSet, Question, RecommendationItem, ScoringRequest};
use crate::services::{
    IconResolver, LivePreviewController, OverrideStore, PreviewOptions, RenderModel, ResultView,
};

/// 会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// 尚未加载题目
    Idle,
    /// 作答中
    Asking,
    /// 最终评分请求进行中
    Finalizing,
    /// 已出结果（可能为空）
    Done,
}

/// `answer` 的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// 不在作答状态，忽略
    Ignored,
    /// 进入下一题
    Next,
    /// 最后一题已答完，结果已产出
    Completed,
}

/// 进度信息
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// 当前题号，从 1 开始，不超过总数
    pub current: usize,
    pub total: usize,
    /// 完成比例 index / total
    pub ratio: f64,
}

/// 问答会话
///
/// 一次只管理一个会话；所有协作者通过构造参数显式传入
pub struct QuizSession {
    questions: Vec<Question>,
    index: usize,
    answers: AnswerSet,
    results: Vec<RecommendationItem>,
    max_results: u32,
    api: Arc<dyn ScoringApi>,
    preview: LivePreviewController,
    overrides: Arc<OverrideStore>,
    view: Arc<dyn ResultView>,
    icons: IconResolver,
    state_tx: watch::Sender<SessionState>,
}

impl QuizSession {
    pub fn new(
        api: Arc<dyn ScoringApi>,
        preview: LivePreviewController,
        overrides: Arc<OverrideStore>,
        view: Arc<dyn ResultView>,
        icons: IconResolver,
        max_results: u32,
    ) -> Self {
        let max_results = clamp_max_results(max_results);
        preview.set_max_results(max_results);
        let (state_tx, _) = watch::channel(SessionState::Idle);
        Self {
            questions: Vec::new(),
            index: 0,
            answers: AnswerSet::new(),
            results: Vec::new(),
            max_results,
            api,
            preview,
            overrides,
            view,
            icons,
            state_tx,
        }
    }

    /// 加载题目并从第一题开始
    pub fn load(&mut self, questions: Vec<Question>) -> Result<(), SessionError> {
        if questions.is_empty() {
            return Err(SessionError::EmptyQuestionList);
        }
        info!("📋 已加载 {} 道题目", questions.len());
        self.questions = questions;
        self.restart();
        Ok(())
    }

    /// 从评分服务拉取题目并加载
    pub async fn load_from_service(&mut self) -> Result<usize, SessionError> {
        let questions = self.api.fetch_questions().await.map_err(|e| {
            error!("❌ 拉取题目列表失败: {}", e);
            SessionError::QuestionFetch(e)
        })?;
        let total = questions.len();
        self.load(questions)?;
        Ok(total)
    }

    /// 回答当前题目
    ///
    /// 只在 `Asking` 状态有效，其它状态直接忽略，防止结算期间重复提交
    pub async fn answer(&mut self, value: bool) -> AnswerOutcome {
        if self.state() != SessionState::Asking {
            debug!("当前状态 {:?}，忽略作答", self.state());
            return AnswerOutcome::Ignored;
        }
        let Some(question) = self.questions.get(self.index) else {
            return AnswerOutcome::Ignored;
        };

        debug!("第 {} 题 [{}] 回答: {}", self.index + 1, question.key, value);
        self.answers.record(question.key.clone(), value);
        self.preview.update(&self.answers, PreviewOptions::default());
        self.index += 1;

        if self.index < self.questions.len() {
            return AnswerOutcome::Next;
        }

        self.finalize().await;
        AnswerOutcome::Completed
    }

    /// 回到第一题并清空答案，无论当前处于什么状态
    pub fn reset(&mut self) {
        info!("🔁 会话重置");
        self.restart();
    }

    /// 修改结果数量；已出结果时用新数量重新请求一次
    pub async fn change_max_results(&mut self, max_results: u32) {
        self.set_max_results(max_results);
        if self.state() == SessionState::Done {
            self.finalize().await;
        }
    }

    pub fn set_max_results(&mut self, max_results: u32) {
        self.max_results = clamp_max_results(max_results);
        self.preview.set_max_results(self.max_results);
    }

    /// 视图重新可见时，用当前答案立即刷新预览
    pub fn resync_preview(&self) {
        self.preview.resync(&self.answers);
    }

    pub fn state(&self) -> SessionState {
        *self.state_tx.borrow()
    }

    /// 订阅状态变化，视图层可据此在结算期间禁用输入
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    pub fn progress(&self) -> Option<Progress> {
        let total = self.questions.len();
        if total == 0 {
            return None;
        }
        Some(Progress {
            current: (self.index + 1).min(total),
            total,
            ratio: self.index as f64 / total as f64,
        })
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.state() {
            SessionState::Asking => self.questions.get(self.index),
            _ => None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn results(&self) -> &[RecommendationItem] {
        &self.results
    }

    pub fn max_results(&self) -> u32 {
        self.max_results
    }

    pub fn preview(&self) -> &LivePreviewController {
        &self.preview
    }

    fn restart(&mut self) {
        self.index = 0;
        self.answers.clear();
        self.results.clear();
        self.preview.update(&self.answers, PreviewOptions::reset());
        // 没有题目时无法作答，停在 Idle
        let next = if self.questions.is_empty() {
            SessionState::Idle
        } else {
            SessionState::Asking
        };
        self.set_state(next);
    }

    /// 发出最终评分请求，只尝试一次
    async fn finalize(&mut self) {
        self.set_state(SessionState::Finalizing);

        let request = ScoringRequest::new(
            self.answers.clone(),
            self.max_results,
            self.overrides.current(),
        );
        info!(
            "⏳ 最终评分: {} 个答案, max_results={}",
            request.answers.len(),
            request.max_results
        );

        self.results = match self.api.recommend(&request).await {
            Ok(items) => {
                info!("✓ 最终评分完成，{} 条推荐", items.len());
                items
            }
            Err(e) => {
                error!("❌ 最终评分失败，以空结果结束: {}", e);
                Vec::new()
            }
        };

        self.view
            .show_results(&RenderModel::from_items(&self.results, &self.icons));
        self.set_state(SessionState::Done);
    }

    fn set_state(&self, state: SessionState) {
        let previous = self.state_tx.send_replace(state);
        if previous != state {
            debug!("会话状态: {:?} -> {:?}", previous, state);
        }
    }
}
