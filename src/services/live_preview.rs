//! 实时预览 - 业务能力层
//!
//! 每次作答后刷新预览，但对评分服务的调用做防抖：
//!
//! - 每次 `update` 递增序号，并在静默窗口结束后才真正发请求；
//!   窗口内的新调用让旧的计划作废，旧计划永远不会发出
//! - 发出请求时记录序号为"最近发出"；响应到达时序号不是最近发出的就丢弃，
//!   以发出顺序而不是到达顺序为准
//! - 已发出的请求不会被中断，只会丢弃其结果

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::clients::ScoringApi;
use crate::config::clamp_max_results;
use crate::models::{AnswerSet, ScoringRequest};
use crate::services::icon_resolver::IconResolver;
use crate::services::override_store::OverrideStore;
use crate::services::render_model::{RenderModel, ResultView};

/// `update` 的选项
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreviewOptions {
    /// 会话重置：立即清空为占位提示
    pub reset: bool,
}

impl PreviewOptions {
    pub fn reset() -> Self {
        Self { reset: true }
    }
}

struct PreviewState {
    /// 每次 update / resync / 清空都递增
    sequence: u64,
    /// 最近一次真正发出的请求序号
    latest_issued: u64,
    /// 尚在静默窗口中的计划
    pending: Option<JoinHandle<()>>,
    max_results: u32,
    last_answers: AnswerSet,
    display: RenderModel,
}

struct Shared {
    api: Arc<dyn ScoringApi>,
    overrides: Arc<OverrideStore>,
    view: Arc<dyn ResultView>,
    icons: IconResolver,
    debounce: Duration,
    state: Mutex<PreviewState>,
}

/// 实时预览控制器
///
/// 克隆后共享同一份状态
#[derive(Clone)]
pub struct LivePreviewController {
    shared: Arc<Shared>,
}

impl LivePreviewController {
    pub fn new(
        api: Arc<dyn ScoringApi>,
        overrides: Arc<OverrideStore>,
        view: Arc<dyn ResultView>,
        icons: IconResolver,
        debounce: Duration,
        max_results: u32,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                api,
                overrides,
                view,
                icons,
                debounce,
                state: Mutex::new(PreviewState {
                    sequence: 0,
                    latest_issued: 0,
                    pending: None,
                    max_results: clamp_max_results(max_results),
                    last_answers: AnswerSet::new(),
                    display: RenderModel::Placeholder,
                }),
            }),
        }
    }

    /// 答案变化后调用，不阻塞调用方
    pub fn update(&self, answers: &AnswerSet, options: PreviewOptions) {
        let mut state = self.shared.lock();
        state.last_answers = answers.clone();

        if options.reset || answers.is_empty() {
            self.shared.clear(&mut state);
            return;
        }

        cancel_pending(&mut state);
        state.sequence += 1;
        let sequence = state.sequence;
        debug!("预览请求 #{} 已计划, {} 个答案", sequence, answers.len());

        let shared = Arc::clone(&self.shared);
        let answers = answers.clone();
        state.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(shared.debounce).await;
            shared.fire_scheduled(sequence, answers).await;
        }));
    }

    /// 跳过静默窗口立即请求，用于视图重新可见时
    pub fn resync(&self, answers: &AnswerSet) {
        let mut state = self.shared.lock();
        state.last_answers = answers.clone();

        if answers.is_empty() {
            self.shared.clear(&mut state);
            return;
        }

        cancel_pending(&mut state);
        state.sequence += 1;
        let sequence = state.sequence;
        let request = self.shared.issue(&mut state, sequence, answers.clone());
        drop(state);

        info!("🔄 预览立即同步 #{}", sequence);
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            shared.fetch(sequence, request).await;
        });
    }

    /// 用最近一次的答案立即同步
    pub fn resync_last(&self) {
        let answers = self.shared.lock().last_answers.clone();
        self.resync(&answers);
    }

    pub fn set_max_results(&self, max_results: u32) {
        self.shared.lock().max_results = clamp_max_results(max_results);
    }

    pub fn max_results(&self) -> u32 {
        self.shared.lock().max_results
    }

    /// 当前预览显示的内容
    pub fn display(&self) -> RenderModel {
        self.shared.lock().display.clone()
    }

    /// 最近一次发出的请求序号
    pub fn latest_issued(&self) -> u64 {
        self.shared.lock().latest_issued
    }

    pub fn has_pending(&self) -> bool {
        self.shared
            .lock()
            .pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

fn cancel_pending(state: &mut PreviewState) {
    if let Some(handle) = state.pending.take() {
        handle.abort();
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, PreviewState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 清空为占位提示，同时让计划中和已发出的请求全部作废
    fn clear(&self, state: &mut PreviewState) {
        cancel_pending(state);
        state.sequence += 1;
        state.latest_issued = state.sequence;
        debug!("预览已清空 (序号 {})", state.sequence);
        self.render(state, RenderModel::Placeholder);
    }

    /// 记录发出的序号并合并覆盖数据
    fn issue(&self, state: &mut PreviewState, sequence: u64, answers: AnswerSet) -> ScoringRequest {
        state.latest_issued = sequence;
        ScoringRequest::new(answers, state.max_results, self.overrides.current())
    }

    async fn fire_scheduled(&self, sequence: u64, answers: AnswerSet) {
        let request = {
            let mut state = self.lock();
            if state.sequence != sequence {
                debug!("预览请求 #{} 已被取代，不发出", sequence);
                return;
            }
            // 之后的 update 不能再中断这个已发出的请求
            state.pending = None;
            self.issue(&mut state, sequence, answers)
        };
        self.fetch(sequence, request).await;
    }

    async fn fetch(&self, sequence: u64, request: ScoringRequest) {
        debug!("发出预览请求 #{}", sequence);
        let result = self.api.recommend(&request).await;

        let mut state = self.lock();
        if state.latest_issued != sequence {
            debug!(
                "丢弃过期的预览响应 #{} (最近发出 #{})",
                sequence, state.latest_issued
            );
            return;
        }

        let model = match result {
            Ok(items) => {
                debug!("预览响应 #{}: {} 条推荐", sequence, items.len());
                RenderModel::from_items(&items, &self.icons)
            }
            Err(e) => {
                warn!("⚠️ 预览请求 #{} 失败: {}", sequence, e);
                RenderModel::NoResults
            }
        };
        self.render(&mut state, model);
    }

    fn render(&self, state: &mut PreviewState, model: RenderModel) {
        self.view.show_preview(&model);
        state.display = model;
    }
}
