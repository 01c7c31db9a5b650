//! 集成测试公共工具：内存评分服务和记录型视图

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use wild_drafter::clients::ProposalReceipt;
use wild_drafter::config::Config;
use wild_drafter::error::ApiError;
use wild_drafter::models::{OverridePayload, Question, Reason, RecommendationItem, ScoringRequest};
use wild_drafter::services::{
    IconResolver, LivePreviewController, MemoryKeyValueStore, OverrideStore, RenderModel,
    ResultView,
};
use wild_drafter::{QuizSession, ScoringApi, SessionState};

/// 按队列返回结果的评分服务，队列空时返回空列表
#[derive(Default)]
pub struct ScriptedApi {
    pub questions: Mutex<Option<Result<Vec<Question>, ApiError>>>,
    pub responses: Mutex<VecDeque<Result<Vec<RecommendationItem>, ApiError>>>,
    pub requests: Mutex<Vec<ScoringRequest>>,
    /// 收到评分请求时会话所处的状态
    pub observed_states: Mutex<Vec<SessionState>>,
    pub state_rx: Mutex<Option<watch::Receiver<SessionState>>>,
    pub proposals: Mutex<Vec<OverridePayload>>,
    /// 官方英雄数据，为 None 时拉取失败
    pub champions: Mutex<Option<OverridePayload>>,
}

impl ScriptedApi {
    pub fn with_questions(questions: Vec<Question>) -> Self {
        let api = Self::default();
        *api.questions.lock().unwrap() = Some(Ok(questions));
        api
    }

    pub fn with_champions(champions: OverridePayload) -> Self {
        let api = Self::default();
        *api.champions.lock().unwrap() = Some(champions);
        api
    }

    pub fn push_response(&self, response: Result<Vec<RecommendationItem>, ApiError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn requests(&self) -> Vec<ScoringRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn watch_session(&self, session: &QuizSession) {
        *self.state_rx.lock().unwrap() = Some(session.subscribe());
    }
}

#[async_trait]
impl ScoringApi for ScriptedApi {
    async fn fetch_questions(&self) -> Result<Vec<Question>, ApiError> {
        self.questions
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn recommend(
        &self,
        request: &ScoringRequest,
    ) -> Result<Vec<RecommendationItem>, ApiError> {
        if let Some(rx) = self.state_rx.lock().unwrap().as_ref() {
            self.observed_states.lock().unwrap().push(*rx.borrow());
        }
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn fetch_champions(&self) -> Result<OverridePayload, ApiError> {
        self.champions
            .lock()
            .unwrap()
            .clone()
            .ok_or(ApiError::BadStatus {
                endpoint: "api/champions".to_string(),
                status: 500,
            })
    }

    async fn submit_proposal(
        &self,
        payload: &OverridePayload,
    ) -> Result<ProposalReceipt, ApiError> {
        self.proposals.lock().unwrap().push(payload.clone());
        Ok(ProposalReceipt {
            status: "received".to_string(),
            proposal: Some(format!("champions_{}.json", payload.len())),
            message: None,
        })
    }
}

/// 记录收到的渲染模型
#[derive(Default)]
pub struct RecordingView {
    pub previews: Mutex<Vec<RenderModel>>,
    pub results: Mutex<Vec<RenderModel>>,
}

impl RecordingView {
    pub fn last_preview(&self) -> Option<RenderModel> {
        self.previews.lock().unwrap().last().cloned()
    }

    pub fn last_results(&self) -> Option<RenderModel> {
        self.results.lock().unwrap().last().cloned()
    }
}

impl ResultView for RecordingView {
    fn show_preview(&self, model: &RenderModel) {
        self.previews.lock().unwrap().push(model.clone());
    }

    fn show_results(&self, model: &RenderModel) {
        self.results.lock().unwrap().push(model.clone());
    }
}

pub struct Harness {
    pub api: Arc<ScriptedApi>,
    pub view: Arc<RecordingView>,
    pub overrides: Arc<OverrideStore>,
    pub session: QuizSession,
}

/// 组装会话，`debounce` 为实时预览的静默窗口
pub fn harness(api: ScriptedApi, debounce: Duration) -> Harness {
    let config = Config::default();
    let api = Arc::new(api);
    let view = Arc::new(RecordingView::default());
    let overrides = Arc::new(OverrideStore::new(MemoryKeyValueStore::new()));
    let icons = IconResolver::new(&config);

    let preview = LivePreviewController::new(
        api.clone(),
        overrides.clone(),
        view.clone(),
        icons.clone(),
        debounce,
        config.max_results,
    );
    let session = QuizSession::new(
        api.clone(),
        preview,
        overrides.clone(),
        view.clone(),
        icons,
        config.max_results,
    );

    Harness {
        api,
        view,
        overrides,
        session,
    }
}

pub fn questions(n: usize) -> Vec<Question> {
    (1..=n)
        .map(|i| Question::new(format!("q{}", i), format!("Question {}?", i)))
        .collect()
}

pub fn item(champion: &str, score: f64, reasons: &[(&str, i64)]) -> RecommendationItem {
    RecommendationItem {
        champion: champion.to_string(),
        score,
        icon: String::new(),
        reasons: reasons
            .iter()
            .map(|(label, weight)| Reason {
                label: label.to_string(),
                weight: *weight,
                key: None,
            })
            .collect(),
        tags: Vec::new(),
    }
}
