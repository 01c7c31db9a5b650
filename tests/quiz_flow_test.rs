mod common;

use std::time::Duration;

use common::{harness, item, questions, ScriptedApi};
use serde_json::json;
use wild_drafter::error::{ApiError, SessionError};
use wild_drafter::models::{AnswerSet, OverridePayload, Question};
use wild_drafter::services::RenderModel;
use wild_drafter::workflow::AnswerOutcome;
use wild_drafter::SessionState;

/// 足够长，保证最终评分请求之前预览不会触发
const LONG_DEBOUNCE: Duration = Duration::from_secs(60);

fn two_questions() -> Vec<Question> {
    vec![Question::new("q1", "Tank?"), Question::new("q2", "Ranged?")]
}

#[tokio::test(start_paused = true)]
async fn test_two_question_scenario() {
    let mut h = harness(ScriptedApi::default(), LONG_DEBOUNCE);
    h.session.load(two_questions()).unwrap();

    assert_eq!(h.session.answer(true).await, AnswerOutcome::Next);
    assert_eq!(h.session.answer(false).await, AnswerOutcome::Completed);

    let expected: AnswerSet = [("q1", true), ("q2", false)].into_iter().collect();
    assert_eq!(h.session.answers(), &expected);

    let requests = h.api.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].answers, expected);
    assert_eq!(requests[0].max_results, 6);
    assert_eq!(requests[0].payload, None);

    // 空列表是合法的"无结果"状态
    assert_eq!(h.session.state(), SessionState::Done);
    assert_eq!(h.view.last_results(), Some(RenderModel::NoResults));
}

#[tokio::test(start_paused = true)]
async fn test_n_answers_reach_done_regardless_of_values() {
    for n in 1..=6 {
        let mut h = harness(ScriptedApi::default(), LONG_DEBOUNCE);
        h.session.load(questions(n)).unwrap();

        for i in 0..n {
            assert_eq!(h.session.state(), SessionState::Asking);
            h.session.answer(i % 3 == 0).await;
        }

        assert_eq!(h.session.state(), SessionState::Done, "n = {}", n);
        assert_eq!(h.session.answers().len(), n);
        assert_eq!(h.session.index(), n);
        assert_eq!(h.api.requests().len(), 1);
    }
}

#[tokio::test(start_paused = true)]
async fn test_final_request_is_issued_while_finalizing() {
    let mut h = harness(ScriptedApi::default(), LONG_DEBOUNCE);
    h.session.load(questions(1)).unwrap();
    h.api.watch_session(&h.session);

    h.session.answer(true).await;

    assert_eq!(
        *h.api.observed_states.lock().unwrap(),
        vec![SessionState::Finalizing]
    );
    assert_eq!(h.session.state(), SessionState::Done);
}

#[tokio::test(start_paused = true)]
async fn test_results_keep_service_order_and_sort_reasons() {
    let api = ScriptedApi::default();
    api.push_response(Ok(vec![
        item("Zac", 2.0, &[("Engage", 1)]),
        item("Sejuani", 5.0, &[("Frontline", 1), ("Synergie melee", 2)]),
    ]));
    let mut h = harness(api, LONG_DEBOUNCE);
    h.session.load(two_questions()).unwrap();

    h.session.answer(true).await;
    h.session.answer(true).await;

    assert_eq!(h.session.results().len(), 2);
    let model = h.view.last_results().unwrap();
    let cards = model.cards();
    assert_eq!(cards[0].champion, "Zac");
    assert_eq!(cards[1].champion, "Sejuani");
    assert_eq!(cards[1].reasons[0].label, "Synergie melee");
    assert_eq!(cards[1].reasons[1].label, "Frontline");
}

#[tokio::test(start_paused = true)]
async fn test_final_failure_degrades_to_empty_results() {
    let api = ScriptedApi::default();
    api.push_response(Err(ApiError::BadStatus {
        endpoint: "recommend".to_string(),
        status: 503,
    }));
    let mut h = harness(api, LONG_DEBOUNCE);
    h.session.load(questions(1)).unwrap();

    assert_eq!(h.session.answer(false).await, AnswerOutcome::Completed);
    assert_eq!(h.session.state(), SessionState::Done);
    assert!(h.session.results().is_empty());
    assert_eq!(h.view.last_results(), Some(RenderModel::NoResults));
    // 不重试
    assert_eq!(h.api.requests().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_reset_from_done() {
    let api = ScriptedApi::default();
    api.push_response(Ok(vec![item("Vi", 3.0, &[])]));
    let mut h = harness(api, LONG_DEBOUNCE);
    h.session.load(two_questions()).unwrap();
    h.session.answer(true).await;
    h.session.answer(true).await;
    assert_eq!(h.session.state(), SessionState::Done);

    h.session.reset();

    assert_eq!(h.session.state(), SessionState::Asking);
    assert_eq!(h.session.index(), 0);
    assert!(h.session.answers().is_empty());
    assert!(h.session.results().is_empty());
    assert!(h.session.preview().display().is_placeholder());
    assert_eq!(h.view.last_preview(), Some(RenderModel::Placeholder));
    assert_eq!(h.session.current_question().unwrap().key, "q1");
}

#[tokio::test(start_paused = true)]
async fn test_reset_mid_quiz_cancels_scheduled_preview() {
    let mut h = harness(ScriptedApi::default(), Duration::from_millis(120));
    h.session.load(questions(3)).unwrap();

    h.session.answer(true).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    h.session.reset();
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert!(h.api.requests().is_empty());
    assert!(h.session.preview().display().is_placeholder());
}

#[tokio::test(start_paused = true)]
async fn test_live_preview_follows_answers() {
    let api = ScriptedApi::default();
    api.push_response(Ok(vec![item("Jarvan IV", 2.0, &[])]));
    let mut h = harness(api, Duration::from_millis(120));
    h.session.load(questions(3)).unwrap();

    h.session.answer(true).await;
    h.session.answer(false).await;
    tokio::time::sleep(Duration::from_millis(200)).await;

    // 两次作答在同一窗口内，只发出一次，带第二次的答案
    let requests = h.api.requests();
    assert_eq!(requests.len(), 1);
    let expected: AnswerSet = [("q1", true), ("q2", false)].into_iter().collect();
    assert_eq!(requests[0].answers, expected);

    let preview = h.view.last_preview().unwrap();
    assert_eq!(preview.cards()[0].champion, "Jarvan IV");
    assert!(preview.cards()[0].icon_url.ends_with("/JarvanIV.png"));
}

#[tokio::test(start_paused = true)]
async fn test_resync_preview_is_immediate() {
    let mut h = harness(ScriptedApi::default(), LONG_DEBOUNCE);
    h.session.load(questions(3)).unwrap();
    h.session.answer(true).await;

    h.session.resync_preview();
    tokio::time::sleep(Duration::from_millis(1)).await;

    assert_eq!(h.api.requests().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_change_max_results_refetches_when_done() {
    let mut h = harness(ScriptedApi::default(), LONG_DEBOUNCE);
    h.session.load(questions(1)).unwrap();
    h.session.answer(true).await;

    h.session.change_max_results(10).await;

    let requests = h.api.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].max_results, 10);
    assert_eq!(h.session.state(), SessionState::Done);
}

#[tokio::test(start_paused = true)]
async fn test_change_max_results_while_asking_only_updates_limit() {
    let mut h = harness(ScriptedApi::default(), LONG_DEBOUNCE);
    h.session.load(questions(2)).unwrap();

    h.session.change_max_results(3).await;
    assert!(h.api.requests().is_empty());

    h.session.answer(true).await;
    h.session.answer(true).await;
    assert_eq!(h.api.requests()[0].max_results, 3);
}

#[tokio::test(start_paused = true)]
async fn test_override_payload_is_merged_into_final_request() {
    let mut h = harness(ScriptedApi::default(), LONG_DEBOUNCE);
    let overrides: OverridePayload =
        serde_json::from_value(json!({"Skarner": {"frontline": true, "lock_target": true}}))
            .unwrap();
    h.overrides.save(&overrides).unwrap();

    h.session.load(questions(1)).unwrap();
    h.session.answer(true).await;

    assert_eq!(h.api.requests()[0].payload, Some(overrides));
}

#[tokio::test(start_paused = true)]
async fn test_load_from_service() {
    let api = ScriptedApi::with_questions(two_questions());
    let mut h = harness(api, LONG_DEBOUNCE);

    assert_eq!(h.session.load_from_service().await.unwrap(), 2);
    assert_eq!(h.session.state(), SessionState::Asking);
    assert_eq!(h.session.current_question().unwrap().text, "Tank?");
}

#[tokio::test(start_paused = true)]
async fn test_load_from_service_failure_halts_start() {
    let api = ScriptedApi::default();
    *api.questions.lock().unwrap() = Some(Err(ApiError::BadStatus {
        endpoint: "questions".to_string(),
        status: 500,
    }));
    let mut h = harness(api, LONG_DEBOUNCE);

    let err = h.session.load_from_service().await.unwrap_err();
    assert!(matches!(err, SessionError::QuestionFetch(_)));
    assert_eq!(h.session.state(), SessionState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_load_from_service_empty_list() {
    let mut h = harness(ScriptedApi::with_questions(Vec::new()), LONG_DEBOUNCE);

    let err = h.session.load_from_service().await.unwrap_err();
    assert!(matches!(err, SessionError::EmptyQuestionList));
    assert_eq!(h.session.state(), SessionState::Idle);
}
