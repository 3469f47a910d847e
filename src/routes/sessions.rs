//! # 세션 API 라우트 핸들러
//!
//! 글쓰기 세션의 시작, 텍스트 수정, 섹션 이동, 상태 조회를 담당하는
//! HTTP 핸들러 함수들입니다. 실제 규칙은 상태 머신(services/session.rs)에
//! 있고, 여기서는 명령을 전달하고 관찰 가능한 상태를 JSON으로 빚어냅니다.
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/v1/catalog | `get_catalog` | 섹션 정의와 제한 시간 |
//! | GET | /api/v1/session | `get_session` | 현재 세션 상태 |
//! | POST | /api/v1/session | `start_session` | 새 세션 시작 (+타이머 기동) |
//! | PUT | /api/v1/session/text | `update_section_text` | 현재 섹션 텍스트 교체 |
//! | POST | /api/v1/session/advance | `advance_section` | 다음 섹션 또는 완료 |
//! | GET | /api/v1/session/result | `get_session_result` | 완료된 세션의 결과 통계 |
//!
//! ## 타이머 설계
//! 세션 시작이 성공하면 1초 주기의 tokio 태스크를 하나 띄웁니다.
//! 태스크는 자신이 태어난 epoch을 들고 tick을 배달하며,
//! 상태 머신이 Stale/Finished를 돌려주는 순간 스스로 종료합니다.
//! 재시작 이전에 예약된 tick이 새 세션에 닿는 일은 epoch 검사가 막습니다.

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, Json};
use rand::Rng; // .random_range() 메서드를 쓰기 위한 트레이트
use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::{
    config::Config,
    db::HistoryStore,
    error::AppError,
    models::{
        CompletedEssay, HistoryRecord, Phase, StartSessionRequest, UpdateTextRequest, SECTIONS,
        TOPICS,
    },
    services::{
        lobby,
        review::REVIEW_URL,
        scoring,
        session::{AdvanceOutcome, SessionMachine, TickOutcome},
    },
};

/// 모든 라우트 핸들러가 공유하는 애플리케이션 상태
///
/// Axum에서는 State를 통해 핸들러에 의존성을 주입합니다.
/// Arc(참조 카운트 스마트 포인터) 덕분에 clone해도 실제 데이터는
/// 복제되지 않고 같은 인스턴스를 가리킵니다.
#[derive(Clone)]
pub struct AppState {
    /// 세션 상태 머신 — Mutex 하나로 감싸 단일 변경 로그를 만듭니다.
    /// 모든 변경(명령, tick)이 이 락 아래에서 일어나므로 병렬 변경이 없습니다.
    pub session: Arc<Mutex<SessionMachine>>,
    /// 히스토리 저장소
    pub history: Arc<HistoryStore>,
    /// 애플리케이션 설정 (초대 링크 주소 등)
    pub config: Config,
}

/// `GET /catalog` — 섹션 카탈로그와 제한 시간을 반환합니다.
///
/// 프론트엔드가 화면을 그리는 데 필요한 불변 설정값입니다.
pub async fn get_catalog(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "sections": SECTIONS,
        "time_limit_seconds": state.config.time_limit_seconds,
    }))
}

/// `GET /session` — 현재 세션의 관찰 가능한 상태를 반환합니다.
///
/// 어느 단계에서든 호출할 수 있습니다 (Idle이면 대부분 null).
pub async fn get_session(State(state): State<AppState>) -> Json<Value> {
    let machine = state.session.lock().await;
    Json(session_view(&machine))
}

/// `POST /session` — 새 세션을 시작합니다.
///
/// 본문: `{ "topic": "...", "challenge": "..." }` (둘 다 선택)
///
/// ## 주제 결정 우선순위
/// 1. `challenge`: 초대 링크에서 온 인코딩된 주제 (디코딩 실패 시 400)
/// 2. `topic`: 직접 입력한 주제 (공백뿐이면 무시)
/// 3. 기본 주제 목록(TOPICS)에서 무작위 선택
///
/// 이미 글쓰기 중이면 409 — 진행 중인 세션을 덮어쓰지 않습니다.
pub async fn start_session(
    State(state): State<AppState>,
    Json(req): Json<StartSessionRequest>,
) -> Result<Json<Value>, AppError> {
    let topic = resolve_topic(&req)?;

    // 블록으로 감싸 락을 start() 호출 동안만 잡습니다
    let epoch = { state.session.lock().await.start(topic)? };

    // 시작이 성공했을 때만 타이머를 띄웁니다
    spawn_session_timer(state.clone(), epoch);

    let machine = state.session.lock().await;
    Ok(Json(session_view(&machine)))
}

/// `PUT /session/text` — 현재 섹션의 텍스트를 통째로 교체합니다.
///
/// 본문: `{ "text": "..." }`. 글쓰기 중이 아니면 409.
/// 응답에 수정 직후의 실시간 통계(단어/문장/남은 단어)를 담아
/// 프론트엔드가 별도 계산 없이 바로 표시할 수 있게 합니다.
pub async fn update_section_text(
    State(state): State<AppState>,
    Json(req): Json<UpdateTextRequest>,
) -> Result<Json<Value>, AppError> {
    let mut machine = state.session.lock().await;
    machine.update_text(req.text)?;
    Ok(Json(json!({ "stats": live_stats(&machine) })))
}

/// `POST /session/advance` — 현재 섹션을 커밋하고 앞으로 이동합니다.
///
/// 마지막 섹션이었다면 세션이 완료되고 히스토리에 기록됩니다.
/// 응답의 `completed` 필드로 어느 쪽인지 구분합니다.
pub async fn advance_section(
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    // advance 결과만 꺼내고 락을 곧바로 놓습니다.
    // 완료 경로의 히스토리 저장(await)을 락 밖에서 하기 위해서입니다.
    let outcome = { state.session.lock().await.advance()? };

    match outcome {
        AdvanceOutcome::Next { .. } => {
            let machine = state.session.lock().await;
            Ok(Json(json!({
                "completed": false,
                "session": session_view(&machine),
            })))
        }
        AdvanceOutcome::Finished(essay) => {
            // 정상 완료 경로 — 레코드는 여기서 정확히 한 번 만들어집니다
            let record = record_completion(&state.history, &essay).await;
            Ok(Json(json!({
                "completed": true,
                "result": result_view(&essay),
                "record_id": record.id,
            })))
        }
    }
}

/// `GET /session/result` — 완료된 세션의 결과 통계를 반환합니다.
///
/// 아직 완료되지 않았으면 409 (프론트엔드 상태 불일치).
pub async fn get_session_result(
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let machine = state.session.lock().await;
    let essay = machine.completed_essay().ok_or_else(|| {
        AppError::InvalidPhase("no completed session to show results for".to_string())
    })?;
    Ok(Json(result_view(essay)))
}

// ── 내부 헬퍼 ──

/// 시작 요청에서 실제 사용할 주제를 결정합니다.
///
/// 선택 정책은 상태 머신 바깥(여기)에 있습니다 —
/// 머신은 받은 문자열을 기록할 뿐입니다.
fn resolve_topic(req: &StartSessionRequest) -> Result<String, AppError> {
    // 초대 링크의 challenge가 있으면 최우선
    if let Some(challenge) = req.challenge.as_deref().filter(|c| !c.is_empty()) {
        return lobby::decode_topic(challenge);
    }

    // 직접 입력한 주제 — 공백뿐이면 없는 것으로 취급
    if let Some(topic) = req
        .topic
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        return Ok(topic.to_string());
    }

    // 무작위 기본 주제.
    // rand::rng()는 스레드 로컬 RNG라 await를 넘겨 보관할 수 없으므로
    // 이 동기 함수 안에서만 씁니다.
    let index = rand::rng().random_range(0..TOPICS.len());
    Ok(TOPICS[index].to_string())
}

/// 1초 주기 세션 타이머 태스크를 띄웁니다.
///
/// 태스크의 수명 = 이 epoch의 Writing 단계 수명.
/// Finished(자동 제출)나 Stale(완료/재시작됨)을 받으면 즉시 끝납니다.
fn spawn_session_timer(state: AppState, epoch: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        // interval의 첫 tick은 즉시 발화하므로 건너뜁니다 (0초가 아니라 1초 후부터)
        interval.tick().await;

        loop {
            interval.tick().await;

            // tick 처리와 락 점유를 최소 구간으로 한정합니다
            let outcome = { state.session.lock().await.tick(epoch) };
            match outcome {
                TickOutcome::Running { .. } => {}
                TickOutcome::Finished(essay) => {
                    // 자동 제출 경로 — 저장은 락 밖에서. 저장 실패는
                    // HistoryStore가 삼키므로 완료 전이를 막을 수 없습니다.
                    record_completion(&state.history, &essay).await;
                    break;
                }
                TickOutcome::Stale => break,
            }
        }
        tracing::debug!(epoch, "session timer stopped");
    });
}

/// 완성된 에세이로 히스토리 레코드를 만들어 저장합니다.
///
/// 수동 완료(advance)와 자동 제출(tick) 두 경로가 모두 이 함수를 거칩니다.
/// 상태 머신의 finalize가 멱등이므로 한 세션에서 두 번 불릴 수 없습니다.
pub(crate) async fn record_completion(
    history: &HistoryStore,
    essay: &CompletedEssay,
) -> HistoryRecord {
    let total_words = scoring::aggregate_word_count(&essay.sections);
    let record = HistoryRecord {
        id: uuid::Uuid::now_v7().to_string(),
        topic: essay.topic.clone(),
        sections: essay.sections.clone(),
        total_time_seconds: essay.total_time_seconds,
        // ISO 8601, 밀리초 포함 UTC (예: "2026-02-16T12:00:00.000Z")
        date: chrono::Utc::now()
            .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        wpm: scoring::words_per_minute(total_words, essay.total_time_seconds),
    };

    // append는 실패하지 않습니다 (저장 장애는 내부에서 로그 후 무시)
    history.append(record.clone()).await;
    record
}

/// 현재 세션 상태를 프론트엔드용 JSON으로 빚습니다.
fn session_view(machine: &SessionMachine) -> Value {
    let section = machine.current_section().map(|def| {
        json!({
            "index": machine.section_index(),
            "total": machine.catalog().len(),
            "id": def.id,
            "title": def.title,
            "description": def.description,
            "target_word_count": def.target_word_count,
        })
    });

    // Writing 중에만 실시간 통계가 의미 있습니다
    let stats = (machine.phase() == Phase::Writing).then(|| live_stats(machine));

    json!({
        "phase": machine.phase(),
        // Idle에서는 주제가 아직 없습니다
        "topic": (machine.phase() != Phase::Idle).then(|| machine.topic()),
        "elapsed_seconds": machine.elapsed_seconds(),
        "remaining_seconds": machine.remaining_seconds(),
        "time_limit_seconds": machine.time_limit_seconds(),
        "section": section,
        "stats": stats,
    })
}

/// 활성 섹션의 실시간 작성 통계
fn live_stats(machine: &SessionMachine) -> Value {
    let text = machine.current_text();
    let target = machine
        .current_section()
        .map(|def| def.target_word_count)
        .unwrap_or(0);
    json!({
        "word_count": scoring::count_words(text),
        "sentence_count": scoring::count_sentences(text),
        "words_remaining": scoring::words_remaining(target, text),
    })
}

/// 완료된 세션의 결과 통계 JSON
fn result_view(essay: &CompletedEssay) -> Value {
    let total_words = scoring::aggregate_word_count(&essay.sections);
    let total_sentences: usize = essay
        .sections
        .values()
        .map(|text| scoring::count_sentences(text))
        .sum();

    json!({
        "topic": essay.topic,
        "sections": essay.sections,
        "total_time_seconds": essay.total_time_seconds,
        "total_words": total_words,
        "total_sentences": total_sentences,
        "wpm": scoring::words_per_minute(total_words, essay.total_time_seconds),
        "review_url": REVIEW_URL,
    })
}
