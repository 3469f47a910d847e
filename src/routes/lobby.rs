//! # 로비 API 라우트 핸들러
//!
//! 친구와 같은 주제로 대결하기 위한 초대 링크 생성과
//! "같이 시작" 시각 계산을 담당합니다.
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | POST | /api/v1/lobby/invite | `create_invite` | 주제를 숨긴 초대 링크 생성 |
//! | GET | /api/v1/lobby/sync | `get_sync_delay` | 다음 10초 경계까지 대기 시간 |
//!
//! ## 동기 시작 사용 흐름 (서버 없는 동기화)
//! ```text
//! 1. 통화하며 셋을 센 뒤 양쪽 모두 "Sync Start" 클릭
//! 2. 각 클라이언트가 GET /lobby/sync로 대기 시간을 받음
//! 3. wait_ms만큼 카운트다운 후 POST /session으로 시작
//! ```
//! 양쪽 시스템 시계가 맞다는 가정 위의 최선 노력일 뿐,
//! 합의 프로토콜이 아닙니다. 시계가 다르면 어긋납니다.

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::{
    error::AppError,
    models::CreateInviteRequest,
    routes::sessions::AppState,
    services::lobby,
};

/// `POST /lobby/invite` — 주제를 숨긴 초대 링크를 만듭니다.
///
/// 본문: `{ "topic": "..." }`. 공백뿐인 주제는 400.
/// 응답의 `invite_url`을 그대로 복사해 보내면 되고,
/// `challenge`는 세션 시작 요청에 넣을 수 있는 인코딩된 주제입니다.
pub async fn create_invite(
    State(state): State<AppState>,
    Json(req): Json<CreateInviteRequest>,
) -> Result<Json<Value>, AppError> {
    let topic = req.topic.trim();
    if topic.is_empty() {
        return Err(AppError::BadRequest(
            "invite topic must not be empty".to_string(),
        ));
    }

    Ok(Json(json!({
        "invite_url": lobby::build_invite_url(&state.config.public_url, topic),
        "challenge": lobby::encode_topic(topic),
    })))
}

/// `GET /lobby/sync` — 다음 10초 벽시계 경계까지의 대기 시간을 반환합니다.
///
/// 클라이언트는 `wait_ms`만큼 시작을 미루면 됩니다.
/// (서버가 요청을 잡아두고 기다리지 않는 이유: 최대 10초를 열어두는
/// HTTP 요청은 타임아웃과 엮여 오히려 동기화를 깨뜨립니다)
pub async fn get_sync_delay() -> Json<Value> {
    let now_ms = chrono::Utc::now().timestamp_millis();
    let wait_ms = lobby::ms_until_sync_start(now_ms);

    // 목표 시각을 ISO 8601로도 같이 내려줍니다 (화면 표시용)
    let starts_at = chrono::DateTime::<chrono::Utc>::from_timestamp_millis(now_ms + wait_ms)
        .map(|t| t.to_rfc3339_opts(chrono::SecondsFormat::Millis, true));

    Json(json!({
        "wait_ms": wait_ms,
        "starts_at": starts_at,
    }))
}
