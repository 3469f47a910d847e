//! # 리뷰 프롬프트 API 라우트 핸들러
//!
//! 완성된 에세이를 외부 AI 리뷰 서비스에 붙여넣을 프롬프트 텍스트로
//! 만들어 반환합니다. 서버는 텍스트를 만들 뿐이고,
//! 클립보드 복사와 리뷰 사이트 열기는 프론트엔드의 일입니다
//! (실패해도 알림 수준 — 세션 상태에는 영향 없음).
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/v1/session/review-prompt | `session_review_prompt` | 방금 완료한 세션의 프롬프트 |
//! | GET | /api/v1/history/{id}/review-prompt | `record_review_prompt` | 저장된 레코드의 프롬프트 |

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::AppError,
    models::{CompletedEssay, SECTIONS},
    routes::sessions::AppState,
    services::review::{build_review_prompt, REVIEW_URL},
};

/// `GET /session/review-prompt` — 방금 완료한 세션의 리뷰 프롬프트
///
/// 세션이 Completed가 아니면 409 — 아직 리뷰할 에세이가 없습니다.
pub async fn session_review_prompt(
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let machine = state.session.lock().await;
    let essay = machine.completed_essay().ok_or_else(|| {
        AppError::InvalidPhase("no completed session to review".to_string())
    })?;

    Ok(Json(prompt_response(essay)))
}

/// `GET /history/{id}/review-prompt` — 저장된 레코드의 리뷰 프롬프트
///
/// 해당 ID의 레코드가 없으면 404.
pub async fn record_review_prompt(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    // 레코드를 찾아 CompletedEssay 형태로 되돌립니다
    // (레코드 = 에세이 + 통계이므로 에세이 부분만 떼어내면 됩니다)
    let record = state
        .history
        .load_all()
        .await
        .into_iter()
        .find(|r| r.id == id)
        .ok_or(AppError::NotFound)?;

    let essay = CompletedEssay {
        topic: record.topic,
        sections: record.sections,
        total_time_seconds: record.total_time_seconds,
    };

    Ok(Json(prompt_response(&essay)))
}

/// 프롬프트 텍스트와 리뷰 사이트 주소를 담은 공통 응답
fn prompt_response(essay: &CompletedEssay) -> Value {
    json!({
        "prompt": build_review_prompt(essay, SECTIONS),
        "review_url": REVIEW_URL,
    })
}
