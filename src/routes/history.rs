//! # 히스토리 API 라우트 핸들러
//!
//! 완성된 에세이 히스토리의 조회와 전체 삭제를 담당합니다.
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/v1/history | `list_history` | 전체 히스토리 (최신순) |
//! | DELETE | /api/v1/history | `clear_history` | 전체 삭제 |
//!
//! 개별 레코드 삭제는 의도적으로 없습니다 — 전체 비우기만 지원합니다.

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::routes::sessions::AppState;

/// `GET /history` — 저장된 에세이 레코드 전체를 최신순으로 반환합니다.
///
/// 저장 파일이 없거나 손상됐더라도 실패하지 않습니다 —
/// 그 경우 저장소가 빈 목록으로 동작합니다 (db/history.rs 참고).
pub async fn list_history(State(state): State<AppState>) -> Json<Value> {
    let records = state.history.load_all().await;
    Json(json!({ "records": records }))
}

/// `DELETE /history` — 모든 레코드를 무조건 삭제합니다.
///
/// 진행 중인 세션에는 영향을 주지 않습니다 — 히스토리는 완료된
/// 세션의 기록일 뿐, 세션 상태와는 독립입니다.
pub async fn clear_history(State(state): State<AppState>) -> Json<Value> {
    state.history.clear().await;
    Json(json!({ "cleared": true }))
}
