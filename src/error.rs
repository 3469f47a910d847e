//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//! Rust에서는 예외(exception) 대신 `Result<T, E>` 타입으로 에러를 처리합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 HTTP 응답으로 자동 변환
//!
//! ## 이 앱의 에러 분류
//! - **상태 불일치(Conflict)**: 잘못된 단계(phase)에서 명령이 들어온 경우.
//!   프론트엔드와 서버 상태가 어긋났다는 뜻이므로 조용히 무시하지 않고
//!   409로 크게 실패시킵니다.
//! - **저장 장애**: 히스토리 파일 쓰기/읽기 실패는 이 타입으로 **오지 않습니다**.
//!   저장소 내부에서 로그만 남기고 삼키는 것이 계약입니다 (db/history.rs 참고).

use axum::{
    http::StatusCode,                     // HTTP 상태 코드 (200, 404, 500 등)
    response::{IntoResponse, Response},   // Axum의 응답 변환 트레이트
    Json,                                 // JSON 응답 래퍼
};
use serde_json::json; // json! 매크로: JSON 객체를 간편하게 생성
use thiserror::Error; // thiserror: 커스텀 에러 타입을 쉽게 만들어주는 매크로 크레이트

// #[derive(Debug, Error)]: 두 가지 derive 매크로를 적용합니다.
// - Debug: 디버깅용 출력 ({:?})
// - Error (thiserror): std::error::Error 트레이트를 자동 구현.
//   #[error("...")] 어트리뷰트로 Display 트레이트(사람이 읽을 에러 메시지)도 자동 생성합니다.

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 각 에러 variant는 적절한 HTTP 상태 코드와 메시지로 변환됩니다.
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 리소스를 찾을 수 없음 (HTTP 404)
    /// 예: 존재하지 않는 히스토리 레코드 ID로 리뷰 프롬프트 요청
    #[error("Resource not found")]
    NotFound,

    /// 잘못된 요청 (HTTP 400)
    /// String을 포함하여 구체적인 에러 메시지를 전달합니다.
    /// {0}은 첫 번째 필드(String)를 참조하는 포맷 문법입니다.
    /// 예: 디코딩할 수 없는 challenge 파라미터
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 세션 단계(phase) 불일치 (HTTP 409)
    ///
    /// 글쓰기 중이 아닌데 텍스트 수정/섹션 이동 명령이 오거나,
    /// 이미 글쓰기 중인데 새 세션 시작 요청이 온 경우입니다.
    /// 올바르게 연동된 프론트엔드에서는 발생하지 않아야 하는
    /// 프로그래밍 오류이므로, 조용한 no-op 대신 크게 실패시킵니다.
    #[error("Invalid session phase: {0}")]
    InvalidPhase(String),

    /// 파일 입출력 오류 (HTTP 500)
    /// #[from]: std::io::Error → AppError::Io 자동 변환.
    /// `?` 연산자를 쓰면 io::Error가 자동으로 이 variant로 감싸집니다.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// impl IntoResponse for AppError:
// Axum의 IntoResponse 트레이트를 AppError에 구현합니다.
// 이를 통해 핸들러가 Err(AppError)를 반환하면,
// Axum이 자동으로 이 메서드를 호출하여 적절한 HTTP 응답을 생성합니다.
impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 각 에러 종류에 따라 적절한 HTTP 상태 코드와 JSON 에러 메시지를 생성합니다.
    /// 내부 에러(IO)는 실제 에러 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다 (보안을 위해).
    fn into_response(self) -> Response {
        // match: 패턴 매칭. enum의 각 variant에 대해 다른 처리를 합니다.
        // 모든 variant를 빠짐없이 처리해야 합니다 (exhaustive).
        // (status, code, message) 튜플을 반환합니다.
        let (status, code, message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found", self.to_string()),

            // ref: 패턴 매칭에서 값을 이동(move)하지 않고 참조만 빌려옵니다.
            AppError::BadRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", msg.clone())
            }

            // 상태 불일치는 클라이언트가 자기 상태를 다시 동기화해야 한다는 신호이므로
            // 메시지를 그대로 전달합니다 (내부 구현 노출이 아님).
            AppError::InvalidPhase(ref msg) => {
                tracing::warn!("Phase desync: {}", msg);
                (StatusCode::CONFLICT, "invalid_phase", msg.clone())
            }

            AppError::Io(ref e) => {
                // 내부 에러는 로그에 기록 (서버 관리자용)
                tracing::error!("IO error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "io_error",
                    // 클라이언트에는 일반적인 메시지만 반환 (보안: 내부 구현 노출 방지)
                    "An IO error occurred".to_string(),
                )
            }
        };

        // (StatusCode, Json<Value>) 튜플은 Axum이 자동으로 HTTP 응답으로 변환합니다.
        (
            status,
            Json(json!({
                "error": {
                    "code": code,
                    "message": message,
                }
            })),
        )
            .into_response()
    }
}
