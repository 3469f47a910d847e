//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//! Axum에서 핸들러는 HTTP 요청을 받아 응답을 반환하는 async 함수입니다.
//!
//! 각 하위 모듈:
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `sessions`: 세션 시작/텍스트 수정/섹션 이동/결과 조회 + AppState 정의
//! - `history`: 히스토리 조회와 전체 삭제
//! - `review`: 리뷰 프롬프트 생성
//! - `lobby`: 초대 링크와 동기 시작

pub mod health;
pub mod history;
pub mod lobby;
pub mod review;
pub mod sessions;

// 각 모듈의 핸들러 함수들을 재공개하여
// main.rs에서 `routes::start_session`처럼 바로 접근 가능하게 합니다.
pub use health::*;
pub use history::*;
pub use lobby::*;
pub use review::*;
pub use sessions::*;
