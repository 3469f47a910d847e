//! # 서비스(도메인 로직) 모듈
//!
//! HTTP와 무관한 순수 도메인 로직을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)는 얇게 유지하고, 실제 규칙은 여기에 둡니다.
//!
//! 각 하위 모듈:
//! - `scoring`: 단어/문장/WPM 계산 (순수 함수)
//! - `session`: 세션 상태 머신 — 이 앱의 핵심
//! - `review`: 완성된 에세이 → 외부 리뷰용 프롬프트 텍스트
//! - `lobby`: 초대 링크 인코딩과 동기 시작 시간 계산

pub mod lobby;
pub mod review;
pub mod scoring;
pub mod session;
