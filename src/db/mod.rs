//! # 저장 계층 (Data Access Layer)
//!
//! 로컬 파일과 직접 상호작용하는 코드를 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)에서 이 모듈을 통해서만 영속화를 수행합니다.
//!
//! 각 하위 모듈:
//! - `history`: 완성된 에세이 히스토리의 JSON 파일 저장소

pub mod history;

// 하위 모듈의 공개 항목을 재공개(re-export)하여
// `crate::db::HistoryStore`처럼 바로 접근할 수 있게 합니다.
pub use history::*;
