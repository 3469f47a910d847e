//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! 각 하위 모듈은 특정 도메인의 데이터 타입을 담당합니다:
//! - `section`: 섹션 카탈로그(불변 설정)와 기본 주제 목록
//! - `essay`: 세션 단계, 완성된 에세이, 히스토리 레코드, 요청 DTO
//!
//! `pub use X::*;`는 하위 모듈의 모든 공개 항목을
//! 이 모듈에서 바로 접근할 수 있게 재공개(re-export)합니다.
//! 예: `crate::models::essay::HistoryRecord` 대신 `crate::models::HistoryRecord`로 접근 가능

// pub mod: 하위 모듈을 공개(public)로 선언합니다.
pub mod essay;
pub mod section;

// pub use: 하위 모듈의 항목을 현재 모듈에서 재공개합니다.
// `*`(glob)는 모든 공개 항목을 의미합니다.
pub use essay::*;
pub use section::*;
