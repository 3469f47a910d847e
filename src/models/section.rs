//! # 섹션 카탈로그 모델 정의
//!
//! 에세이를 구성하는 섹션(도입-본론1·2·3-결론)의 정적 정의와
//! 주제 미입력 시 사용할 기본 주제 목록을 담습니다.
//!
//! 카탈로그는 프로세스 시작 시 상수로 고정되며 절대 변경되지 않습니다.
//! 배열의 **순서가 곧 작성 순서**입니다 — 세션 상태 머신의
//! `section_index`는 이 배열의 인덱스입니다.

use serde::Serialize;

/// 에세이 섹션 하나의 정의 (불변 설정값)
///
/// &'static str: 프로그램 전체 수명 동안 유효한 문자열 참조.
/// 상수 테이블에 들어가므로 String(힙 할당)이 아니라 &'static str을 씁니다.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SectionDefinition {
    /// 섹션 고유 식별자 — CompletedEssay의 sections 맵 키로 쓰입니다
    pub id: &'static str,
    /// 화면에 표시할 섹션 제목
    pub title: &'static str,
    /// 이 섹션에서 무엇을 써야 하는지 안내하는 문구
    pub description: &'static str,
    /// 권장 단어 수 — 강제가 아니라 목표치입니다
    pub target_word_count: u32,
}

/// 에세이 섹션 카탈로그 (작성 순서대로)
///
/// 5분 동안 5개 섹션을 씁니다: 도입(50) → 논점 3개(각 60) → 결론(50).
pub const SECTIONS: &[SectionDefinition] = &[
    SectionDefinition {
        id: "intro",
        title: "Introduction",
        description: "Hook the reader and state your thesis clearly.",
        target_word_count: 50,
    },
    SectionDefinition {
        id: "point1",
        title: "Key Point 1",
        description: "First supporting argument with evidence.",
        target_word_count: 60,
    },
    SectionDefinition {
        id: "point2",
        title: "Key Point 2",
        description: "Second supporting argument or counter-point.",
        target_word_count: 60,
    },
    SectionDefinition {
        id: "point3",
        title: "Key Point 3",
        description: "Third supporting argument or practical application.",
        target_word_count: 60,
    },
    SectionDefinition {
        id: "conclusion",
        title: "Conclusion",
        description: "Summarize main points and provide a final thought.",
        target_word_count: 50,
    },
];

/// 주제를 입력하지 않고 시작했을 때 무작위로 뽑는 기본 주제 목록
pub const TOPICS: &[&str] = &[
    "Does social media do more harm than good?",
    "Should remote work be the standard for all office jobs?",
    "Is artificial intelligence a threat to human creativity?",
    "Should higher education be free for everyone?",
    "The importance of failure in personal growth.",
    "Should space exploration be privatized?",
    "Is a universal basic income feasible?",
    "The impact of fast fashion on the environment.",
    "Should voting be mandatory?",
    "The future of public transportation in mega-cities.",
];
