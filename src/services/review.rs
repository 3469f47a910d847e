//! # 리뷰 프롬프트 생성 서비스
//!
//! 완성된 에세이를 외부 AI 리뷰 서비스에 붙여넣을 수 있는
//! 텍스트 프롬프트로 포맷합니다.
//!
//! 순수 함수입니다 — I/O가 전혀 없고 문자열만 반환합니다.
//! 클립보드 복사와 새 탭 열기는 프론트엔드(표현 계층)의 일입니다.

use std::fmt::Write; // write! 매크로를 String에 쓰기 위한 트레이트

use crate::models::{CompletedEssay, SectionDefinition};

/// 리뷰 프롬프트를 붙여넣을 외부 리뷰 사이트 주소
///
/// 서버는 주소를 알려줄 뿐, 열지 않습니다. 열기 실패(팝업 차단 등)는
/// 사용자에게 알림으로 보여줄 일이지 세션 상태와는 무관합니다.
pub const REVIEW_URL: &str = "https://gemini.google.com/app";

/// 완성된 에세이를 리뷰 요청 프롬프트 텍스트로 변환합니다.
///
/// 주제와 각 섹션을 **카탈로그 순서대로** 나열하고
/// (빈 섹션은 "(No content)" 플레이스홀더),
/// 구조화된 비평을 요청하는 고정 안내문으로 감쌉니다.
pub fn build_review_prompt(essay: &CompletedEssay, catalog: &[SectionDefinition]) -> String {
    let mut body = format!("Topic: {}\n\n", essay.topic);

    for section in catalog {
        // .map(String::as_str): Option<&String> → Option<&str>
        // .filter(...): 빈 문자열도 "내용 없음"으로 취급
        let text = essay
            .sections
            .get(section.id)
            .map(String::as_str)
            .filter(|t| !t.trim().is_empty())
            .unwrap_or("(No content)");

        // write!는 String에 대해 실패하지 않지만 Result를 반환하므로
        // .ok()로 명시적으로 버립니다 (unwrap 없이).
        write!(body, "[{}]\n{}\n\n", section.title, text).ok();
    }

    format!(
        "You are an expert writing coach and editor. A student has just written a \
\"Minute Essay\" under strict time constraints (5 minutes total).

Here is their essay:
---
{body}---

Please provide a concise but helpful review.
1. Rate the flow and clarity (out of 10).
2. Identify 2 strong points (Pros).
3. Identify 2 areas for improvement (Cons/Constructive Feedback).
4. Give a brief overall comment on how well they defended the topic given the time limit.

Format the output in clear Markdown. Be encouraging but honest."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SECTIONS;
    use std::collections::BTreeMap;

    fn essay() -> CompletedEssay {
        let mut sections = BTreeMap::new();
        for def in SECTIONS {
            sections.insert(def.id.to_string(), String::new());
        }
        sections.insert("intro".to_string(), "My thesis here.".to_string());
        CompletedEssay {
            topic: "Test topic".to_string(),
            sections,
            total_time_seconds: 120,
        }
    }

    #[test]
    fn prompt_contains_topic_and_section_titles_in_order() {
        let prompt = build_review_prompt(&essay(), SECTIONS);
        assert!(prompt.contains("Topic: Test topic"));

        // 카탈로그 순서 확인: Introduction이 Conclusion보다 먼저
        let intro_pos = prompt.find("[Introduction]").unwrap();
        let conclusion_pos = prompt.find("[Conclusion]").unwrap();
        assert!(intro_pos < conclusion_pos);
    }

    #[test]
    fn empty_sections_get_placeholder() {
        let prompt = build_review_prompt(&essay(), SECTIONS);
        assert!(prompt.contains("My thesis here."));
        assert!(prompt.contains("(No content)"));
    }

    #[test]
    fn prompt_includes_fixed_instructions() {
        let prompt = build_review_prompt(&essay(), SECTIONS);
        assert!(prompt.contains("writing coach"));
        assert!(prompt.contains("out of 10"));
    }
}
