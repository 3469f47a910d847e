//! # 에세이 세션 모델 정의
//!
//! 세션 단계(phase), 완성된 에세이, 히스토리 레코드와
//! API 요청/응답 본문(DTO) 구조체들을 정의합니다.
//!
//! ## 세션 흐름
//! 1. `StartSessionRequest`로 세션 시작 (Idle/Completed → Writing)
//! 2. `UpdateTextRequest`로 현재 섹션 텍스트를 계속 교체
//! 3. 섹션 이동을 반복하다 마지막 섹션에서 이동하거나 제한 시간에 도달하면
//!    `CompletedEssay`가 만들어지고, 통계를 붙인 `HistoryRecord`가 저장됩니다.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 세션의 현재 단계
///
/// Idle(대기) → Writing(작성 중) → Completed(완료)로만 흐릅니다.
/// Completed에서 다시 시작하면 Writing으로 재진입하며 이전 초안은 버려집니다.
//
// serde(rename_all = "lowercase"): JSON에서는 "idle"/"writing"/"completed"로 표현
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Writing,
    Completed,
}

/// 완성된 에세이 — 세션이 Completed로 전이되는 순간 한 번만 만들어지는 불변 값
///
/// `sections` 맵의 키 집합은 **항상 카탈로그의 섹션 id 집합과 정확히 일치**합니다.
/// (작성하지 않은 섹션도 빈 문자열로 포함 — 누락 키가 구조적으로 불가능하도록
/// 상태 머신이 고정 크기 슬롯에서 맵을 만들어 냅니다)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedEssay {
    /// 이 세션의 에세이 주제
    pub topic: String,
    /// 섹션 id → 작성한 텍스트. BTreeMap: 키 순서가 안정적인 정렬 맵
    pub sections: BTreeMap<String, String>,
    /// 실제 소요 시간 (초). 자동 제출 시에는 제한 시간으로 클램프됩니다.
    pub total_time_seconds: u32,
}

/// 히스토리 레코드 — 완성된 에세이에 통계를 붙여 저장하는 단위
///
/// 세션 하나가 Completed에 도달할 때 **정확히 하나** 만들어지며,
/// 이후 절대 수정되지 않습니다. 개별 삭제는 없고 전체 비우기만 있습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// 레코드 고유 식별자 (UUIDv7 — 생성 순서대로 정렬 가능)
    pub id: String,
    /// 에세이 주제
    pub topic: String,
    /// 섹션 id → 텍스트 (CompletedEssay와 동일한 불변식)
    pub sections: BTreeMap<String, String>,
    /// 소요 시간 (초)
    pub total_time_seconds: u32,
    /// 완료 시각 (ISO 8601 형식: "2026-02-16T12:00:00.000Z")
    pub date: String,
    /// 분당 단어 수 (words per minute) — 완료 시점에 한 번 계산
    pub wpm: u32,
}

// ── 요청(Request) DTO ──

/// 세션 시작 요청 — `POST /api/v1/session`의 요청 본문에 해당합니다.
///
/// 주제 결정 우선순위: challenge(초대 링크) > topic(직접 입력) > 무작위 기본 주제.
/// 이 선택 정책은 상태 머신 바깥(라우트 계층)에 있습니다 —
/// 상태 머신은 받은 주제 문자열을 기록할 뿐입니다.
#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    /// 직접 입력한 주제 (선택 — 없거나 공백뿐이면 무시)
    pub topic: Option<String>,
    /// 초대 링크에서 온 인코딩된 주제 (선택 — 있으면 topic보다 우선)
    pub challenge: Option<String>,
}

/// 현재 섹션 텍스트 교체 요청 — `PUT /api/v1/session/text`의 요청 본문
#[derive(Debug, Deserialize)]
pub struct UpdateTextRequest {
    /// 현재 섹션의 전체 텍스트 (증분이 아니라 통째로 교체)
    pub text: String,
}

/// 초대 링크 생성 요청 — `POST /api/v1/lobby/invite`의 요청 본문
#[derive(Debug, Deserialize)]
pub struct CreateInviteRequest {
    /// 상대에게 숨겨서 보낼 주제
    pub topic: String,
}
