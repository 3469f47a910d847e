//! # 세션 상태 머신 (이 앱의 핵심)
//!
//! 제한 시간이 있는 멀티 섹션 글쓰기 세션의 단계 전이를 관리합니다.
//!
//! ## 상태 전이도
//! ```text
//! Idle ──start()──▶ Writing ──advance()×N or 제한시간 도달──▶ Completed
//!                      ▲                                          │
//!                      └───────────── start() (재시작) ◀──────────┘
//! ```
//!
//! ## 설계 원칙
//! - **tick이 유일한 시간 권위**: 경과 시간 증가와 제한 시간 검사를
//!   하나의 전이 안에서 수행합니다. 카운터 갱신과 타임아웃 감시를
//!   분리하면 평가 순서에 따라 동작이 달라지는 경쟁이 생기기 때문입니다.
//! - **타이머 식별자(epoch)**: start()마다 epoch이 증가하고, tick은
//!   자신이 태어난 epoch을 들고 옵니다. 재시작 이전에 예약된 tick이
//!   새 세션에 배달되는 일이 구조적으로 불가능합니다.
//! - **고정 크기 섹션 슬롯**: 섹션 텍스트를 열린 맵이 아니라 카탈로그와
//!   길이가 같은 Vec에 보관합니다. "모든 섹션 키가 존재한다"는 불변식이
//!   자료구조 수준에서 보장됩니다.
//! - **finalize는 멱등**: 자동 제출 경로와 수동 완료 경로가 같은 finalize를
//!   호출하며, 이미 Completed면 아무것도 바꾸지 않고 기존 결과를 돌려줍니다.
//!   → 히스토리 레코드가 중복 생성될 수 없습니다.
//!
//! ## 알려진 경쟁 (설계상 허용)
//! 타임아웃이 발화하는 바로 그 순간에 입력된 마지막 타자는 이벤트 도착
//! 순서에 따라 유실될 수 있습니다. finalize가 락 아래에서 가장 최근에
//! 커밋된 텍스트를 읽으므로 창은 최소화되지만, 0-유실은 보장하지 않습니다.

use std::collections::BTreeMap;

use crate::error::AppError;
use crate::models::{CompletedEssay, Phase, SectionDefinition};

/// advance()의 결과 — 다음 섹션으로 갔는지, 세션이 끝났는지
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// 다음 섹션으로 이동했습니다 (새 활성 섹션의 인덱스)
    Next { section_index: usize },
    /// 마지막 섹션이었으므로 세션이 완료되었습니다 (정상 완료 경로)
    Finished(CompletedEssay),
}

/// tick()의 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// 글쓰기 계속 진행 중 (증가된 경과 시간)
    Running { elapsed_seconds: u32 },
    /// 제한 시간에 도달하여 자동 제출되었습니다 (강제 완료 경로)
    Finished(CompletedEssay),
    /// 낡은 tick — epoch이 다르거나 이미 Writing이 아닙니다.
    /// tick은 자율적으로 도착하는 이벤트이므로 에러가 아니라 무시 대상입니다.
    /// (이 값을 받은 타이머 태스크는 스스로 종료해야 합니다)
    Stale,
}

/// 세션 상태 머신
///
/// 초안(draft)의 유일한 소유자입니다. 모든 변경은 이 타입의 메서드를
/// 통해서만 일어나며, 호출자는 이를 `Mutex` 하나로 감싸 단일 변경 로그를
/// 만듭니다 (병렬 변경 없음).
pub struct SessionMachine {
    /// 섹션 카탈로그 (불변, 순서 = 작성 순서)
    catalog: &'static [SectionDefinition],
    /// 전체 제한 시간 (초)
    time_limit_seconds: u32,

    phase: Phase,
    topic: String,
    /// 활성 섹션 인덱스 — Writing 동안 항상 [0, catalog.len()) 범위
    section_index: usize,
    /// 활성 섹션의 라이브 텍스트 (advance 전까지는 슬롯에 커밋되지 않음)
    current_text: String,
    /// 섹션별 커밋된 텍스트 — 카탈로그와 길이가 같은 고정 크기 슬롯
    section_texts: Vec<String>,
    /// 경과 시간 (초) — Writing 동안 단조 증가, Completed 이후 동결
    elapsed_seconds: u32,
    /// 타이머 식별자 — start()마다 증가. Writing 수명과 타이머를 묶습니다.
    timer_epoch: u64,
    /// finalize가 만든 결과 (멱등성의 근거: 한 번 만들면 다시 만들지 않음)
    completed: Option<CompletedEssay>,
}

impl SessionMachine {
    /// 새 상태 머신을 Idle 단계로 생성합니다.
    pub fn new(catalog: &'static [SectionDefinition], time_limit_seconds: u32) -> Self {
        Self {
            catalog,
            time_limit_seconds,
            phase: Phase::Idle,
            topic: String::new(),
            section_index: 0,
            current_text: String::new(),
            // vec![값; 개수]: 같은 값으로 채운 Vec 생성 — 슬롯 전부 빈 문자열
            section_texts: vec![String::new(); catalog.len()],
            elapsed_seconds: 0,
            timer_epoch: 0,
            completed: None,
        }
    }

    // ── 조회(관찰 가능한 상태) ──

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn section_index(&self) -> usize {
        self.section_index
    }

    pub fn current_text(&self) -> &str {
        &self.current_text
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    pub fn time_limit_seconds(&self) -> u32 {
        self.time_limit_seconds
    }

    /// 제한 시간까지 남은 초 (이미 지났으면 0)
    pub fn remaining_seconds(&self) -> u32 {
        self.time_limit_seconds.saturating_sub(self.elapsed_seconds)
    }

    pub fn catalog(&self) -> &'static [SectionDefinition] {
        self.catalog
    }

    /// 활성 섹션의 정의 — Writing이 아니면 None
    pub fn current_section(&self) -> Option<&'static SectionDefinition> {
        if self.phase == Phase::Writing {
            self.catalog.get(self.section_index)
        } else {
            None
        }
    }

    /// 완성된 에세이 — Completed가 아니면 None
    pub fn completed_essay(&self) -> Option<&CompletedEssay> {
        self.completed.as_ref()
    }

    // ── 명령(전이) ──

    /// 새 세션을 시작합니다. (Idle 또는 Completed에서만 허용)
    ///
    /// 초안을 전부 리셋하고 Writing으로 전이합니다.
    /// 반환값은 새 타이머 epoch — 이 세션을 위한 tick은 반드시
    /// 이 값을 들고 와야 합니다.
    ///
    /// 주제가 비어 있으면 안 됩니다 — 무작위 기본 주제 선택 같은
    /// 대체 정책은 호출자(라우트 계층)의 책임입니다.
    pub fn start(&mut self, topic: String) -> Result<u64, AppError> {
        // Writing 중의 재시작은 상태 불일치 — 크게 실패시킵니다
        if self.phase == Phase::Writing {
            return Err(AppError::InvalidPhase(
                "cannot start a new session while writing is in progress".to_string(),
            ));
        }

        self.topic = topic;
        self.section_index = 0;
        self.current_text.clear();
        self.section_texts = vec![String::new(); self.catalog.len()];
        self.elapsed_seconds = 0;
        self.completed = None;
        self.phase = Phase::Writing;
        // epoch 증가: 이전 세션을 위해 예약돼 있던 tick은 전부 무효가 됩니다
        self.timer_epoch += 1;

        tracing::info!(topic = %self.topic, epoch = self.timer_epoch, "session started");
        Ok(self.timer_epoch)
    }

    /// 활성 섹션의 라이브 텍스트를 통째로 교체합니다. (Writing에서만 허용)
    ///
    /// 섹션 이동도, 다른 필드 변경도 일으키지 않습니다.
    pub fn update_text(&mut self, text: String) -> Result<(), AppError> {
        if self.phase != Phase::Writing {
            return Err(AppError::InvalidPhase(
                "cannot update section text outside the writing phase".to_string(),
            ));
        }
        self.current_text = text;
        Ok(())
    }

    /// 활성 섹션을 커밋하고 다음 섹션으로 이동하거나, 마지막이면 완료합니다.
    /// (Writing에서만 허용)
    pub fn advance(&mut self) -> Result<AdvanceOutcome, AppError> {
        if self.phase != Phase::Writing {
            return Err(AppError::InvalidPhase(
                "cannot advance sections outside the writing phase".to_string(),
            ));
        }

        // 라이브 텍스트를 활성 슬롯에 커밋 (스냅샷)
        self.section_texts[self.section_index] = self.current_text.clone();

        if self.section_index + 1 < self.catalog.len() {
            self.section_index += 1;
            // 새 섹션은 빈 텍스트에서 시작합니다
            self.current_text.clear();
            tracing::debug!(section_index = self.section_index, "advanced to next section");
            Ok(AdvanceOutcome::Next {
                section_index: self.section_index,
            })
        } else {
            // 마지막 섹션에서의 advance = 정상 완료 경로
            Ok(AdvanceOutcome::Finished(self.finalize()))
        }
    }

    /// 1초에 한 번 배달되는 시간 이벤트를 처리합니다.
    ///
    /// epoch이 다르거나 이미 Writing이 아니면 `Stale` — 재시작/완료 이전에
    /// 예약된 tick이 새 상태를 오염시키지 못합니다.
    ///
    /// 증가 후 경과 시간이 제한에 도달하면 **그 자리에서** 강제 완료합니다:
    /// 아직 advance하지 않은 라이브 텍스트까지 포함해 제출되며,
    /// 기록되는 소요 시간은 제한 시간으로 클램프됩니다.
    pub fn tick(&mut self, epoch: u64) -> TickOutcome {
        if epoch != self.timer_epoch || self.phase != Phase::Writing {
            return TickOutcome::Stale;
        }

        self.elapsed_seconds += 1;

        if self.elapsed_seconds >= self.time_limit_seconds {
            tracing::info!(
                elapsed = self.elapsed_seconds,
                limit = self.time_limit_seconds,
                "time limit reached, auto-submitting"
            );
            TickOutcome::Finished(self.finalize())
        } else {
            TickOutcome::Running {
                elapsed_seconds: self.elapsed_seconds,
            }
        }
    }

    /// 세션을 Completed로 전이시키고 완성된 에세이를 만듭니다.
    ///
    /// 정상 완료(advance)와 자동 제출(tick) 두 경로가 모두 여기로 모입니다.
    /// **멱등**: 이미 Completed면 기존 결과를 그대로 돌려주고 아무것도
    /// 바꾸지 않습니다. 히스토리 레코드 중복 생성을 원천 차단하는 장치입니다.
    fn finalize(&mut self) -> CompletedEssay {
        // if let Some(...): 이미 완료된 세션이면 저장된 결과를 복제해 반환
        if let Some(existing) = &self.completed {
            return existing.clone();
        }

        // 라이브 텍스트를 마지막으로 한 번 더 커밋합니다.
        // 자동 제출 경로에서는 이것이 "타이핑 중이던 내용"의 스냅샷이고,
        // 같은 섹션에 이미 커밋된 값이 있어도 라이브 텍스트가 덮어씁니다.
        self.section_texts[self.section_index] = self.current_text.clone();

        // 강제 완료 시 기록 시간은 제한 시간을 넘지 않도록 클램프합니다.
        // (스케줄링 지연으로 라이브 카운터가 제한을 넘었더라도)
        self.elapsed_seconds = self.elapsed_seconds.min(self.time_limit_seconds);

        // 고정 크기 슬롯 → 섹션 id 맵. 카탈로그의 모든 id가 키로 들어가므로
        // "누락 키 없음, 여분 키 없음" 불변식이 여기서 성립합니다.
        let sections: BTreeMap<String, String> = self
            .catalog
            .iter()
            .zip(self.section_texts.iter())
            .map(|(def, text)| (def.id.to_string(), text.clone()))
            .collect();

        let essay = CompletedEssay {
            topic: self.topic.clone(),
            sections,
            total_time_seconds: self.elapsed_seconds,
        };

        self.phase = Phase::Completed;
        self.completed = Some(essay.clone());

        tracing::info!(
            total_time_seconds = essay.total_time_seconds,
            "session completed"
        );
        essay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 테스트용 2섹션 카탈로그 (각 목표 10단어)
    const TWO_SECTIONS: &[SectionDefinition] = &[
        SectionDefinition {
            id: "a",
            title: "A",
            description: "first",
            target_word_count: 10,
        },
        SectionDefinition {
            id: "b",
            title: "B",
            description: "second",
            target_word_count: 10,
        },
    ];

    fn machine() -> SessionMachine {
        SessionMachine::new(TWO_SECTIONS, 300)
    }

    #[test]
    fn starts_in_idle_and_enters_writing() {
        let mut m = machine();
        assert_eq!(m.phase(), Phase::Idle);

        let epoch = m.start("topic".to_string()).unwrap();
        assert_eq!(m.phase(), Phase::Writing);
        assert_eq!(m.section_index(), 0);
        assert_eq!(m.elapsed_seconds(), 0);
        assert_eq!(epoch, 1);
    }

    #[test]
    fn start_while_writing_fails_loudly() {
        let mut m = machine();
        m.start("t".to_string()).unwrap();
        assert!(matches!(
            m.start("again".to_string()),
            Err(AppError::InvalidPhase(_))
        ));
    }

    #[test]
    fn commands_outside_writing_fail_loudly() {
        let mut m = machine();
        // Idle에서의 텍스트 수정/섹션 이동은 상태 불일치
        assert!(matches!(
            m.update_text("x".to_string()),
            Err(AppError::InvalidPhase(_))
        ));
        assert!(matches!(m.advance(), Err(AppError::InvalidPhase(_))));
    }

    #[test]
    fn advancing_through_all_sections_completes() {
        let mut m = machine();
        m.start("t".to_string()).unwrap();

        m.update_text("first section".to_string()).unwrap();
        let out = m.advance().unwrap();
        assert_eq!(out, AdvanceOutcome::Next { section_index: 1 });
        // 새 섹션의 라이브 텍스트는 비어 있어야 합니다
        assert_eq!(m.current_text(), "");

        m.update_text("second section".to_string()).unwrap();
        let out = m.advance().unwrap();
        let essay = match out {
            AdvanceOutcome::Finished(essay) => essay,
            other => panic!("expected Finished, got {:?}", other),
        };

        assert_eq!(m.phase(), Phase::Completed);
        // 섹션 키 집합 = 카탈로그 id 집합 (누락도 여분도 없음)
        assert_eq!(essay.sections.len(), 2);
        assert_eq!(essay.sections["a"], "first section");
        assert_eq!(essay.sections["b"], "second section");
    }

    #[test]
    fn spec_scenario_timeout_auto_submit() {
        // 시나리오: 300초 예산, A에 "one two three" 입력 후 advance,
        // B는 아무것도 쓰지 않고 300 tick 경과 → 자동 제출
        let mut m = machine();
        let epoch = m.start("t".to_string()).unwrap();

        m.update_text("one two three".to_string()).unwrap();
        m.advance().unwrap();

        let mut finished = None;
        for _ in 0..300 {
            match m.tick(epoch) {
                TickOutcome::Finished(essay) => {
                    assert!(finished.is_none(), "finalize must fire exactly once");
                    finished = Some(essay);
                }
                TickOutcome::Running { .. } => {}
                TickOutcome::Stale => panic!("live ticks must not be stale"),
            }
        }

        let essay = finished.expect("300 ticks must reach the limit");
        assert_eq!(m.phase(), Phase::Completed);
        assert_eq!(essay.sections["a"], "one two three");
        assert_eq!(essay.sections["b"], "");
        assert_eq!(essay.total_time_seconds, 300);
        // wpm 검증은 scoring 모듈 소관: round(3 / 5) = 1
        assert_eq!(crate::services::scoring::words_per_minute(3, 300), 1);
    }

    #[test]
    fn ticks_after_completion_are_stale() {
        let mut m = machine();
        let epoch = m.start("t".to_string()).unwrap();
        for _ in 0..300 {
            m.tick(epoch);
        }
        assert_eq!(m.phase(), Phase::Completed);

        // 완료 이후 추가 tick은 몇 번이 와도 Stale이며 아무것도 바꾸지 않습니다
        for _ in 0..10 {
            assert_eq!(m.tick(epoch), TickOutcome::Stale);
        }
        assert_eq!(m.elapsed_seconds(), 300);
    }

    #[test]
    fn stale_epoch_cannot_touch_a_fresh_session() {
        let mut m = machine();
        let old_epoch = m.start("first".to_string()).unwrap();
        for _ in 0..300 {
            m.tick(old_epoch);
        }

        // 재시작 — 새 epoch 발급
        let new_epoch = m.start("second".to_string()).unwrap();
        assert_ne!(old_epoch, new_epoch);

        // 이전 세션을 위해 예약돼 있던 tick이 늦게 배달된 상황
        assert_eq!(m.tick(old_epoch), TickOutcome::Stale);
        assert_eq!(m.elapsed_seconds(), 0);

        // 새 epoch의 tick은 정상 동작
        assert_eq!(
            m.tick(new_epoch),
            TickOutcome::Running { elapsed_seconds: 1 }
        );
    }

    #[test]
    fn timeout_overrides_previously_advanced_section_text() {
        // 마지막 섹션까지 갔다가 돌아올 수는 없지만, 타임아웃 순간의
        // 라이브 텍스트는 활성 섹션의 커밋 값을 덮어써야 합니다.
        let mut m = SessionMachine::new(TWO_SECTIONS, 3);
        let epoch = m.start("t".to_string()).unwrap();

        m.update_text("draft a".to_string()).unwrap();
        m.advance().unwrap();
        // 섹션 b 작성 중 타임아웃
        m.update_text("typed but never advanced".to_string()).unwrap();

        m.tick(epoch);
        m.tick(epoch);
        let out = m.tick(epoch);
        let essay = match out {
            TickOutcome::Finished(essay) => essay,
            other => panic!("expected Finished, got {:?}", other),
        };
        assert_eq!(essay.sections["a"], "draft a");
        assert_eq!(essay.sections["b"], "typed but never advanced");
        assert_eq!(essay.total_time_seconds, 3);
    }

    #[test]
    fn restart_from_completed_discards_previous_draft() {
        let mut m = machine();
        m.start("first".to_string()).unwrap();
        m.update_text("old text".to_string()).unwrap();
        m.advance().unwrap();
        m.update_text("old tail".to_string()).unwrap();
        m.advance().unwrap(); // Completed

        m.start("second".to_string()).unwrap();
        assert_eq!(m.phase(), Phase::Writing);
        assert_eq!(m.topic(), "second");
        assert_eq!(m.section_index(), 0);
        assert_eq!(m.current_text(), "");
        assert_eq!(m.elapsed_seconds(), 0);
        assert!(m.completed_essay().is_none());
    }

    #[test]
    fn elapsed_is_monotone_while_writing_and_frozen_after() {
        let mut m = SessionMachine::new(TWO_SECTIONS, 5);
        let epoch = m.start("t".to_string()).unwrap();

        let mut last = 0;
        for _ in 0..4 {
            match m.tick(epoch) {
                TickOutcome::Running { elapsed_seconds } => {
                    assert!(elapsed_seconds > last);
                    last = elapsed_seconds;
                }
                other => panic!("unexpected outcome {:?}", other),
            }
        }
        m.tick(epoch); // 5번째 tick에서 완료
        assert_eq!(m.elapsed_seconds(), 5);
        m.tick(epoch);
        assert_eq!(m.elapsed_seconds(), 5); // 동결
    }
}
