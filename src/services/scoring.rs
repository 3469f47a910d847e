//! # 점수 계산(Scoring) 서비스
//!
//! 단어 수, 문장 수, 분당 단어 수(WPM) 등을 계산하는 순수 함수들입니다.
//! 상태도 I/O도 없으므로 async가 아닙니다 — CPU 작업만 하는 함수는
//! 비동기로 만들 이유가 없습니다.
//!
//! 이 모듈의 함수들:
//! - `count_words()`: 공백 기준 단어 수
//! - `count_sentences()`: 문장 부호(. ! ?) 기준 문장 수
//! - `words_per_minute()`: 분당 단어 수 (0 나눗셈 없이 항상 유한한 정수)
//! - `aggregate_word_count()`: 모든 섹션의 단어 수 합계
//! - `words_remaining()`: 권장 단어 수까지 남은 단어 수
//!
//! 정확한 언어학적 분석이 목표가 아닙니다 — 단순한 공백/문장부호
//! 휴리스틱이며, 그 이상의 정밀도는 보장하지 않습니다.

use std::collections::BTreeMap;

/// 텍스트의 단어 수를 계산합니다.
///
/// 공백(스페이스, 탭, 줄바꿈)의 연속을 구분자로 삼고 빈 토큰은 버립니다.
/// 빈 문자열이나 공백뿐인 문자열은 0을 반환합니다.
pub fn count_words(text: &str) -> usize {
    // .split_whitespace(): 공백 런(run) 단위로 분리하며 빈 조각은 내지 않습니다.
    // .count(): 이터레이터의 항목 수를 셉니다
    text.split_whitespace().count()
}

/// 텍스트의 문장 수를 계산합니다.
///
/// `.` `!` `?`가 하나 이상 연속된 구간을 문장 경계로 보고,
/// 공백뿐인 조각은 문장으로 세지 않습니다.
/// 예: "Hi!! Bye." → 2문장, "..." → 0문장
pub fn count_sentences(text: &str) -> usize {
    // split에 char 배열을 주면 그중 아무 문자에서나 분리됩니다.
    // "!!"처럼 연속된 구분자 사이의 빈 조각은 filter에서 걸러지므로
    // 결과적으로 "구분자 런 단위 분리"와 같습니다.
    text.split(['.', '!', '?'])
        .filter(|fragment| !fragment.trim().is_empty())
        .count()
}

/// 분당 단어 수(WPM)를 계산합니다.
///
/// - `total_seconds == 0`이면 0 나눗셈을 피하기 위해 1초로 간주합니다.
/// - 단어가 0개면 결과도 0입니다.
/// - 반환값은 항상 유한한 0 이상의 정수입니다 (예외 없음).
pub fn words_per_minute(total_words: usize, total_seconds: u32) -> u32 {
    if total_words == 0 {
        return 0;
    }
    // max(1): 0초 → 1초 (division by zero 방지)
    let safe_seconds = total_seconds.max(1);
    // as f64: 정수 → 부동소수점 변환. 60초 = 1분 기준으로 환산 후 반올림합니다.
    let minutes = f64::from(safe_seconds) / 60.0;
    (total_words as f64 / minutes).round() as u32
}

/// 모든 섹션의 단어 수 합계를 계산합니다.
///
/// 섹션 id → 텍스트 맵을 받아 각 값의 `count_words`를 더합니다.
/// (맵에 없는 섹션은 애초에 이 함수에 도달하지 않지만, 빈 문자열 값은 0으로 셉니다)
pub fn aggregate_word_count(sections: &BTreeMap<String, String>) -> usize {
    // .values(): 맵의 값들만 순회하는 이터레이터
    // .map(|s| ...): 각 값을 단어 수로 변환
    // .sum(): 전부 더합니다
    sections.values().map(|text| count_words(text)).sum()
}

/// 권장 단어 수까지 남은 단어 수를 계산합니다.
///
/// 이미 목표를 넘겼으면 0을 반환합니다 (음수 없음).
pub fn words_remaining(target: u32, text: &str) -> u32 {
    // saturating_sub: 결과가 음수가 될 것 같으면 0에서 멈추는 뺄셈
    // (u32는 음수를 표현할 수 없으므로 일반 뺄셈은 패닉/언더플로 위험)
    target.saturating_sub(count_words(text) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_words_empty_and_whitespace_is_zero() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("   \t\n  "), 0);
    }

    #[test]
    fn count_words_splits_on_whitespace_runs() {
        assert_eq!(count_words("one two three"), 3);
        assert_eq!(count_words("  one\t\ttwo \n three  "), 3);
    }

    #[test]
    fn count_sentences_handles_punctuation_runs() {
        assert_eq!(count_sentences("Hello world."), 1);
        assert_eq!(count_sentences("Hi!! Are you there? Yes."), 3);
        // 구분자만 있는 입력은 문장이 아닙니다
        assert_eq!(count_sentences("...!?"), 0);
        assert_eq!(count_sentences(""), 0);
        // 마침표 없이 끝나는 조각도 문장으로 셉니다
        assert_eq!(count_sentences("No trailing period"), 1);
    }

    #[test]
    fn wpm_zero_words_is_zero_for_any_time() {
        assert_eq!(words_per_minute(0, 0), 0);
        assert_eq!(words_per_minute(0, 60), 0);
        assert_eq!(words_per_minute(0, 300), 0);
    }

    #[test]
    fn wpm_zero_seconds_treated_as_one() {
        // 10단어 / (1/60분) = 600
        assert_eq!(words_per_minute(10, 0), 600);
    }

    #[test]
    fn wpm_rounds_to_nearest_integer() {
        // 3단어 / 5분 = 0.6 → 반올림 1
        assert_eq!(words_per_minute(3, 300), 1);
        // 100단어 / 1분 = 100
        assert_eq!(words_per_minute(100, 60), 100);
        // 1단어 / 5분 = 0.2 → 반올림 0
        assert_eq!(words_per_minute(1, 300), 0);
    }

    #[test]
    fn aggregate_counts_all_sections_including_empty() {
        let mut sections = BTreeMap::new();
        sections.insert("intro".to_string(), "one two three".to_string());
        sections.insert("point1".to_string(), String::new());
        sections.insert("conclusion".to_string(), "bye".to_string());
        assert_eq!(aggregate_word_count(&sections), 4);
    }

    #[test]
    fn words_remaining_saturates_at_zero() {
        assert_eq!(words_remaining(5, "one two"), 3);
        assert_eq!(words_remaining(2, "one two three four"), 0);
        assert_eq!(words_remaining(0, ""), 0);
    }
}
