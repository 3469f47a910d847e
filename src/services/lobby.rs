//! # 로비(Lobby) 서비스 — 초대 링크와 동기 시작 휴리스틱
//!
//! 친구와 같은 주제로 "같이 시작"하기 위한 편의 기능들입니다.
//! 서버 간 핸드셰이크가 아닙니다 — 어느 서버도 링크를 검증하거나
//! 중계하지 않으며, 시계 정렬은 각자의 시스템 시계에 의존하는
//! 최선 노력(best-effort)일 뿐입니다.
//!
//! - 초대 링크: 공개 주소에 `challenge` 쿼리 파라미터 하나를 붙인 URL.
//!   주제는 시작 전까지 숨겨야 하므로 URL-safe Base64로 인코딩합니다.
//! - 동기 시작: 벽시계의 다음 10초 배수까지 남은 밀리초를 계산해
//!   클라이언트들이 그 시점까지 시작을 미루게 합니다.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine; // .encode()/.decode() 메서드를 쓰기 위한 트레이트

use crate::error::AppError;

/// 동기 시작이 정렬되는 벽시계 배수 (10초)
const SYNC_INTERVAL_MS: i64 = 10_000;

/// 주제를 초대 링크용으로 인코딩합니다.
///
/// URL-safe, 패딩 없는 Base64 — 쿼리 스트링에 퍼센트 인코딩 없이
/// 그대로 넣을 수 있는 문자만 씁니다. (`+`/`/`/`=` 없음)
pub fn encode_topic(topic: &str) -> String {
    URL_SAFE_NO_PAD.encode(topic.as_bytes())
}

/// 초대 링크의 challenge 파라미터를 주제 문자열로 복원합니다.
///
/// 잘못된 Base64이거나 UTF-8이 아니면 400(BadRequest)입니다 —
/// 손으로 링크를 고치다 깨뜨린 경우이므로 사용자에게 알려줍니다.
pub fn decode_topic(challenge: &str) -> Result<String, AppError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(challenge)
        // map_err: 에러 타입을 바꿉니다 (base64::DecodeError → AppError)
        .map_err(|_| AppError::BadRequest("invalid challenge encoding".to_string()))?;
    String::from_utf8(bytes)
        .map_err(|_| AppError::BadRequest("challenge is not valid UTF-8".to_string()))
}

/// 초대 링크를 만듭니다.
///
/// 설정된 공개 주소(origin + path)에 `challenge` 파라미터 하나만 붙입니다.
/// 기존 쿼리나 해시는 설정값에 없다고 가정합니다 (config.rs 참고).
pub fn build_invite_url(public_url: &str, topic: &str) -> String {
    // trim_end_matches('/'): "https://host/" → "https://host"
    // (슬래시 중복 방지)
    format!(
        "{}?challenge={}",
        public_url.trim_end_matches('/'),
        encode_topic(topic)
    )
}

/// 다음 10초 경계까지 남은 밀리초를 계산합니다.
///
/// 반환값은 항상 (0, 10000] 범위입니다 — 정확히 경계 위에 있으면
/// "지금"이 아니라 다음 경계를 기다립니다 (두 클라이언트가 같은
/// 순간을 관찰했을 때 한쪽만 즉시 출발하는 일을 막기 위해).
pub fn ms_until_sync_start(now_ms: i64) -> i64 {
    SYNC_INTERVAL_MS - (now_ms.rem_euclid(SYNC_INTERVAL_MS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_roundtrips_through_encoding() {
        let topic = "Should voting be mandatory?";
        let encoded = encode_topic(topic);
        // URL-safe: 쿼리 스트링에 못 들어가는 문자가 없어야 합니다
        assert!(!encoded.contains('+'));
        assert!(!encoded.contains('/'));
        assert!(!encoded.contains('='));
        assert_eq!(decode_topic(&encoded).unwrap(), topic);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            decode_topic("!!!not base64!!!"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn invite_url_has_single_challenge_param() {
        let url = build_invite_url("http://localhost:3000/", "topic one");
        assert!(url.starts_with("http://localhost:3000?challenge="));
        // 파라미터는 하나뿐
        assert_eq!(url.matches('?').count(), 1);
        assert_eq!(url.matches('&').count(), 0);
    }

    #[test]
    fn sync_wait_is_in_range() {
        // 경계 직후
        assert_eq!(ms_until_sync_start(20_001), 9_999);
        // 경계 직전
        assert_eq!(ms_until_sync_start(29_999), 1);
        // 정확히 경계 위 → 다음 경계까지 꽉 채워 기다립니다
        assert_eq!(ms_until_sync_start(30_000), 10_000);
        // 임의 시각에서도 (0, 10000] 범위
        for now in [0_i64, 123, 9_999, 10_000, 987_654_321] {
            let wait = ms_until_sync_start(now);
            assert!(wait > 0 && wait <= 10_000, "wait={wait} for now={now}");
        }
    }
}
