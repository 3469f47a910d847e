//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `HISTORY_PATH`: 에세이 히스토리를 저장할 JSON 파일 경로
//! - `PUBLIC_URL`: 로비 초대 링크를 만들 때 사용할 공개 주소
//! - `TIME_LIMIT_SECONDS`: 세션 전체 제한 시간 (기본 300초 = 5분)
//! - `HOST`: 서버 바인딩 주소
//! - `PORT`: 서버 포트 번호
//!
//! 히스토리 파일 경로를 전역 상수가 아니라 설정값으로 주입하는 이유:
//! 테스트에서 임시 경로로 바꿔 끼울 수 있어야 하기 때문입니다.

// std::env: Rust 표준 라이브러리의 환경변수 모듈
use std::env;

/// 세션 전체 제한 시간 기본값 (5분)
pub const DEFAULT_TIME_LIMIT_SECONDS: u32 = 300;

// #[derive(...)]: 자동으로 트레이트 구현을 생성하는 **derive 매크로**
// - Debug: {:?} 포맷으로 출력 가능 (디버깅용 문자열 표현)
// - Clone: .clone() 메서드로 값을 복제 가능
#[derive(Debug, Clone)]
/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후,
/// 애플리케이션 전체에서 공유됩니다.
pub struct Config {
    /// 히스토리 JSON 파일 경로 (예: "data/history.json")
    pub history_path: String,
    /// 초대 링크의 기준 주소 (예: "https://sokjak.example.com")
    /// 쿼리 파라미터나 해시 없이 origin + path만 넣는 것을 권장합니다.
    pub public_url: String,
    /// 세션 전체 제한 시간 (초). 이 값에 도달하면 자동 제출됩니다.
    pub time_limit_seconds: u32,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 3000)
    /// u16: 0~65535 범위의 부호 없는 16비트 정수. 포트 번호에 딱 맞는 타입입니다.
    pub port: u16,
}

// impl: 구조체에 메서드를 추가하는 블록
impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// 모든 항목에 기본값이 있으므로 환경변수가 하나도 없어도 동작합니다.
    /// (이 앱은 비밀키가 필요 없어 "필수" 환경변수가 없습니다)
    pub fn from_env() -> Self {
        Self {
            // unwrap_or_else(|_| ...): Result가 Err일 때 실행할 클로저를 지정합니다.
            // |_|: 클로저의 매개변수. `_`는 "이 값은 사용하지 않겠다"는 의미입니다.
            // .to_string(): &str(문자열 슬라이스)를 String(소유된 문자열)으로 변환
            history_path: env::var("HISTORY_PATH")
                .unwrap_or_else(|_| "data/history.json".to_string()),
            public_url: env::var("PUBLIC_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),

            // 제한 시간은 문자열 → 숫자 변환이 필요합니다.
            // .parse(): 문자열을 다른 타입으로 파싱. 여기서는 u32로 변환합니다.
            // .unwrap_or(...): 파싱 실패 시 기본값(300초) 사용
            time_limit_seconds: env::var("TIME_LIMIT_SECONDS")
                .unwrap_or_else(|_| DEFAULT_TIME_LIMIT_SECONDS.to_string())
                .parse()
                .unwrap_or(DEFAULT_TIME_LIMIT_SECONDS),

            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()        // "3000" → 3000u16
                .unwrap_or(3000), // 파싱 실패 시 기본값
        }
    }
}
