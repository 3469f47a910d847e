//! # Sokjak 웹 서버 진입점
//!
//! 이 파일은 Sokjak(속작 — 5분 에세이 트레이너) 백엔드의
//! **시작점(entry point)**입니다.
//! Rust 프로그램은 항상 `main()` 함수에서 실행이 시작됩니다.
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. 설정 로딩
//! 4. 히스토리 저장 디렉토리 준비 및 저장소 오픈
//! 5. 세션 상태 머신 생성
//! 6. API 라우터 설정
//! 7. HTTP 서버 시작

// ── 모듈 선언 ──
// `mod` 키워드는 다른 파일을 모듈로 가져옵니다.
// 예: `mod config;`는 같은 디렉토리의 `config.rs` 또는 `config/mod.rs`를 가져옵니다.
// Rust에서는 파일 시스템 구조가 곧 모듈 구조입니다.
mod config;
mod db;
mod error;
mod models;
mod routes;
mod services;

// ── 외부 크레이트 및 모듈에서 필요한 항목 가져오기 ──
// `use` 키워드는 다른 모듈의 항목을 현재 스코프로 가져옵니다.
use anyhow::Result; // anyhow::Result: 어떤 에러 타입이든 담을 수 있는 범용 Result 타입
use axum::{
    // Axum: Rust의 비동기 웹 프레임워크
    routing::{delete, get, post, put}, // HTTP 메서드별 라우팅 함수들
    Router,                            // 라우터: URL 경로와 핸들러를 연결하는 구조체
};
use std::path::Path;  // 파일 경로를 다루는 표준 라이브러리 타입
use std::sync::Arc;   // 참조 카운트 스마트 포인터 (스레드 간 공유)
use tokio::sync::Mutex;
use tower_http::{
    // tower-http: HTTP 미들웨어 모음 크레이트
    cors::{Any, CorsLayer},          // CORS(Cross-Origin Resource Sharing) 설정
    services::{ServeDir, ServeFile}, // 정적 파일 서빙 서비스
    trace::TraceLayer,               // HTTP 요청/응답 로깅 미들웨어
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt}; // 로깅 초기화 유틸리티

use config::Config;
use db::HistoryStore;
use routes::{sessions::AppState, *};
use services::session::SessionMachine;

// #[tokio::main]: 비동기 런타임을 시작하는 **어트리뷰트 매크로**
// Rust의 main() 함수는 기본적으로 동기(sync)이므로,
// async/await를 사용하려면 비동기 런타임(Tokio)이 필요합니다.
// 세션 타이머(1초 tick 태스크)도 이 런타임 위에서 돕니다.
#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일에서 환경변수를 읽어옵니다. (예: HISTORY_PATH, PORT 등)
    // .ok()는 Result를 Option으로 변환하여, .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // tracing은 Rust 생태계의 표준 로깅 프레임워크입니다.
    // registry(): 로그 수집기를 만들고
    // .with(): 필터와 포맷터를 레이어처럼 쌓아올립니다 (데코레이터 패턴)
    tracing_subscriber::registry()
        .with(
            // EnvFilter: RUST_LOG 환경변수로 로그 레벨을 제어합니다.
            // 환경변수가 없으면 기본값으로 sokjak, tower_http, axum 모듈을 debug 레벨로 설정
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sokjak=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer()) // 로그를 터미널에 출력하는 포맷터 레이어
        .init(); // 전역 로거로 등록

    // ── 3단계: 설정 로딩 ──
    // Config::from_env()로 환경변수에서 설정을 읽어옵니다.
    // 모든 항목에 기본값이 있으므로 실패하지 않습니다.
    let config = Config::from_env();
    tracing::info!("Starting Sokjak server on {}:{}", config.host, config.port);

    // ── 4단계: 히스토리 저장소 준비 ──
    // 히스토리 파일의 부모 디렉토리가 없으면 생성합니다.
    // Path::new(): 문자열을 파일 경로 타입으로 변환
    if let Some(parent) = Path::new(&config.history_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            // tokio::fs: 비동기 파일 시스템 작업. std::fs의 비동기 버전입니다.
            // create_dir_all: 중간 디렉토리까지 모두 생성 (mkdir -p와 같음)
            tokio::fs::create_dir_all(parent).await?;
            tracing::info!("Created history directory: {}", parent.display());
        }
    }

    // 저장소를 열면서 기존 히스토리를 로딩합니다.
    // 파일이 없거나 손상됐으면 빈 히스토리로 시작합니다 (에러 아님).
    let history = Arc::new(HistoryStore::open(config.history_path.clone()).await);

    // ── 5단계: 세션 상태 머신 생성 ──
    // 섹션 카탈로그(상수)와 제한 시간(설정)으로 상태 머신을 만들고,
    // Mutex로 감싸 모든 변경이 한 줄로 직렬화되게 합니다.
    let session = Arc::new(Mutex::new(SessionMachine::new(
        models::SECTIONS,
        config.time_limit_seconds,
    )));

    // ── 6단계: 애플리케이션 상태(State) 생성 ──
    // AppState: 모든 라우트 핸들러가 공유하는 데이터를 담는 구조체
    // Axum에서는 State를 통해 핸들러에 의존성을 주입합니다.
    // Arc 덕분에 clone해도 같은 인스턴스를 가리킵니다.
    let state = AppState {
        session,
        history,
        config: config.clone(),
    };

    // ── 7단계: API 라우터 설정 ──
    // Router::new(): 빈 라우터를 생성합니다.
    // .route(): URL 패턴과 핸들러 함수를 연결합니다.
    //           get(), post(), put() 등은 HTTP 메서드를 지정합니다.
    let api_routes = Router::new()
        // 섹션 카탈로그 (불변 설정 조회)
        .route("/catalog", get(get_catalog))
        // 세션 API — 같은 경로에 .post()를 체이닝하면 메서드별로 매핑됩니다
        .route("/session", get(get_session).post(start_session))
        .route("/session/text", put(update_section_text))
        .route("/session/advance", post(advance_section))
        .route("/session/result", get(get_session_result))
        .route("/session/review-prompt", get(session_review_prompt))
        // 히스토리 API
        .route("/history", get(list_history).delete(clear_history))
        // {id}는 URL 경로 파라미터 (Path<String>으로 핸들러에서 추출)
        .route("/history/{id}/review-prompt", get(record_review_prompt))
        // 로비 API (초대 링크, 동기 시작)
        .route("/lobby/invite", post(create_invite))
        .route("/lobby/sync", get(get_sync_delay))
        // 헬스체크 API (서버 상태 확인용)
        .route("/health", get(health_check))
        // .with_state(): 이 라우터의 모든 핸들러에서 AppState를 사용할 수 있게 합니다.
        .with_state(state);

    // ── 8단계: CORS 미들웨어 설정 ──
    // CORS: 브라우저의 보안 정책. 다른 도메인에서의 API 호출을 허용/차단합니다.
    // 개발 환경에서는 Any(모두 허용)로 설정합니다.
    // 프로덕션에서는 특정 도메인만 허용해야 합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)  // 모든 출처(origin) 허용
        .allow_methods(Any) // 모든 HTTP 메서드 허용
        .allow_headers(Any); // 모든 헤더 허용

    // ── 9단계: 프론트엔드 정적 파일 서빙 설정 ──
    // 빌드된 프론트엔드 파일이 있으면 같은 서버에서 서빙합니다.
    // SPA(Single Page Application)이므로, 찾을 수 없는 경로는 index.html로 돌려보냅니다.
    // (초대 링크의 ?challenge= 파라미터도 index.html이 받아 처리합니다)
    let frontend_dist = Path::new("../frontend/dist");
    // if-else가 표현식(expression)으로 사용됩니다.
    // Rust에서는 if-else의 결과를 변수에 바로 대입할 수 있습니다.
    let app = if frontend_dist.exists() {
        tracing::info!("Serving frontend static files from ../frontend/dist");

        // ServeDir: 디렉토리의 파일을 HTTP로 서빙하는 서비스
        // not_found_service: 파일을 찾지 못하면 index.html을 반환 (SPA 라우팅 지원)
        let serve_dir = ServeDir::new("../frontend/dist")
            .not_found_service(ServeFile::new("../frontend/dist/index.html"));

        Router::new()
            // .nest(): API 라우트를 /api/v1 경로 아래에 중첩시킵니다.
            // 예: /session → /api/v1/session
            .nest("/api/v1", api_routes)
            // .fallback_service(): API 경로에 매칭되지 않는 모든 요청은 프론트엔드로 전달
            .fallback_service(serve_dir)
            // .layer(): 미들웨어를 추가합니다. 미들웨어는 요청/응답을 가로채서 처리합니다.
            .layer(cors)
            .layer(TraceLayer::new_for_http()) // HTTP 요청/응답 자동 로깅
    } else {
        // 프론트엔드 빌드가 없으면 API만 서빙합니다.
        tracing::warn!("Frontend dist directory not found, serving API only");

        Router::new()
            .nest("/api/v1", api_routes)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    };

    // ── 10단계: 서버 시작 ──
    // format!: 문자열 포맷팅 매크로. Python의 f-string과 비슷합니다.
    let addr = format!("{}:{}", config.host, config.port);
    // TcpListener: TCP 연결을 수신 대기하는 소켓
    // .bind(): 지정된 주소에 바인딩 (해당 포트에서 요청 대기 시작)
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // axum::serve(): 요청을 받아 라우터로 전달하는 메인 루프를 시작합니다.
    // 이 await는 서버가 종료될 때까지 반환되지 않습니다.
    axum::serve(listener, app).await?;

    Ok(())
}
