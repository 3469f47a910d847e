//! # 히스토리 저장소 (Data Access Layer)
//!
//! 완성된 에세이 레코드를 로컬 JSON 파일 하나에 저장/조회/삭제합니다.
//!
//! ## 내구성 모델
//! - 저장 단위는 파일 하나(설정으로 주입된 경로) = 네임스페이스 키 하나.
//! - 파일에는 레코드 배열 전체가 **최신순(most-recent-first)**으로 들어갑니다.
//! - 버전/마이그레이션 스킴이 없습니다: 포맷이 바뀌면 기존 데이터는
//!   손상 데이터와 동일하게 취급되어 빈 목록으로 대체됩니다.
//!
//! ## 장애 계약 (중요)
//! - **읽기 실패/손상**: 에러가 아니라 "히스토리 없음"입니다.
//!   warn 로그만 남기고 빈 목록을 반환합니다.
//! - **쓰기 실패**(디스크 꽉 참 등): error 로그를 남기고 **삼킵니다**.
//!   호출자에게 전파되지 않으므로 저장 장애가 세션 완료 전이를
//!   막을 수 없고, 메모리의 목록은 이미 갱신된 상태라
//!   같은 프로세스 안에서는 방금 쓴 에세이가 계속 보입니다.

use std::path::PathBuf;

use tokio::fs; // 비동기 파일시스템. 동기 std::fs는 요청 처리를 블로킹합니다.
use tokio::sync::RwLock; // 읽기 다수/쓰기 단독 락 (비동기 버전)

use crate::models::HistoryRecord;

/// 히스토리 저장소
///
/// 메모리의 `Vec<HistoryRecord>`가 읽기의 기준(authoritative)이고,
/// 파일은 그 내구성 사본입니다. 시작 시 파일에서 한 번 로딩합니다.
pub struct HistoryStore {
    /// JSON 파일 경로 — 전역 상수가 아니라 생성 시 주입됩니다 (테스트 용이성)
    path: PathBuf,
    /// 최신순 레코드 목록
    records: RwLock<Vec<HistoryRecord>>,
}

impl HistoryStore {
    /// 저장소를 열고 기존 히스토리를 로딩합니다.
    ///
    /// 파일이 없거나, 읽을 수 없거나, JSON 파싱에 실패하면
    /// 손상으로 간주하고 빈 목록으로 시작합니다 (에러 아님).
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<Vec<HistoryRecord>>(&raw) {
                Ok(records) => records,
                Err(e) => {
                    // 손상 = 부재. 기존 파일은 다음 append 때 덮어써집니다.
                    tracing::warn!(path = %path.display(), error = %e,
                        "history file is corrupt, starting with empty history");
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e,
                    "failed to read history file, starting with empty history");
                Vec::new()
            }
        };

        tracing::info!(path = %path.display(), count = records.len(), "history loaded");
        Self {
            path,
            records: RwLock::new(records),
        }
    }

    /// 레코드를 목록 맨 앞에 추가하고 파일로 영속화합니다.
    ///
    /// 영속화 실패는 로그만 남기고 삼킵니다 — 이 함수는 실패하지 않습니다.
    /// (완료 경로가 저장 장애로 막히면 안 된다는 계약)
    pub async fn append(&self, record: HistoryRecord) {
        // .write().await: 쓰기 락 획득 (다른 읽기/쓰기가 끝날 때까지 대기)
        let mut records = self.records.write().await;
        // insert(0, ...): 맨 앞 삽입 — 최신순 유지
        records.insert(0, record);

        // 메모리 갱신이 끝난 **뒤에** 디스크에 씁니다.
        // 디스크가 실패해도 메모리 목록은 이미 일관된 상태입니다.
        if let Err(e) = self.persist(&records).await {
            tracing::error!(path = %self.path.display(), error = %e,
                "failed to persist history, record kept in memory only");
        }
    }

    /// 전체 히스토리를 최신순으로 반환합니다.
    pub async fn load_all(&self) -> Vec<HistoryRecord> {
        // .read().await: 읽기 락 (여러 읽기가 동시에 가능)
        self.records.read().await.clone()
    }

    /// 모든 레코드를 무조건 삭제합니다.
    ///
    /// 메모리를 비우고 파일도 지웁니다. 파일이 애초에 없으면 성공으로
    /// 간주하고, 그 외 삭제 실패는 로그만 남깁니다 — 메모리는 이미
    /// 비었으므로 이후 load_all()은 빈 목록을 반환합니다.
    pub async fn clear(&self) {
        self.records.write().await.clear();

        match fs::remove_file(&self.path).await {
            Ok(()) => tracing::info!(path = %self.path.display(), "history cleared"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e,
                    "failed to delete history file");
            }
        }
    }

    /// 현재 목록 전체를 JSON 배열로 직렬화해 파일에 씁니다.
    async fn persist(&self, records: &[HistoryRecord]) -> Result<(), std::io::Error> {
        // 부모 디렉토리가 없으면 만듭니다 (mkdir -p)
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // to_string_pretty: 사람이 열어볼 수 있는 들여쓰기 포맷
        // 직렬화 실패도 io::Error로 접어 하나의 에러 경로로 처리합니다.
        let json = serde_json::to_string_pretty(records)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, json).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn record(topic: &str) -> HistoryRecord {
        let mut sections = BTreeMap::new();
        sections.insert("intro".to_string(), "some text".to_string());
        HistoryRecord {
            id: uuid::Uuid::now_v7().to_string(),
            topic: topic.to_string(),
            sections,
            total_time_seconds: 300,
            date: "2026-02-16T12:00:00Z".to_string(),
            wpm: 42,
        }
    }

    #[tokio::test]
    async fn append_then_load_returns_most_recent_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::open(dir.path().join("history.json")).await;

        store.append(record("first")).await;
        store.append(record("second")).await;

        let all = store.load_all().await;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].topic, "second");
        assert_eq!(all[1].topic, "first");
    }

    #[tokio::test]
    async fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        {
            let store = HistoryStore::open(&path).await;
            store.append(record("persisted")).await;
        }

        // 새 저장소 인스턴스 = 프로세스 재시작 시뮬레이션
        let reopened = HistoryStore::open(&path).await;
        let all = reopened.load_all().await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].topic, "persisted");
    }

    #[tokio::test]
    async fn clear_empties_store_and_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        let store = HistoryStore::open(&path).await;
        store.append(record("gone soon")).await;
        store.clear().await;
        assert!(store.load_all().await.is_empty());

        // 디스크에서도 지워졌는지 재오픈으로 확인
        let reopened = HistoryStore::open(&path).await;
        assert!(reopened.load_all().await.is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_is_treated_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        tokio::fs::write(&path, "{ this is not valid json ]").await.unwrap();

        let store = HistoryStore::open(&path).await;
        assert!(store.load_all().await.is_empty());
    }

    #[tokio::test]
    async fn failed_persist_keeps_in_memory_records() {
        let dir = tempfile::tempdir().unwrap();
        // 일반 파일을 부모 "디렉토리"로 쓰게 해 쓰기를 실패시킵니다
        let blocker = dir.path().join("blocker");
        tokio::fs::write(&blocker, "regular file").await.unwrap();
        let path = blocker.join("history.json");

        let store = HistoryStore::open(&path).await;
        // append는 패닉도 에러도 없이 돌아와야 합니다
        store.append(record("memory only")).await;

        // 디스크 쓰기는 실패했지만 메모리 목록은 멀쩡합니다
        let all = store.load_all().await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].topic, "memory only");

        // 이후의 append도 기존 목록을 잃지 않습니다
        store.append(record("second try")).await;
        assert_eq!(store.load_all().await.len(), 2);
    }
}
