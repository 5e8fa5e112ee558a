/// 대여 기록 레지스트리
/// 대여 기록은 메모리에만 유지한다. 영속화 없음.
/// 계정 전환 또는 프로세스 재시작 시 모든 기록이 사라진다.
// region:    --- Imports
use crate::access::{self, AccessState};
use crate::rental::model::RentalRecord;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::info;

// endregion: --- Imports

// region:    --- Rental Registry

pub struct RentalRegistry {
    duration_ms: i64,
    rentals: RwLock<Vec<RentalRecord>>,
}

impl RentalRegistry {
    /// 대여 기록 레지스트리 생성
    pub fn new(duration_ms: i64) -> Self {
        Self {
            duration_ms,
            rentals: RwLock::new(Vec::new()),
        }
    }

    /// 대여 기간 가져오기 (밀리초)
    pub fn duration_ms(&self) -> i64 {
        self.duration_ms
    }

    /// 대여 기록 추가
    /// 같은 NFT를 두 번 대여해도 기록이 중복되지 않는다.
    /// 새로 추가된 경우에만 기록을 반환한다.
    pub async fn rent(&self, nft_id: u64, now: DateTime<Utc>) -> Option<RentalRecord> {
        let mut rentals = self.rentals.write().await;
        if rentals.iter().any(|r| r.nft_id == nft_id) {
            return None;
        }
        let record = RentalRecord {
            nft_id,
            rented_at: now,
            state: AccessState::Active,
        };
        rentals.push(record.clone());
        Some(record)
    }

    /// 대여 기록 제거
    pub async fn end(&self, nft_id: u64) -> Option<RentalRecord> {
        let mut rentals = self.rentals.write().await;
        let pos = rentals.iter().position(|r| r.nft_id == nft_id)?;
        Some(rentals.remove(pos))
    }

    /// 대여 기록 존재 여부
    pub async fn is_rented(&self, nft_id: u64) -> bool {
        self.rentals.read().await.iter().any(|r| r.nft_id == nft_id)
    }

    /// 현재 대여 기록 스냅샷
    pub async fn snapshot(&self) -> Vec<RentalRecord> {
        self.rentals.read().await.clone()
    }

    /// 만료된 대여 상태 갱신
    /// 남은 시간이 0이 된 Active 기록을 Expired로 전환한다.
    /// 이번 호출에서 새로 전환된 id만 반환하므로, 전환은 기록당 정확히 한 번 관측된다.
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> Vec<u64> {
        let mut rentals = self.rentals.write().await;
        let mut expired = Vec::new();
        for record in rentals.iter_mut() {
            if record.state == AccessState::Active
                && access::remaining_ms(record.rented_at, self.duration_ms, now) == 0
            {
                record.state = AccessState::Expired;
                expired.push(record.nft_id);
            }
        }
        expired
    }

    /// 모든 대여 기록 삭제 (계정 전환 시)
    pub async fn clear(&self) {
        let mut rentals = self.rentals.write().await;
        if !rentals.is_empty() {
            info!(
                "{:<12} --> 대여 기록 {}건 삭제",
                "Registry",
                rentals.len()
            );
        }
        rentals.clear();
    }
}

// endregion: --- Rental Registry

// endregion: --- Tests
