// region:    --- Imports
use crate::access;
use crate::registry::RentalRegistry;
use crate::rental::model::{RentalRecord, RentalView};
use chrono::{DateTime, Utc};
use tracing::info;

// endregion: --- Imports

// region:    --- Query Handlers

/// 대여 기록을 조회 모델로 변환
/// 남은 시간은 조회 시점에 계산하며 저장하지 않는다.
fn to_view(record: &RentalRecord, duration_ms: i64, now: DateTime<Utc>) -> RentalView {
    let remaining_ms = access::remaining_ms(record.rented_at, duration_ms, now);
    RentalView {
        nft_id: record.nft_id,
        rented_at: record.rented_at,
        remaining_ms,
        remaining: access::format_remaining(remaining_ms),
        state: access::access_state(remaining_ms),
    }
}

/// 모든 대여 기록 조회
pub async fn list_rentals(registry: &RentalRegistry, now: DateTime<Utc>) -> Vec<RentalView> {
    info!("{:<12} --> 대여 기록 조회", "Query");
    registry
        .snapshot()
        .await
        .iter()
        .map(|record| to_view(record, registry.duration_ms(), now))
        .collect()
}

/// 대여 기록 조회
pub async fn get_rental(
    registry: &RentalRegistry,
    nft_id: u64,
    now: DateTime<Utc>,
) -> Option<RentalView> {
    info!("{:<12} --> 대여 기록 조회 id: {}", "Query", nft_id);
    registry
        .snapshot()
        .await
        .iter()
        .find(|record| record.nft_id == nft_id)
        .map(|record| to_view(record, registry.duration_ms(), now))
}

// endregion: --- Query Handlers

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::AccessState;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap()
    }

    /// 남은 시간과 표기는 조회 시점 기준으로 계산된다
    #[tokio::test]
    async fn test_view_computed_at_read_time() {
        let registry = RentalRegistry::new(access::DEFAULT_ACCESS_DURATION_MS);
        registry.rent(1, start()).await;

        // 대여 직후: 전체 기간이 남아 있다
        let view = get_rental(&registry, 1, start()).await.unwrap();
        assert_eq!(view.remaining_ms, access::DEFAULT_ACCESS_DURATION_MS);
        assert_eq!(view.remaining, "5m 0s");
        assert_eq!(view.state, AccessState::Active);

        // 기간 경과 후: 만료 상태로 조회된다
        let view = get_rental(&registry, 1, start() + Duration::minutes(5)).await.unwrap();
        assert_eq!(view.remaining_ms, 0);
        assert_eq!(view.remaining, "Expired");
        assert_eq!(view.state, AccessState::Expired);
    }

    /// 대여 기록이 없으면 조회 결과도 없다
    #[tokio::test]
    async fn test_empty_registry_lists_nothing() {
        let registry = RentalRegistry::new(access::DEFAULT_ACCESS_DURATION_MS);
        assert!(list_rentals(&registry, start()).await.is_empty());
        assert!(get_rental(&registry, 1, start()).await.is_none());
    }
}
// endregion: --- Tests
