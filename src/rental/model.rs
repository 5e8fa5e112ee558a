use crate::access::AccessState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 대여 기록 모델
// 대여 성공 시점에 생성되며 이후 변경되지 않는다 (상태 전이 제외)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RentalRecord {
    pub nft_id: u64,
    pub rented_at: DateTime<Utc>,
    pub state: AccessState,
}

// 대여 조회 모델 (남은 시간은 조회 시점에 계산)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RentalView {
    pub nft_id: u64,
    pub rented_at: DateTime<Utc>,
    pub remaining_ms: i64,
    pub remaining: String,
    pub state: AccessState,
}
