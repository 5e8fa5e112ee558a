/// 접근 만료 계산기
/// 대여 시작 시각과 고정 대여 기간으로부터 남은 시간을 계산한다.
/// 남은 시간은 저장하지 않고 매번 다시 계산한다.
// region:    --- Imports
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// endregion: --- Imports

// region:    --- Access State

/// 기본 대여 기간 (5분)
pub const DEFAULT_ACCESS_DURATION_MS: i64 = 5 * 60 * 1000;

/// 대여 접근 상태
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum AccessState {
    Active,
    Expired,
}

// endregion: --- Access State

// region:    --- Expiry Calculator

/// 남은 접근 시간 계산 (밀리초, 0 미만으로 내려가지 않음)
pub fn remaining_ms(rented_at: DateTime<Utc>, duration_ms: i64, now: DateTime<Utc>) -> i64 {
    let expires_at = rented_at + Duration::milliseconds(duration_ms);
    (expires_at - now).num_milliseconds().max(0)
}

/// 남은 시간으로부터 접근 상태 계산
pub fn access_state(remaining_ms: i64) -> AccessState {
    if remaining_ms > 0 {
        AccessState::Active
    } else {
        AccessState::Expired
    }
}

/// 남은 시간 표기: "Xm Ys", 만료 시 "Expired"
pub fn format_remaining(remaining_ms: i64) -> String {
    if remaining_ms > 0 {
        let minutes = remaining_ms / 60_000;
        let seconds = (remaining_ms % 60_000) / 1000;
        format!("{}m {}s", minutes, seconds)
    } else {
        "Expired".to_string()
    }
}

// endregion: --- Expiry Calculator

// endregion: --- Tests
