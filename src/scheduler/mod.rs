/// 접근 상태 갱신 스케줄러
/// 대여 목록이 서비스되는 동안 1초마다 남은 시간을 다시 계산해
/// 만료된 대여를 Expired 상태로 전환한다.
/// 전환은 레지스트리가 보장하는 대로 기록당 정확히 한 번 일어난다.
// region:    --- Imports
use crate::registry::RentalRegistry;
use chrono::Utc;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};
use tracing::{debug, info};

// endregion: --- Imports

// region:    --- Access Scheduler

/// 접근 상태 갱신 스케줄러
pub struct AccessScheduler {
    registry: Arc<RentalRegistry>,
}

/// 스케줄러 중지 핸들
/// 드롭 시 태스크를 동기적으로 중단한다. 타이머 핸들 누수 방지.
pub struct SchedulerHandle {
    handle: JoinHandle<()>,
}

impl SchedulerHandle {
    /// 스케줄러 중지
    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl AccessScheduler {
    pub fn new(registry: Arc<RentalRegistry>) -> Self {
        Self { registry }
    }

    /// 접근 상태 갱신 스케줄러 시작
    pub fn start(&self) -> SchedulerHandle {
        let registry = Arc::clone(&self.registry);
        let handle = tokio::spawn(async move {
            let mut interval = interval(Duration::from_secs(1)); // 1초마다 실행
            loop {
                interval.tick().await;
                let expired = registry.sweep_expired(Utc::now()).await;
                for nft_id in expired {
                    info!(
                        "{:<12} --> 대여 접근 만료: nft_id={}",
                        "Scheduler", nft_id
                    );
                }
                debug!("{:<12} --> 접근 상태 갱신 완료", "Scheduler");
            }
        });
        SchedulerHandle { handle }
    }
}

// endregion: --- Access Scheduler

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::AccessState;
    use chrono::Utc;

    /// 스케줄러가 만료된 대여를 Expired로 전환한다
    #[tokio::test]
    async fn test_scheduler_expires_rental() {
        // 대여 기간 0ms: 다음 틱에 바로 만료된다
        let registry = Arc::new(RentalRegistry::new(0));
        registry.rent(1, Utc::now()).await;

        let scheduler = AccessScheduler::new(Arc::clone(&registry));
        let handle = scheduler.start();

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(registry.snapshot().await[0].state, AccessState::Expired);

        handle.stop();
    }

    /// 핸들 드롭 후에는 갱신이 멈춘다
    #[tokio::test]
    async fn test_scheduler_stops_on_drop() {
        let registry = Arc::new(RentalRegistry::new(0));
        let scheduler = AccessScheduler::new(Arc::clone(&registry));
        drop(scheduler.start());

        registry.rent(2, Utc::now()).await;
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(registry.snapshot().await[0].state, AccessState::Active);
    }
}
// endregion: --- Tests
