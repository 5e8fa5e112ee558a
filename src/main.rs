// region:    --- Imports
use crate::contract::{ContractClient, HttpContractClient};
use crate::registry::RentalRegistry;
use crate::scheduler::AccessScheduler;
use crate::wallet::WalletManager;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};
// endregion: --- Imports

// region:    --- Modules
mod access;
mod contract;
mod handlers;
mod registry;
mod rental;
mod scheduler;
mod wallet;

// endregion: --- Modules

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // 컨트랙트 클라이언트 생성
    let rpc_url = std::env::var("CONTRACT_RPC_URL").expect("CONTRACT_RPC_URL must be set");
    let contract: Arc<dyn ContractClient> = Arc::new(HttpContractClient::new(rpc_url));

    // 대여 기간 결정: 컨트랙트 조회 실패 시 로컬 기본값 사용
    let duration_ms = match contract.rental_duration().await {
        Ok(secs) => {
            info!("{:<12} --> 컨트랙트 대여 기간: {}초", "Main", secs);
            (secs as i64) * 1000
        }
        Err(e) => {
            warn!(
                "{:<12} --> 컨트랙트 대여 기간 조회 실패, 기본값 사용: {}",
                "Main", e
            );
            std::env::var("RENTAL_DURATION_SECS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .map(|secs| secs * 1000)
                .unwrap_or(access::DEFAULT_ACCESS_DURATION_MS)
        }
    };

    // 대여 기록 레지스트리 생성 (메모리 전용)
    let registry = Arc::new(RentalRegistry::new(duration_ms));
    info!(
        "{:<12} --> 대여 기록 레지스트리 생성: 대여 기간 {}ms",
        "Main", duration_ms
    );

    // 지갑 관리자 생성
    let provider_url =
        std::env::var("WALLET_PROVIDER_URL").expect("WALLET_PROVIDER_URL must be set");
    let wallet = Arc::new(WalletManager::new(provider_url));

    // 계정 변경 구독: 계정이 바뀌면 대여 기록을 폐기한다
    {
        let registry = Arc::clone(&registry);
        let mut account_rx = wallet.subscribe();
        tokio::spawn(async move {
            while account_rx.changed().await.is_ok() {
                info!("{:<12} --> 계정 변경 감지, 대여 기록 폐기", "Main");
                registry.clear().await;
            }
        });
    }

    // 접근 상태 갱신 스케줄러 시작 (1초 주기)
    let scheduler = AccessScheduler::new(Arc::clone(&registry));
    let _scheduler_handle = scheduler.start();

    // 테스트 페이지를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 라우터 설정
    let routes_all = handlers::routes((registry, contract, wallet)).layer(cors);

    // 리스너 생성(로컬 호스트의 3000번 포트를 사용)
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&bind_addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
