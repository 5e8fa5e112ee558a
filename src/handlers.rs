// region:    --- Imports
use crate::contract::ContractClient;
use crate::registry::RentalRegistry;
use crate::rental::commands::{
    handle_end_rental as command_handle_end_rental, handle_rent_nft as command_handle_rent_nft,
    handle_store_nft as command_handle_store_nft, EndRentalCommand, RentNftCommand,
    StoreNftCommand,
};
use crate::rental::queries;
use crate::wallet::WalletManager;
use crate::access;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

// endregion: --- Imports

// region:    --- App State

/// 핸들러 공유 상태
/// 컨트랙트 클라이언트는 트레이트 객체로 들고 있어 테스트에서 목으로 교체한다.
pub type AppState = (
    Arc<RentalRegistry>,
    Arc<dyn ContractClient>,
    Arc<WalletManager>,
);

/// 라우터 구성
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/wallet/connect", post(handle_connect_wallet))
        .route("/wallet/select", post(handle_select_account))
        .route("/wallet/account", get(handle_get_account))
        .route("/nfts", get(handle_get_nfts))
        .route("/rent", post(handle_rent))
        .route("/rent/end", post(handle_end_rental))
        .route("/store", post(handle_store))
        .route("/rentals", get(handle_get_rentals))
        .route("/access/:nft_id", get(handle_check_access))
        .with_state(state)
}

// endregion: --- App State

// region:    --- Wallet Handlers

/// 지갑 연결 요청 처리
pub async fn handle_connect_wallet(
    State((_, _, wallet)): State<AppState>,
) -> impl IntoResponse {
    info!("{:<12} --> 지갑 연결 요청 처리 시작", "Wallet");
    match wallet.request_accounts().await {
        Ok(accounts) => Json(accounts).into_response(),
        Err(e) => {
            error!("{:<12} --> 지갑 연결 실패: {}", "Wallet", e);
            (
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "error": e,
                    "code": "WALLET_UNAVAILABLE"
                })),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SelectAccountRequest {
    pub address: String,
}

/// 계정 선택 요청 처리
pub async fn handle_select_account(
    State((_, _, wallet)): State<AppState>,
    Json(req): Json<SelectAccountRequest>,
) -> impl IntoResponse {
    wallet.select_account(&req.address);
    Json(serde_json::json!({
        "message": "계정이 선택되었습니다.",
        "account": req.address
    }))
}

/// 현재 계정 조회
pub async fn handle_get_account(State((_, _, wallet)): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({ "account": wallet.current_account() }))
}

// endregion: --- Wallet Handlers

// region:    --- Command Handlers

/// 대여 요청 처리
pub async fn handle_rent(
    State((registry, contract, wallet)): State<AppState>,
    Json(cmd): Json<RentNftCommand>,
) -> impl IntoResponse {
    info!("{:<12} --> 대여 요청 처리 시작: {:?}", "Command", cmd);

    // 선택된 계정 확인
    let account = match wallet.current_account() {
        Some(account) => account,
        None => {
            return (
                axum::http::StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": "선택된 계정이 없습니다.",
                    "code": "NO_ACCOUNT"
                })),
            )
                .into_response()
        }
    };

    // 대여 처리
    match command_handle_rent_nft(cmd, &account, contract.as_ref(), &registry).await {
        Ok(record) => Json(serde_json::json!({
            "message": "대여가 성공적으로 처리되었습니다.",
            "nft_id": record.nft_id,
            "rented_at": record.rented_at
        }))
        .into_response(),
        Err(e) => (axum::http::StatusCode::BAD_REQUEST, Json(e)).into_response(),
    }
}

/// 대여 종료 요청 처리
pub async fn handle_end_rental(
    State((registry, contract, wallet)): State<AppState>,
    Json(cmd): Json<EndRentalCommand>,
) -> impl IntoResponse {
    info!("{:<12} --> 대여 종료 요청 처리 시작: {:?}", "Command", cmd);

    let account = match wallet.current_account() {
        Some(account) => account,
        None => {
            return (
                axum::http::StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": "선택된 계정이 없습니다.",
                    "code": "NO_ACCOUNT"
                })),
            )
                .into_response()
        }
    };

    match command_handle_end_rental(cmd, &account, contract.as_ref(), &registry).await {
        Ok(record) => Json(serde_json::json!({
            "message": "대여가 종료되었습니다.",
            "nft_id": record.nft_id
        }))
        .into_response(),
        Err(e) => (axum::http::StatusCode::BAD_REQUEST, Json(e)).into_response(),
    }
}

/// 등록(테스트 민팅) 요청 처리
pub async fn handle_store(
    State((_, contract, wallet)): State<AppState>,
    Json(cmd): Json<StoreNftCommand>,
) -> impl IntoResponse {
    info!("{:<12} --> 등록 요청 처리 시작: {:?}", "Command", cmd);

    let account = match wallet.current_account() {
        Some(account) => account,
        None => {
            return (
                axum::http::StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": "선택된 계정이 없습니다.",
                    "code": "NO_ACCOUNT"
                })),
            )
                .into_response()
        }
    };

    let nft_id = cmd.nft_id;
    match command_handle_store_nft(cmd, &account, contract.as_ref()).await {
        Ok(_) => Json(serde_json::json!({
            "message": "NFT가 컨트랙트에 등록되었습니다.",
            "nft_id": nft_id
        }))
        .into_response(),
        Err(e) => (axum::http::StatusCode::BAD_REQUEST, Json(e)).into_response(),
    }
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 대여 가능한 NFT 목록 조회
/// 컨트랙트 호출 실패는 빈 목록으로 드러낸다. 재시도 없음.
pub async fn handle_get_nfts(State((_, contract, _)): State<AppState>) -> impl IntoResponse {
    info!("{:<12} --> 대여 가능 NFT 조회", "HandlerQuery");
    match contract.get_available_nfts().await {
        Ok(nft_ids) => Json(nft_ids).into_response(),
        Err(e) => {
            error!("{:<12} --> NFT 목록 조회 실패: {}", "HandlerQuery", e);
            Json(Vec::<u64>::new()).into_response()
        }
    }
}

/// 대여 기록 목록 조회 (남은 시간 포함)
pub async fn handle_get_rentals(
    State((registry, _, _)): State<AppState>,
) -> impl IntoResponse {
    info!("{:<12} --> 대여 기록 조회", "HandlerQuery");
    Json(queries::list_rentals(&registry, Utc::now()).await)
}

/// 컨트랙트 기준 접근 확인
/// 호출 실패는 만료 상태로 드러낸다.
pub async fn handle_check_access(
    State((_, contract, _)): State<AppState>,
    Path(nft_id): Path<u64>,
) -> impl IntoResponse {
    info!("{:<12} --> 접근 확인 id: {}", "HandlerQuery", nft_id);
    match contract.check_access(nft_id).await {
        Ok(remaining_secs) => Json(serde_json::json!({
            "nft_id": nft_id,
            "remaining_secs": remaining_secs.max(0),
            "state": access::access_state(remaining_secs.max(0) * 1000)
        }))
        .into_response(),
        Err(e) => {
            error!("{:<12} --> 접근 확인 실패: {}", "HandlerQuery", e);
            Json(serde_json::json!({
                "nft_id": nft_id,
                "remaining_secs": 0,
                "state": access::AccessState::Expired
            }))
            .into_response()
        }
    }
}

// endregion: --- Query Handlers
