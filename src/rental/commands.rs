/// 대여 관련 커맨드 처리
/// 1. NFT 대여
/// 2. NFT 등록 (테스트 민팅)
/// 3. 대여 종료
// region:    --- Imports
use crate::contract::ContractClient;
use crate::registry::RentalRegistry;
use crate::rental::model::RentalRecord;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
// endregion: --- Imports

// region:    --- Commands

/// 대여 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RentNftCommand {
    pub nft_id: u64,
}

/// 등록 명령
#[derive(Debug, Serialize, Deserialize)]
pub struct StoreNftCommand {
    pub nft_id: u64,
}

/// 대여 종료 명령
#[derive(Debug, Serialize, Deserialize)]
pub struct EndRentalCommand {
    pub nft_id: u64,
}

/// 1. NFT 대여
/// 컨트랙트 쓰기 호출이 성공한 경우에만 대여 기록을 만든다.
/// 같은 NFT에 대한 중복 대여는 기록을 만들지 않는다.
pub async fn handle_rent_nft(
    cmd: RentNftCommand,
    account: &str,
    contract: &dyn ContractClient,
    registry: &RentalRegistry,
) -> Result<RentalRecord, serde_json::Value> {
    info!("{:<12} --> 대여 요청 처리 시작: {:?}", "Command", cmd);

    // 중복 대여 검증
    if registry.is_rented(cmd.nft_id).await {
        return Err(serde_json::json!({
            "error": "이미 대여 중인 NFT입니다.",
            "code": "ALREADY_RENTED"
        }));
    }

    // 컨트랙트 쓰기 호출 (사용자 거부, revert는 그대로 전달)
    contract
        .rent_nft(cmd.nft_id, account)
        .await
        .map_err(|e| serde_json::json!({"error": e, "code": "CONTRACT_CALL_FAILED"}))?;

    // 대여 기록 생성
    match registry.rent(cmd.nft_id, Utc::now()).await {
        Some(record) => {
            info!(
                "{:<12} --> 대여 성공: nft_id={} rented_at={}",
                "Command", record.nft_id, record.rented_at
            );
            Ok(record)
        }
        None => Err(serde_json::json!({
            "error": "이미 대여 중인 NFT입니다.",
            "code": "ALREADY_RENTED"
        })),
    }
}

/// 2. NFT 등록 (테스트 민팅)
pub async fn handle_store_nft(
    cmd: StoreNftCommand,
    account: &str,
    contract: &dyn ContractClient,
) -> Result<(), serde_json::Value> {
    info!("{:<12} --> 등록 요청 처리 시작: {:?}", "Command", cmd);

    contract
        .store_nft(cmd.nft_id, account)
        .await
        .map_err(|e| serde_json::json!({"error": e, "code": "CONTRACT_CALL_FAILED"}))
}

/// 3. 대여 종료
pub async fn handle_end_rental(
    cmd: EndRentalCommand,
    account: &str,
    contract: &dyn ContractClient,
    registry: &RentalRegistry,
) -> Result<RentalRecord, serde_json::Value> {
    info!("{:<12} --> 대여 종료 처리 시작: {:?}", "Command", cmd);

    if !registry.is_rented(cmd.nft_id).await {
        return Err(serde_json::json!({
            "error": "대여 중이 아닌 NFT입니다.",
            "code": "NOT_RENTED"
        }));
    }

    contract
        .end_rental(account)
        .await
        .map_err(|e| serde_json::json!({"error": e, "code": "CONTRACT_CALL_FAILED"}))?;

    registry.end(cmd.nft_id).await.ok_or_else(|| {
        serde_json::json!({
            "error": "대여 중이 아닌 NFT입니다.",
            "code": "NOT_RENTED"
        })
    })
}

// endregion: --- Commands

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::access;
    use async_trait::async_trait;

    /// 항상 성공하는 컨트랙트 스텁
    struct OkContract;

    #[async_trait]
    impl ContractClient for OkContract {
        async fn get_available_nfts(&self) -> Result<Vec<u64>, String> {
            Ok(vec![1, 2, 3])
        }
        async fn check_access(&self, _nft_id: u64) -> Result<i64, String> {
            Ok(300)
        }
        async fn rental_duration(&self) -> Result<u64, String> {
            Ok(300)
        }
        async fn rent_nft(&self, _nft_id: u64, _from: &str) -> Result<(), String> {
            Ok(())
        }
        async fn store_nft(&self, _nft_id: u64, _from: &str) -> Result<(), String> {
            Ok(())
        }
        async fn end_rental(&self, _from: &str) -> Result<(), String> {
            Ok(())
        }
    }

    /// 항상 revert 되는 컨트랙트 스텁
    struct RevertContract;

    #[async_trait]
    impl ContractClient for RevertContract {
        async fn get_available_nfts(&self) -> Result<Vec<u64>, String> {
            Err("execution reverted".to_string())
        }
        async fn check_access(&self, _nft_id: u64) -> Result<i64, String> {
            Err("execution reverted".to_string())
        }
        async fn rental_duration(&self) -> Result<u64, String> {
            Err("execution reverted".to_string())
        }
        async fn rent_nft(&self, _nft_id: u64, _from: &str) -> Result<(), String> {
            Err("execution reverted".to_string())
        }
        async fn store_nft(&self, _nft_id: u64, _from: &str) -> Result<(), String> {
            Err("execution reverted".to_string())
        }
        async fn end_rental(&self, _from: &str) -> Result<(), String> {
            Err("execution reverted".to_string())
        }
    }

    /// 중복 대여 시 기록이 중복되지 않고 오류 코드가 반환된다
    #[tokio::test]
    async fn test_rent_twice_rejected() {
        let registry = RentalRegistry::new(access::DEFAULT_ACCESS_DURATION_MS);
        let contract = OkContract;

        let first = handle_rent_nft(RentNftCommand { nft_id: 1 }, "0xabc", &contract, &registry).await;
        assert!(first.is_ok());

        let second =
            handle_rent_nft(RentNftCommand { nft_id: 1 }, "0xabc", &contract, &registry).await;
        let err = second.unwrap_err();
        assert_eq!(err["code"], "ALREADY_RENTED");
        assert_eq!(registry.snapshot().await.len(), 1);
    }

    /// 컨트랙트 revert 시 대여 기록이 만들어지지 않는다
    #[tokio::test]
    async fn test_rent_revert_creates_no_record() {
        let registry = RentalRegistry::new(access::DEFAULT_ACCESS_DURATION_MS);
        let contract = RevertContract;

        let result =
            handle_rent_nft(RentNftCommand { nft_id: 1 }, "0xabc", &contract, &registry).await;
        let err = result.unwrap_err();
        assert_eq!(err["code"], "CONTRACT_CALL_FAILED");
        assert!(registry.snapshot().await.is_empty());
    }

    /// 대여 중이 아닌 NFT의 종료 요청은 거부된다
    #[tokio::test]
    async fn test_end_rental_requires_record() {
        let registry = RentalRegistry::new(access::DEFAULT_ACCESS_DURATION_MS);
        let contract = OkContract;

        let result =
            handle_end_rental(EndRentalCommand { nft_id: 9 }, "0xabc", &contract, &registry).await;
        assert_eq!(result.unwrap_err()["code"], "NOT_RENTED");
    }

    /// 대여 종료 후 기록이 제거된다
    #[tokio::test]
    async fn test_end_rental_removes_record() {
        let registry = RentalRegistry::new(access::DEFAULT_ACCESS_DURATION_MS);
        let contract = OkContract;

        handle_rent_nft(RentNftCommand { nft_id: 2 }, "0xabc", &contract, &registry)
            .await
            .unwrap();
        handle_end_rental(EndRentalCommand { nft_id: 2 }, "0xabc", &contract, &registry)
            .await
            .unwrap();
        assert!(!registry.is_rented(2).await);
    }
}
// endregion: --- Tests
