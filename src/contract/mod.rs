/// 대여 컨트랙트 클라이언트
/// 체인은 불투명한 외부 서비스로 취급한다. 읽기/쓰기 호출만 전달하고
/// 실패(사용자 거부, 체인 revert)는 해석하지 않고 그대로 드러낸다.
// region:    --- Imports
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

// endregion: --- Imports

// region:    --- Contract Client Trait

/// 컨트랙트 호출 트레이트
#[async_trait]
pub trait ContractClient: Send + Sync {
    /// 대여 가능한 NFT id 목록 조회 (읽기)
    async fn get_available_nfts(&self) -> Result<Vec<u64>, String>;

    /// 남은 접근 시간 조회 (읽기, 초 단위)
    async fn check_access(&self, nft_id: u64) -> Result<i64, String>;

    /// 컨트랙트의 대여 기간 조회 (읽기, 초 단위)
    async fn rental_duration(&self) -> Result<u64, String>;

    /// NFT 대여 (쓰기)
    async fn rent_nft(&self, nft_id: u64, from: &str) -> Result<(), String>;

    /// NFT 등록 (쓰기, 테스트 민팅 경로)
    async fn store_nft(&self, nft_id: u64, from: &str) -> Result<(), String>;

    /// 대여 종료 (쓰기)
    async fn end_rental(&self, from: &str) -> Result<(), String>;
}

// endregion: --- Contract Client Trait

// region:    --- Http Contract Client

/// 체인 게이트웨이를 통해 컨트랙트를 호출하는 구현체
pub struct HttpContractClient {
    rpc_url: String,
    client: reqwest::Client,
}

impl HttpContractClient {
    pub fn new(rpc_url: String) -> Self {
        Self {
            rpc_url,
            client: reqwest::Client::new(),
        }
    }

    /// 컨트랙트 호출 전송
    /// 게이트웨이는 {"result": ...} 또는 {"error": ...}를 돌려준다.
    async fn call(&self, method: &str, params: Value, from: Option<&str>) -> Result<Value, String> {
        info!("{:<12} --> 컨트랙트 호출: {}", "Contract", method);

        let mut body = json!({
            "method": method,
            "params": params,
        });
        if let Some(from) = from {
            body["from"] = json!(from);
        }

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("컨트랙트 호출 실패({}): {}", method, e))?;

        let payload: Value = response
            .json()
            .await
            .map_err(|e| format!("컨트랙트 응답 파싱 실패({}): {}", method, e))?;

        if let Some(error) = payload.get("error") {
            // 사용자 거부나 revert 사유를 그대로 전달
            return Err(error.to_string());
        }

        Ok(payload.get("result").cloned().unwrap_or(Value::Null))
    }
}

#[async_trait]
impl ContractClient for HttpContractClient {
    async fn get_available_nfts(&self) -> Result<Vec<u64>, String> {
        let result = self.call("getAvailableNfts", json!([]), None).await?;
        serde_json::from_value(result).map_err(|e| format!("getAvailableNfts 응답 형식 오류: {}", e))
    }

    async fn check_access(&self, nft_id: u64) -> Result<i64, String> {
        let result = self.call("checkAccess", json!([nft_id]), None).await?;
        serde_json::from_value(result).map_err(|e| format!("checkAccess 응답 형식 오류: {}", e))
    }

    async fn rental_duration(&self) -> Result<u64, String> {
        let result = self.call("rentalDuration", json!([]), None).await?;
        serde_json::from_value(result).map_err(|e| format!("rentalDuration 응답 형식 오류: {}", e))
    }

    async fn rent_nft(&self, nft_id: u64, from: &str) -> Result<(), String> {
        self.call("rentNft", json!([nft_id]), Some(from)).await?;
        Ok(())
    }

    async fn store_nft(&self, nft_id: u64, from: &str) -> Result<(), String> {
        self.call("store", json!([nft_id]), Some(from)).await?;
        Ok(())
    }

    async fn end_rental(&self, from: &str) -> Result<(), String> {
        self.call("endRental", json!([]), Some(from)).await?;
        Ok(())
    }
}

// endregion: --- Http Contract Client
