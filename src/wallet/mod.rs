/// 지갑 연결 관리자
/// 지갑 제공자(브라우저 확장 대리 서비스)에서 계정 목록을 조회하고
/// 선택된 계정과 계정 변경 알림을 관리한다.
// region:    --- Imports
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;

// endregion: --- Imports

// region:    --- Wallet Account

/// 지갑 계정 모델
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WalletAccount {
    pub address: String,
    pub name: Option<String>,
}

// endregion: --- Wallet Account

// region:    --- Wallet Manager

pub struct WalletManager {
    provider_url: String,
    client: reqwest::Client,
    account_tx: watch::Sender<Option<String>>,
}

impl WalletManager {
    /// 지갑 관리자 생성
    pub fn new(provider_url: String) -> Self {
        let (account_tx, _) = watch::channel(None);
        Self {
            provider_url,
            client: reqwest::Client::new(),
            account_tx,
        }
    }

    /// 지갑 제공자에서 계정 목록 요청
    /// 제공자가 없거나 계정이 비어 있으면 오류로 드러낸다.
    pub async fn request_accounts(&self) -> Result<Vec<WalletAccount>, String> {
        info!("{:<12} --> 지갑 계정 요청", "Wallet");

        let response = self
            .client
            .get(format!("{}/accounts", self.provider_url))
            .send()
            .await
            .map_err(|e| format!("지갑 제공자를 찾을 수 없습니다: {}", e))?;

        let accounts: Vec<WalletAccount> = response
            .json()
            .await
            .map_err(|e| format!("지갑 응답 파싱 실패: {}", e))?;

        if accounts.is_empty() {
            return Err("지갑에 계정이 없습니다".to_string());
        }

        Ok(accounts)
    }

    /// 계정 선택
    /// 같은 계정을 다시 선택하면 변경 알림을 보내지 않는다.
    pub fn select_account(&self, address: &str) {
        info!("{:<12} --> 계정 선택: {}", "Wallet", address);
        self.account_tx
            .send_if_modified(|current| match current.as_deref() {
                Some(selected) if selected == address => false,
                _ => {
                    *current = Some(address.to_string());
                    true
                }
            });
    }

    /// 현재 선택된 계정
    pub fn current_account(&self) -> Option<String> {
        self.account_tx.borrow().clone()
    }

    /// 계정 변경 알림 구독
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.account_tx.subscribe()
    }
}

// endregion: --- Wallet Manager

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;

    /// 계정 선택과 변경 알림 확인
    #[tokio::test]
    async fn test_select_account_notifies_once() {
        let wallet = WalletManager::new("http://localhost:0".to_string());
        let mut rx = wallet.subscribe();

        wallet.select_account("5Grw...alice");
        assert!(rx.has_changed().unwrap());
        rx.mark_unchanged();
        assert_eq!(wallet.current_account().as_deref(), Some("5Grw...alice"));

        // 같은 계정 재선택은 알림을 만들지 않는다
        wallet.select_account("5Grw...alice");
        assert!(!rx.has_changed().unwrap());

        // 다른 계정 선택은 알림을 만든다
        wallet.select_account("5Fhm...bob");
        assert!(rx.has_changed().unwrap());
    }
}
// endregion: --- Tests
