//! Vault data reader: one batched read pass per refresh.

use std::sync::Arc;

use alloy_primitives::U256;
use chrono::Utc;

use crate::config::{PriceSource, VaultConfig};
use crate::contracts::{BlockId, BtcVault, Erc20};
use crate::domain::snapshot::VaultSnapshot;
use crate::domain::state::SharedState;
use crate::error::{RpcError, VaultError};
use crate::rpc::Provider;
use crate::shared::{format_units, ContractAddress};

#[derive(Clone)]
pub struct VaultReader {
    provider: Arc<dyn Provider>,
    token: Erc20,
    share_token: Erc20,
    vault: BtcVault,
    price_source: PriceSource,
    decimals: u8,
    block: BlockId,
}

impl VaultReader {
    pub fn new(provider: Arc<dyn Provider>, config: &VaultConfig) -> Self {
        Self {
            provider,
            token: Erc20::new(config.token_address),
            share_token: Erc20::new(config.share_token_address),
            vault: BtcVault::new(config.vault_address, config.entrypoints.clone()),
            price_source: config.price_source,
            decimals: config.token_decimals,
            block: BlockId::Latest,
        }
    }

    /// Read every snapshot field for `owner`, all at once.
    ///
    /// Fails as a whole if any single read fails.
    pub async fn fetch(&self, owner: &ContractAddress) -> Result<VaultSnapshot, RpcError> {
        let provider = self.provider.as_ref();
        let block = self.block;

        let asset_price = async {
            match self.price_source {
                PriceSource::Vault => self.vault.asset_price(provider, block).await,
                PriceSource::Fixed(price) => Ok::<U256, RpcError>(price),
            }
        };

        let (
            token_balance,
            share_balance,
            vault_balance,
            total_deposited,
            asset_price,
            paused,
            deposit_fee_rate,
            position,
        ) = futures_util::try_join!(
            self.token.balance_of(provider, owner, block),
            self.share_token.balance_of(provider, owner, block),
            self.vault.user_balance(provider, owner, block),
            self.vault.total_deposited(provider, block),
            asset_price,
            self.vault.is_paused(provider, block),
            self.vault.deposit_fee_rate(provider, block),
            self.vault.position(provider, owner, block),
        )?;

        Ok(VaultSnapshot {
            token_balance,
            share_balance,
            vault_balance,
            total_deposited,
            asset_price,
            paused,
            deposit_fee_rate,
            position,
            fetched_at: Some(Utc::now()),
        })
    }

    /// Re-read the snapshot for the active session.
    ///
    /// A no-op without a session. On failure the previous snapshot stays. A
    /// result that arrives after the session changed is discarded.
    pub async fn refresh(&self, state: &SharedState) -> Result<(), VaultError> {
        let (session_id, owner) = {
            let mut s = state.write().await;
            let Some(session) = s.session.as_ref() else {
                return Ok(());
            };
            let target = (session.id(), session.address());
            s.begin_loading();
            s.last_error = None;
            target
        };

        let result = self.fetch(&owner).await;

        let mut s = state.write().await;
        s.end_loading();

        let still_current = s.session.as_ref().map(|sess| sess.id()) == Some(session_id);
        if !still_current {
            tracing::debug!(session_id, "Session changed during refresh, discarding result");
            return Ok(());
        }

        match result {
            Ok(snapshot) => {
                tracing::debug!(
                    address = %owner,
                    token_balance = %format_units(snapshot.token_balance, self.decimals),
                    vault_balance = %format_units(snapshot.vault_balance, self.decimals),
                    paused = snapshot.paused,
                    "Vault snapshot refreshed"
                );
                s.snapshot = snapshot;
                Ok(())
            }
            Err(e) => {
                let err = VaultError::DataFetch(e);
                tracing::warn!(address = %owner, "{}", err);
                s.record_error(&err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::constants::{erc20, vault};
    use crate::domain::state::AppState;
    use crate::mock::{connected_state, test_config, MockAccount, MockProvider};

    fn reader(provider: &Arc<MockProvider>) -> VaultReader {
        VaultReader::new(provider.clone(), &test_config())
    }

    #[tokio::test]
    async fn test_refresh_without_session_is_noop() {
        let provider = Arc::new(MockProvider::funded());
        let state = AppState::shared();

        reader(&provider).refresh(&state).await.unwrap();

        assert_eq!(provider.total_calls(), 0);
        assert!(state.read().await.snapshot.is_zero());
    }

    #[tokio::test]
    async fn test_refresh_populates_every_field() {
        let provider = Arc::new(MockProvider::funded());
        let state = connected_state(MockAccount::new("0xabc")).await;

        reader(&provider).refresh(&state).await.unwrap();

        let s = state.read().await;
        assert_eq!(s.snapshot.token_balance, U256::from(500_000_000u64));
        assert_eq!(s.snapshot.share_balance, U256::from(100_000_000u64));
        assert_eq!(s.snapshot.vault_balance, U256::from(100_000_000u64));
        assert_eq!(s.snapshot.total_deposited, U256::from(900_000_000u64));
        assert_eq!(s.snapshot.asset_price, U256::from(6_500_000_000_000u64));
        assert!(!s.snapshot.paused);
        assert_eq!(s.snapshot.deposit_fee_rate, U256::from(50u64));
        assert_eq!(s.snapshot.position.collateral, U256::from(100_000_000u64));
        assert!(s.snapshot.fetched_at.is_some());
        assert!(!s.is_loading());
        assert_eq!(provider.total_calls(), 8);
    }

    #[tokio::test]
    async fn test_fixed_price_skips_oracle_read() {
        let provider = Arc::new(MockProvider::funded());
        let mut config = test_config();
        config.price_source = PriceSource::Fixed(U256::from(42u64));
        let state = connected_state(MockAccount::new("0xabc")).await;

        VaultReader::new(provider.clone(), &config)
            .refresh(&state)
            .await
            .unwrap();

        assert_eq!(state.read().await.snapshot.asset_price, U256::from(42u64));
        assert_eq!(provider.calls_to(vault::GET_ASSET_PRICE), 0);
        assert_eq!(provider.total_calls(), 7);
    }

    #[tokio::test]
    async fn test_single_failed_read_keeps_previous_snapshot() {
        let provider = Arc::new(MockProvider::funded());
        let state = connected_state(MockAccount::new("0xabc")).await;
        let reader = reader(&provider);
        reader.refresh(&state).await.unwrap();
        let before = state.read().await.snapshot.clone();

        provider.set_u256(erc20::BALANCE_OF, U256::from(1u64));
        provider.fail(vault::IS_PAUSED);
        let err = reader.refresh(&state).await.unwrap_err();

        assert!(matches!(err, VaultError::DataFetch(_)));
        let s = state.read().await;
        assert_eq!(s.snapshot, before);
        assert!(s.last_error.as_deref().unwrap().starts_with("Failed to fetch vault data"));
        assert!(!s.is_loading());
    }

    #[tokio::test]
    async fn test_malformed_result_fails_refresh() {
        let provider = Arc::new(MockProvider::funded());
        provider.set_result(vault::GET_TOTAL_DEPOSITED, vec![]);
        let state = connected_state(MockAccount::new("0xabc")).await;

        let err = reader(&provider).refresh(&state).await.unwrap_err();
        assert!(matches!(
            err,
            VaultError::DataFetch(RpcError::UnexpectedResult { .. })
        ));
        assert!(state.read().await.snapshot.is_zero());
    }

    #[tokio::test]
    async fn test_overlapping_refreshes_keep_loading_until_last_finishes() {
        let slow = Arc::new(MockProvider::funded());
        let fast = Arc::new(MockProvider::funded());
        let state = connected_state(MockAccount::new("0xabc")).await;

        let gate = slow.hold();
        let parked = tokio::spawn({
            let reader = reader(&slow);
            let state = state.clone();
            async move { reader.refresh(&state).await }
        });
        slow.wait_until_held().await;

        reader(&fast).refresh(&state).await.unwrap();
        assert!(state.read().await.is_loading());

        gate.release();
        parked.await.unwrap().unwrap();
        assert!(!state.read().await.is_loading());
    }

    #[tokio::test]
    async fn test_result_for_replaced_session_is_discarded() {
        let provider = Arc::new(MockProvider::funded());
        let state = connected_state(MockAccount::new("0xabc")).await;
        let reader = reader(&provider);

        // Disconnect while the reads are parked.
        let gate = provider.hold();
        let refresh = tokio::spawn({
            let reader = reader.clone();
            let state = state.clone();
            async move { reader.refresh(&state).await }
        });
        provider.wait_until_held().await;
        state.write().await.session = None;
        gate.release();

        refresh.await.unwrap().unwrap();
        assert!(state.read().await.snapshot.is_zero());
    }
}
