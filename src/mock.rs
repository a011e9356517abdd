//! In-memory node and wallet doubles shared by the unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy_primitives::U256;
use async_trait::async_trait;
use tokio::sync::{watch, Notify};

use crate::config::{PriceSource, VaultConfig};
use crate::contracts::calldata::{encode_u256, get_selector_from_name};
use crate::contracts::constants::{erc20, vault};
use crate::contracts::{BlockId, Call, FunctionCall, VaultEntrypoints};
use crate::domain::session::Session;
use crate::domain::state::{AppState, SharedState};
use crate::error::{RpcError, WalletError};
use crate::rpc::{Provider, RetryPolicy};
use crate::shared::{ContractAddress, Felt, TransactionHash};
use crate::wallet::{Account, SelectOptions, WalletConnector};

pub(crate) const TOKEN: &str = "0x70ce";
pub(crate) const SHARE_TOKEN: &str = "0x5ea3";
pub(crate) const VAULT: &str = "0x7a01";

pub(crate) fn addr(hex: &str) -> ContractAddress {
    ContractAddress::from_hex(hex).unwrap()
}

pub(crate) fn test_config() -> VaultConfig {
    VaultConfig {
        rpc_url: "http://node.test".to_string(),
        token_address: addr(TOKEN),
        share_token_address: addr(SHARE_TOKEN),
        vault_address: addr(VAULT),
        token_decimals: 8,
        refresh_interval: Duration::from_secs(30),
        entrypoints: VaultEntrypoints::default(),
        price_source: PriceSource::Vault,
        read_retry: RetryPolicy::None,
        wallet: SelectOptions::default(),
    }
}

/// State with `account` already connected as session 1.
pub(crate) async fn connected_state(account: Arc<MockAccount>) -> SharedState {
    let state = AppState::shared();
    {
        let mut s = state.write().await;
        s.last_session_id = 1;
        s.session = Some(Session::new(1, account));
    }
    state
}

// ─── Provider ────────────────────────────────────────────────────────────────

#[derive(Clone)]
enum Canned {
    Result(Vec<Felt>),
    Fail,
}

struct Gate {
    entered: Notify,
    open: watch::Sender<bool>,
}

/// Keeps every call parked until [`MockGate::release`].
pub(crate) struct MockGate(Arc<Gate>);

impl MockGate {
    pub(crate) fn release(&self) {
        self.0.open.send_replace(true);
    }
}

/// Answers `starknet_call` from canned results keyed by entrypoint name.
///
/// A result registered for a specific contract wins over one registered for
/// the entrypoint alone.
#[derive(Default)]
pub(crate) struct MockProvider {
    canned: Mutex<HashMap<(Option<ContractAddress>, Felt), Canned>>,
    requests: Mutex<Vec<FunctionCall>>,
    gate: Mutex<Option<Arc<Gate>>>,
}

impl MockProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Every snapshot read answered for `test_config()` addresses.
    ///
    /// 5 WBTC in the wallet, 1 WBTC deposited.
    pub(crate) fn funded() -> Self {
        let one_btc = U256::from(100_000_000u64);
        let mut position = encode_u256(one_btc).to_vec();
        position.extend(encode_u256(U256::ZERO));

        Self::new()
            .with_u256_at(TOKEN, erc20::BALANCE_OF, U256::from(500_000_000u64))
            .with_u256_at(SHARE_TOKEN, erc20::BALANCE_OF, one_btc)
            .with_u256(vault::GET_USER_BALANCE, one_btc)
            .with_u256(vault::GET_TOTAL_DEPOSITED, U256::from(900_000_000u64))
            .with_u256(vault::GET_ASSET_PRICE, U256::from(6_500_000_000_000u64))
            .with_bool(vault::IS_PAUSED, false)
            .with_u256(vault::GET_DEPOSIT_FEE_RATE, U256::from(50u64))
            .with_result(vault::GET_VAULT_POSITION, position)
    }

    pub(crate) fn with_result(self, entrypoint: &str, result: Vec<Felt>) -> Self {
        self.set_result(entrypoint, result);
        self
    }

    pub(crate) fn with_u256(self, entrypoint: &str, value: U256) -> Self {
        self.with_result(entrypoint, encode_u256(value).to_vec())
    }

    pub(crate) fn with_u256_at(self, contract: &str, entrypoint: &str, value: U256) -> Self {
        self.canned.lock().unwrap().insert(
            (Some(addr(contract)), get_selector_from_name(entrypoint)),
            Canned::Result(encode_u256(value).to_vec()),
        );
        self
    }

    pub(crate) fn with_bool(self, entrypoint: &str, value: bool) -> Self {
        self.with_result(entrypoint, vec![Felt::from(value)])
    }

    pub(crate) fn set_result(&self, entrypoint: &str, result: Vec<Felt>) {
        self.canned
            .lock()
            .unwrap()
            .insert((None, get_selector_from_name(entrypoint)), Canned::Result(result));
    }

    pub(crate) fn set_u256(&self, entrypoint: &str, value: U256) {
        self.set_result(entrypoint, encode_u256(value).to_vec());
    }

    /// Make every call to `entrypoint` fail with a server error.
    pub(crate) fn fail(&self, entrypoint: &str) {
        let selector = get_selector_from_name(entrypoint);
        let mut canned = self.canned.lock().unwrap();
        canned.retain(|(_, s), _| *s != selector);
        canned.insert((None, selector), Canned::Fail);
    }

    pub(crate) fn hold(&self) -> MockGate {
        let (open, _) = watch::channel(false);
        let gate = Arc::new(Gate {
            entered: Notify::new(),
            open,
        });
        *self.gate.lock().unwrap() = Some(gate.clone());
        MockGate(gate)
    }

    /// Resolves once a call has reached the gate set by [`Self::hold`].
    pub(crate) async fn wait_until_held(&self) {
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.entered.notified().await;
        }
    }

    pub(crate) fn requests(&self) -> Vec<FunctionCall> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn calls_to(&self, entrypoint: &str) -> usize {
        let selector = get_selector_from_name(entrypoint);
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.entry_point_selector == selector)
            .count()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn call(&self, request: &FunctionCall, _block: BlockId) -> Result<Vec<Felt>, RpcError> {
        self.requests.lock().unwrap().push(request.clone());

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            let mut open = gate.open.subscribe();
            let _ = open.wait_for(|released| *released).await;
        }

        let canned = {
            let canned = self.canned.lock().unwrap();
            let selector = request.entry_point_selector;
            canned
                .get(&(Some(request.contract_address), selector))
                .or_else(|| canned.get(&(None, selector)))
                .cloned()
        };

        match canned {
            Some(Canned::Result(result)) => Ok(result),
            Some(Canned::Fail) => Err(RpcError::ServerError {
                status: 500,
                body: "node unavailable".to_string(),
            }),
            None => Err(RpcError::JsonRpc {
                code: 21,
                message: "Invalid message selector".to_string(),
            }),
        }
    }
}

// ─── Wallet ──────────────────────────────────────────────────────────────────

/// A wallet account that records what it was asked to execute.
pub(crate) struct MockAccount {
    address: ContractAddress,
    submitted: Mutex<Vec<Vec<Call>>>,
    rejections: Mutex<HashMap<Felt, String>>,
}

impl MockAccount {
    pub(crate) fn new(address: &str) -> Arc<Self> {
        Arc::new(Self {
            address: addr(address),
            submitted: Mutex::new(Vec::new()),
            rejections: Mutex::new(HashMap::new()),
        })
    }

    /// Reject any transaction containing a call to `entrypoint`.
    pub(crate) fn reject(&self, entrypoint: &str, reason: &str) {
        self.rejections
            .lock()
            .unwrap()
            .insert(get_selector_from_name(entrypoint), reason.to_string());
    }

    pub(crate) fn submitted(&self) -> Vec<Vec<Call>> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl Account for MockAccount {
    fn address(&self) -> ContractAddress {
        self.address
    }

    async fn execute(&self, calls: Vec<Call>) -> Result<TransactionHash, WalletError> {
        {
            let rejections = self.rejections.lock().unwrap();
            if let Some(reason) = calls.iter().find_map(|c| rejections.get(&c.selector)) {
                return Err(WalletError::Rejected(reason.clone()));
            }
        }
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(calls);
        Ok(TransactionHash::new(Felt::from(
            0x7000 + submitted.len() as u64,
        )))
    }
}

struct ConnectorInner {
    account: Option<Arc<MockAccount>>,
    bind_fails: bool,
    bound_urls: Mutex<Vec<String>>,
}

/// Wallet picker that returns a fixed account, or nothing.
#[derive(Clone)]
pub(crate) struct MockConnector(Arc<ConnectorInner>);

impl MockConnector {
    fn build(account: Option<Arc<MockAccount>>, bind_fails: bool) -> Self {
        Self(Arc::new(ConnectorInner {
            account,
            bind_fails,
            bound_urls: Mutex::new(Vec::new()),
        }))
    }

    pub(crate) fn with_account(account: Arc<MockAccount>) -> Self {
        Self::build(Some(account), false)
    }

    /// The user closes the picker without choosing.
    pub(crate) fn dismissed() -> Self {
        Self::build(None, false)
    }

    pub(crate) fn rejecting_bind() -> Self {
        Self::build(Some(MockAccount::new("0xdead")), true)
    }

    pub(crate) fn bound_urls(&self) -> Vec<String> {
        self.0.bound_urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WalletConnector for MockConnector {
    type Handle = Arc<MockAccount>;

    async fn select_wallet(
        &self,
        _options: &SelectOptions,
    ) -> Result<Option<Self::Handle>, WalletError> {
        Ok(self.0.account.clone())
    }

    async fn bind_provider(
        &self,
        handle: Self::Handle,
        rpc_url: &str,
    ) -> Result<Arc<dyn Account>, WalletError> {
        if self.0.bind_fails {
            return Err(WalletError::BindFailed {
                endpoint: rpc_url.to_string(),
                reason: "chain mismatch".to_string(),
            });
        }
        self.0.bound_urls.lock().unwrap().push(rpc_url.to_string());
        Ok(handle)
    }
}
