//! Starknet JSON-RPC client: `StarknetRpc`.
//!
//! Speaks JSON-RPC 2.0 over HTTP POST. Only the read path lives here;
//! transactions are signed and submitted by the user's wallet.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::contracts::{BlockId, FunctionCall};
use crate::error::RpcError;
use crate::rpc::retry::{RetryConfig, RetryPolicy};
use crate::rpc::wire::{CallParams, JsonRpcRequest, JsonRpcResponse, STARKNET_CALL};
use crate::rpc::Provider;
use crate::shared::Felt;

/// JSON-RPC provider bound to one node URL.
#[derive(Clone)]
pub struct StarknetRpc {
    url: String,
    client: Client,
    retry: RetryPolicy,
    next_id: Arc<AtomicU64>,
}

impl StarknetRpc {
    pub fn new(url: &str) -> Result<Self, RpcError> {
        let mut builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        {
            builder = builder
                .timeout(Duration::from_secs(30))
                .pool_max_idle_per_host(10);
        }

        Ok(Self {
            url: url.to_string(),
            client: builder.build()?,
            retry: RetryPolicy::None,
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// Retry policy applied to reads.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue a single JSON-RPC method call.
    pub async fn request<T, P>(&self, method: &str, params: P) -> Result<T, RpcError>
    where
        T: DeserializeOwned,
        P: Serialize,
    {
        let config = match RetryConfig::for_policy(&self.retry) {
            Some(config) => config,
            None => return self.do_request(method, &params).await,
        };

        let mut last_error = None;

        for attempt in 0..=config.max_retries {
            match self.do_request::<T, P>(method, &params).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    let should_retry = match &e {
                        RpcError::ServerError { status, .. } => {
                            config.retryable_statuses.contains(status)
                        }
                        RpcError::RateLimited { retry_after_ms } => {
                            if let Some(ms) = retry_after_ms {
                                futures_timer::Delay::new(Duration::from_millis(*ms)).await;
                            }
                            config.retryable_statuses.contains(&429)
                        }
                        RpcError::Timeout => true,
                        RpcError::Reqwest(re) => {
                            #[cfg(not(target_arch = "wasm32"))]
                            let retryable = re.is_connect() || re.is_timeout() || re.is_request();
                            #[cfg(target_arch = "wasm32")]
                            let retryable = re.is_timeout() || re.is_request();
                            retryable
                        }
                        _ => false,
                    };

                    if should_retry && attempt < config.max_retries {
                        let delay = config.delay_for_attempt(attempt);
                        tracing::debug!(
                            attempt = attempt + 1,
                            max = config.max_retries,
                            delay_ms = delay.as_millis() as u64,
                            method,
                            "Retrying RPC request to {}",
                            self.url
                        );
                        futures_timer::Delay::new(delay).await;
                        last_error = Some(e);
                    } else {
                        return Err(e);
                    }
                }
            }
        }

        Err(RpcError::MaxRetriesExceeded {
            attempts: config.max_retries + 1,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    async fn do_request<T, P>(&self, method: &str, params: &P) -> Result<T, RpcError>
    where
        T: DeserializeOwned,
        P: Serialize,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = JsonRpcRequest::new(id, method, params);

        let resp = self.client.post(&self.url).json(&body).send().await?;
        let status = resp.status();

        if status.is_success() {
            let parsed = resp.json::<JsonRpcResponse<T>>().await?;
            return parsed.into_result(method);
        }

        let status_code = status.as_u16();
        let retry_after_ms = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .map(|secs| secs * 1000);
        let body_text = resp.text().await.unwrap_or_default();

        match status_code {
            429 => Err(RpcError::RateLimited { retry_after_ms }),
            408 => Err(RpcError::Timeout),
            _ => Err(RpcError::ServerError {
                status: status_code,
                body: body_text,
            }),
        }
    }
}

#[async_trait]
impl Provider for StarknetRpc {
    async fn call(&self, request: &FunctionCall, block: BlockId) -> Result<Vec<Felt>, RpcError> {
        tracing::trace!(
            contract = %request.contract_address,
            selector = %request.entry_point_selector,
            "starknet_call"
        );
        self.request(
            STARKNET_CALL,
            CallParams {
                request,
                block_id: block,
            },
        )
        .await
    }
}

impl std::fmt::Debug for StarknetRpc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StarknetRpc")
            .field("url", &self.url)
            .field("retry", &self.retry)
            .finish()
    }
}
