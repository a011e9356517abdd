//! RPC layer: the read-only [`Provider`] seam and its JSON-RPC implementation.

#[cfg(feature = "http")]
pub mod client;
pub mod retry;
pub mod wire;

#[cfg(feature = "http")]
pub use client::StarknetRpc;
pub use retry::{RetryConfig, RetryPolicy};

use async_trait::async_trait;

use crate::contracts::{BlockId, FunctionCall};
use crate::error::RpcError;
use crate::shared::Felt;

/// Read-only access to contract state.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Evaluate a view function at `block` and return its raw result felts.
    async fn call(&self, request: &FunctionCall, block: BlockId) -> Result<Vec<Felt>, RpcError>;
}
