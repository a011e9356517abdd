//! JSON-RPC 2.0 envelopes for the Starknet node API.

use serde::{Deserialize, Serialize};

use crate::contracts::{BlockId, FunctionCall};
use crate::error::RpcError;

pub const STARKNET_CALL: &str = "starknet_call";

#[derive(Debug, Serialize)]
pub struct JsonRpcRequest<'a, P> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: P,
}

impl<'a, P: Serialize> JsonRpcRequest<'a, P> {
    pub fn new(id: u64, method: &'a str, params: P) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method,
            params,
        }
    }
}

/// Named params of `starknet_call`.
#[derive(Debug, Serialize)]
pub struct CallParams<'a> {
    pub request: &'a FunctionCall,
    pub block_id: BlockId,
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl<T> JsonRpcResponse<T> {
    /// Collapse the envelope into the result or a typed error.
    pub fn into_result(self, method: &str) -> Result<T, RpcError> {
        if let Some(err) = self.error {
            let message = match err.data {
                Some(data) => format!("{} ({})", err.message, data),
                None => err.message,
            };
            return Err(RpcError::JsonRpc {
                code: err.code,
                message,
            });
        }
        self.result.ok_or_else(|| RpcError::UnexpectedResult {
            entrypoint: method.to_string(),
            reason: "response has neither result nor error".to_string(),
        })
    }
}
