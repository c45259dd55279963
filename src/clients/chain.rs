//! Minimal EVM JSON-RPC client: balances and transaction receipts.

use backoff::future::retry_notify;
use backoff::Error as BackoffError;
use backoff::ExponentialBackoff;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::validation;

const WEI_PER_ETHER: f64 = 1e18;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: String,
    #[serde(default)]
    pub block_number: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    /// Set when the transaction deployed a contract
    #[serde(default)]
    pub contract_address: Option<String>,
    /// `0x1` on success, `0x0` when reverted
    #[serde(default)]
    pub status: Option<String>,
}

impl TransactionReceipt {
    pub fn succeeded(&self) -> bool {
        self.status.as_deref() == Some("0x1")
    }
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize, Debug)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Clone)]
pub struct ChainClient {
    http: reqwest::Client,
    rpc_url: String,
    receipt_timeout: Duration,
    next_id: Arc<AtomicU64>,
}

impl ChainClient {
    pub fn new(rpc_url: impl Into<String>, receipt_timeout: Duration) -> Self {
        Self {
            http: super::http_client(),
            rpc_url: rpc_url.into(),
            receipt_timeout,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    #[tracing::instrument(skip(self, params), fields(rpc_url = %self.rpc_url))]
    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<Option<T>, AppError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let response = self.http.post(&self.rpc_url).json(&request).send().await?;
        let response = super::ensure_success("chain RPC", response).await?;
        let body: RpcResponse<T> = response.json().await?;

        if let Some(err) = body.error {
            tracing::warn!("RPC {} failed: {} ({})", method, err.message, err.code);
            return Err(AppError::UpstreamError(format!("{} failed: {}", method, err.message)));
        }
        Ok(body.result)
    }

    /// Native balance of `address`, in ether.
    pub async fn get_balance(&self, address: &str) -> Result<f64, AppError> {
        let address = validation::require_address("address", address)?;
        let quantity: Option<String> = self.call("eth_getBalance", json!([address, "latest"])).await?;
        let quantity = quantity
            .ok_or_else(|| AppError::UpstreamError("eth_getBalance returned no result".to_string()))?;
        Ok(wei_to_ether(parse_quantity(&quantity)?))
    }

    pub async fn get_transaction_receipt(&self, tx_hash: &str) -> Result<Option<TransactionReceipt>, AppError> {
        let tx_hash = validation::require_tx_hash("tx_hash", tx_hash)?;
        self.call("eth_getTransactionReceipt", json!([tx_hash])).await
    }

    /// Poll until the transaction is mined or the receipt timeout elapses.
    #[tracing::instrument(skip(self))]
    pub async fn wait_for_receipt(&self, tx_hash: &str) -> Result<TransactionReceipt, AppError> {
        validation::require_tx_hash("tx_hash", tx_hash)?;

        let backoff = ExponentialBackoff {
            initial_interval: Duration::from_millis(250),
            max_interval: Duration::from_secs(5),
            max_elapsed_time: Some(self.receipt_timeout),
            ..ExponentialBackoff::default()
        };

        let receipt = retry_notify(
            backoff,
            || async move {
                match self.get_transaction_receipt(tx_hash).await {
                    Ok(Some(receipt)) => Ok(receipt),
                    Ok(None) => Err(BackoffError::transient(AppError::UpstreamError(format!(
                        "receipt for {} not available yet",
                        tx_hash
                    )))),
                    Err(e @ AppError::UpstreamError(_)) => Err(BackoffError::transient(e)),
                    Err(e) => Err(BackoffError::permanent(e)),
                }
            },
            retry_notify_handler,
        )
        .await?;

        tracing::info!(
            "Transaction {} mined in block {}",
            tx_hash,
            receipt.block_number.as_deref().unwrap_or("?")
        );
        Ok(receipt)
    }
}

fn retry_notify_handler<E>(err: E, duration: Duration)
where
    E: std::fmt::Display,
{
    tracing::debug!("{}. Retrying in {:.1}s...", err, duration.as_secs_f32());
}

/// Parse a hex `QUANTITY` such as `0x1bc16d674ec80000`.
pub fn parse_quantity(raw: &str) -> Result<u128, AppError> {
    let digits = raw.trim().trim_start_matches("0x");
    if digits.is_empty() {
        return Ok(0);
    }
    u128::from_str_radix(digits, 16)
        .map_err(|e| AppError::UpstreamError(format!("invalid quantity '{}': {}", raw, e)))
}

pub fn wei_to_ether(wei: u128) -> f64 {
    wei as f64 / WEI_PER_ETHER
}
