use alloy::providers::Provider;
use eyre::{Context, Result};
use std::time::Instant;
use tracing::{info, warn};

/// Outcome of probing a JSON-RPC node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingResult {
    pub success: bool,
    pub latency_ms: Option<u64>,
    pub chain_id: Option<u64>,
    pub block_number: Option<u64>,
    pub error: Option<String>,
}

/// Check that the node answers `eth_chainId` and `eth_blockNumber`
pub async fn ping_rpc<P: Provider>(provider: &P) -> PingResult {
    let start = Instant::now();

    match query_head(provider).await {
        Ok((chain_id, block_number)) => {
            let latency_ms = start.elapsed().as_millis() as u64;
            info!(
                "✓ RPC node reachable: chain {} at block {} ({}ms)",
                chain_id, block_number, latency_ms
            );
            PingResult {
                success: true,
                latency_ms: Some(latency_ms),
                chain_id: Some(chain_id),
                block_number: Some(block_number),
                error: None,
            }
        }
        Err(e) => {
            warn!("RPC node unreachable: {:#}", e);
            PingResult {
                success: false,
                latency_ms: None,
                chain_id: None,
                block_number: None,
                error: Some(format!("{:#}", e)),
            }
        }
    }
}

async fn query_head<P: Provider>(provider: &P) -> Result<(u64, u64)> {
    let chain_id = provider
        .get_chain_id()
        .await
        .context("eth_chainId failed")?;
    let block_number = provider
        .get_block_number()
        .await
        .context("eth_blockNumber failed")?;
    Ok((chain_id, block_number))
}
