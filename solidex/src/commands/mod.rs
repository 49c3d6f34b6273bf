use alloy::network::ReceiptResponse;
use alloy_primitives::TxHash;
use eyre::{bail, Result};

pub mod deploy;
pub mod exchange;
pub mod token;

/// Fail on a reverted receipt, otherwise hand back its hash
pub(crate) fn ensure_success<R: ReceiptResponse>(receipt: &R, action: &str) -> Result<TxHash> {
    let tx_hash = receipt.transaction_hash();
    if !receipt.status() {
        bail!("{action} reverted in transaction {tx_hash}");
    }
    Ok(tx_hash)
}
