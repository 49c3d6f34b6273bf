use alloy::providers::Provider;
use alloy_primitives::{Address, TxHash, U256};
use eyre::{Result, WrapErr};
use tracing::info;

use super::ensure_success;
use crate::contracts::Solidex;

pub async fn total_liquidity<P: Provider>(provider: &P, dex: Address) -> Result<U256> {
    let liquidity = Solidex::new(dex, provider)
        .totalLiquidity()
        .call()
        .await
        .wrap_err("Failed to read total liquidity")?;
    Ok(liquidity)
}

pub async fn liquidity_of<P: Provider>(provider: &P, dex: Address, account: Address) -> Result<U256> {
    let liquidity = Solidex::new(dex, provider)
        .liquidity(account)
        .call()
        .await
        .wrap_err_with(|| format!("Failed to read liquidity of {account}"))?;
    Ok(liquidity)
}

/// Seed the pool with `tokens` (already approved) and `value` wei
pub async fn init<P: Provider>(
    provider: &P,
    dex: Address,
    tokens: U256,
    value: U256,
) -> Result<TxHash> {
    info!(
        "Initializing exchange {} with {} tokens and {} wei",
        dex, tokens, value
    );

    let receipt = Solidex::new(dex, provider)
        .init(tokens)
        .value(value)
        .send()
        .await
        .wrap_err("Failed to send init transaction")?
        .get_receipt()
        .await
        .wrap_err("Failed to confirm init transaction")?;

    let tx_hash = ensure_success(&receipt, "init")?;
    info!("Init confirmed: {}", tx_hash);
    Ok(tx_hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::providers::ProviderBuilder;
    use alloy::transports::mock::Asserter;
    use alloy_primitives::{address, Bytes};

    const DEX: Address = address!("0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512");

    #[tokio::test]
    async fn test_total_liquidity() {
        let asserter = Asserter::new();
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_mocked_client(asserter.clone());

        let liquidity = U256::from(5u128 * 10u128.pow(18));
        asserter.push_success(&Bytes::from(liquidity.to_be_bytes::<32>().to_vec()));

        assert_eq!(total_liquidity(&provider, DEX).await.unwrap(), liquidity);
    }

    #[tokio::test]
    async fn test_liquidity_of_empty_account() {
        let asserter = Asserter::new();
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_mocked_client(asserter.clone());

        asserter.push_success(&Bytes::from(U256::ZERO.to_be_bytes::<32>().to_vec()));

        let account = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
        assert_eq!(liquidity_of(&provider, DEX, account).await.unwrap(), U256::ZERO);
    }
}
