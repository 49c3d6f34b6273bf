use alloy::providers::Provider;
use alloy_primitives::{Address, TxHash, U256};
use eyre::{Result, WrapErr};
use serde::Serialize;
use tracing::info;

use super::ensure_success;
use crate::contracts::Solids;

/// ERC-20 metadata of a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: U256,
}

pub async fn token_info<P: Provider>(provider: &P, token: Address) -> Result<TokenInfo> {
    let erc20 = Solids::new(token, provider);

    let name = erc20.name().call().await.wrap_err("Failed to read token name")?;
    let symbol = erc20
        .symbol()
        .call()
        .await
        .wrap_err("Failed to read token symbol")?;
    let decimals = erc20
        .decimals()
        .call()
        .await
        .wrap_err("Failed to read token decimals")?;
    let total_supply = erc20
        .totalSupply()
        .call()
        .await
        .wrap_err("Failed to read token supply")?;

    Ok(TokenInfo {
        address: token,
        name,
        symbol,
        decimals,
        total_supply,
    })
}

pub async fn balance_of<P: Provider>(provider: &P, token: Address, account: Address) -> Result<U256> {
    let balance = Solids::new(token, provider)
        .balanceOf(account)
        .call()
        .await
        .wrap_err_with(|| format!("Failed to read token balance of {account}"))?;
    Ok(balance)
}

pub async fn allowance<P: Provider>(
    provider: &P,
    token: Address,
    owner: Address,
    spender: Address,
) -> Result<U256> {
    let allowance = Solids::new(token, provider)
        .allowance(owner, spender)
        .call()
        .await
        .wrap_err_with(|| format!("Failed to read allowance of {spender} over {owner}"))?;
    Ok(allowance)
}

/// Let `spender` move up to `amount` of the caller's tokens
pub async fn approve<P: Provider>(
    provider: &P,
    token: Address,
    spender: Address,
    amount: U256,
) -> Result<TxHash> {
    info!("Approving {} for {} tokens of {}", spender, amount, token);

    let receipt = Solids::new(token, provider)
        .approve(spender, amount)
        .send()
        .await
        .wrap_err("Failed to send approve transaction")?
        .get_receipt()
        .await
        .wrap_err("Failed to confirm approve transaction")?;

    let tx_hash = ensure_success(&receipt, "approve")?;
    info!("Approve confirmed: {}", tx_hash);
    Ok(tx_hash)
}

pub async fn transfer<P: Provider>(
    provider: &P,
    token: Address,
    to: Address,
    amount: U256,
) -> Result<TxHash> {
    info!("Transferring {} tokens of {} to {}", amount, token, to);

    let receipt = Solids::new(token, provider)
        .transfer(to, amount)
        .send()
        .await
        .wrap_err("Failed to send transfer transaction")?
        .get_receipt()
        .await
        .wrap_err("Failed to confirm transfer transaction")?;

    let tx_hash = ensure_success(&receipt, "transfer")?;
    info!("Transfer confirmed: {}", tx_hash);
    Ok(tx_hash)
}
