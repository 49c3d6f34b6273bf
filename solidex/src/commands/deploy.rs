//! Deployment scripts.
//!
//! Every step waits for its receipt before the next one starts; the first
//! failure aborts the remaining steps.

use alloy::dyn_abi::DynSolValue;
use alloy::providers::Provider;
use alloy_primitives::{Address, U256};
use eyre::{bail, Result};
use tracing::{info, warn};

use super::{exchange, token};
use crate::artifact::ContractArtifact;
use crate::factory::{ContractFactory, Deployment};
use crate::report::BootstrapReport;

/// Inputs to [`bootstrap`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapParams {
    /// Account that signs every transaction and receives the minted supply
    pub deployer: Address,
    /// Tokens moved into the pool, in base units
    pub tokens: U256,
    /// Wei sent along with `init`
    pub eth: U256,
}

pub async fn deploy_solids<P: Provider>(provider: &P) -> Result<Deployment> {
    info!("Deploying Solids");
    ContractFactory::new(ContractArtifact::solids(), provider)
        .deploy(&[])
        .await
}

/// Constructor arguments for the exchange, derived from its ABI: nothing, or
/// the address of the token it trades.
pub fn solidex_constructor_args(
    artifact: &ContractArtifact,
    token: Address,
) -> Result<Vec<DynSolValue>> {
    match artifact.constructor_inputs() {
        [] => Ok(Vec::new()),
        [param] if param.ty == "address" => Ok(vec![DynSolValue::Address(token)]),
        inputs => bail!(
            "Unsupported {} constructor ({}): expected no inputs or a single token address",
            artifact.name(),
            inputs
                .iter()
                .map(|param| param.ty.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

pub async fn deploy_solidex<P: Provider>(
    provider: &P,
    artifact: ContractArtifact,
    token: Address,
) -> Result<Deployment> {
    let args = solidex_constructor_args(&artifact, token)?;
    if args.is_empty() {
        warn!(
            "{} constructor takes no token address; {} is not passed to it",
            artifact.name(),
            token
        );
    }

    info!("Deploying {} for token {}", artifact.name(), token);
    ContractFactory::new(artifact, provider).deploy(&args).await
}

/// Deploy Solids and Solidex, approve the exchange, seed its liquidity and
/// read back the resulting balances.
pub async fn bootstrap<P: Provider>(
    provider: &P,
    solidex: ContractArtifact,
    params: &BootstrapParams,
) -> Result<BootstrapReport> {
    let token = deploy_solids(provider).await?;
    let exchange = deploy_solidex(provider, solidex, token.address()).await?;

    token::approve(provider, token.address(), exchange.address(), params.tokens).await?;
    exchange::init(provider, exchange.address(), params.tokens, params.eth).await?;

    let deployer_balance =
        token::balance_of(provider, token.address(), params.deployer).await?;
    let exchange_balance =
        token::balance_of(provider, token.address(), exchange.address()).await?;
    let total_liquidity = exchange::total_liquidity(provider, exchange.address()).await?;

    info!(
        "Bootstrap complete: exchange {} holds {} tokens, total liquidity {}",
        exchange.address(),
        exchange_balance,
        total_liquidity
    );

    Ok(BootstrapReport {
        token,
        exchange,
        deployer_balance,
        exchange_balance,
        total_liquidity,
    })
}
