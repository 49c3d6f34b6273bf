//! Contract factory: deploys a [`ContractArtifact`] or binds to an existing
//! instance of it.

use alloy::dyn_abi::DynSolValue;
use alloy::json_abi::JsonAbi;
use alloy::network::{Ethereum, ReceiptResponse, TransactionBuilder};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest;
use alloy_contract::{ContractInstance, Interface, RawCallBuilder};
use alloy_primitives::{Address, TxHash};
use eyre::{bail, eyre, Result, WrapErr};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::artifact::ContractArtifact;

/// Record of a confirmed deployment.
///
/// Only built from a successful deployment receipt, so the address never
/// changes once set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    contract: String,
    address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    transaction_hash: Option<TxHash>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    block_number: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gas_used: Option<u64>,
}

impl Deployment {
    /// Build the handle from a deployment receipt.
    pub fn from_receipt<R: ReceiptResponse>(contract: &str, receipt: &R) -> Result<Self> {
        let transaction_hash = receipt.transaction_hash();
        if !receipt.status() {
            bail!("{contract} deployment reverted in transaction {transaction_hash}");
        }
        let address = receipt.contract_address().ok_or_else(|| {
            eyre!("Receipt of transaction {transaction_hash} carries no {contract} address")
        })?;

        Ok(Self {
            contract: contract.to_string(),
            address,
            transaction_hash: Some(transaction_hash),
            block_number: receipt.block_number(),
            gas_used: Some(receipt.gas_used()),
        })
    }

    pub fn contract(&self) -> &str {
        &self.contract
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn transaction_hash(&self) -> Option<TxHash> {
        self.transaction_hash
    }

    pub fn block_number(&self) -> Option<u64> {
        self.block_number
    }

    pub fn gas_used(&self) -> Option<u64> {
        self.gas_used
    }
}

/// Binds a [`ContractArtifact`] to a provider, which carries the signing or
/// read-only credential.
#[derive(Debug, Clone)]
pub struct ContractFactory<P> {
    artifact: ContractArtifact,
    provider: P,
}

impl<P> ContractFactory<P> {
    pub fn new(artifact: ContractArtifact, provider: P) -> Self {
        Self { artifact, provider }
    }

    /// The same contract bound to a different credential.
    pub fn connect<Q>(self, provider: Q) -> ContractFactory<Q> {
        ContractFactory {
            artifact: self.artifact,
            provider,
        }
    }

    pub fn artifact(&self) -> &ContractArtifact {
        &self.artifact
    }

    pub fn interface(&self) -> &JsonAbi {
        self.artifact.abi()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Unsigned contract-creation transaction; nonce, gas and fees are left
    /// for the caller (or its provider fillers) to set.
    pub fn deploy_transaction(&self, args: &[DynSolValue]) -> Result<TransactionRequest> {
        let code = self.artifact.deploy_code(args)?;
        Ok(TransactionRequest::default().with_deploy_code(code))
    }

    /// Callable binding to an instance that is already on chain, signing or
    /// reading through this factory's provider. No network access.
    pub fn attach(&self, address: Address) -> ContractInstance<P>
    where
        P: Clone,
    {
        ContractInstance::new(
            address,
            self.provider.clone(),
            Interface::new(self.artifact.abi().clone()),
        )
    }
}

impl<P: Provider> ContractFactory<P> {
    /// Send the deployment transaction and wait for its receipt.
    pub async fn deploy(&self, args: &[DynSolValue]) -> Result<Deployment> {
        let name = self.artifact.name();
        let code = self.artifact.deploy_code(args)?;
        debug!("{} deploy code is {} bytes", name, code.len());

        let pending = RawCallBuilder::<_, Ethereum>::new_raw_deploy(&self.provider, code)
            .send()
            .await
            .wrap_err_with(|| format!("Failed to send {name} deployment transaction"))?;
        info!("{} deployment sent: {}", name, pending.tx_hash());

        let receipt = pending
            .get_receipt()
            .await
            .wrap_err_with(|| format!("Failed to confirm {name} deployment"))?;
        let deployment = Deployment::from_receipt(name, &receipt)?;

        info!(
            "{} deployed at {} (block {:?}, gas used {:?})",
            name,
            deployment.address(),
            deployment.block_number(),
            deployment.gas_used()
        );
        Ok(deployment)
    }
}
