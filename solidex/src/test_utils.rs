//! Receipts and deployments for unit tests.

use alloy::rpc::types::TransactionReceipt;
use alloy_primitives::{b256, Address, TxHash};

use crate::factory::Deployment;

pub(crate) const TX_HASH: TxHash =
    b256!("0x2d2bfbb7a1a8f4b5e0e3e7cbb1b7ed4f6d1d6b2a1f6c0b9e5d3f8a7c6b5a4f3e");

/// Receipt as a node returns it over JSON-RPC.
pub(crate) fn receipt(status: bool, contract_address: Option<Address>) -> TransactionReceipt {
    let json = serde_json::json!({
        "type": "0x2",
        "status": if status { "0x1" } else { "0x0" },
        "cumulativeGasUsed": "0x8f2d1",
        "logs": [],
        "logsBloom": format!("0x{}", "00".repeat(256)),
        "transactionHash": TX_HASH,
        "transactionIndex": "0x0",
        "blockHash": "0x6a3c1d9f4e2b8a7c5d0e1f2a3b4c5d6e7f8091a2b3c4d5e6f708192a3b4c5d6e",
        "blockNumber": "0x2",
        "gasUsed": "0x8f2d1",
        "effectiveGasPrice": "0x3b9aca00",
        "from": "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
        "to": null,
        "contractAddress": contract_address,
    });
    serde_json::from_value(json).unwrap()
}

pub(crate) fn deployment(contract: &str, address: Address) -> Deployment {
    Deployment::from_receipt(contract, &receipt(true, Some(address))).unwrap()
}
