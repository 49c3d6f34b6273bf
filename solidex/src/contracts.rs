//! Typed bindings for the Solids token and the Solidex exchange.

use alloy_sol_types::sol;

sol!(
    #[derive(Debug)]
    #[allow(missing_docs)]
    #[sol(rpc, abi)]
    Solids,
    "artifacts/Solids.json"
);

// Creation bytecode for the exchange is read from its Hardhat artifact at
// deploy time, see `ContractArtifact::load`.
sol! {
    #[sol(rpc, abi)]
    contract Solidex {
        #[derive(Debug)]
        function totalLiquidity() external view returns (uint256);
        #[derive(Debug)]
        function liquidity(address provider) external view returns (uint256);
        #[derive(Debug)]
        function init(uint256 tokens) external payable returns (uint256);
    }
}
