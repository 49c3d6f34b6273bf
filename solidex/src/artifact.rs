//! Compiled contract descriptors.
//!
//! A [`ContractArtifact`] is the immutable (ABI, bytecode) pair emitted by the
//! contract toolchain. Solids ships embedded in this crate; other contracts are
//! read from Hardhat artifact files at runtime.

use std::fs;
use std::path::Path;

use alloy::dyn_abi::{DynSolType, DynSolValue, JsonAbiExt, Specifier};
use alloy::json_abi::{JsonAbi, Param};
use alloy_primitives::Bytes;
use eyre::{bail, Result, WrapErr};
use serde::Deserialize;

use crate::contracts::Solids;

/// On-disk layout of a Hardhat artifact (`hh-sol-artifact-1`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HardhatArtifact {
    contract_name: String,
    #[serde(default)]
    source_name: Option<String>,
    abi: JsonAbi,
    #[serde(default)]
    bytecode: String,
    #[serde(default)]
    link_references: serde_json::Map<String, serde_json::Value>,
}

/// Interface definition and creation bytecode of one compiled contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractArtifact {
    name: String,
    source_name: Option<String>,
    abi: JsonAbi,
    bytecode: Bytes,
}

impl ContractArtifact {
    /// The Solids token, compiled into the crate.
    pub fn solids() -> Self {
        Self {
            name: "Solids".to_string(),
            source_name: Some("contracts/Solids.sol".to_string()),
            abi: Solids::abi::contract(),
            bytecode: Solids::BYTECODE.clone(),
        }
    }

    /// Parse a Hardhat artifact.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HardhatArtifact =
            serde_json::from_str(json).wrap_err("Malformed contract artifact")?;

        if !raw.link_references.is_empty() {
            let libraries = raw
                .link_references
                .keys()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            bail!(
                "{} requires library linking ({}), which is not supported",
                raw.contract_name,
                libraries
            );
        }

        let bytecode: Bytes = raw
            .bytecode
            .parse()
            .wrap_err_with(|| format!("Invalid bytecode for {}", raw.contract_name))?;
        if bytecode.is_empty() {
            bail!(
                "{} has no creation bytecode (abstract contract or interface) and cannot be deployed",
                raw.contract_name
            );
        }

        Ok(Self {
            name: raw.contract_name,
            source_name: raw.source_name,
            abi: raw.abi,
            bytecode,
        })
    }

    /// Read and parse a Hardhat artifact file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read contract artifact {}", path.display()))?;
        Self::from_json(&contents)
            .wrap_err_with(|| format!("Failed to load contract artifact {}", path.display()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    pub fn abi(&self) -> &JsonAbi {
        &self.abi
    }

    pub fn bytecode(&self) -> &Bytes {
        &self.bytecode
    }

    /// Constructor parameters; empty when the ABI declares no constructor.
    pub fn constructor_inputs(&self) -> &[Param] {
        self.abi
            .constructor()
            .map(|constructor| constructor.inputs.as_slice())
            .unwrap_or_default()
    }

    /// ABI-encode constructor arguments, checking arity and types.
    pub fn encode_constructor(&self, args: &[DynSolValue]) -> Result<Vec<u8>> {
        match self.abi.constructor() {
            Some(constructor) => constructor
                .abi_encode_input(args)
                .wrap_err_with(|| format!("Invalid constructor arguments for {}", self.name)),
            None if args.is_empty() => Ok(Vec::new()),
            None => bail!(
                "{} declares no constructor but {} argument(s) were given",
                self.name,
                args.len()
            ),
        }
    }

    /// Coerce textual arguments into the constructor's declared types.
    pub fn parse_constructor_args<S: AsRef<str>>(&self, args: &[S]) -> Result<Vec<DynSolValue>> {
        let inputs = self.constructor_inputs();
        if inputs.len() != args.len() {
            bail!(
                "{} constructor expects {} argument(s), got {}",
                self.name,
                inputs.len(),
                args.len()
            );
        }

        inputs
            .iter()
            .zip(args)
            .map(|(param, arg)| {
                let ty: DynSolType = param.resolve()?;
                ty.coerce_str(arg.as_ref()).wrap_err_with(|| {
                    format!(
                        "Invalid value {:?} for constructor parameter `{}` ({})",
                        arg.as_ref(),
                        param.name,
                        param.ty
                    )
                })
            })
            .collect()
    }

    /// Creation bytecode followed by the encoded constructor arguments.
    pub fn deploy_code(&self, args: &[DynSolValue]) -> Result<Bytes> {
        let encoded = self.encode_constructor(args)?;
        Ok([self.bytecode.as_ref(), encoded.as_slice()].concat().into())
    }
}
