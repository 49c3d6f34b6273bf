//! Deployment records and run summaries.

use alloy_primitives::{Address, U256};
use chrono::{DateTime, Utc};
use eyre::{bail, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::factory::Deployment;
use crate::units::{format_amount, SOLIDS_DECIMALS};

/// Saved summary of one deployment run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub environment: String,
    pub chain_id: u64,
    pub deployer: Address,
    pub deployed_at: DateTime<Utc>,
    pub deployments: Vec<Deployment>,
}

impl DeploymentRecord {
    pub fn new(environment: impl Into<String>, chain_id: u64, deployer: Address) -> Self {
        Self {
            environment: environment.into(),
            chain_id,
            deployer,
            deployed_at: Utc::now(),
            deployments: Vec::new(),
        }
    }

    pub fn with_deployment(mut self, deployment: Deployment) -> Self {
        self.deployments.push(deployment);
        self
    }

    /// Latest deployment of `contract` in this record
    pub fn find(&self, contract: &str) -> Option<&Deployment> {
        self.deployments
            .iter()
            .rev()
            .find(|deployment| deployment.contract() == contract)
    }

    /// Write the record as `.json` or `.toml`, chosen by extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let contents = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)?,
            Some(ext) => bail!("Unsupported file extension: {}. Use .json or .toml", ext),
            None => bail!("No file extension found. Use .json or .toml"),
        };

        fs::write(path, contents)
            .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
        info!("Deployment record saved to: {}", path.display());

        Ok(())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?;

        let record = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&contents)
                .wrap_err_with(|| format!("Malformed deployment record {}", path.display()))?,
            Some("toml") => toml::from_str(&contents)
                .wrap_err_with(|| format!("Malformed deployment record {}", path.display()))?,
            Some(ext) => bail!("Unsupported file extension: {}", ext),
            None => bail!("No file extension found"),
        };

        Ok(record)
    }
}

/// Result of the full deploy-and-seed script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapReport {
    pub token: Deployment,
    pub exchange: Deployment,
    pub deployer_balance: U256,
    pub exchange_balance: U256,
    pub total_liquidity: U256,
}

impl BootstrapReport {
    fn rows(&self) -> Vec<(&'static str, String)> {
        let amount = |value: U256| {
            format_amount(value, SOLIDS_DECIMALS).unwrap_or_else(|_| value.to_string())
        };
        vec![
            ("Solids", self.token.address().to_string()),
            ("Solidex", self.exchange.address().to_string()),
            ("Deployer SLD balance", amount(self.deployer_balance)),
            ("Exchange SLD balance", amount(self.exchange_balance)),
            ("Total liquidity", amount(self.total_liquidity)),
        ]
    }
}

#[cfg(feature = "formatting")]
impl fmt::Display for BootstrapReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use comfy_table::{presets::UTF8_BORDERS_ONLY, Table};

        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY).set_header(vec!["", "Value"]);
        for (label, value) in self.rows() {
            table.add_row(vec![label.to_string(), value]);
        }
        write!(f, "{table}")
    }
}

#[cfg(not(feature = "formatting"))]
impl fmt::Display for BootstrapReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, value) in self.rows() {
            writeln!(f, "{label}: {value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::deployment;
    use alloy_primitives::address;

    const DEPLOYER: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

    fn record() -> DeploymentRecord {
        DeploymentRecord::new("localhost", 31337, DEPLOYER).with_deployment(deployment(
            "Solids",
            address!("0x5FbDB2315678afecb367f032d93F642f64180aa3"),
        ))
    }

    #[test]
    fn test_save_and_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("localhost.json");

        let record = record();
        record.save(&path).unwrap();
        let loaded = DeploymentRecord::from_file(&path).unwrap();

        assert_eq!(loaded, record);
        assert_eq!(
            loaded.find("Solids").map(Deployment::address),
            Some(address!("0x5FbDB2315678afecb367f032d93F642f64180aa3"))
        );
        assert!(loaded.find("Solidex").is_none());
    }

    #[test]
    fn test_save_and_load_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("localhost.toml");

        let record = record();
        record.save(&path).unwrap();
        let loaded = DeploymentRecord::from_file(&path).unwrap();

        assert_eq!(loaded.chain_id, 31337);
        assert_eq!(loaded.deployer, DEPLOYER);
        assert_eq!(loaded.deployments, record.deployments);
    }

    #[test]
    fn test_save_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();

        let err = record().save(dir.path().join("record.yaml")).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension: yaml"));

        let err = record().save(dir.path().join("record")).unwrap_err();
        assert!(err.to_string().contains("No file extension"));
    }

    #[test]
    fn test_bootstrap_report_display() {
        let report = BootstrapReport {
            token: deployment("Solids", address!("0x5FbDB2315678afecb367f032d93F642f64180aa3")),
            exchange: deployment("Solidex", address!("0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512")),
            deployer_balance: U256::from(995u128 * 10u128.pow(18)),
            exchange_balance: U256::from(5u128 * 10u128.pow(18)),
            total_liquidity: U256::from(5u128 * 10u128.pow(18)),
        };

        let rendered = report.to_string();
        assert!(rendered.contains("0x5FbDB2315678afecb367f032d93F642f64180aa3"));
        assert!(rendered.contains("995.000000000000000000"));
        assert!(rendered.contains("Total liquidity"));
    }

    #[test]
    fn test_malformed_record_names_path() {
        let dir = tempfile::tempdir().unwrap();

        let json = dir.path().join("broken.json");
        fs::write(&json, "{\"environment\": ").unwrap();
        let err = DeploymentRecord::from_file(&json).unwrap_err();
        assert!(err.to_string().contains("broken.json"));

        let toml = dir.path().join("broken.toml");
        fs::write(&toml, "chainId = ").unwrap();
        let err = DeploymentRecord::from_file(&toml).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }
}
