use alloy::network::EthereumWallet;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use eyre::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

/// Hardhat / anvil local node.
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";
pub const DEFAULT_ENVIRONMENT: &str = "localhost";
/// Where `npx hardhat compile` writes the exchange artifact.
pub const DEFAULT_SOLIDEX_ARTIFACT: &str = "artifacts/contracts/Solidex.sol/Solidex.json";

/// Connection and credential settings for a deployment run
pub struct SolidexClient {
    /// JSON-RPC endpoint of the node
    pub(crate) rpc_url: Url,
    /// Environment name (e.g., "localhost", "sepolia")
    pub(crate) environment: String,
    /// Variables loaded from the environment file
    pub(crate) env_vars: HashMap<String, String>,
}

impl SolidexClient {
    /// Create a new builder for SolidexClient
    pub fn builder() -> SolidexClientBuilder {
        SolidexClientBuilder::default()
    }

    /// Get the JSON-RPC endpoint
    pub fn rpc_url(&self) -> &Url {
        &self.rpc_url
    }

    /// Get the environment name
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Look a key up in the env file, then in the process environment
    pub fn get_env(&self, key: &str) -> Option<String> {
        lookup(&self.env_vars, key)
    }

    /// Private key of the deployer account
    pub fn deployer_privkey(&self) -> Result<String> {
        self.get_env("DEPLOYER_PRIVKEY").ok_or_else(|| {
            eyre::eyre!(
                "DEPLOYER_PRIVKEY not found\n\n\
                 This command signs transactions and needs the deployer's private key.\n\n\
                 Hints:\n\
                 - Set DEPLOYER_PRIVKEY in .env.{}.local or in the process environment\n\
                 - For a local hardhat/anvil node, use one of the funded dev accounts",
                self.environment
            )
        })
    }

    /// Signer built from DEPLOYER_PRIVKEY
    pub fn signer(&self) -> Result<PrivateKeySigner> {
        self.deployer_privkey()?
            .trim()
            .parse::<PrivateKeySigner>()
            .context("Invalid DEPLOYER_PRIVKEY: expected a 32-byte hex private key")
    }

    /// Provider that signs with the deployer key
    pub fn provider(&self) -> Result<DynProvider> {
        let wallet = EthereumWallet::new(self.signer()?);
        Ok(ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(self.rpc_url.clone())
            .erased())
    }

    /// Provider for read calls only; needs no credential
    pub fn read_provider(&self) -> DynProvider {
        ProviderBuilder::new()
            .connect_http(self.rpc_url.clone())
            .erased()
    }

    /// Location of the Solidex Hardhat artifact
    pub fn solidex_artifact_path(&self) -> PathBuf {
        self.get_env("SOLIDEX_ARTIFACT")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SOLIDEX_ARTIFACT))
    }
}

/// Builder for SolidexClient
#[derive(Default)]
pub struct SolidexClientBuilder {
    rpc_url: Option<Url>,
    environment: Option<String>,
    env_file_path: Option<PathBuf>,
}

impl SolidexClientBuilder {
    /// Set the JSON-RPC endpoint
    pub fn with_rpc_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.rpc_url = Some(Url::parse(url.as_ref()).context("Invalid RPC URL")?);
        Ok(self)
    }

    /// Set the environment name (e.g., "localhost", "sepolia")
    pub fn with_environment(mut self, env: impl Into<String>) -> Self {
        self.environment = Some(env.into());
        self
    }

    /// Set custom environment file path
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file_path = Some(path.into());
        self
    }

    /// Build the SolidexClient
    pub fn build(self) -> Result<SolidexClient> {
        let environment = self
            .environment
            .or_else(|| std::env::var("SOLIDEX_ENV").ok())
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());

        let env_file = self
            .env_file_path
            .unwrap_or_else(|| PathBuf::from(format!(".env.{}.local", environment)));

        let env_vars = load_env_file(&env_file)?;

        let rpc_url = match self.rpc_url {
            Some(url) => url,
            None => match lookup(&env_vars, "RPC_URL") {
                Some(url) => Url::parse(&url)
                    .with_context(|| format!("Invalid RPC_URL {:?}", url))?,
                None => Url::parse(DEFAULT_RPC_URL)?,
            },
        };

        Ok(SolidexClient {
            rpc_url,
            environment,
            env_vars,
        })
    }
}

fn lookup(env_vars: &HashMap<String, String>, key: &str) -> Option<String> {
    env_vars
        .get(key)
        .cloned()
        .or_else(|| std::env::var(key).ok())
}

/// Load variables from a dotenv file; a missing file yields none
fn load_env_file(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        debug!("No env file at {}", path.display());
        return Ok(HashMap::new());
    }

    debug!("Loading env file {}", path.display());
    dotenvy::from_path_iter(path)
        .with_context(|| format!("Failed to open env file {}", path.display()))?
        .map(|item| item.with_context(|| format!("Malformed line in {}", path.display())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const HARDHAT_KEY_0: &str =
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn env_file(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join(".env.test.local");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_builder_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let client = SolidexClient::builder()
            .with_environment("localhost")
            .with_env_file(dir.path().join("missing.env"))
            .build()
            .unwrap();
        assert_eq!(client.environment(), "localhost");
        assert_eq!(client.rpc_url().as_str(), "http://127.0.0.1:8545/");
    }

    #[test]
    fn test_builder_with_rpc_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = env_file(&dir, "RPC_URL=http://10.0.0.1:8545\n");
        let client = SolidexClient::builder()
            .with_rpc_url("http://example.com:9545")
            .unwrap()
            .with_env_file(path)
            .build()
            .unwrap();
        assert_eq!(client.rpc_url().as_str(), "http://example.com:9545/");
    }

    #[test]
    fn test_builder_rejects_invalid_url() {
        assert!(SolidexClient::builder().with_rpc_url("not a url").is_err());
    }

    #[test]
    fn test_env_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = env_file(
            &dir,
            &format!(
                "# local hardhat node\n\
                 RPC_URL=http://10.0.0.1:8545\n\
                 DEPLOYER_PRIVKEY={HARDHAT_KEY_0}\n\
                 SOLIDEX_ARTIFACT=build/Solidex.json\n"
            ),
        );
        let client = SolidexClient::builder()
            .with_environment("test")
            .with_env_file(path)
            .build()
            .unwrap();

        assert_eq!(client.environment(), "test");
        assert_eq!(client.rpc_url().as_str(), "http://10.0.0.1:8545/");
        assert_eq!(
            client.solidex_artifact_path(),
            PathBuf::from("build/Solidex.json")
        );
        assert_eq!(
            client.signer().unwrap().address().to_string(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }

    #[test]
    fn test_invalid_rpc_url_in_env_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = env_file(&dir, "RPC_URL=::nope::\n");
        let err = SolidexClient::builder()
            .with_env_file(path)
            .build()
            .err()
            .unwrap();
        assert!(err.to_string().contains("Invalid RPC_URL"));
    }

    #[test]
    fn test_invalid_private_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = env_file(&dir, "DEPLOYER_PRIVKEY=0x1234\n");
        let client = SolidexClient::builder()
            .with_env_file(path)
            .build()
            .unwrap();
        assert!(client.signer().is_err());
        assert!(client.provider().is_err());
    }
}
