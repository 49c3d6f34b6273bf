//! Solidex CLI
//!
//! Deploys the Solids token and the Solidex exchange, then runs the follow-up
//! transactions and read calls against them. Any failure exits with status 1.

use alloy::primitives::Address;
use alloy::providers::Provider;
use alloy_chains::NamedChain;
use clap::{Parser, Subcommand, ValueEnum};
use eyre::{Result, WrapErr};
use solidex::commands::{deploy, exchange, token};
use solidex::health;
use solidex::units::{format_amount, parse_amount, ETHER_DECIMALS, SOLIDS_DECIMALS};
use solidex::{ContractArtifact, ContractFactory, Deployment, DeploymentRecord, SolidexClient};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use url::Url;

#[derive(Debug, Parser)]
#[command(name = "solidex")]
#[command(about = "Deploy and operate the Solids token and the Solidex exchange")]
struct Cli {
    /// JSON-RPC endpoint (overrides RPC_URL from the env file)
    #[arg(short = 'r', long = "rpc-url", global = true)]
    rpc_url: Option<Url>,

    /// Environment name; selects `.env.<ENV>.local` (overrides SOLIDEX_ENV)
    #[arg(short = 'e', long = "env", global = true)]
    environment: Option<String>,

    /// Explicit env file path
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    #[command(flatten)]
    verbose: clap_verbosity::Verbosity,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ContractKind {
    Solids,
    Solidex,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Deploy the Solids token
    DeploySolids {
        /// Save a deployment record (.json or .toml)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Deploy the Solidex exchange for a token
    DeploySolidex {
        /// Token the exchange trades against
        #[arg(long)]
        token: Address,
        /// Solidex Hardhat artifact (overrides SOLIDEX_ARTIFACT)
        #[arg(long)]
        artifact: Option<PathBuf>,
        /// Save a deployment record (.json or .toml)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Deploy both contracts, approve the exchange and seed its liquidity
    Bootstrap {
        /// Tokens to move into the pool
        #[arg(long, default_value = "5")]
        tokens: String,
        /// Ether to move into the pool
        #[arg(long, default_value = "5")]
        eth: String,
        /// Solidex Hardhat artifact (overrides SOLIDEX_ARTIFACT)
        #[arg(long)]
        artifact: Option<PathBuf>,
        /// Save a deployment record (.json or .toml)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Approve a spender for tokens held by the deployer
    Approve {
        /// Token contract
        #[arg(long)]
        token: Address,
        /// Account allowed to spend
        spender: Address,
        /// Amount in whole tokens (e.g., 5 or 0.5)
        amount: String,
    },
    /// Transfer tokens from the deployer
    Transfer {
        /// Token contract
        #[arg(long)]
        token: Address,
        /// Recipient
        to: Address,
        /// Amount in whole tokens (e.g., 5 or 0.5)
        amount: String,
    },
    /// Seed exchange liquidity (approve the exchange for the tokens first)
    Init {
        /// Exchange contract
        dex: Address,
        /// Tokens to move into the pool
        #[arg(long)]
        tokens: String,
        /// Ether to move into the pool
        #[arg(long)]
        eth: String,
    },
    /// Show the token balance of an account [default: the deployer]
    Balance {
        /// Token contract
        #[arg(long)]
        token: Address,
        /// Account to query
        account: Option<Address>,
    },
    /// Show exchange liquidity, optionally for one provider account
    Liquidity {
        /// Exchange contract
        dex: Address,
        /// Liquidity provider to query
        #[arg(long)]
        account: Option<Address>,
    },
    /// Show name, symbol, decimals and supply of a token
    TokenInfo {
        /// Token contract
        token: Address,
    },
    /// Print the unsigned deployment transaction as JSON
    DeployTx {
        #[arg(value_enum)]
        contract: ContractKind,
        /// Token address passed to the Solidex constructor
        #[arg(long)]
        token: Option<Address>,
        /// Solidex Hardhat artifact (overrides SOLIDEX_ARTIFACT)
        #[arg(long)]
        artifact: Option<PathBuf>,
    },
    /// Print a contract's ABI as JSON
    Abi {
        #[arg(value_enum)]
        contract: ContractKind,
        /// Solidex Hardhat artifact (overrides SOLIDEX_ARTIFACT)
        #[arg(long)]
        artifact: Option<PathBuf>,
    },
    /// Show current configuration and connection status
    Status,
    /// Get the address and public key of the deployer wallet
    Deployer,
}

/// Attach a hint to failures whose cause is recognizable
fn format_error(err: &eyre::Report) -> String {
    let message = format!("{:#}", err);
    let lower = message.to_lowercase();

    let hint = if lower.contains("connection refused") || lower.contains("error sending request") {
        Some(
            "Could not reach the RPC node.\n\n\
             Hints:\n\
             - Start a local node with `npx hardhat node` or `anvil`\n\
             - Check --rpc-url or RPC_URL in your env file",
        )
    } else if lower.contains("insufficient funds") {
        Some(
            "The deployer cannot pay for this transaction.\n\n\
             Hints:\n\
             - Fund the DEPLOYER_PRIVKEY account on this network\n\
             - Lower --eth when seeding liquidity",
        )
    } else if lower.contains("execution reverted") || lower.contains("reverted in transaction") {
        Some(
            "The contract rejected the transaction.\n\n\
             Hints:\n\
             - A reverted deployment means the constructor rejected its arguments (check --token)\n\
             - Recompile the contracts if the artifact is stale\n\
             - `init` needs an approval for at least --tokens first\n\
             - `init` only succeeds once per exchange",
        )
    } else if lower.contains("failed to read contract artifact") {
        Some(
            "The Solidex artifact is missing.\n\n\
             Hints:\n\
             - Compile the contracts with `npx hardhat compile`\n\
             - Point --artifact or SOLIDEX_ARTIFACT at the artifact JSON",
        )
    } else {
        None
    };

    match hint {
        Some(hint) => format!("Error: {}\n\n{}", message, hint),
        None => format!("Error: {}", message),
    }
}

fn init_tracing(verbose: &clap_verbosity::Verbosity) -> Result<()> {
    // Configure log level based on verbosity flag
    let log_level = if verbose.is_silent() {
        Level::ERROR
    } else {
        match verbose.log_level_filter() {
            log::LevelFilter::Off => Level::ERROR,
            log::LevelFilter::Error => Level::ERROR,
            log::LevelFilter::Warn => Level::WARN,
            log::LevelFilter::Info => Level::INFO,
            log::LevelFilter::Debug => Level::DEBUG,
            log::LevelFilter::Trace => Level::TRACE,
        }
    };

    // Logs go to stderr so stdout stays parseable (JSON output of abi/deploy-tx).
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .wrap_err("Failed to set global subscriber")
}

fn load_solidex(client: &SolidexClient, artifact: Option<PathBuf>) -> Result<ContractArtifact> {
    let path = artifact.unwrap_or_else(|| client.solidex_artifact_path());
    info!("Loading Solidex artifact from {}", path.display());
    ContractArtifact::load(path)
}

fn resolve_account(client: &SolidexClient, account: Option<Address>) -> Result<Address> {
    match account {
        Some(account) => Ok(account),
        None => Ok(client.signer()?.address()),
    }
}

async fn save_record<P: Provider>(
    client: &SolidexClient,
    provider: &P,
    deployments: Vec<Deployment>,
    output: Option<PathBuf>,
) -> Result<()> {
    let Some(path) = output else {
        return Ok(());
    };

    let chain_id = provider.get_chain_id().await?;
    let deployer = client.signer()?.address();
    let record = deployments.into_iter().fold(
        DeploymentRecord::new(client.environment(), chain_id, deployer),
        DeploymentRecord::with_deployment,
    );
    record.save(&path)?;
    println!("Deployment record saved to: {}", path.display());

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format_error(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.verbose)?;

    // Build the client
    let mut builder = SolidexClient::builder();
    if let Some(url) = &cli.rpc_url {
        builder = builder.with_rpc_url(url.as_str())?;
    }
    if let Some(environment) = cli.environment {
        builder = builder.with_environment(environment);
    }
    if let Some(path) = cli.env_file {
        builder = builder.with_env_file(path);
    }
    let client = builder.build()?;
    info!("Environment {} at {}", client.environment(), client.rpc_url());

    match cli.command {
        Commands::DeploySolids { output } => {
            let provider = client.provider()?;
            let deployment = deploy::deploy_solids(&provider).await?;
            println!("Solids deployed to: {}", deployment.address());

            save_record(&client, &provider, vec![deployment], output).await?;
        }
        Commands::DeploySolidex {
            token,
            artifact,
            output,
        } => {
            let artifact = load_solidex(&client, artifact)?;
            let provider = client.provider()?;
            let deployment = deploy::deploy_solidex(&provider, artifact, token).await?;
            println!("Solidex deployed to: {}", deployment.address());

            save_record(&client, &provider, vec![deployment], output).await?;
        }
        Commands::Bootstrap {
            tokens,
            eth,
            artifact,
            output,
        } => {
            let artifact = load_solidex(&client, artifact)?;
            let params = deploy::BootstrapParams {
                deployer: client.signer()?.address(),
                tokens: parse_amount(&tokens, SOLIDS_DECIMALS)?,
                eth: parse_amount(&eth, ETHER_DECIMALS)?,
            };
            info!("Bootstrapping with {} SLD and {} ETH", tokens, eth);

            let provider = client.provider()?;
            let report = deploy::bootstrap(&provider, artifact, &params).await?;
            println!("{}", report);

            let deployments = vec![report.token.clone(), report.exchange.clone()];
            save_record(&client, &provider, deployments, output).await?;
        }
        Commands::Approve {
            token: token_address,
            spender,
            amount,
        } => {
            let provider = client.provider()?;
            let info = token::token_info(&provider, token_address).await?;
            let amount = parse_amount(&amount, info.decimals)?;

            let tx_hash = token::approve(&provider, token_address, spender, amount).await?;
            println!(
                "Approved {} for {} {}: {}",
                spender,
                format_amount(amount, info.decimals)?,
                info.symbol,
                tx_hash
            );
        }
        Commands::Transfer {
            token: token_address,
            to,
            amount,
        } => {
            let provider = client.provider()?;
            let info = token::token_info(&provider, token_address).await?;
            let amount = parse_amount(&amount, info.decimals)?;

            let tx_hash = token::transfer(&provider, token_address, to, amount).await?;
            println!(
                "Transferred {} {} to {}: {}",
                format_amount(amount, info.decimals)?,
                info.symbol,
                to,
                tx_hash
            );
        }
        Commands::Init { dex, tokens, eth } => {
            let tokens = parse_amount(&tokens, SOLIDS_DECIMALS)?;
            let eth = parse_amount(&eth, ETHER_DECIMALS)?;
            let provider = client.provider()?;

            let tx_hash = exchange::init(&provider, dex, tokens, eth).await?;
            println!("Exchange {} initialized: {}", dex, tx_hash);
        }
        Commands::Balance {
            token: token_address,
            account,
        } => {
            let account = resolve_account(&client, account)?;
            let provider = client.read_provider();
            let info = token::token_info(&provider, token_address).await?;

            let balance = token::balance_of(&provider, token_address, account).await?;
            println!(
                "{}: {} {}",
                account,
                format_amount(balance, info.decimals)?,
                info.symbol
            );
        }
        Commands::Liquidity { dex, account } => {
            let provider = client.read_provider();

            let total = exchange::total_liquidity(&provider, dex).await?;
            println!("Total liquidity: {}", format_amount(total, ETHER_DECIMALS)?);

            if let Some(account) = account {
                let own = exchange::liquidity_of(&provider, dex, account).await?;
                println!(
                    "Liquidity of {}: {}",
                    account,
                    format_amount(own, ETHER_DECIMALS)?
                );
            }
        }
        Commands::TokenInfo { token: token_address } => {
            let info = token::token_info(&client.read_provider(), token_address).await?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Commands::DeployTx {
            contract,
            token,
            artifact,
        } => {
            let (artifact, args) = match contract {
                ContractKind::Solids => (ContractArtifact::solids(), Vec::new()),
                ContractKind::Solidex => {
                    let artifact = load_solidex(&client, artifact)?;
                    let args = match token {
                        Some(token) => deploy::solidex_constructor_args(&artifact, token)?,
                        None => artifact.parse_constructor_args::<&str>(&[])?,
                    };
                    (artifact, args)
                }
            };

            let tx = ContractFactory::new(artifact, ()).deploy_transaction(&args)?;
            println!("{}", serde_json::to_string_pretty(&tx)?);
        }
        Commands::Abi { contract, artifact } => {
            let artifact = match contract {
                ContractKind::Solids => ContractArtifact::solids(),
                ContractKind::Solidex => load_solidex(&client, artifact)?,
            };
            println!("{}", serde_json::to_string_pretty(artifact.abi())?);
        }
        Commands::Status => {
            println!("Configuration Status:");
            println!("  Environment: {}", client.environment());
            println!("  RPC URL: {}", client.rpc_url());

            let ping_result = health::ping_rpc(&client.read_provider()).await;
            if ping_result.success {
                let chain_id = ping_result.chain_id.unwrap_or_default();
                let chain_name = NamedChain::try_from(chain_id)
                    .map(|chain| chain.to_string())
                    .unwrap_or_else(|_| "unknown".to_string());
                println!(
                    "  Connection: OK ({}ms)",
                    ping_result.latency_ms.unwrap_or(0)
                );
                println!("  Chain: {} ({})", chain_id, chain_name);
                println!("  Block: {}", ping_result.block_number.unwrap_or_default());
            } else {
                println!(
                    "  Connection: FAILED - {}",
                    ping_result
                        .error
                        .unwrap_or_else(|| "Unknown error".to_string())
                );
            }

            match client.signer() {
                Ok(signer) => println!("  Deployer: {}", signer.address()),
                Err(_) => println!("  Deployer: not configured (set DEPLOYER_PRIVKEY)"),
            }
        }
        Commands::Deployer => {
            let signer = client.signer()?;
            let address = signer.address();
            let pubkey = signer.credential().verifying_key();

            println!("Deployer Wallet:");
            println!("  Address:    {}", address);
            println!(
                "  Public Key: 0x{}",
                hex::encode(pubkey.to_encoded_point(false).as_bytes())
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_bootstrap_defaults() {
        let cli = Cli::try_parse_from(["solidex", "bootstrap"]).unwrap();
        match cli.command {
            Commands::Bootstrap {
                tokens,
                eth,
                artifact,
                output,
            } => {
                assert_eq!(tokens, "5");
                assert_eq!(eth, "5");
                assert!(artifact.is_none());
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "solidex",
            "status",
            "--rpc-url",
            "http://localhost:9545",
            "--env",
            "sepolia",
        ])
        .unwrap();
        assert_eq!(cli.rpc_url.unwrap().as_str(), "http://localhost:9545/");
        assert_eq!(cli.environment.as_deref(), Some("sepolia"));
    }

    #[test]
    fn test_rejects_invalid_address() {
        assert!(Cli::try_parse_from(["solidex", "token-info", "0x1234"]).is_err());
    }

    #[test]
    fn test_format_error_connection_refused() {
        let err = eyre::eyre!("error sending request for url (http://127.0.0.1:8545/)")
            .wrap_err("Failed to send Solids deployment transaction");
        let message = format_error(&err);
        assert!(message.starts_with("Error: Failed to send Solids deployment transaction"));
        assert!(message.contains("npx hardhat node"));
    }

    #[test]
    fn test_format_error_revert() {
        let err = eyre::eyre!("init reverted in transaction 0xabc");
        assert!(format_error(&err).contains("approval"));
    }

    #[test]
    fn test_format_error_deployment_revert() {
        let err = eyre::eyre!("Solidex deployment reverted in transaction 0xabc");
        let message = format_error(&err);
        assert!(message.contains("reverted deployment"));
        assert!(message.contains("--token"));
        assert!(message.contains("constructor"));
    }

    #[test]
    fn test_format_error_without_hint() {
        let err = eyre::eyre!("something else");
        assert_eq!(format_error(&err), "Error: something else");
    }
}
