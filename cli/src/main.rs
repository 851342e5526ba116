//! solsend: a command line wallet for sending SOL.

mod config;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use solsend_crypto::{generate_keypair, write_keypair_file};
use solsend_rpc::{LedgerClient, RpcClient};
use solsend_types::{Cluster, Commitment, Timestamp};
use solsend_utils::LogFormat;
use solsend_wallet_core::dashboard::lock;
use solsend_wallet_core::{Dashboard, KeypairWallet, TransferController, WalletSession};

use crate::config::ClientConfig;

#[derive(Parser)]
#[command(name = "solsend", version, about = "Send SOL and inspect a wallet account")]
struct Cli {
    /// Path to a TOML configuration file. Flags and env vars override it.
    #[arg(long, global = true, env = "SOLSEND_CONFIG")]
    config: Option<PathBuf>,

    /// Cluster: "devnet", "testnet", "mainnet-beta" or "localnet".
    #[arg(long, global = true, env = "SOLSEND_CLUSTER")]
    cluster: Option<Cluster>,

    /// JSON-RPC endpoint, overriding the cluster's public one.
    #[arg(long, global = true, env = "SOLSEND_URL")]
    url: Option<String>,

    /// Keypair file of the wallet account.
    #[arg(long, global = true, env = "SOLSEND_KEYPAIR")]
    keypair: Option<PathBuf>,

    /// Commitment level: "processed", "confirmed" or "finalized".
    #[arg(long, global = true, env = "SOLSEND_COMMITMENT")]
    commitment: Option<Commitment>,

    /// Log level, e.g. "warn" or "info,solsend_rpc=debug".
    #[arg(long, global = true, env = "SOLSEND_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, global = true, env = "SOLSEND_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the wallet's account address.
    Address,
    /// Print the wallet's balance.
    Balance,
    /// List the most recent transfers.
    History {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Transfer SOL and wait for confirmation.
    Send {
        /// Base58 account address of the recipient.
        recipient: String,
        /// Amount in SOL, e.g. "0.5".
        amount: String,
    },
    /// Generate a new keypair file.
    Keygen {
        /// Where to write the keypair; defaults to the configured keypair path.
        #[arg(long)]
        outfile: Option<PathBuf>,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    fn resolve_config(&self) -> anyhow::Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::from_toml_file(path)?,
            None => ClientConfig::default(),
        };
        if let Some(cluster) = self.cluster {
            config.cluster = cluster;
        }
        if let Some(url) = &self.url {
            config.rpc_url = Some(url.clone());
        }
        if let Some(path) = &self.keypair {
            config.keypair_path = path.clone();
        }
        if let Some(commitment) = self.commitment {
            config.commitment = commitment;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        Ok(config)
    }
}

type Controller = TransferController<RpcClient, KeypairWallet>;

fn controller(config: &ClientConfig, history_limit: usize) -> anyhow::Result<Controller> {
    let wallet = KeypairWallet::from_file(&config.keypair_path)
        .with_context(|| format!("loading keypair {}", config.keypair_path.display()))?;
    let ledger = RpcClient::with_config(config.endpoint(), config.rpc_client_config())?;
    let dashboard = Dashboard::new(config.cluster)
        .with_history_limit(history_limit)
        .shared();
    let mut settings = config.transfer_settings();
    settings.history_limit = history_limit;
    Ok(TransferController::new(ledger, wallet, dashboard, settings))
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    solsend_utils::init_logging(config.log_format, &config.log_level)?;
    tracing::debug!(cluster = %config.cluster, endpoint = config.endpoint(), "configuration loaded");

    match cli.command {
        Command::Address => {
            let wallet = KeypairWallet::from_file(&config.keypair_path)?;
            if let Some(account) = wallet.current_account() {
                println!("{account}");
            }
        }
        Command::Balance => {
            let wallet = KeypairWallet::from_file(&config.keypair_path)?;
            let account = wallet
                .current_account()
                .context("no wallet connected")?;
            let ledger = RpcClient::with_config(config.endpoint(), config.rpc_client_config())?;
            let balance = ledger.get_balance(&account, config.commitment).await?;
            println!("{balance}");
        }
        Command::History { limit } => {
            let limit = limit.unwrap_or(config.history_limit);
            let controller = controller(&config, limit)?;
            let account = controller
                .wallet()
                .current_account()
                .context("no wallet connected")?;
            lock(controller.dashboard()).set_account(Some(account));
            controller.refresh_history(&account, limit).await?;
            print!("{}", render::history(&lock(controller.dashboard()), Timestamp::now()));
        }
        Command::Send { recipient, amount } => {
            let controller = controller(&config, config.history_limit)?;
            controller.sync_account().await;
            {
                let mut view = lock(controller.dashboard());
                print!("{}", render::account_summary(&view));
                let form = view.form_mut();
                form.recipient = recipient;
                form.amount = amount;
            }

            let outcome = controller
                .submit_form()
                .await
                .context("recipient and amount are both required")?;

            let view = lock(controller.dashboard());
            if let Some(text) = render::submission(&view, Timestamp::now()) {
                match &outcome {
                    Ok(_) => print!("{text}"),
                    Err(_) => eprint!("{text}"),
                }
            }
            print!("{}", render::account_summary(&view));
            if outcome.is_err() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Keygen { outfile, force } => {
            let path = outfile.unwrap_or(config.keypair_path);
            let keypair = generate_keypair();
            write_keypair_file(&keypair, &path, force)?;
            println!("Wrote new keypair to {}", path.display());
            println!("Account: {}", keypair.public);
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_config_file() {
        let cli = Cli::parse_from([
            "solsend",
            "--cluster",
            "testnet",
            "--commitment",
            "finalized",
            "--log-format",
            "json",
            "history",
            "--limit",
            "3",
        ]);
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.cluster, Cluster::Testnet);
        assert_eq!(config.commitment, Commitment::Finalized);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(matches!(cli.command, Command::History { limit: Some(3) }));
    }

    #[test]
    fn send_takes_recipient_and_amount() {
        let cli = Cli::parse_from(["solsend", "send", "4Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7D4xWLs4gDB4T", "0.5"]);
        match cli.command {
            Command::Send { recipient, amount } => {
                assert_eq!(recipient, "4Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7D4xWLs4gDB4T");
                assert_eq!(amount, "0.5");
            }
            _ => panic!("expected send"),
        }
    }

    #[test]
    fn unknown_cluster_is_rejected() {
        assert!(Cli::try_parse_from(["solsend", "--cluster", "moon", "balance"]).is_err());
    }
}
