//! evm-wallet-kit CLI
//!
//! Inspect the built-in chain registry and resolve or download
//! content-addressed resources.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use evm_wallet_kit::chains::ChainRegistry;
use evm_wallet_kit::storage::{download, resolve_scheme, DownloadOptions};
use evm_wallet_kit::wallet::builtin_wallets;

/// evm-wallet-kit: SDK tooling for EVM-compatible chains
#[derive(Parser)]
#[command(name = "evm-wallet-kit")]
#[command(about = "Chain registry and content-addressed storage tooling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in chain registry
    ListChains,

    /// Show one chain record as JSON
    Chain {
        /// Chain id or slug (e.g. 25 or cronos)
        #[arg(value_name = "ID_OR_SLUG")]
        chain: String,
    },

    /// List the built-in wallet brands
    ListWallets,

    /// Resolve a content URI to a gateway URL
    Resolve {
        /// URI to resolve (ipfs:// or http(s)://)
        #[arg(value_name = "URI")]
        uri: String,

        /// IPFS gateway prefix
        #[arg(short, long)]
        gateway: Option<String>,
    },

    /// Download a content-addressed resource
    Download {
        /// URI to download (ipfs:// or http(s)://)
        #[arg(value_name = "URI")]
        uri: String,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// IPFS gateway prefix
        #[arg(short, long)]
        gateway: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    let cli = Cli::parse();

    match cli.command {
        Commands::ListChains => {
            let registry = ChainRegistry::builtin();
            let mut chains: Vec<_> = registry.iter().collect();
            chains.sort_by_key(|chain| chain.chain_id);

            println!("{:>8}  {:<20} {:<12} {}", "CHAIN ID", "NAME", "SLUG", "CURRENCY");
            for chain in chains {
                println!(
                    "{:>8}  {:<20} {:<12} {}",
                    chain.chain_id, chain.name, chain.slug, chain.native_currency.symbol
                );
            }
        }
        Commands::Chain { chain } => {
            let registry = ChainRegistry::builtin();
            let record = registry.resolve(&chain)?;
            println!("{}", serde_json::to_string_pretty(record)?);
        }
        Commands::ListWallets => {
            println!("{:<16} {:<16} {}", "ID", "NAME", "VENDOR FLAG");
            for wallet in builtin_wallets() {
                println!("{:<16} {:<16} {}", wallet.id, wallet.name, wallet.vendor_flag);
            }
        }
        Commands::Resolve { uri, gateway } => {
            let gateway =
                gateway.unwrap_or_else(|| evm_wallet_kit::storage::DEFAULT_IPFS_GATEWAY.to_string());
            println!("{}", resolve_scheme(&uri, &gateway)?);
        }
        Commands::Download { uri, output, gateway } => {
            let mut options = DownloadOptions::default();
            if let Some(gateway) = gateway {
                options.gateway = gateway;
            }

            info!(%uri, "downloading");
            let bytes = download(&uri, &options).await?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, &bytes).await?;
                    info!(path = %path.display(), size = bytes.len(), "saved");
                }
                None => {
                    use std::io::Write;
                    std::io::stdout().write_all(&bytes)?;
                }
            }
        }
    }

    Ok(())
}
