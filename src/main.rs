use anyhow::Result;
use clap::Parser;
use leverage_desk::config::TESTNET_REST_URL;
use leverage_desk::shell;
use leverage_desk::types::Config;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "levd")]
#[command(about = "Binance USDT-M perpetuals leverage desk")]
struct Args {
    /// Point at the futures testnet instead of mainnet
    #[arg(long)]
    testnet: bool,

    /// Override the futures REST base URL
    #[arg(long)]
    rest_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let mut config = Config::load()?;
    if args.testnet {
        config.rest_url = TESTNET_REST_URL.to_string();
    }
    if let Some(rest_url) = args.rest_url {
        config.rest_url = rest_url;
    }

    shell::run_shell(config).await
}
