use std::net::SocketAddr;

use clap::Parser;
use monitormach::{
    TracingObserver,
    api::{ApiConfig, ApiState, spawn_api_server},
    config::{CliOverrides, Config, EnvOverrides, read_config_file},
};
use tracing::{info, level_filters::LevelFilter, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Config file (.toml or .json); defaults are used when omitted
    #[arg(short, long)]
    file: Option<String>,

    /// Per-probe timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Address to bind the HTTP surface to
    #[arg(long)]
    bind: Option<SocketAddr>,
}

fn init() {
    dotenv::dotenv().ok();

    let filter = filter::Targets::new().with_targets(vec![
        ("monitormach", LevelFilter::DEBUG),
        ("tower_http", LevelFilter::INFO),
    ]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let config = match &args.file {
        Some(path) => read_config_file(path)?,
        None => Config::default(),
    };

    let cli = CliOverrides {
        timeout_ms: args.timeout_ms,
        bind: args.bind,
    };
    config.layered(&EnvOverrides::from_env(), &cli)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init();
    let args = Args::parse();
    trace!("started with args: {args:?}");

    let config = load_config(&args)?;
    info!(
        targets = config.targets.len(),
        probe_timeout_ms = config.probe_timeout_ms,
        "configuration loaded"
    );

    let state = ApiState::from_config(&config, TracingObserver::shared())?;
    spawn_api_server(ApiConfig::from(&config), state).await?;

    tokio::signal::ctrl_c().await?;
    info!("shutting down");

    Ok(())
}
