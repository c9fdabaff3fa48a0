//! SentinelLayer CLI - Command-line interface
//!
//! Runs the range proxy that map viewers use to reach COG tiles in
//! the object store.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sentinellayer::config::{
    AppConfig, DEFAULT_CLOUD_COVER_THRESHOLD, DEFAULT_PORT, DEFAULT_UPSTREAM_TIMEOUT_SECS,
};
use sentinellayer::pixel::DEFAULT_MAX_REFLECTANCE;
use sentinellayer::proxy::{ProxyServer, ProxyState};

#[derive(Parser)]
#[command(name = "sentinellayer", about = "Sentinel-2 imagery proxy for map viewers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the COG range proxy.
    Serve(ServeArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// Address to listen on.
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    host: IpAddr,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Upstream request timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_UPSTREAM_TIMEOUT_SECS)]
    upstream_timeout_secs: u64,

    /// Reflectance value that maps to full brightness when stretching
    /// raw bands to 8 bits.
    #[arg(long, default_value_t = DEFAULT_MAX_REFLECTANCE)]
    max_reflectance: f32,

    /// Cloud-cover percentage at or below which a scene counts as
    /// clear.
    #[arg(long, default_value_t = DEFAULT_CLOUD_COVER_THRESHOLD)]
    cloud_cover_threshold: f64,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Serve(args) => serve(args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn serve(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::new()
        .with_bind_addr(SocketAddr::new(args.host, args.port))
        .with_upstream_timeout_secs(args.upstream_timeout_secs)
        .with_max_reflectance(args.max_reflectance)
        .with_cloud_cover_threshold(args.cloud_cover_threshold);

    let state = ProxyState::with_timeout(config.upstream_timeout_secs)?;
    let server = ProxyServer::bind(config.bind_addr, state).await?;

    info!(addr = %config.bind_addr, "starting sentinel proxy");
    server
        .run_until(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown requested");
        })
        .await?;

    Ok(())
}
