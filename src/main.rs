use clap::{Parser, Subcommand};
use portfolio_stats::config::Config;
use portfolio_stats::routes::{router, AppState, STATS_PATH};
use portfolio_stats::utils::display::DisplayFormatter;
use portfolio_stats::StatsService;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{debug, info};

#[derive(Parser)]
#[command(about = "Competitive-programming stats for the portfolio site")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the stats endpoint (default)
    Serve {
        /// Overrides PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Fetch stats once and print them
    Show,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match Cli::parse().command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => serve(port).await?,
        Command::Show => {
            debug!("Fetching stats once");
            let aggregate = StatsService::new().collect().await;
            println!("{}", DisplayFormatter::new().format_aggregate(&aggregate));
        }
    }

    Ok(())
}

async fn serve(port: Option<u16>) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let address = SocketAddr::new(config.host, port.unwrap_or(config.port));

    let state = Arc::new(AppState {
        service: StatsService::new(),
    });
    let app = router(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(address).await?;
    info!("Serving {STATS_PATH} on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
