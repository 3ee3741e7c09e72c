//! CLI for Specular
//!
//! Subcommands:
//! - `server`: run the broker and its WebSocket server
//! - `client`: relay stdin/stdout to a topic (useful for smoke tests)

use std::process::ExitCode;

use clap::Parser;
use specular::broker::Broker;
use specular::config::load_config;
use specular::transport::start_websocket_server;
use specular::utils::{Result, logging};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "specular", version, about)]
enum Command {
    /// Start the broker and the WebSocket server
    Server {
        /// Override the configured listen port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Send stdin lines to a topic and print what comes back
    Client {
        /// WebSocket URL to connect to
        #[arg(long, default_value = "ws://127.0.0.1:7373/specular/chat")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    logging::init("info");

    let result = match Command::parse() {
        Command::Server { port } => run_server(port).await,
        Command::Client { url } => specular::client::run(&url).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run_server(port: Option<u16>) -> Result<()> {
    let mut settings = load_config()?;
    if let Some(port) = port {
        settings.server.port = port;
    }

    let broker = Broker::new(settings.broker.capacity);
    start_websocket_server(&settings, broker.clone(), shutdown_signal()).await?;

    broker.shutdown()?;
    broker.closed().await;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received. Exiting gracefully."),
        Err(e) => {
            error!("Cannot listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    }
}
