use clap::Parser;
use env_logger::Env;
use log::{error, info};
use server::network::ServerMessage;
use server::{Server, ServerConfig};
use std::time::Duration;

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Server IP address to bind to
    #[clap(short = 'H', long, default_value = "127.0.0.1")]
    host: String,
    /// Server port to listen on
    #[clap(short, long, default_value = "8080")]
    port: u16,
    /// Tick rate of every room (updates per second)
    #[clap(short, long, default_value = "60")]
    tick_rate: u32,
    /// Maximum concurrent connections
    #[clap(short, long, default_value = "64")]
    max_clients: usize,
    /// Seconds of silence before a client is dropped
    #[clap(long, default_value = "5")]
    client_timeout: u64,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        ServerConfig {
            host: args.host,
            port: args.port,
            tick_rate: args.tick_rate,
            max_clients: args.max_clients,
            client_timeout: Duration::from_secs(args.client_timeout),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from(Args::parse());
    let mut server = Server::new(config).await?;
    let control = server.control();

    let mut server_handle = tokio::spawn(async move {
        if let Err(e) = server.run().await {
            error!("Server stopped with error: {}", e);
        }
    });

    tokio::select! {
        result = &mut server_handle => {
            if let Err(e) = result {
                error!("Server task panicked: {}", e);
            }
            return Ok(());
        }
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!("Failed to listen for Ctrl+C: {}", e);
            }
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    }

    if control.send(ServerMessage::Shutdown).is_ok() {
        if let Err(e) = server_handle.await {
            error!("Server task panicked: {}", e);
        }
    }

    Ok(())
}
