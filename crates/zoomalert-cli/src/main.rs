//! Zoom alert command line tool
//!
//! Two entry points into the library: `send` posts a single alert to a user
//! by email, `serve` runs the HTTP surface. Configuration comes from the
//! environment (see `Config::from_env`); both commands print the
//! authorization URL when the OAuth flow has not been completed yet.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use zoomalert::{Config, ZoomAlertModule};

#[derive(Parser)]
#[command(name = "zoomalert", about = "Send chat alerts to Zoom users", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send a plain text alert to a user by email
    Send {
        /// Recipient email address
        #[arg(long)]
        email: String,

        /// Message to send
        #[arg(long)]
        message: String,
    },

    /// Run the HTTP surface (OAuth flow + alert endpoints)
    Serve {
        /// Listen port (defaults to PORT or 8080)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env();
    zoomalert::telemetry::init(&config.log_level);
    config.validate().context("invalid configuration")?;

    match cli.command {
        Command::Send { email, message } => {
            let module = ZoomAlertModule::new(config).await?;

            if !module.is_authorized().await {
                let (url, _state) = module.authorization_url()?;
                eprintln!("User authorization required. Complete the OAuth flow first:");
                eprintln!("  {url}");
                anyhow::bail!("user authorization required");
            }

            println!("Sending alert to {email}...");
            module.send_alert(&email, &message).await.context("failed to send alert")?;
            println!("Alert sent successfully");
        }
        Command::Serve { port } => {
            let port = port.unwrap_or(config.port);
            let module = Arc::new(ZoomAlertModule::new(config).await?);

            let addr = SocketAddr::from(([0, 0, 0, 0], port));
            println!("Serving on http://{addr}");
            module.serve(addr).await?;
        }
    }

    Ok(())
}
