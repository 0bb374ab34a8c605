//! Minimal alert send.
//!
//! Loads configuration from the environment, prints the authorization URL if
//! the OAuth flow has not been completed yet, and otherwise sends a plain
//! text alert to `TARGET_EMAIL`.

use zoomalert::{Config, ZoomAlertModule};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    zoomalert::telemetry::init(&config.log_level);
    config.validate()?;

    let email = std::env::var("TARGET_EMAIL")
        .map_err(|_| anyhow::anyhow!("TARGET_EMAIL is required"))?;

    let module = ZoomAlertModule::new(config).await?;

    if !module.is_authorized().await {
        let (url, _state) = module.authorization_url()?;
        println!("User authorization required. Visit:\n  {url}");
        return Ok(());
    }

    module.send_alert(&email, "Hello from the zoomalert example").await?;
    println!("Alert sent to {email}");

    Ok(())
}
