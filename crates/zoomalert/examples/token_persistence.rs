//! Token persistence walkthrough.
//!
//! Shows how the persisted token slot is configured and what survives a
//! restart: the module reloads the record on construction and reports how
//! long the access token remains valid.

use zoomalert::{Config, ZoomAlertModule};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    zoomalert::telemetry::init(&config.log_level);

    println!("Token slot: {}", config.token_file_path.display());

    if config.validate().is_err() {
        println!("Set ZOOM_ACCOUNT_ID, ZOOM_CLIENT_ID, and ZOOM_CLIENT_SECRET to run the demo");
        return Ok(());
    }

    let module = ZoomAlertModule::new(config).await?;

    match module.session().current_tokens().await {
        Some(tokens) => {
            println!("Loaded persisted tokens");
            println!("  refresh token present: {}", tokens.refresh_token.is_some());
            println!("  seconds until expiry:  {}", tokens.seconds_until_expiry());
        }
        None => {
            let (url, _state) = module.authorization_url()?;
            println!("No persisted tokens yet. Authorize first:\n  {url}");
        }
    }

    Ok(())
}
