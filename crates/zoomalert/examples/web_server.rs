//! Standalone HTTP server.
//!
//! Mounts the module's routes and serves them on the configured port:
//!
//! ```text
//! GET  /api/v1/health            service health
//! GET  /api/v1/auth/status       authorization status
//! GET  /api/v1/oauth/authorize   begin the OAuth flow
//! GET  /api/v1/oauth/callback    OAuth redirect target
//! POST /api/v1/alert             plain text alert
//! POST /api/v1/alert/rich        rich content alert
//! POST /api/v1/alert/templated   severity-templated alert
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use zoomalert::{Config, ZoomAlertModule};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    zoomalert::telemetry::init(&config.log_level);
    config.validate()?;

    let port = config.port;
    let module = Arc::new(ZoomAlertModule::new(config).await?);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("Serving on http://{addr}");
    module.serve(addr).await?;

    Ok(())
}
