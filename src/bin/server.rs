//! portfolio-server: HTTP front end for the portfolio report extractor.
//!
//! Environment:
//! - `PORT` listening port (default 5000)
//! - `RUST_LOG` log filter (default `info`)

use std::sync::Arc;

use portfolio_extract::{router, ExtractorBuilder};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_PORT: u16 = 5000;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);

    let extractor = Arc::new(ExtractorBuilder::new().build()?);
    let app = router(extractor);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("portfolio server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
