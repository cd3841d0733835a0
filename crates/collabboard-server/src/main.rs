//! CollabBoard relay server binary.

use clap::Parser;
use collabboard_server::{Config, ServerError};

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "collabboard_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::parse();
    collabboard_server::run(config).await
}
