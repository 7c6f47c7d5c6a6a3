//! siteasset server entry point.
//!
//! Boots the MCP server on stdio transport. Logging goes to stderr to avoid
//! interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use siteasset_core::{AppConfig, CacheDb, FsAssetSource, Resolver};
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(
        db_path = %config.db_path.display(),
        assets_dir = %config.assets_dir.display(),
        high_density = config.is_high_density(),
        "Starting siteasset server on stdio transport"
    );

    let cache = CacheDb::open(&config.db_path).await?;
    let source = Arc::new(FsAssetSource::new(&config.assets_dir));
    let resolver = Resolver::new(source, Arc::new(cache.clone())).with_internal_scheme(&config.internal_scheme);

    // Requests arriving before this finishes get the pending sentinel.
    let _defaults_loading = resolver.spawn_default_loading();

    let handler = handler::AssetServer::new(resolver, cache, config.is_high_density());
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
