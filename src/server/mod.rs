/// Mock TVL endpoint
/// Serves `GET /tvl/:protocol` from JSON files so the dashboard can run without the real backend

#[cfg(feature = "server")]
pub mod routes;

#[cfg(feature = "server")]
pub mod handlers;

#[cfg(feature = "server")]
pub mod store;

#[cfg(feature = "server")]
pub use routes::create_router;

#[cfg(feature = "server")]
pub use store::TvlStore;

#[cfg(feature = "server")]
pub async fn run(data_dir: &std::path::Path, host: &str, port: u16, enable_cors: bool) -> anyhow::Result<()> {
    use anyhow::Context;
    use std::net::SocketAddr;
    use std::sync::Arc;

    let store = TvlStore::load_dir(data_dir)?;
    if store.is_empty() {
        tracing::warn!(dir = %data_dir.display(), "no <protocol>.json files found");
    }

    let protocols: Vec<String> = store.protocols().into_iter().map(str::to_string).collect();
    let app = create_router(Arc::new(store), enable_cors);

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;

    println!("🚀 DADA TVL Server");
    println!("   📍 http://{}", addr);
    println!();
    println!("📚 Endpoints:");
    for protocol in &protocols {
        println!("   GET  /tvl/{}", protocol);
    }
    println!("   GET  /health");
    println!();

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(%addr, cors = enable_cors, "TVL server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
