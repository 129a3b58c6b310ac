use anyhow::Result;
use hvac_service::{
    config::AppConfig,
    http::{self, ApiState},
    loader,
    metrics_server,
    observability,
    sources::HvacCsvSource,
    store::DatasetStore,
};
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Load configuration
    let cfg = AppConfig::load()?;

    // Start metrics server if configured
    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr)?;
    }

    let Some(http_cfg) = &cfg.http else {
        anyhow::bail!("[http] bind_addr is required to run the service");
    };
    let addr: SocketAddr = http_cfg
        .bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid http.bind_addr: {e}"))?;

    // Requests are accepted right away and answered with 503 until the load completes.
    let store = DatasetStore::new();
    let app = http::router(ApiState::new(store.clone(), cfg.chart.clone()));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "chart API listening");
    let server = tokio::spawn(async move { axum::serve(listener, app.into_make_service()).await });

    let source = HvacCsvSource::new(&cfg.source.csv_path);
    match loader::load_into_store(source, cfg.sanitizer, store).await {
        Ok(report) => tracing::info!(
            path = %cfg.source.csv_path.display(),
            accepted = report.accepted,
            rejected = report.rejected,
            "dataset ready"
        ),
        // Already recorded in the store; keep serving so clients see the failure.
        Err(e) => tracing::error!(error = %e, "dataset unavailable for this session"),
    }

    tokio::select! {
        res = server => res??,
        _ = tokio::signal::ctrl_c() => tracing::info!("shutting down"),
    }

    Ok(())
}
