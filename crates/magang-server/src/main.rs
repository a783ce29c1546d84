//! Magang HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use magang::classifier::{CategoryClassifier, ClassifierConfig};
use magang::config::Config;
use magang::embedding::{SentenceConfig, SentenceEmbedder};
use magang::geo::{GeoCache, GeocodeClient, NominatimProvider};
use magang::ranking::RankingService;
use magang_server::gateway::{HandlerState, create_router_with_state};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        geocoder_country = %config.geocoder_country,
        "Magang starting"
    );

    let geo_cache = Arc::new(GeoCache::load(config.geo_cache_path.clone()));
    tracing::info!(
        path = %config.geo_cache_path.display(),
        entries = geo_cache.len(),
        "Geocode cache ready"
    );

    let classifier_config = if let Some(path) = &config.classifier_path {
        ClassifierConfig::new(path.clone()).clean_input(config.clean_before_classify)
    } else {
        tracing::warn!("No MAGANG_CLASSIFIER_PATH configured, running classifier in stub mode");
        ClassifierConfig::stub()
    };
    let classifier = match CategoryClassifier::load(classifier_config) {
        Ok(classifier) => Some(Arc::new(classifier)),
        Err(e) => {
            tracing::error!(
                error = %e,
                "Failed to load category classifier; predict-category will be unavailable"
            );
            None
        }
    };

    let embedder_config = if let Some(path) = &config.embedder_path {
        SentenceConfig::new(path.clone())
    } else {
        tracing::warn!("No MAGANG_EMBEDDER_PATH configured, running embedder in stub mode");
        SentenceConfig::stub()
    };
    let ranking = match SentenceEmbedder::load(embedder_config) {
        Ok(embedder) => {
            let geocoder = GeocodeClient::new(
                NominatimProvider::new(&config.geocoder_url),
                Arc::clone(&geo_cache),
                config.geocoder_country.clone(),
            );
            Some(Arc::new(RankingService::new(Arc::new(embedder), geocoder)))
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                "Failed to load sentence embedder; recommend-internships will be unavailable"
            );
            None
        }
    };

    let state = HandlerState::new(classifier, ranking, Arc::clone(&geo_cache));
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Err(e) = geo_cache.flush() {
        tracing::error!(error = %e, "Failed to flush geocode cache");
    }

    tracing::info!("Magang shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var("MAGANG_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime");

    rt.block_on(async {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
            .expect("failed to build client");

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
