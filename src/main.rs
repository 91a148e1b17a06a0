pub mod analysis_service;
pub mod api;
pub mod app;
pub mod config;

use crate::analysis_service::AnalysisService;
use crate::app::AppState;
use std::{net::SocketAddr, sync::Arc};
use stockscope::services::YahooClient;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("stockscope=info,stockscope_server=info")
    });
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let app_config = match config::AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    // Set a global span with node_name for all subsequent logs
    let _span = tracing::info_span!("node", name = %app_config.node_name).entered();

    tracing::info!("Starting stockscope-server");
    tracing::info!(
        environment = %app_config.environment,
        port = app_config.port,
        provider = %app_config.provider_base_url,
        "Loaded configuration"
    );

    let source = match YahooClient::with_options(
        &app_config.provider_base_url,
        app_config.request_timeout,
        true,
    ) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize price source");
            std::process::exit(1);
        }
    };

    let Some(governor_conf) = GovernorConfigBuilder::default()
        .per_second(app_config.rate_limit_per_second)
        .burst_size(app_config.rate_limit_burst)
        .finish()
    else {
        tracing::error!("Invalid rate limit configuration");
        std::process::exit(1);
    };

    let port = app_config.port;
    let app_state = AppState {
        service: Arc::new(AnalysisService::new(Arc::new(source))),
        config: Arc::new(app_config),
    };

    let app = app::router(app_state)
        .layer(GovernorLayer::new(Arc::new(governor_conf)))
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "Server listening");
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Failed to bind");
            std::process::exit(1);
        }
    };

    let service = app.into_make_service_with_connect_info::<SocketAddr>();
    if let Err(e) = axum::serve(listener, service).await {
        tracing::error!(error = %e, "Server stopped with error");
    }
}
