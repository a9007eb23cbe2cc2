//! Redwave server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use redwave_api::{middleware::AppState, router as api_router};
use redwave_common::{Config, TokenManager};
use redwave_core::{
    ContentService, DirectoryService, DonationRequestService, FundService, HttpPaymentGateway,
    NoOpPaymentGateway, PaymentGateway, StatsService, UserService,
};
use redwave_db::repositories::{
    ContentRepository, DonationRequestRepository, FundRepository, GeoRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "redwave=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting redwave server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = redwave_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    redwave_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let geo_repo = GeoRepository::new(Arc::clone(&db));
    let request_repo = DonationRequestRepository::new(Arc::clone(&db));
    let fund_repo = FundRepository::new(Arc::clone(&db));
    let content_repo = ContentRepository::new(Arc::clone(&db));

    // Payment gateway: real provider when configured, otherwise a stub that
    // mints fake client secrets for local development
    let payment_gateway: Arc<dyn PaymentGateway> =
        match HttpPaymentGateway::from_config(&config.payment) {
            Some(gateway) => Arc::new(gateway),
            None => {
                warn!("No payment provider configured, using no-op gateway");
                Arc::new(NoOpPaymentGateway)
            }
        };

    // Initialize services
    let user_service = UserService::new(user_repo.clone());
    let directory_service = DirectoryService::new(user_repo.clone(), geo_repo);
    let donation_request_service = DonationRequestService::new(request_repo.clone());
    let stats_service = StatsService::new(user_repo, request_repo, fund_repo.clone());
    let fund_service = FundService::new(fund_repo, payment_gateway);
    let content_service = ContentService::new(content_repo);

    let token_manager = Arc::new(TokenManager::new(
        &config.auth.token_secret,
        config.auth.token_ttl_secs,
    ));

    // Create app state
    let state = AppState {
        user_service,
        directory_service,
        donation_request_service,
        stats_service,
        fund_service,
        content_service,
        token_manager,
    };

    // CORS: explicit origins when configured, any otherwise
    let cors = if config.server.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<axum::http::HeaderValue> = config
            .server
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Build router
    let app = Router::new()
        .merge(api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            redwave_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
