use std::sync::Arc;

use axum::Router;
use flarm_tracks::{
    config::Config,
    routes,
    state::AppState,
    store::{PgStore, PositionStore},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flarm_tracks=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    if let Err(err) = config.validate() {
        tracing::error!("{}", err);
        std::process::exit(1);
    }

    let database_url = config.database_url.as_deref().unwrap_or_default();
    let store: Arc<dyn PositionStore> = match PgStore::connect_lazy(
        database_url,
        config.database_max_connections,
        config.query_timeout,
    ) {
        Ok(store) => Arc::new(store),
        Err(err) => {
            tracing::error!("Invalid DATABASE_URL: {}", err);
            std::process::exit(1);
        }
    };

    let port = config.port;
    let state = AppState::new(config, store);

    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::tracks::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("Failed to bind {}: {}", addr, err);
            std::process::exit(1);
        }
    };

    tracing::info!("flarm-tracks listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("Tracks: GET http://{}/api/flarm/:ids", addr);

    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", err);
        std::process::exit(1);
    }
}
