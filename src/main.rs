use axum::routing::get;
use axum::{middleware::from_fn_with_state, Json, Router};
use dotenvy::dotenv;
use lori::helpers::env_value;
use lori::{log_raw, Options};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing_subscriber::EnvFilter;

async fn index() -> Json<Value> {
    Json(json!({ "name": "lori" }))
}

async fn health() -> &'static str {
    "ok"
}

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let logger = Arc::clone(lori::global());
    logger.configure(Options::from_env());

    // `/health` goes through the `from_fn` handler, everything else through the layer.
    let app = Router::new()
        .route("/", get(index).post(index).delete(index))
        .layer(logger.middleware())
        .merge(
            Router::new()
                .route("/health", get(health))
                .route_layer(from_fn_with_state(Arc::clone(&logger), lori::request_logger)),
        )
        .layer(ServiceBuilder::new().layer(tower_http::trace::TraceLayer::new_for_http()));

    let port = env_value("PORT")
        .and_then(|port| port.parse::<u16>().ok())
        .unwrap_or(3000);
    let address = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(address).await?;
    tracing::debug!(%address, "listener bound");

    log_raw!(logger, "Server running at {}", address);
    logger.info("waiting for requests");

    axum::serve(listener, app).await
}
