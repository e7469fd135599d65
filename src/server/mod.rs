pub mod handlers;
pub mod state;

use crate::config::Config;
use axum::{
    Router,
    extract::Request,
    http::{HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use state::AppState;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Header carrying the service version on every response.
const VERSION_HEADER: &str = "x-rankrelay-version";

async fn version_header(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    response.headers_mut().insert(
        VERSION_HEADER,
        HeaderValue::from_static(env!("CARGO_PKG_VERSION")),
    );
    response
}

/// Build the router with all routes and shared state.
///
/// Split out from [`start`] so tests can drive the router directly via
/// `tower::ServiceExt::oneshot` without binding a listener.
pub fn build_router(config: Config) -> Router {
    let state = AppState::new(config);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        .route("/", get(handlers::health::health_check))
        .route("/health", get(handlers::health::health_check))
        .route(
            "/rest/v1/rank/{region}/{name}/{tag}",
            get(handlers::rank::get_rank),
        )
        .route("/metrics", get(handlers::metrics::metrics_text))
        .layer(middleware::from_fn(version_header))
        .layer(cors)
        .with_state(state)
}

/// Start the Axum HTTP server
pub async fn start(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("0.0.0.0:{}", config.port);

    let app = build_router(config);

    // Bind TCP listener
    let listener = match tokio::net::TcpListener::bind(addr.as_str()).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to address {}: {}", addr, e);
            return Err(e.into());
        }
    };

    info!("🚀 Server listening on http://{}", addr);

    // Start serving
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
