//! Preliminary Title Report Server
//!
//! Serves the title report engine over HTTP:
//!
//! - Full analysis of raw report text and/or a narrative summary
//! - Single-clause requirement classification
//! - The requirement taxonomy with default severities
//!
//! Rate limiting is per client IP via tower-governor; request bodies are
//! capped by axum's body limit.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use clap::Parser;
use prelim_engine::TitleEngine;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod error;

use api::{handle_analyze, handle_classify, handle_health, handle_list_requirement_types};

/// Command-line arguments for the title report server
#[derive(Parser, Debug)]
#[command(name = "prelim-server")]
#[command(about = "Preliminary title report analysis server")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Rate limit: requests per second per IP
    #[arg(long, default_value = "10")]
    rate_limit: u32,

    /// Maximum request body size in bytes
    #[arg(long, default_value = "2097152")]
    max_body_bytes: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<TitleEngine>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            engine: Arc::new(TitleEngine::new()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// API routes with the body limit applied; no rate limiting or CORS
pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handle_health))
        // API endpoints
        .route("/api/requirement-types", get(handle_list_requirement_types))
        .route("/api/classify", post(handle_classify))
        .route("/api/analyze", post(handle_analyze))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting title report server on {}:{}", args.host, args.port);

    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(args.rate_limit.into())
            .burst_size(args.rate_limit.saturating_mul(2))
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limit: {}", args.rate_limit))?,
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = router(AppState::new(), args.max_body_bytes)
        .layer(GovernorLayer {
            config: governor_conf,
        })
        .layer(cors);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Rate limit: {} requests/second per IP", args.rate_limit);
    info!("Max body size: {} bytes", args.max_body_bytes);

    // The governor keys on the peer address
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
