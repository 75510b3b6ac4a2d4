//! ADGM Document Review Server
//!
//! Analyzes uploaded DOCX documents against ADGM process checklists and
//! red-flag rules. Provides REST API endpoints for:
//!
//! - Process and document type listing
//! - Batch analysis (JSON report)
//! - Report download (JSON or plain text)
//! - A static ADGM guidance lookup
//!
//! ## Architecture
//!
//! The rule book is compiled once at startup, either the built-in ADGM
//! table or a JSON file passed with `--rules`, and shared by every request.
//! Analysis runs on the blocking pool with a timeout.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use clap::Parser;
use compliance_engine::{ComplianceEngine, RuleBook};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod error;
mod knowledge;
#[cfg(test)]
mod tests;

use api::{
    handle_analyze, handle_ask, handle_health, handle_list_document_types,
    handle_list_processes, handle_report,
};

/// Command-line arguments for the ADGM server
#[derive(Parser, Debug)]
#[command(name = "adgm-server")]
#[command(about = "ADGM document review server for DOCX compliance analysis")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Analysis timeout in milliseconds
    #[arg(long, default_value = "30000")]
    timeout_ms: u64,

    /// Rate limit: requests per second per IP
    #[arg(long, default_value = "10")]
    rate_limit: u32,

    /// Maximum request body size in megabytes
    #[arg(long, default_value = "25")]
    max_upload_mb: usize,

    /// JSON rule book replacing the built-in ADGM rules
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: ComplianceEngine,
    /// Analysis timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            engine: ComplianceEngine::new(),
            timeout_ms: 30_000,
        }
    }
}

/// Routes, CORS and body limit. Rate limiting is added in `main`.
pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handle_health))
        // API endpoints
        .route("/api/processes", get(handle_list_processes))
        .route("/api/document-types", get(handle_list_document_types))
        .route("/api/analyze", post(handle_analyze))
        .route("/api/report", post(handle_report))
        .route("/api/ask", post(handle_ask))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ADGM server on {}:{}", args.host, args.port);

    let book = match &args.rules {
        Some(path) => {
            info!("Loading rule book from {}", path.display());
            Arc::new(RuleBook::from_file(path)?)
        }
        None => RuleBook::builtin(),
    };
    info!(
        "Rule book: {} rules, {} processes",
        book.rules().len(),
        book.processes().len()
    );

    let state = AppState {
        engine: ComplianceEngine::with_rule_book(book),
        timeout_ms: args.timeout_ms,
    };

    // Create rate limiter configuration
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(args.rate_limit.into())
            .burst_size(args.rate_limit * 2)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limit: {}", args.rate_limit))?,
    );

    let app = router(state, args.max_upload_mb * 1024 * 1024).layer(GovernorLayer {
        config: governor_conf,
    });

    // Start server
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Rate limit: {} requests/second per IP", args.rate_limit);
    info!("Upload limit: {} MB", args.max_upload_mb);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
