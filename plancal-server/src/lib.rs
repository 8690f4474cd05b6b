//! HTTP front of the planning converter.
//!
//! A pdf posted to `/upload` runs through the planner; the resulting
//! spreadsheet and calendar are then served under `/download/{kind}/{id}`.

mod handlers;
mod types;

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use plancal_core::{OcrEngine, Planner};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

pub use handlers::*;
pub use types::*;

/// Largest accepted upload body.
pub const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// State shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// The one OCR engine; uploads take turns on it
    pub engine: Arc<Mutex<Box<dyn OcrEngine>>>,
    pub planner: Arc<Planner>,
    /// Where `planning_<id>` files are written and served from
    pub output_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(
        engine: impl OcrEngine + 'static,
        planner: Planner,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            engine: Arc::new(Mutex::new(Box::new(engine))),
            planner: Arc::new(planner),
            output_dir: Arc::new(output_dir.into()),
        }
    }
}

/// Build the router with all endpoints
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/upload", post(upload))
        .route("/download/xlsx/{id}", get(download_xlsx))
        .route("/download/ics/{id}", get(download_ics))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve on an already bound listener.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, build_router(state)).await
}

pub async fn start_server(addr: &str, state: AppState) -> Result<(), std::io::Error> {
    tracing::info!("Starting planning server on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    serve(listener, state).await
}
