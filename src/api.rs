pub(crate) mod analyze;
pub(crate) mod exports;
pub(crate) mod health;
pub(crate) mod metrics;
pub(crate) mod options;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{app::AppState, ui};

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ui::index))
        .route("/health/ready", get(health::ready))
        .route("/health/live", get(health::live))
        .route("/metrics", get(metrics::exporter))
        .route("/api/options", get(options::controls))
        .route("/api/analyze", post(analyze::analyze))
        .route("/api/exports/{file_name}", get(exports::download))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
