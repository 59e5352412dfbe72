use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::error;

use crate::app::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) struct HealthReport {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl HealthReport {
    fn ready() -> Self {
        Self {
            status: "ready",
            detail: None,
        }
    }

    fn degraded(detail: impl Into<String>) -> Self {
        Self {
            status: "degraded",
            detail: Some(detail.into()),
        }
    }
}

/// モデルは起動時に読み込み済みのため、書き出し先ディレクトリのみ確認する。
pub(crate) async fn ready(
    State(state): State<AppState>,
) -> Result<Json<HealthReport>, (StatusCode, Json<HealthReport>)> {
    state.telemetry().record_ready_probe();

    let export_dir = state.orchestrator().export_dir().to_path_buf();
    match tokio::fs::metadata(&export_dir).await {
        Ok(metadata) if metadata.is_dir() => Ok(Json(HealthReport::ready())),
        Ok(_) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthReport::degraded(format!(
                "export dir {} is not a directory",
                export_dir.display()
            ))),
        )),
        Err(error) => {
            error!(%error, export_dir = %export_dir.display(), "export dir check failed");
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthReport::degraded(format!("export dir: {error}"))),
            ))
        }
    }
}

pub(crate) async fn live(State(state): State<AppState>) -> Json<HealthReport> {
    state.telemetry().record_live_probe();
    Json(HealthReport {
        status: "live",
        detail: None,
    })
}
