use std::io::ErrorKind;

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

use crate::{app::AppState, export::is_export_file_name};

/// 書き出し済み CSV を添付ファイルとして返す。
pub(crate) async fn download(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Response {
    if !is_export_file_name(&file_name) {
        debug!(file_name, "rejected export download name");
        return StatusCode::NOT_FOUND.into_response();
    }

    let path = state.orchestrator().export_dir().join(&file_name);
    match tokio::fs::read(&path).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{file_name}\""),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(error) if error.kind() == ErrorKind::NotFound => StatusCode::NOT_FOUND.into_response(),
        Err(error) => {
            error!(%error, path = %path.display(), "failed to read export");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
