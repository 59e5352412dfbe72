use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use tracing::error;
use uuid::Uuid;

use crate::{
    app::AppState,
    chart::ChartBar,
    classification::ClassificationRecord,
    pipeline::{AnalysisOutcome, AnalysisReport, AnalysisRequest},
};

#[derive(Debug, Serialize)]
struct ChartPayload {
    title: String,
    bar_gap: f64,
    bars: Vec<ChartBar>,
    svg: String,
}

#[derive(Debug, Serialize)]
struct ExportPayload {
    file_name: String,
    path: String,
    download_url: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum AnalyzeResponse {
    Completed {
        run_id: Uuid,
        rows: Vec<ClassificationRecord>,
        chart: ChartPayload,
        export: ExportPayload,
    },
    Failed {
        error: String,
    },
}

impl From<AnalysisReport> for AnalyzeResponse {
    fn from(report: AnalysisReport) -> Self {
        let svg = report.chart.render_svg();
        let download_url = format!("/api/exports/{}", report.export.file_name);
        Self::Completed {
            run_id: report.run_id,
            rows: report.table.into_rows(),
            chart: ChartPayload {
                title: report.chart.title,
                bar_gap: report.chart.bar_gap,
                bars: report.chart.bars,
                svg,
            },
            export: ExportPayload {
                file_name: report.export.file_name,
                path: report.export.path.display().to_string(),
                download_url,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
}

/// 画面のトリガー。解析をブロッキングスレッドで最後まで実行して 3 出力を返す。
pub(crate) async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> impl IntoResponse {
    let orchestrator = state.orchestrator();
    let joined = tokio::task::spawn_blocking(move || orchestrator.run(&request)).await;

    match joined {
        Ok(Ok(AnalysisOutcome::Completed(report))) => {
            Json(AnalyzeResponse::from(report)).into_response()
        }
        Ok(Ok(AnalysisOutcome::Failed { error })) => {
            Json(AnalyzeResponse::Failed { error }).into_response()
        }
        Ok(Err(error)) => {
            error!(error = %format!("{error:#}"), "analysis failed");
            internal_error()
        }
        Err(error) => {
            error!(%error, "analysis task panicked");
            internal_error()
        }
    }
}

fn internal_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "analysis failed",
        }),
    )
        .into_response()
}
