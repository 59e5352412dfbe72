//! 取得 → 分類 → 表 → 絞り込み → グラフ → CSV の一連の実行。
//!
//! 実行はすべて同期で、コメントは取得順に 1 件ずつ分類する。
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use crate::{
    chart::ChartArtifact,
    classification::classify_comment,
    export::{ExportArtifact, write_export},
    fetch::{CommentFetcher, FetchOutcome},
    inference::InferenceService,
    observability::Metrics,
    table::{LabelFilter, ResultTable},
};

pub const DEFAULT_MAX_COMMENTS: i64 = 10;

fn default_max_comments() -> i64 {
    DEFAULT_MAX_COMMENTS
}

/// 画面の入力値 4 つ。省略された項目は画面の初期値になる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub video_url: String,
    #[serde(default = "default_max_comments")]
    pub max_comments: i64,
    #[serde(default)]
    pub sentiment_filter: LabelFilter,
    #[serde(default)]
    pub toxicity_filter: LabelFilter,
}

impl AnalysisRequest {
    #[must_use]
    pub fn new(video_url: impl Into<String>) -> Self {
        Self {
            video_url: video_url.into(),
            max_comments: DEFAULT_MAX_COMMENTS,
            sentiment_filter: LabelFilter::All,
            toxicity_filter: LabelFilter::All,
        }
    }
}

/// 成功時の 3 出力（表・グラフ・CSV）。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub run_id: Uuid,
    pub table: ResultTable,
    pub chart: ChartArtifact,
    pub export: ExportArtifact,
}

/// 1 回の実行結果。想定内の失敗は `Failed` として返し、グラフと CSV は出さない。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    Completed(AnalysisReport),
    Failed { error: String },
}

#[derive(Clone)]
pub struct AnalysisOrchestrator {
    fetcher: CommentFetcher,
    inference: InferenceService,
    export_dir: PathBuf,
    metrics: Arc<Metrics>,
}

impl std::fmt::Debug for AnalysisOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisOrchestrator")
            .field("export_dir", &self.export_dir)
            .finish_non_exhaustive()
    }
}

impl AnalysisOrchestrator {
    #[must_use]
    pub fn new(
        fetcher: CommentFetcher,
        inference: InferenceService,
        export_dir: PathBuf,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            fetcher,
            inference,
            export_dir,
            metrics,
        }
    }

    #[must_use]
    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// 解析を 1 回実行する。
    ///
    /// # Errors
    /// 推論または CSV 書き出しが失敗した場合。途中までの結果は返さない。
    pub fn run(&self, request: &AnalysisRequest) -> Result<AnalysisOutcome> {
        let run_id = Uuid::new_v4();
        let span = info_span!("analysis_run", %run_id);
        let _entered = span.enter();
        let _timer = self.metrics.run_duration.start_timer();
        self.metrics.runs_started.inc();

        let result = self.execute(run_id, request);
        match &result {
            Ok(AnalysisOutcome::Completed(report)) => {
                self.metrics.runs_completed.inc();
                info!(
                    rows = report.table.len(),
                    export = %report.export.path.display(),
                    "analysis run completed"
                );
            }
            Ok(AnalysisOutcome::Failed { error }) => {
                self.metrics.runs_rejected.inc();
                info!(%error, "analysis run ended with error payload");
            }
            Err(error) => {
                self.metrics.runs_failed.inc();
                warn!(error = %format!("{error:#}"), "analysis run failed");
            }
        }
        result
    }

    fn execute(&self, run_id: Uuid, request: &AnalysisRequest) -> Result<AnalysisOutcome> {
        let fetched = {
            let _timer = self.metrics.fetch_duration.start_timer();
            self.fetcher.fetch(&request.video_url, request.max_comments)
        };
        let comments = match fetched {
            FetchOutcome::Comments { comments } => comments,
            FetchOutcome::Failed { message } => {
                return Ok(AnalysisOutcome::Failed { error: message });
            }
        };
        self.metrics.comments_fetched.inc_by(comments.len() as f64);
        debug!(comments = comments.len(), "fetched comments");

        let mut records = Vec::with_capacity(comments.len());
        for (index, comment) in comments.iter().enumerate() {
            let _timer = self.metrics.inference_duration.start_timer();
            let record = classify_comment(&self.inference, comment)
                .with_context(|| format!("failed to classify comment #{index}"))?;
            self.metrics.comments_classified.inc();
            records.push(record);
        }

        let table = ResultTable::new(records)
            .filtered(&request.sentiment_filter, &request.toxicity_filter);
        debug!(
            rows = table.len(),
            sentiment_filter = %request.sentiment_filter,
            toxicity_filter = %request.toxicity_filter,
            "applied filters"
        );

        let chart = ChartArtifact::sentiment_distribution(&table);
        let export = write_export(&table, &self.export_dir)?;

        Ok(AnalysisOutcome::Completed(AnalysisReport {
            run_id,
            table,
            chart,
            export,
        }))
    }
}
