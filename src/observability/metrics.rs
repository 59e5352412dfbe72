//! Prometheusメトリクス定義。
use prometheus::{
    Counter, Histogram, Registry, register_counter_with_registry,
    register_histogram_with_registry,
};
use std::sync::Arc;

/// メトリクスコレクター。
#[derive(Debug, Clone)]
pub struct Metrics {
    // カウンター
    pub runs_started: Counter,
    pub runs_completed: Counter,
    pub runs_rejected: Counter,
    pub runs_failed: Counter,
    pub comments_fetched: Counter,
    pub comments_classified: Counter,

    // ヒストグラム
    pub fetch_duration: Histogram,
    pub inference_duration: Histogram,
    pub run_duration: Histogram,
}

impl Metrics {
    /// 新しいメトリクスコレクターを作成する。
    ///
    /// # Errors
    /// 同名のメトリクスが既に登録されている場合。
    pub fn new(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        Ok(Self {
            runs_started: register_counter_with_registry!(
                "comment_analyzer_runs_started_total",
                "Total number of analysis runs started",
                registry
            )?,
            runs_completed: register_counter_with_registry!(
                "comment_analyzer_runs_completed_total",
                "Total number of analysis runs that produced a table",
                registry
            )?,
            runs_rejected: register_counter_with_registry!(
                "comment_analyzer_runs_rejected_total",
                "Runs that ended with an error payload (invalid URL or fetch failure)",
                registry
            )?,
            runs_failed: register_counter_with_registry!(
                "comment_analyzer_runs_failed_total",
                "Runs aborted by an inference or export failure",
                registry
            )?,
            comments_fetched: register_counter_with_registry!(
                "comment_analyzer_comments_fetched_total",
                "Total number of top-level comments fetched",
                registry
            )?,
            comments_classified: register_counter_with_registry!(
                "comment_analyzer_comments_classified_total",
                "Total number of comments classified",
                registry
            )?,
            fetch_duration: register_histogram_with_registry!(
                "comment_analyzer_fetch_duration_seconds",
                "Duration of comment fetches",
                registry
            )?,
            inference_duration: register_histogram_with_registry!(
                "comment_analyzer_inference_duration_seconds",
                "Duration of classifying a single comment",
                registry
            )?,
            run_duration: register_histogram_with_registry!(
                "comment_analyzer_run_duration_seconds",
                "Duration of whole analysis runs",
                registry
            )?,
        })
    }
}
