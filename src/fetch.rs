//! URL から動画 ID を解決し、トップレベルコメントを取得する。
//!
//! 想定内の失敗（不正な URL、リモート障害）は [`FetchOutcome::Failed`] として値で返し、
//! 呼び出し側へ例外的に伝播させない。
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::{clients::CommentThreadsApi, video_id::extract_video_id};

pub const INVALID_URL_MESSAGE: &str = "Invalid YouTube URL";
pub const MIN_RESULTS: i64 = 1;
pub const MAX_RESULTS: i64 = 100;

/// 取得結果。成功と失敗は `status` フィールドで判別する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchOutcome {
    Comments { comments: Vec<String> },
    Failed { message: String },
}

impl FetchOutcome {
    fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}

/// 取得件数を API が受け付ける 1..=100 に丸める。
#[must_use]
pub fn clamp_max_results(requested: i64) -> u32 {
    u32::try_from(requested.clamp(MIN_RESULTS, MAX_RESULTS)).unwrap_or(1)
}

#[derive(Clone)]
pub struct CommentFetcher {
    api: Arc<dyn CommentThreadsApi>,
}

impl std::fmt::Debug for CommentFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentFetcher")
            .field("api", &"<CommentThreadsApi>")
            .finish()
    }
}

impl CommentFetcher {
    #[must_use]
    pub fn new(api: Arc<dyn CommentThreadsApi>) -> Self {
        Self { api }
    }

    /// 動画 URL のトップレベルコメントを取得する。
    ///
    /// 失敗は常に [`FetchOutcome::Failed`] に変換される。
    #[must_use]
    pub fn fetch(&self, video_url: &str, max_results: i64) -> FetchOutcome {
        let Some(video_id) = extract_video_id(video_url) else {
            debug!(video_url, "no video id in url");
            return FetchOutcome::failed(INVALID_URL_MESSAGE);
        };

        let bounded = clamp_max_results(max_results);
        if i64::from(bounded) != max_results {
            debug!(requested = max_results, bounded, "clamped comment count");
        }

        match self.api.list_top_level_comments(video_id, bounded) {
            Ok(comments) => FetchOutcome::Comments { comments },
            Err(error) => {
                warn!(video_id, error = %format!("{error:#}"), "comment fetch failed");
                FetchOutcome::failed(format!("{error:#}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use anyhow::{Result, anyhow};

    use super::*;

    #[derive(Default)]
    struct RecordingApi {
        calls: Mutex<Vec<(String, u32)>>,
        fail_with: Option<String>,
    }

    impl CommentThreadsApi for RecordingApi {
        fn list_top_level_comments(&self, video_id: &str, max_results: u32) -> Result<Vec<String>> {
            self.calls
                .lock()
                .expect("calls mutex")
                .push((video_id.to_string(), max_results));
            match &self.fail_with {
                Some(message) => Err(anyhow!(message.clone()).context("request failed")),
                None => Ok(vec!["great video".to_string(), "meh".to_string()]),
            }
        }
    }

    #[test]
    fn invalid_url_never_reaches_the_api() {
        let api = Arc::new(RecordingApi::default());
        let fetcher = CommentFetcher::new(api.clone());

        let outcome = fetcher.fetch("https://example.com/video", 10);

        assert_eq!(
            outcome,
            FetchOutcome::Failed {
                message: "Invalid YouTube URL".to_string()
            }
        );
        assert!(api.calls.lock().expect("calls mutex").is_empty());
    }

    #[test]
    fn passes_resolved_id_and_bound_to_api() {
        let api = Arc::new(RecordingApi::default());
        let fetcher = CommentFetcher::new(api.clone());

        let outcome = fetcher.fetch("https://youtu.be/abc123XYZ_-", 25);

        assert_eq!(
            outcome,
            FetchOutcome::Comments {
                comments: vec!["great video".to_string(), "meh".to_string()]
            }
        );
        assert_eq!(
            api.calls.lock().expect("calls mutex").as_slice(),
            &[("abc123XYZ_-".to_string(), 25)]
        );
    }

    #[test]
    fn out_of_range_counts_are_clamped() {
        assert_eq!(clamp_max_results(0), 1);
        assert_eq!(clamp_max_results(-7), 1);
        assert_eq!(clamp_max_results(1), 1);
        assert_eq!(clamp_max_results(100), 100);
        assert_eq!(clamp_max_results(5000), 100);
    }

    #[test]
    fn remote_failure_becomes_error_value() {
        let api = Arc::new(RecordingApi {
            fail_with: Some("quotaExceeded".to_string()),
            ..RecordingApi::default()
        });
        let fetcher = CommentFetcher::new(api);

        let outcome = fetcher.fetch("https://www.youtube.com/watch?v=abc", 10);

        assert_eq!(
            outcome,
            FetchOutcome::Failed {
                message: "request failed: quotaExceeded".to_string()
            }
        );
    }

    #[test]
    fn outcome_serializes_with_status_marker() {
        let failed = serde_json::to_value(FetchOutcome::failed("boom")).expect("serialize");
        assert_eq!(failed, serde_json::json!({"status": "failed", "message": "boom"}));

        let ok = serde_json::to_value(FetchOutcome::Comments {
            comments: vec!["a".to_string()],
        })
        .expect("serialize");
        assert_eq!(ok, serde_json::json!({"status": "comments", "comments": ["a"]}));
    }
}
