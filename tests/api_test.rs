mod common;

use std::sync::Arc;

use anyhow::{Result, anyhow};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use comment_analyzer::{
    app::{ComponentRegistry, build_router},
    fetch::CommentFetcher,
    inference::{InferenceService, LabelScore, ToxicityScorer},
    observability::Telemetry,
    pipeline::AnalysisOrchestrator,
};
use serde_json::{Value, json};
use tower::ServiceExt;

use common::{CannedComments, LexiconSentiment, orchestrator_with, sample_comments};

fn router(dir: &std::path::Path) -> Router {
    let telemetry = Telemetry::without_tracing().expect("telemetry");
    let orchestrator =
        orchestrator_with(Arc::new(CannedComments(sample_comments())), dir, &telemetry);
    build_router(ComponentRegistry::from_parts(telemetry, orchestrator))
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.clone().oneshot(request).await.expect("request succeeds");
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, body.to_vec())
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    send(router, request).await
}

async fn post_analyze(router: &Router, payload: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request");
    let (status, body) = send(router, request).await;
    (status, serde_json::from_slice(&body).expect("json body"))
}

#[tokio::test]
async fn index_page_is_served() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (status, body) = get(&router(dir.path()), "/").await;

    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).expect("utf-8");
    assert!(html.contains("/api/analyze"));
    assert!(html.contains("/api/options"));
}

#[tokio::test]
async fn options_declare_controls() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (status, body) = get(&router(dir.path()), "/api/options").await;

    assert_eq!(status, StatusCode::OK);
    let controls: Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(controls["max_comments"]["min"], 1);
    assert_eq!(controls["max_comments"]["max"], 100);
    assert_eq!(controls["max_comments"]["default"], 10);
    assert_eq!(
        controls["sentiment_filter"]["choices"],
        json!(["All", "POSITIVE", "NEGATIVE"])
    );
    assert_eq!(controls["toxicity_filter"]["choices"][8], "Not Toxic");
    assert_eq!(controls["outputs"].as_array().map(Vec::len), Some(3));
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_url_returns_error_payload() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (status, body) =
        post_analyze(&router(dir.path()), json!({"video_url": "https://vimeo.com/1"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "failed", "error": "Invalid YouTube URL"}));
}

#[tokio::test(flavor = "multi_thread")]
async fn analyze_returns_table_chart_and_download() {
    let dir = tempfile::tempdir().expect("tempdir");
    let router = router(dir.path());

    let (status, body) = post_analyze(
        &router,
        json!({
            "video_url": "https://youtu.be/abc123XYZ_-",
            "max_comments": 4,
            "sentiment_filter": "All",
            "toxicity_filter": "All"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");
    let rows = body["rows"].as_array().expect("rows");
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[1]["Comment"], "what an idiot take");
    assert_eq!(rows[1]["Toxicity"], "insult");
    assert_eq!(rows[1]["Toxicity Score"], 0.83);
    assert_eq!(body["chart"]["title"], "Sentiment Distribution");
    assert!(body["chart"]["svg"].as_str().expect("svg").starts_with("<svg"));

    let download_url = body["export"]["download_url"].as_str().expect("url");
    let (status, csv) = get(&router, download_url).await;
    assert_eq!(status, StatusCode::OK);
    let csv = String::from_utf8(csv).expect("utf-8");
    assert!(csv.starts_with("Comment,Sentiment,Sentiment Score,Toxicity,Toxicity Score\n"));
    assert_eq!(csv.lines().count(), 5);

    let (_, metrics) = get(&router, "/metrics").await;
    let metrics = String::from_utf8(metrics).expect("utf-8");
    assert!(metrics.contains("comment_analyzer_runs_completed_total 1"));
    assert!(metrics.contains("comment_analyzer_comments_classified_total 4"));
}

#[tokio::test]
async fn download_rejects_foreign_names() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("secrets.csv"), "nope").expect("write");
    let router = router(dir.path());

    let (status, _) = get(&router, "/api/exports/secrets.csv").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&router, "/api/exports/comments-missing.csv").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

struct BrokenToxicity;

impl ToxicityScorer for BrokenToxicity {
    fn score_all(&self, _text: &str) -> Result<Vec<LabelScore>> {
        Err(anyhow!("out of memory"))
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn inference_failure_is_a_generic_server_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let telemetry = Telemetry::without_tracing().expect("telemetry");
    let orchestrator = AnalysisOrchestrator::new(
        CommentFetcher::new(Arc::new(CannedComments(sample_comments()))),
        InferenceService::new(Arc::new(LexiconSentiment), Arc::new(BrokenToxicity)),
        dir.path().to_path_buf(),
        telemetry.metrics_arc(),
    );
    let router = build_router(ComponentRegistry::from_parts(telemetry, orchestrator));

    let (status, body) =
        post_analyze(&router, json!({"video_url": "https://youtu.be/abc"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "analysis failed"}));
    assert_eq!(std::fs::read_dir(dir.path()).expect("read dir").count(), 0);
}

#[tokio::test]
async fn health_probes_report_ready() {
    let dir = tempfile::tempdir().expect("tempdir");
    let router = router(dir.path());

    let (status, body) = get(&router, "/health/live").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<Value>(&body).expect("json")["status"], "live");

    let (status, body) = get(&router, "/health/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<Value>(&body).expect("json")["status"], "ready");
}
