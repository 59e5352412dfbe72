//! YouTube Data API v3 の commentThreads クライアント。
//!
//! トップレベルコメントのみを 1 リクエストで取得します。ページングと再試行は行いません。
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Url, blocking::Client};
use serde::Deserialize;
use tracing::debug;

/// 動画 ID からトップレベルコメント本文の一覧を得るリモート能力。
pub trait CommentThreadsApi: Send + Sync {
    /// `video_id` のトップレベルコメントを API の返却順で最大 `max_results` 件取得する。
    ///
    /// # Errors
    /// 通信・認証・クォータ・応答形式のいずれかで失敗した場合はエラーを返す。
    fn list_top_level_comments(&self, video_id: &str, max_results: u32) -> Result<Vec<String>>;
}

#[derive(Debug, Deserialize)]
struct CommentThreadListResponse {
    items: Vec<CommentThread>,
}

#[derive(Debug, Deserialize)]
struct CommentThread {
    snippet: CommentThreadSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThreadSnippet {
    top_level_comment: TopLevelComment,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    text_display: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// YouTube クライアントの設定。
#[derive(Debug, Clone)]
pub struct YouTubeConfig {
    pub base_url: String,
    pub api_key: String,
    pub connect_timeout: Duration,
    pub total_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct YouTubeClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl YouTubeClient {
    /// 新しい YouTube クライアントを作成する。
    ///
    /// ブロッキングクライアントのため、非同期ランタイムのワーカースレッド上では構築しないこと。
    ///
    /// # Errors
    /// URL のパースまたは HTTP クライアントの構築に失敗した場合はエラーを返します。
    pub fn new(config: YouTubeConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.total_timeout)
            .build()
            .context("failed to build YouTube HTTP client")?;

        let mut raw_base = config.base_url;
        if !raw_base.ends_with('/') {
            raw_base.push('/');
        }
        let base_url = Url::parse(&raw_base).context("invalid YouTube API base URL")?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
        })
    }

    fn comment_threads_url(&self, video_id: &str, max_results: u32) -> Result<Url> {
        let mut url = self
            .base_url
            .join("commentThreads")
            .context("failed to build commentThreads URL")?;
        url.query_pairs_mut()
            .append_pair("part", "snippet")
            .append_pair("videoId", video_id)
            .append_pair("maxResults", &max_results.to_string())
            .append_pair("textFormat", "plainText")
            .append_pair("key", &self.api_key);
        Ok(url)
    }
}

impl CommentThreadsApi for YouTubeClient {
    fn list_top_level_comments(&self, video_id: &str, max_results: u32) -> Result<Vec<String>> {
        let url = self.comment_threads_url(video_id, max_results)?;
        debug!(video_id, max_results, "requesting comment threads");

        // reqwest のエラー表示には URL（API キーを含む）が入るため取り除く。
        let response = self
            .client
            .get(url)
            .send()
            .map_err(reqwest::Error::without_url)
            .context("YouTube commentThreads request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or(body);
            anyhow::bail!("YouTube API returned error status {status}: {detail}");
        }

        let payload = response
            .json::<CommentThreadListResponse>()
            .map_err(reqwest::Error::without_url)
            .context("failed to deserialize YouTube commentThreads response")?;

        let comments: Vec<String> = payload
            .items
            .into_iter()
            .map(|thread| thread.snippet.top_level_comment.snippet.text_display)
            .collect();

        debug!(video_id, comments = comments.len(), "fetched comment threads");
        Ok(comments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: String) -> YouTubeConfig {
        YouTubeConfig {
            base_url,
            api_key: "test-key".to_string(),
            connect_timeout: Duration::from_secs(3),
            total_timeout: Duration::from_secs(10),
        }
    }

    fn thread(text: &str) -> serde_json::Value {
        serde_json::json!({
            "kind": "youtube#commentThread",
            "snippet": {
                "videoId": "abc123XYZ_-",
                "topLevelComment": {
                    "kind": "youtube#comment",
                    "snippet": {
                        "textDisplay": text,
                        "textOriginal": text,
                        "likeCount": 3
                    }
                },
                "totalReplyCount": 2
            }
        })
    }

    async fn list(server: &MockServer, video_id: &'static str, max: u32) -> Result<Vec<String>> {
        let uri = server.uri();
        tokio::task::spawn_blocking(move || {
            let client = YouTubeClient::new(test_config(uri)).expect("client should build");
            client.list_top_level_comments(video_id, max)
        })
        .await
        .expect("blocking task should join")
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn returns_top_level_texts_in_response_order() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "kind": "youtube#commentThreadListResponse",
            "items": [thread("first!"), thread("second"), thread("first!")]
        });

        Mock::given(method("GET"))
            .and(path("/commentThreads"))
            .and(query_param("part", "snippet"))
            .and(query_param("videoId", "abc123XYZ_-"))
            .and(query_param("maxResults", "25"))
            .and(query_param("textFormat", "plainText"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;

        let comments = list(&server, "abc123XYZ_-", 25)
            .await
            .expect("fetch should succeed");

        assert_eq!(comments, vec!["first!", "second", "first!"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn surfaces_api_error_message() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "error": {
                "code": 403,
                "message": "The video identified by the videoId parameter has disabled comments.",
                "errors": [{"reason": "commentsDisabled"}]
            }
        });

        Mock::given(method("GET"))
            .and(path("/commentThreads"))
            .respond_with(ResponseTemplate::new(403).set_body_json(body))
            .mount(&server)
            .await;

        let error = list(&server, "abc123XYZ_-", 10)
            .await
            .expect_err("403 should fail");
        let message = format!("{error:#}");

        assert!(message.contains("403"), "{message}");
        assert!(message.contains("has disabled comments"), "{message}");
        assert!(!message.contains("test-key"), "{message}");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn malformed_response_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/commentThreads"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"kind": "x"})))
            .mount(&server)
            .await;

        let error = list(&server, "abc123XYZ_-", 10)
            .await
            .expect_err("missing items should fail");

        assert!(format!("{error:#}").contains("failed to deserialize"));
    }

    #[test]
    fn base_url_without_trailing_slash_keeps_version_segment() {
        let client = YouTubeClient::new(test_config(
            "https://www.googleapis.com/youtube/v3".to_string(),
        ))
        .expect("client should build");
        let url = client
            .comment_threads_url("vid", 5)
            .expect("url should build");

        assert_eq!(url.path(), "/youtube/v3/commentThreads");
        assert_eq!(
            url.query(),
            Some("part=snippet&videoId=vid&maxResults=5&textFormat=plainText&key=test-key")
        );
    }
}
