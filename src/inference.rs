//! 感情・有害性スコアリング能力の抽象と、起動時に一度だけ構築するサービスハンドル。
mod bert;

use std::sync::Arc;

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::info;

pub use bert::{BertSentimentScorer, BertToxicityScorer, ToxicityModelSource, normalize_toxicity_label};

/// ラベルと確信度の組。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

impl LabelScore {
    #[must_use]
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// テキストから単一の感情ラベルを返す能力。
pub trait SentimentScorer: Send + Sync {
    /// # Errors
    /// 推論に失敗した場合はエラーを返す。
    fn score(&self, text: &str) -> Result<LabelScore>;
}

/// テキストから全有害性カテゴリのスコアを返す能力。
///
/// 返却順はモデルのカテゴリ列挙順であること。
pub trait ToxicityScorer: Send + Sync {
    /// # Errors
    /// 推論に失敗した場合はエラーを返す。
    fn score_all(&self, text: &str) -> Result<Vec<LabelScore>>;
}

/// 2 つの推論能力をまとめたハンドル。プロセス起動時に構築し、明示的に受け渡す。
#[derive(Clone)]
pub struct InferenceService {
    sentiment: Arc<dyn SentimentScorer>,
    toxicity: Arc<dyn ToxicityScorer>,
}

impl std::fmt::Debug for InferenceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceService")
            .field("sentiment", &"<SentimentScorer>")
            .field("toxicity", &"<ToxicityScorer>")
            .finish()
    }
}

impl InferenceService {
    #[must_use]
    pub fn new(sentiment: Arc<dyn SentimentScorer>, toxicity: Arc<dyn ToxicityScorer>) -> Self {
        Self {
            sentiment,
            toxicity,
        }
    }

    /// rust-bert のモデルを読み込む。
    /// 初回はモデルのダウンロードが走るため時間がかかる。
    ///
    /// # Errors
    /// いずれかのモデルの読み込みに失敗した場合はエラーを返す。
    pub fn load(toxicity_source: ToxicityModelSource) -> Result<Self> {
        info!(source = ?toxicity_source, "loading inference models");
        // モデル構築はブロッキングかつ重いため専用スレッドで行う
        let (sentiment, toxicity) = std::thread::spawn(move || -> Result<_> {
            let sentiment = BertSentimentScorer::new()?;
            let toxicity = BertToxicityScorer::new(&toxicity_source)?;
            Ok((sentiment, toxicity))
        })
        .join()
        .map_err(|_| anyhow!("failed to join model loading thread"))??;
        info!("inference models loaded");

        Ok(Self::new(Arc::new(sentiment), Arc::new(toxicity)))
    }

    /// # Errors
    /// 感情モデルの推論に失敗した場合。
    pub fn sentiment(&self, text: &str) -> Result<LabelScore> {
        self.sentiment.score(text)
    }

    /// # Errors
    /// 有害性モデルの推論に失敗した場合。
    pub fn toxicity(&self, text: &str) -> Result<Vec<LabelScore>> {
        self.toxicity.score_all(text)
    }
}
