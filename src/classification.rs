//! コメント 1 件の感情・有害性分類。
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::inference::{InferenceService, LabelScore};

/// スコアリングに渡す先頭文字数。表示用の本文は切り詰めない。
pub const MAX_SCORED_CHARS: usize = 512;
pub const TOXICITY_THRESHOLD: f64 = 0.5;
pub const NOT_TOXIC: &str = "Not Toxic";
pub const SENTIMENT_LABELS: [&str; 2] = ["POSITIVE", "NEGATIVE"];
pub const TOXICITY_CATEGORIES: [&str; 7] = [
    "toxicity",
    "severe_toxicity",
    "obscene",
    "identity_attack",
    "insult",
    "threat",
    "sexual_explicit",
];

/// 分類結果の 1 行。列名は CSV のヘッダと一致する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    #[serde(rename = "Comment")]
    pub comment: String,
    #[serde(rename = "Sentiment")]
    pub sentiment: String,
    #[serde(rename = "Sentiment Score")]
    pub sentiment_score: f64,
    #[serde(rename = "Toxicity")]
    pub toxicity: String,
    #[serde(rename = "Toxicity Score")]
    pub toxicity_score: f64,
}

/// 小数第 3 位に丸める。
#[must_use]
pub fn round_score(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}

/// 先頭 `max_chars` 文字（バイトではない）を返す。
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// 最大スコアのカテゴリを選ぶ。同点は先に現れた方を採用する。
fn top_category(scores: Vec<LabelScore>) -> Option<LabelScore> {
    scores.into_iter().fold(None, |best, candidate| match best {
        Some(current) if candidate.score > current.score => Some(candidate),
        Some(current) => Some(current),
        None => Some(candidate),
    })
}

/// コメントを分類する。
///
/// 推論の失敗はそのまま返し、呼び出し側の実行全体を中断させる。
///
/// # Errors
/// いずれかの推論能力が失敗した場合、または有害性スコアが空の場合。
pub fn classify_comment(service: &InferenceService, comment: &str) -> Result<ClassificationRecord> {
    let scored = truncate_chars(comment, MAX_SCORED_CHARS);

    let sentiment = service.sentiment(scored)?;
    let top = top_category(service.toxicity(scored)?)
        .context("toxicity model returned no category scores")?;

    let toxicity_score = round_score(top.score);
    let toxicity = if toxicity_score > TOXICITY_THRESHOLD {
        top.label
    } else {
        NOT_TOXIC.to_string()
    };

    Ok(ClassificationRecord {
        comment: comment.to_string(),
        sentiment: sentiment.label,
        sentiment_score: round_score(sentiment.score),
        toxicity,
        toxicity_score,
    })
}
