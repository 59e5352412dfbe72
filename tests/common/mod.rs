#![allow(dead_code)]

use std::{path::Path, sync::Arc};

use anyhow::Result;
use comment_analyzer::{
    clients::CommentThreadsApi,
    fetch::CommentFetcher,
    inference::{InferenceService, LabelScore, SentimentScorer, ToxicityScorer},
    observability::Telemetry,
    pipeline::AnalysisOrchestrator,
};

/// 語彙で決まる決定的な感情スコア。
pub struct LexiconSentiment;

impl SentimentScorer for LexiconSentiment {
    fn score(&self, text: &str) -> Result<LabelScore> {
        let lower = text.to_lowercase();
        if ["love", "great", "awesome"].iter().any(|w| lower.contains(w)) {
            Ok(LabelScore::new("POSITIVE", 0.998_76))
        } else {
            Ok(LabelScore::new("NEGATIVE", 0.812_34))
        }
    }
}

/// "idiot" を含むと insult が最大、それ以外は閾値未満。
pub struct LexiconToxicity;

impl ToxicityScorer for LexiconToxicity {
    fn score_all(&self, text: &str) -> Result<Vec<LabelScore>> {
        let insult = if text.to_lowercase().contains("idiot") { 0.83 } else { 0.05 };
        Ok(vec![
            LabelScore::new("toxicity", 0.42),
            LabelScore::new("severe_toxicity", 0.01),
            LabelScore::new("obscene", 0.02),
            LabelScore::new("identity_attack", 0.003),
            LabelScore::new("insult", insult),
            LabelScore::new("threat", 0.001),
            LabelScore::new("sexual_explicit", 0.004),
        ])
    }
}

/// 固定のコメント列を返すリモート API の代役。
pub struct CannedComments(pub Vec<String>);

impl CommentThreadsApi for CannedComments {
    fn list_top_level_comments(&self, _video_id: &str, max_results: u32) -> Result<Vec<String>> {
        Ok(self.0.iter().take(max_results as usize).cloned().collect())
    }
}

pub fn stub_inference() -> InferenceService {
    InferenceService::new(Arc::new(LexiconSentiment), Arc::new(LexiconToxicity))
}

pub fn orchestrator_with(
    api: Arc<dyn CommentThreadsApi>,
    export_dir: &Path,
    telemetry: &Telemetry,
) -> AnalysisOrchestrator {
    AnalysisOrchestrator::new(
        CommentFetcher::new(api),
        stub_inference(),
        export_dir.to_path_buf(),
        telemetry.metrics_arc(),
    )
}

pub fn sample_comments() -> Vec<String> {
    vec![
        "I love this video".to_string(),
        "what an idiot take".to_string(),
        "Great editing, awesome pacing".to_string(),
        "boring".to_string(),
        "love it, though the intro drags".to_string(),
    ]
}
