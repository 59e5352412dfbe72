use std::{path::PathBuf, sync::Mutex};

use anyhow::{Context, Result, anyhow};
use rust_bert::{
    pipelines::{
        common::{ModelResource, ModelType},
        sentiment::{SentimentConfig, SentimentModel, SentimentPolarity},
        sequence_classification::{SequenceClassificationConfig, SequenceClassificationModel},
    },
    resources::{LocalResource, RemoteResource, ResourceProvider},
};

use super::{LabelScore, SentimentScorer, ToxicityScorer};

const WEIGHTS_FILE: &str = "rust_model.ot";
const CONFIG_FILE: &str = "config.json";
const VOCAB_FILE: &str = "vocab.txt";
const REMOTE_CACHE_SUBDIR: &str = "toxic-bert";

/// toxic-bert の重み・設定・語彙の取得元。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToxicityModelSource {
    /// `rust_model.ot`, `config.json`, `vocab.txt` を含むディレクトリ。
    Local(PathBuf),
    /// 同じ 3 ファイルを配信する URL のルート。
    Remote(String),
}

/// toxic-bert の出力ラベルを固定カテゴリ名に揃える。
#[must_use]
pub fn normalize_toxicity_label(raw: &str) -> String {
    match raw {
        "toxic" => "toxicity".to_string(),
        "severe_toxic" => "severe_toxicity".to_string(),
        "identity_hate" => "identity_attack".to_string(),
        other => other.to_string(),
    }
}

/// DistilBERT SST-2 による感情分類。
pub struct BertSentimentScorer {
    model: Mutex<SentimentModel>,
}

impl BertSentimentScorer {
    /// # Errors
    /// モデルの取得・構築に失敗した場合。
    pub fn new() -> Result<Self> {
        let model =
            SentimentModel::new(SentimentConfig::default()).context("failed to load sentiment model")?;
        Ok(Self {
            model: Mutex::new(model),
        })
    }
}

impl SentimentScorer for BertSentimentScorer {
    fn score(&self, text: &str) -> Result<LabelScore> {
        let model = self
            .model
            .lock()
            .map_err(|_| anyhow!("sentiment model mutex poisoned"))?;
        let sentiment = model
            .predict([text])
            .pop()
            .context("sentiment model returned no prediction")?;
        let label = match sentiment.polarity {
            SentimentPolarity::Positive => "POSITIVE",
            SentimentPolarity::Negative => "NEGATIVE",
        };
        Ok(LabelScore::new(label, sentiment.score))
    }
}

/// toxic-bert によるマルチラベル有害性分類。
pub struct BertToxicityScorer {
    model: Mutex<SequenceClassificationModel>,
}

impl BertToxicityScorer {
    /// # Errors
    /// リソースの取得やモデルの構築に失敗した場合。
    pub fn new(source: &ToxicityModelSource) -> Result<Self> {
        let config = match source {
            ToxicityModelSource::Local(dir) => toxicity_config(
                LocalResource::from(dir.join(WEIGHTS_FILE)),
                LocalResource::from(dir.join(CONFIG_FILE)),
                LocalResource::from(dir.join(VOCAB_FILE)),
            ),
            ToxicityModelSource::Remote(root) => toxicity_config(
                remote_resource(root, WEIGHTS_FILE),
                remote_resource(root, CONFIG_FILE),
                remote_resource(root, VOCAB_FILE),
            ),
        };
        let model = SequenceClassificationModel::new(config)
            .context("failed to load toxicity model")?;
        Ok(Self {
            model: Mutex::new(model),
        })
    }
}

impl ToxicityScorer for BertToxicityScorer {
    fn score_all(&self, text: &str) -> Result<Vec<LabelScore>> {
        let model = self
            .model
            .lock()
            .map_err(|_| anyhow!("toxicity model mutex poisoned"))?;
        // 閾値 0 で全カテゴリのスコアを得る
        let mut labels = model
            .predict_multilabel(&[text], 0.0)
            .context("toxicity inference failed")?
            .pop()
            .context("toxicity model returned no prediction")?;
        labels.sort_by_key(|label| label.id);

        Ok(labels
            .into_iter()
            .map(|label| LabelScore::new(normalize_toxicity_label(&label.text), label.score))
            .collect())
    }
}

fn remote_resource(root: &str, file: &str) -> RemoteResource {
    let url = format!("{}/{file}", root.trim_end_matches('/'));
    RemoteResource::new(&url, REMOTE_CACHE_SUBDIR)
}

fn toxicity_config<R>(weights: R, config: R, vocab: R) -> SequenceClassificationConfig
where
    R: ResourceProvider + Send + 'static,
{
    SequenceClassificationConfig::new(
        ModelType::Bert,
        ModelResource::Torch(Box::new(weights)),
        config,
        vocab,
        None::<R>,
        true,
        None::<bool>,
        None::<bool>,
    )
}
