//! 分類結果の表と、ラベル完全一致フィルタ。
use serde::{Deserialize, Serialize};

use crate::classification::ClassificationRecord;

pub const ALL: &str = "All";

/// ドロップダウンの選択値。`"All"` 以外はラベルとの完全一致で絞り込む。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LabelFilter {
    #[default]
    All,
    Only(String),
}

impl LabelFilter {
    #[must_use]
    pub fn matches(&self, label: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == label,
        }
    }
}

impl From<String> for LabelFilter {
    fn from(raw: String) -> Self {
        if raw == ALL { Self::All } else { Self::Only(raw) }
    }
}

impl From<&str> for LabelFilter {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<LabelFilter> for String {
    fn from(filter: LabelFilter) -> Self {
        match filter {
            LabelFilter::All => ALL.to_string(),
            LabelFilter::Only(label) => label,
        }
    }
}

impl std::fmt::Display for LabelFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Only(label) => f.write_str(label),
        }
    }
}

/// 取得順を保った分類結果の列。並べ替えはしない。
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct ResultTable {
    rows: Vec<ClassificationRecord>,
}

impl ResultTable {
    #[must_use]
    pub fn new(rows: Vec<ClassificationRecord>) -> Self {
        Self { rows }
    }

    #[must_use]
    pub fn rows(&self) -> &[ClassificationRecord] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<ClassificationRecord> {
        self.rows
    }

    /// 感情フィルタ、続いて有害性フィルタを適用する。
    #[must_use]
    pub fn filtered(self, sentiment: &LabelFilter, toxicity: &LabelFilter) -> Self {
        let rows = self
            .rows
            .into_iter()
            .filter(|row| sentiment.matches(&row.sentiment))
            .filter(|row| toxicity.matches(&row.toxicity))
            .collect();
        Self { rows }
    }
}
