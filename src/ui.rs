//! 画面の宣言。入力部品・トリガー・出力領域を定義し、ページ本体は静的 HTML。
use axum::response::Html;
use serde::Serialize;

use crate::{
    classification::{NOT_TOXIC, SENTIMENT_LABELS, TOXICITY_CATEGORIES},
    fetch::{MAX_RESULTS, MIN_RESULTS},
    pipeline::DEFAULT_MAX_COMMENTS,
    table::ALL,
};

const INDEX_HTML: &str = include_str!("ui/index.html");

#[derive(Debug, Clone, Serialize)]
pub struct TextControl {
    pub label: &'static str,
    pub placeholder: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SliderControl {
    pub label: &'static str,
    pub min: i64,
    pub max: i64,
    pub step: i64,
    pub default: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DropdownControl {
    pub label: &'static str,
    pub choices: Vec<String>,
    pub default: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputRegion {
    pub id: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ControlDeclarations {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub video_url: TextControl,
    pub max_comments: SliderControl,
    pub sentiment_filter: DropdownControl,
    pub toxicity_filter: DropdownControl,
    pub trigger_label: &'static str,
    pub outputs: Vec<OutputRegion>,
}

#[must_use]
pub fn declarations() -> ControlDeclarations {
    let sentiment_choices = std::iter::once(ALL)
        .chain(SENTIMENT_LABELS)
        .map(str::to_string)
        .collect();
    let toxicity_choices = std::iter::once(ALL)
        .chain(TOXICITY_CATEGORIES)
        .chain(std::iter::once(NOT_TOXIC))
        .map(str::to_string)
        .collect();

    ControlDeclarations {
        title: "YouTube Comment Analyzer",
        subtitle: "Analyze sentiment and toxicity from YouTube comments",
        video_url: TextControl {
            label: "YouTube Video URL",
            placeholder: "Paste a YouTube video link",
        },
        max_comments: SliderControl {
            label: "Number of Comments",
            min: MIN_RESULTS,
            max: MAX_RESULTS,
            step: 1,
            default: DEFAULT_MAX_COMMENTS,
        },
        sentiment_filter: DropdownControl {
            label: "Filter by Sentiment",
            choices: sentiment_choices,
            default: ALL,
        },
        toxicity_filter: DropdownControl {
            label: "Filter by Toxicity",
            choices: toxicity_choices,
            default: ALL,
        },
        trigger_label: "Analyze Comments",
        outputs: vec![
            OutputRegion {
                id: "table",
                label: "Analysis Table",
            },
            OutputRegion {
                id: "chart",
                label: "Sentiment Chart",
            },
            OutputRegion {
                id: "download",
                label: "Download CSV",
            },
        ],
    }
}

pub(crate) async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
