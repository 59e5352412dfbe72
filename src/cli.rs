//! コマンドライン駆動。`serve` で画面を提供し、`analyze` で 1 回だけ解析する。
use std::fmt::Write as _;

use clap::{Args, Parser, Subcommand};

use crate::{
    pipeline::{AnalysisOutcome, AnalysisRequest, DEFAULT_MAX_COMMENTS},
    table::{ALL, LabelFilter},
};

const COMMENT_PREVIEW_CHARS: usize = 60;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve the web front end (default)
    Serve,
    /// Analyze a single video and print the results
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeArgs {
    /// YouTube video URL (watch, youtu.be, embed or shorts link)
    #[arg(long)]
    pub url: String,

    /// Number of top-level comments to fetch
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_COMMENTS,
        value_parser = clap::value_parser!(i64).range(1..=100)
    )]
    pub max_comments: i64,

    /// Sentiment label to keep, or "All"
    #[arg(long, default_value = ALL)]
    pub sentiment: String,

    /// Toxicity label to keep, or "All"
    #[arg(long, default_value = ALL)]
    pub toxicity: String,
}

impl From<AnalyzeArgs> for AnalysisRequest {
    fn from(args: AnalyzeArgs) -> Self {
        Self {
            video_url: args.url,
            max_comments: args.max_comments,
            sentiment_filter: LabelFilter::from(args.sentiment),
            toxicity_filter: LabelFilter::from(args.toxicity),
        }
    }
}

/// 端末向けに結果を整形する。コメント本文は表示のみ切り詰める。
#[must_use]
pub fn render_outcome(outcome: &AnalysisOutcome) -> String {
    let report = match outcome {
        AnalysisOutcome::Failed { error } => return format!("error\n{error}\n"),
        AnalysisOutcome::Completed(report) => report,
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<62}  {:<9} {:>6}  {:<16} {:>6}",
        "Comment", "Sentiment", "Score", "Toxicity", "Score"
    );
    for row in report.table.rows() {
        let _ = writeln!(
            out,
            "{:<62}  {:<9} {:>6.3}  {:<16} {:>6.3}",
            preview(&row.comment),
            row.sentiment,
            row.sentiment_score,
            row.toxicity,
            row.toxicity_score
        );
    }

    let _ = writeln!(out, "\n{}", report.chart.title);
    for bar in &report.chart.bars {
        let _ = writeln!(out, "{:<9} {} {}", bar.label, "#".repeat(bar.count), bar.count);
    }
    let _ = writeln!(out, "\nCSV: {}", report.export.path.display());
    out
}

fn preview(comment: &str) -> String {
    let single_line = comment.replace(['\n', '\r'], " ");
    if single_line.chars().count() > COMMENT_PREVIEW_CHARS {
        let head: String = single_line.chars().take(COMMENT_PREVIEW_CHARS - 1).collect();
        format!("{head}…")
    } else {
        single_line
    }
}
