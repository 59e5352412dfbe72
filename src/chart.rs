//! 感情ラベル分布の棒グラフ。
use std::fmt::Write as _;

use serde::Serialize;

use crate::table::ResultTable;

pub const CHART_TITLE: &str = "Sentiment Distribution";
pub const BAR_GAP: f64 = 0.2;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 400.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 50.0;
const MAX_TICKS: usize = 5;
const PALETTE: [&str; 6] = ["#636efa", "#ef553b", "#00cc96", "#ab63fa", "#ffa15a", "#19d3f3"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartBar {
    pub label: String,
    pub count: usize,
}

/// 毎回ゼロから作り直す分布。永続化しない。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartArtifact {
    pub title: String,
    pub bar_gap: f64,
    pub bars: Vec<ChartBar>,
}

impl ChartArtifact {
    /// 表に現れた感情ラベルごとの件数を、初出順に集計する。
    #[must_use]
    pub fn sentiment_distribution(table: &ResultTable) -> Self {
        let mut bars: Vec<ChartBar> = Vec::new();
        for row in table.rows() {
            match bars.iter_mut().find(|bar| bar.label == row.sentiment) {
                Some(bar) => bar.count += 1,
                None => bars.push(ChartBar {
                    label: row.sentiment.clone(),
                    count: 1,
                }),
            }
        }

        Self {
            title: CHART_TITLE.to_string(),
            bar_gap: BAR_GAP,
            bars,
        }
    }

    /// 単体で表示できる SVG を描画する。同じ入力からは同じバイト列になる。
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn render_svg(&self) -> String {
        let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let baseline = MARGIN_TOP + plot_height;
        let max_count = self.bars.iter().map(|bar| bar.count).max().unwrap_or(0).max(1);

        let mut svg = String::new();
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif">"#
        );
        let _ = write!(
            svg,
            r##"<rect width="{WIDTH}" height="{HEIGHT}" fill="#ffffff"/>"##
        );
        let _ = write!(
            svg,
            r#"<text x="{:.1}" y="30" font-size="18" text-anchor="middle">{}</text>"#,
            WIDTH / 2.0,
            escape_xml(&self.title)
        );

        let step = max_count.div_ceil(MAX_TICKS).max(1);
        for tick in (0..=max_count).step_by(step) {
            let y = baseline - plot_height * tick as f64 / max_count as f64;
            let _ = write!(
                svg,
                r##"<line x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#e5ecf6"/><text x="{:.1}" y="{:.1}" font-size="12" text-anchor="end">{tick}</text>"##,
                MARGIN_LEFT + plot_width,
                MARGIN_LEFT - 8.0,
                y + 4.0
            );
        }

        if !self.bars.is_empty() {
            let slot = plot_width / self.bars.len() as f64;
            let bar_width = slot * (1.0 - self.bar_gap);
            for (index, bar) in self.bars.iter().enumerate() {
                let x = MARGIN_LEFT + slot * index as f64 + (slot - bar_width) / 2.0;
                let height = plot_height * bar.count as f64 / max_count as f64;
                let color = PALETTE[index % PALETTE.len()];
                let label = escape_xml(&bar.label);
                let _ = write!(
                    svg,
                    r#"<rect x="{x:.1}" y="{:.1}" width="{bar_width:.1}" height="{height:.1}" fill="{color}"><title>{label}: {}</title></rect>"#,
                    baseline - height,
                    bar.count
                );
                let _ = write!(
                    svg,
                    r#"<text x="{:.1}" y="{:.1}" font-size="12" text-anchor="middle">{label}</text>"#,
                    x + bar_width / 2.0,
                    baseline + 18.0
                );
            }
        }

        let _ = write!(
            svg,
            r##"<line x1="{MARGIN_LEFT}" y1="{baseline}" x2="{:.1}" y2="{baseline}" stroke="#444444"/>"##,
            MARGIN_LEFT + plot_width
        );
        let _ = write!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-size="13" text-anchor="middle">Sentiment</text>"#,
            MARGIN_LEFT + plot_width / 2.0,
            HEIGHT - 10.0
        );
        let _ = write!(
            svg,
            r#"<text x="16" y="{:.1}" font-size="13" text-anchor="middle" transform="rotate(-90 16 {:.1})">count</text>"#,
            MARGIN_TOP + plot_height / 2.0,
            MARGIN_TOP + plot_height / 2.0
        );
        svg.push_str("</svg>");
        svg
    }
}

fn escape_xml(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
