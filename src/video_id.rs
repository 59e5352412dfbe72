//! YouTube URL から動画 ID を取り出す。
use once_cell::sync::Lazy;
use regex::Regex;

/// 優先順に試す URL 形状: watch, youtu.be, embed, shorts。
static VIDEO_ID_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"youtube\.com/watch\?v=([^&\n?#]+)",
        r"youtu\.be/([^&\n?#]+)",
        r"youtube\.com/embed/([^&\n?#]+)",
        r"youtube\.com/shorts/([^&\n?#]+)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("compile video id pattern"))
    .collect()
});

/// URL から動画 ID を抽出する。どの形状にも一致しなければ `None`。
#[must_use]
pub fn extract_video_id(url: &str) -> Option<&str> {
    VIDEO_ID_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(url)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str())
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::extract_video_id;

    #[rstest]
    #[case("https://www.youtube.com/watch?v=abc123XYZ_-")]
    #[case("https://youtube.com/watch?v=abc123XYZ_-&t=42s")]
    #[case("https://youtu.be/abc123XYZ_-")]
    #[case("https://youtu.be/abc123XYZ_-?si=share")]
    #[case("https://www.youtube.com/embed/abc123XYZ_-")]
    #[case("https://www.youtube.com/embed/abc123XYZ_-?autoplay=1")]
    #[case("https://www.youtube.com/shorts/abc123XYZ_-")]
    #[case("https://m.youtube.com/shorts/abc123XYZ_-#comments")]
    fn extracts_id_from_supported_shapes(#[case] url: &str) {
        assert_eq!(extract_video_id(url), Some("abc123XYZ_-"));
    }

    #[rstest]
    #[case("")]
    #[case("not a url")]
    #[case("https://vimeo.com/123456789")]
    #[case("https://www.youtube.com/playlist?list=PLrAXtmRdnEQy")]
    #[case("https://www.youtube.com/watch?feature=share")]
    fn returns_none_for_unrecognized_urls(#[case] url: &str) {
        assert_eq!(extract_video_id(url), None);
    }

    #[test]
    fn watch_pattern_wins_over_later_shapes() {
        let url = "https://www.youtube.com/watch?v=first&next=https://youtu.be/second";
        assert_eq!(extract_video_id(url), Some("first"));
    }
}
