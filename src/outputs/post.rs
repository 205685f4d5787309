//! Social media post rendering.
//!
//! Turns a [`RankedSelection`] into the plain-text post shared by every
//! platform:
//!
//! ```text
//! 🚀 Top 10 Tech News - May 06, 2025
//!
//! 🥇 First headline
//! 🔗 https://example.com/first
//!
//! 🥈 Second headline
//!
//! #TechNews #Technology #Innovation #AI #Startups #TechTrends
//! ```
//!
//! Links of 100 characters or more are dropped so long tracking URLs do not
//! swamp the post; the headline is still listed.

use crate::models::RankedSelection;
use crate::ranking::DEFAULT_SELECTION_SIZE;
use chrono::NaiveDate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Links must be strictly shorter than this many characters to be shown.
pub const DEFAULT_MAX_LINK_CHARS: usize = 100;

/// Presentation settings for the post.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PostConfig {
    /// Headline count shown in the header. Unset means the configured
    /// selection size (see [`crate::config::AppConfig::post_config`]), not
    /// how many stories a given run happened to select.
    pub headline_count: Option<usize>,
    /// Links with this many characters or more are omitted.
    pub max_link_chars: usize,
    /// Footer hashtags, without the leading `#`.
    pub hashtags: Vec<String>,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            headline_count: None,
            max_link_chars: DEFAULT_MAX_LINK_CHARS,
            hashtags: ["TechNews", "Technology", "Innovation", "AI", "Startups", "TechTrends"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
        }
    }
}

/// Date as it appears in the header, e.g. `May 06, 2025`.
pub fn header_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

/// Symbol shown in front of the story at 1-based `rank`.
pub fn rank_symbol(rank: usize) -> String {
    match rank {
        1 => "🥇".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        4..=9 => format!("{rank}\u{FE0F}\u{20E3}"),
        10 => "🔟".to_string(),
        _ => format!("{rank}."),
    }
}

/// Whether `url` is short enough to be included in the post.
pub fn link_fits(url: &str, max_link_chars: usize) -> bool {
    !url.is_empty() && url.chars().count() < max_link_chars
}

/// Render the post text for `selection` stamped with `date`.
///
/// Pure: the same selection, date and config always give the same text. An
/// empty selection renders the header and footer only.
pub fn format_post(selection: &RankedSelection, date: NaiveDate, config: &PostConfig) -> String {
    let mut post = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(
        post,
        "🚀 Top {} Tech News - {}\n",
        config.headline_count.unwrap_or(DEFAULT_SELECTION_SIZE),
        header_date(date)
    );

    for (i, ranked) in selection.iter().enumerate() {
        let story = &ranked.story;
        let _ = writeln!(post, "{} {}", rank_symbol(i + 1), story.title);
        if link_fits(&story.url, config.max_link_chars) {
            let _ = writeln!(post, "🔗 {}", story.url);
        }
        post.push('\n');
    }

    post.push_str(&config.hashtags.iter().map(|t| format!("#{t}")).join(" "));
    post
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Story;
    use crate::ranking::RankingEngine;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 6).unwrap()
    }

    fn selection_of(stories: Vec<Story>) -> RankedSelection {
        RankingEngine::default().rank(stories)
    }

    #[test]
    fn test_empty_selection_is_header_and_footer_only() {
        let post = format_post(&RankedSelection::default(), date(), &PostConfig::default());
        assert_eq!(
            post,
            "🚀 Top 10 Tech News - May 06, 2025\n\n\
             #TechNews #Technology #Innovation #AI #Startups #TechTrends"
        );
    }

    #[test]
    fn test_full_layout() {
        let selection = selection_of(vec![
            Story::new("AI breakthrough at OpenAI", "https://openai.com/a", 100, "Hacker News"),
            Story::new("Local bakery opens", "", 150, "Hacker News"),
        ]);
        let post = format_post(&selection, date(), &PostConfig::default());
        let expected = "🚀 Top 10 Tech News - May 06, 2025\n\n\
                        🥇 AI breakthrough at OpenAI\n\
                        🔗 https://openai.com/a\n\n\
                        🥈 Local bakery opens\n\n\
                        #TechNews #Technology #Innovation #AI #Startups #TechTrends";
        assert_eq!(post, expected);
    }

    #[test]
    fn test_long_link_is_omitted() {
        let long_url = format!("https://example.com/{}", "a".repeat(100 - 20));
        assert_eq!(long_url.len(), 100);
        let selection = selection_of(vec![Story::new("Long", long_url.clone(), 1, "Hacker News")]);
        let post = format_post(&selection, date(), &PostConfig::default());
        assert!(post.contains("🥇 Long\n"));
        assert!(!post.contains(&long_url));
        assert!(!post.contains("🔗"));
    }

    #[test]
    fn test_99_char_link_is_included() {
        let url = format!("https://example.com/{}", "a".repeat(99 - 20));
        assert_eq!(url.len(), 99);
        let selection = selection_of(vec![Story::new("Short", url.clone(), 1, "Hacker News")]);
        let post = format_post(&selection, date(), &PostConfig::default());
        assert!(post.contains(&format!("🔗 {url}\n")));
    }

    #[test]
    fn test_rank_symbols() {
        assert_eq!(rank_symbol(1), "🥇");
        assert_eq!(rank_symbol(2), "🥈");
        assert_eq!(rank_symbol(3), "🥉");
        assert_eq!(rank_symbol(4), "4️⃣");
        assert_eq!(rank_symbol(9), "9️⃣");
        assert_eq!(rank_symbol(10), "🔟");
        assert_eq!(rank_symbol(11), "11.");
    }

    #[test]
    fn test_ten_lines_use_distinct_symbols() {
        let stories = (0..12)
            .map(|i| Story::new(format!("Story {i}"), "", 100 - i, "Hacker News"))
            .collect();
        let post = format_post(&selection_of(stories), date(), &PostConfig::default());
        let body: Vec<&str> = post
            .lines()
            .skip(2)
            .filter(|l| l.starts_with("Story") || l.contains(" Story "))
            .collect();
        assert_eq!(body.len(), 10);
        assert!(body[0].starts_with("🥇 Story 0"));
        assert!(body[3].starts_with("4️⃣ Story 3"));
        assert!(body[9].starts_with("🔟 Story 9"));
    }

    #[test]
    fn test_link_fits_counts_characters() {
        assert!(!link_fits("", 100));
        assert!(link_fits("https://example.com", 100));
        // 99 multi-byte characters still fit
        assert!(link_fits(&"é".repeat(99), 100));
        assert!(!link_fits(&"é".repeat(100), 100));
    }

    #[test]
    fn test_custom_hashtags() {
        let config = PostConfig {
            hashtags: vec!["Rust".to_string()],
            ..PostConfig::default()
        };
        let post = format_post(&RankedSelection::default(), date(), &config);
        assert!(post.ends_with("#Rust"));
    }

    #[test]
    fn test_explicit_headline_count() {
        let config = PostConfig {
            headline_count: Some(5),
            ..PostConfig::default()
        };
        let post = format_post(&RankedSelection::default(), date(), &config);
        assert!(post.starts_with("🚀 Top 5 Tech News - May 06, 2025\n\n"));
    }

    #[test]
    fn test_header_date() {
        assert_eq!(header_date(date()), "May 06, 2025");
    }
}
