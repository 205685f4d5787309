//! Story ranking and top-N selection.
//!
//! Each story gets a `final_score` made of two parts:
//!
//! ```text
//! final_score = normalized(raw_score) + boost_per_category * keyword_match_count
//! ```
//!
//! Raw scores are rescaled into `0.0..=1.0` so a single keyword category
//! (worth `2.0` by default) always outweighs raw popularity, whatever the
//! absolute scale of the batch. Sorting is stable: stories with equal
//! scores keep the order in which the source supplied them.

use crate::keywords::KeywordMatcher;
use crate::models::{RankedSelection, RankedStory, Story};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Boost added per distinct keyword category.
pub const DEFAULT_BOOST_PER_CATEGORY: f64 = 2.0;
/// Number of stories kept in a selection.
pub const DEFAULT_SELECTION_SIZE: usize = 10;

/// How raw scores are rescaled before boosts are added.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Normalization {
    /// Divide by the largest raw score in the batch.
    #[default]
    BatchMax,
    /// Divide by a fixed ceiling, clamping at 1.0.
    FixedCeiling { ceiling: f64 },
    /// Rescale so the batch minimum maps to 0.0 and the maximum to 1.0.
    MinMax,
}

impl Normalization {
    /// Normalize every raw score of a batch, preserving order.
    ///
    /// Degenerate denominators (an all-zero batch, a zero ceiling, or a
    /// batch where every score is equal under min-max) yield 0.0 for every
    /// story instead of dividing by zero.
    pub fn apply(&self, raw_scores: &[u64]) -> Vec<f64> {
        let (floor, span) = match *self {
            Normalization::BatchMax => {
                let max = raw_scores.iter().copied().max().unwrap_or(0);
                (0.0, max as f64)
            }
            Normalization::FixedCeiling { ceiling } => (0.0, ceiling),
            Normalization::MinMax => {
                let min = raw_scores.iter().copied().min().unwrap_or(0);
                let max = raw_scores.iter().copied().max().unwrap_or(0);
                (min as f64, (max - min) as f64)
            }
        };

        if span.is_nan() || span <= 0.0 {
            return vec![0.0; raw_scores.len()];
        }

        raw_scores
            .iter()
            .map(|&raw| ((raw as f64 - floor) / span).clamp(0.0, 1.0))
            .collect()
    }
}

/// Tunable constants of the ranking heuristic.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RankingConfig {
    pub boost_per_category: f64,
    pub selection_size: usize,
    pub normalization: Normalization,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            boost_per_category: DEFAULT_BOOST_PER_CATEGORY,
            selection_size: DEFAULT_SELECTION_SIZE,
            normalization: Normalization::default(),
        }
    }
}

/// Combine a normalized score with the keyword boost.
pub fn final_score(normalized: f64, keyword_match_count: usize, boost_per_category: f64) -> f64 {
    normalized + boost_per_category * keyword_match_count as f64
}

/// Scores, sorts and truncates batches of stories.
#[derive(Debug, Clone, Default)]
pub struct RankingEngine {
    matcher: KeywordMatcher,
    config: RankingConfig,
}

impl RankingEngine {
    pub fn new(matcher: KeywordMatcher, config: RankingConfig) -> Self {
        Self { matcher, config }
    }

    pub fn matcher(&self) -> &KeywordMatcher {
        &self.matcher
    }

    /// Rank a batch and keep the best `selection_size` stories.
    ///
    /// Never fails: an empty batch yields an empty selection, stories with
    /// an empty URL rank like any other, and duplicates are kept.
    #[instrument(level = "debug", skip_all, fields(count = stories.len()))]
    pub fn rank(&self, stories: Vec<Story>) -> RankedSelection {
        let raw_scores: Vec<u64> = stories.iter().map(|s| s.raw_score).collect();
        let normalized = self.config.normalization.apply(&raw_scores);

        let mut ranked: Vec<RankedStory> = stories
            .into_iter()
            .zip(normalized)
            .map(|(story, normalized_score)| {
                let keyword_match_count = self.matcher.match_count(&story.title);
                let final_score = final_score(
                    normalized_score,
                    keyword_match_count,
                    self.config.boost_per_category,
                );
                RankedStory {
                    story,
                    keyword_match_count,
                    normalized_score,
                    final_score,
                }
            })
            .collect();

        // sort_by is stable, so ties keep input order
        ranked.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
        ranked.truncate(self.config.selection_size);

        debug!(selected = ranked.len(), "Ranked stories");
        RankedSelection::new(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(title: &str, raw_score: u64) -> Story {
        Story::new(title, format!("https://example.com/{raw_score}"), raw_score, "Hacker News")
    }

    fn titles(selection: &RankedSelection) -> Vec<&str> {
        selection.iter().map(|r| r.story.title.as_str()).collect()
    }

    #[test]
    fn test_keyword_boost_dominates_raw_score() {
        let engine = RankingEngine::default();
        let selection = engine.rank(vec![
            story("AI breakthrough at OpenAI", 100),
            story("Local bakery opens", 150),
        ]);

        assert_eq!(titles(&selection), vec!["AI breakthrough at OpenAI", "Local bakery opens"]);

        let first = selection.iter().next().unwrap();
        assert_eq!(first.keyword_match_count, 1);
        assert!((first.normalized_score - 2.0 / 3.0).abs() < 1e-9);
        assert!((first.final_score - 8.0 / 3.0).abs() < 1e-9);

        let second = selection.iter().nth(1).unwrap();
        assert_eq!(second.keyword_match_count, 0);
        assert!((second.final_score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input_yields_empty_selection() {
        let selection = RankingEngine::default().rank(Vec::new());
        assert!(selection.is_empty());
    }

    #[test]
    fn test_output_length_is_min_of_ten_and_input() {
        let engine = RankingEngine::default();
        for n in [0usize, 1, 9, 10, 11, 30] {
            let stories = (0..n).map(|i| story(&format!("Story {i}"), i as u64)).collect();
            assert_eq!(engine.rank(stories).len(), n.min(10), "input length {n}");
        }
    }

    #[test]
    fn test_sorted_descending() {
        let engine = RankingEngine::default();
        let stories = vec![
            story("Plain one", 10),
            story("Apple event", 5),
            story("Plain two", 90),
            story("OpenAI hit by security breach", 1),
            story("Plain three", 40),
        ];
        let selection = engine.rank(stories);
        let scores: Vec<f64> = selection.iter().map(|r| r.final_score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]), "{scores:?}");
        assert_eq!(titles(&selection)[0], "OpenAI hit by security breach");
    }

    #[test]
    fn test_ties_preserve_input_order() {
        let engine = RankingEngine::default();
        let stories = vec![
            story("First", 50),
            story("Second", 50),
            story("Third", 50),
            story("Top", 100),
            story("Fourth", 50),
        ];
        let selection = engine.rank(stories);
        assert_eq!(titles(&selection), vec!["Top", "First", "Second", "Third", "Fourth"]);
    }

    #[test]
    fn test_rank_is_deterministic() {
        let engine = RankingEngine::default();
        let stories: Vec<Story> = (0..30)
            .map(|i| story(&format!("Story {} about Google", i % 4), (i * 7 % 13) as u64))
            .collect();
        assert_eq!(engine.rank(stories.clone()), engine.rank(stories));
    }

    #[test]
    fn test_all_zero_scores_do_not_divide_by_zero() {
        let engine = RankingEngine::default();
        let selection = engine.rank(vec![story("A", 0), story("B", 0), story("Tesla recall", 0)]);
        for ranked in &selection {
            assert_eq!(ranked.normalized_score, 0.0);
            assert!(ranked.final_score.is_finite());
        }
        assert_eq!(titles(&selection), vec!["Tesla recall", "A", "B"]);
    }

    #[test]
    fn test_missing_url_and_duplicates_are_kept() {
        let engine = RankingEngine::default();
        let selection = engine.rank(vec![
            Story::new("No link", "", 10, "Hacker News"),
            Story::new("Dup", "https://example.com/x", 5, "Hacker News"),
            Story::new("Dup", "https://example.com/x", 5, "Hacker News"),
        ]);
        assert_eq!(selection.len(), 3);
        assert_eq!(titles(&selection), vec!["No link", "Dup", "Dup"]);
    }

    #[test]
    fn test_custom_boost_and_selection_size() {
        let config = RankingConfig {
            boost_per_category: 0.1,
            selection_size: 1,
            normalization: Normalization::BatchMax,
        };
        let engine = RankingEngine::new(KeywordMatcher::default(), config);
        let selection = engine.rank(vec![
            story("AI breakthrough at OpenAI", 100),
            story("Local bakery opens", 150),
        ]);
        // 0.667 + 0.1 < 1.0, so raw popularity wins with a small boost
        assert_eq!(titles(&selection), vec!["Local bakery opens"]);
    }

    #[test]
    fn test_final_score() {
        assert_eq!(final_score(0.5, 0, 2.0), 0.5);
        assert_eq!(final_score(0.5, 2, 2.0), 4.5);
    }

    #[test]
    fn test_batch_max_normalization() {
        let normalized = Normalization::BatchMax.apply(&[0, 50, 200]);
        assert_eq!(normalized, vec![0.0, 0.25, 1.0]);
        assert_eq!(Normalization::BatchMax.apply(&[0, 0]), vec![0.0, 0.0]);
        assert!(Normalization::BatchMax.apply(&[]).is_empty());
    }

    #[test]
    fn test_fixed_ceiling_normalization() {
        let normalization = Normalization::FixedCeiling { ceiling: 100.0 };
        assert_eq!(normalization.apply(&[0, 50, 250]), vec![0.0, 0.5, 1.0]);

        let zero = Normalization::FixedCeiling { ceiling: 0.0 };
        assert_eq!(zero.apply(&[10, 20]), vec![0.0, 0.0]);
    }

    #[test]
    fn test_min_max_normalization() {
        assert_eq!(Normalization::MinMax.apply(&[10, 20, 30]), vec![0.0, 0.5, 1.0]);
        assert_eq!(Normalization::MinMax.apply(&[7, 7, 7]), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_ranking_config_from_yaml() {
        let yaml = "boost_per_category: 3.0\nnormalization:\n  kind: fixed_ceiling\n  ceiling: 500.0\n";
        let config: RankingConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.boost_per_category, 3.0);
        assert_eq!(config.selection_size, DEFAULT_SELECTION_SIZE);
        assert_eq!(config.normalization, Normalization::FixedCeiling { ceiling: 500.0 });
    }
}
