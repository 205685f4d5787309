//! Data models for scraped stories and their ranked representations.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Story`]: Raw story record as scraped from a news source
//! - [`RankedStory`]: A story enriched with its keyword match count and scores
//! - [`RankedSelection`]: The ordered top-N stories handed to the post formatter

use serde::{Deserialize, Serialize};

/// A raw news story as scraped from a news source.
///
/// # Fields
///
/// * `title` - The headline shown on the source site
/// * `url` - The outbound link (may be empty when the source has none)
/// * `raw_score` - The source's own popularity metric (points, upvotes, ...)
/// * `source_name` - Label of the source the story came from
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Story {
    /// The story headline.
    pub title: String,
    /// The story link. Empty when unavailable.
    pub url: String,
    /// The source-reported popularity signal.
    pub raw_score: u64,
    /// The name of the source, e.g. "Hacker News".
    pub source_name: String,
}

impl Story {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        raw_score: u64,
        source_name: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            raw_score,
            source_name: source_name.into(),
        }
    }
}

/// A story after it has passed through the ranking engine.
///
/// The derived fields are computed once by
/// [`RankingEngine::rank`](crate::ranking::RankingEngine::rank) and never
/// recomputed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedStory {
    /// The original story.
    #[serde(flatten)]
    pub story: Story,
    /// Number of distinct keyword categories found in the title.
    pub keyword_match_count: usize,
    /// The raw score rescaled against the rest of the batch.
    pub normalized_score: f64,
    /// Normalized score plus keyword boost. Sole ranking key.
    pub final_score: f64,
}

/// The top stories of a batch, best first.
///
/// Ordering is descending by `final_score`; stories with equal scores keep
/// the order in which the source supplied them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RankedSelection {
    stories: Vec<RankedStory>,
}

impl RankedSelection {
    pub(crate) fn new(stories: Vec<RankedStory>) -> Self {
        Self { stories }
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RankedStory> {
        self.stories.iter()
    }
}

impl<'a> IntoIterator for &'a RankedSelection {
    type Item = &'a RankedStory;
    type IntoIter = std::slice::Iter<'a, RankedStory>;

    fn into_iter(self) -> Self::IntoIter {
        self.stories.iter()
    }
}
