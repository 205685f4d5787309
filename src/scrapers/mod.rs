//! News sources that supply raw stories for ranking.
//!
//! Each source implements [`StorySource`] and returns at most
//! `max_stories` [`Story`] records in the order the site lists them. That
//! order matters: the ranking engine keeps it for stories with equal scores.
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | Hacker News | [`hacker_news`] | HTML scraping | Front page, points as raw score |

pub mod hacker_news;

use crate::models::Story;
use serde::{Deserialize, Serialize};
use std::error::Error;

/// Default number of stories requested from a source.
pub const DEFAULT_MAX_STORIES: usize = 30;

/// Async supplier of raw stories.
pub trait StorySource {
    /// Human-readable source name, stamped into every [`Story`].
    fn name(&self) -> &str;

    /// Fetch the current batch of stories.
    ///
    /// An empty batch is a valid result; errors mean the source could not be
    /// reached or parsed at all.
    async fn fetch_stories(&self) -> Result<Vec<Story>, Box<dyn Error>>;
}

/// HTTP settings for scraping a source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceConfig {
    /// The page listing the stories.
    pub front_page_url: String,
    /// Upper bound on stories taken from the page.
    pub max_stories: usize,
    /// `User-Agent` sent with the request.
    pub user_agent: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            front_page_url: hacker_news::FRONT_PAGE_URL.to_string(),
            max_stories: DEFAULT_MAX_STORIES,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            timeout_secs: 10,
        }
    }
}
