//! Hacker News front page scraper.
//!
//! Each story on the front page is a `tr.athing` row holding the title link,
//! followed by a sibling row whose `span.score` reads like `"150 points"`.
//! Job postings have no score and are kept with a raw score of 0.
//!
//! # URL Pattern
//!
//! Self posts link relatively (`item?id=123`) and are resolved against the
//! front page URL to `https://news.ycombinator.com/item?id=123`.

use super::{SourceConfig, StorySource};
use crate::models::Story;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::error::Error;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

pub const FRONT_PAGE_URL: &str = "https://news.ycombinator.com/";
pub const SOURCE_NAME: &str = "Hacker News";

/// Scrapes stories from the Hacker News front page.
#[derive(Debug, Clone)]
pub struct HackerNews {
    client: Client,
    config: SourceConfig,
}

impl HackerNews {
    /// Build a scraper with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(config: SourceConfig) -> Result<Self, Box<dyn Error>> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }
}

impl StorySource for HackerNews {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    #[instrument(level = "info", skip_all, fields(url = %self.config.front_page_url))]
    async fn fetch_stories(&self) -> Result<Vec<Story>, Box<dyn Error>> {
        let base_url = Url::parse(&self.config.front_page_url)?;

        let html = self
            .client
            .get(base_url.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let stories = parse_front_page(&html, &base_url, self.config.max_stories)?;
        info!(count = stories.len(), source = SOURCE_NAME, "Scraped stories");
        Ok(stories)
    }
}

/// Extract up to `limit` stories from front page HTML.
///
/// Rows without a title link are skipped. Links that cannot be resolved
/// against `base_url` are kept as an empty URL so the story still ranks.
pub fn parse_front_page(
    html: &str,
    base_url: &Url,
    limit: usize,
) -> Result<Vec<Story>, Box<dyn Error>> {
    let document = Html::parse_document(html);
    let row_selector = Selector::parse("tr.athing")?;
    let title_selector = Selector::parse("span.titleline > a")?;
    let score_selector = Selector::parse("span.score")?;

    let mut stories = Vec::new();
    for row in document.select(&row_selector).take(limit) {
        let Some(link) = row.select(&title_selector).next() else {
            debug!(id = ?row.value().attr("id"), "Row has no title link; skipping");
            continue;
        };

        let title = link.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            continue;
        }

        let url = match link.value().attr("href") {
            Some(href) => match base_url.join(href) {
                Ok(resolved) => resolved.to_string(),
                Err(e) => {
                    warn!(%href, error = %e, "Unresolvable story link");
                    String::new()
                }
            },
            None => String::new(),
        };

        let raw_score = row
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .next()
            .and_then(|subtext| subtext.select(&score_selector).next())
            .and_then(|score| parse_points(&score.text().collect::<String>()))
            .unwrap_or(0);

        stories.push(Story::new(title, url, raw_score, SOURCE_NAME));
    }

    Ok(stories)
}

/// Parse `"150 points"` (or `"1 point"`) into `150`.
fn parse_points(text: &str) -> Option<u64> {
    text.split_whitespace().next()?.parse().ok()
}
