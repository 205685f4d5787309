//! One end-to-end run: fetch, rank, format, publish, archive.
//!
//! Runs share no state. A failed fetch skips the run, an empty selection
//! skips publishing, and one platform failing never stops the others.

use crate::outputs::json::{RunArchive, write_run};
use crate::outputs::post::{PostConfig, format_post};
use crate::publishers::{PublishOutcome, Publisher, SocialPublisher};
use crate::ranking::RankingEngine;
use crate::scrapers::StorySource;
use chrono::NaiveDate;
use futures::future::join_all;
use tracing::{error, info, instrument, warn};

/// Result of publishing to a single platform.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformResult {
    pub platform: &'static str,
    pub result: Result<PublishOutcome, String>,
}

/// What a run did, for logging and tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// Stories returned by the source.
    pub fetched: usize,
    /// Stories kept by the ranking engine.
    pub selected: usize,
    /// The formatted post, if the run got that far.
    pub post: Option<String>,
    /// One entry per publisher, in publisher order.
    pub outcomes: Vec<PlatformResult>,
}

impl RunReport {
    pub fn failed_platforms(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }
}

/// The configured pipeline, reused across scheduled runs.
#[derive(Debug)]
pub struct Pipeline<S> {
    source: S,
    engine: RankingEngine,
    post: PostConfig,
    publishers: Vec<SocialPublisher>,
    json_output_dir: Option<String>,
}

impl<S: StorySource> Pipeline<S> {
    pub fn new(
        source: S,
        engine: RankingEngine,
        post: PostConfig,
        publishers: Vec<SocialPublisher>,
        json_output_dir: Option<String>,
    ) -> Self {
        Self {
            source,
            engine,
            post,
            publishers,
            json_output_dir,
        }
    }

    /// Run the pipeline once, stamping `date` into the post header.
    #[instrument(level = "info", skip_all, fields(%date, source = %self.source.name()))]
    pub async fn run_job(&self, date: NaiveDate) -> RunReport {
        let start_time = std::time::Instant::now();
        let mut report = RunReport::default();

        let stories = match self.source.fetch_stories().await {
            Ok(stories) => stories,
            Err(e) => {
                error!(error = %e, "Failed to fetch stories; skipping run");
                return report;
            }
        };
        report.fetched = stories.len();

        let selection = self.engine.rank(stories);
        report.selected = selection.len();

        for (i, ranked) in selection.iter().enumerate() {
            info!(
                rank = i + 1,
                score = %format!("{:.1}", ranked.final_score),
                categories = ?self.engine.matcher().matched_categories(&ranked.story.title),
                title = %ranked.story.title,
                "Selected story"
            );
        }

        if selection.is_empty() {
            warn!("No stories found; nothing to publish");
            return report;
        }

        let post = format_post(&selection, date, &self.post);
        info!(chars = post.chars().count(), "Formatted post:\n{post}");

        let content = post.as_str();
        let results = join_all(self.publishers.iter().map(|publisher| async move {
            (publisher.platform(), publisher.publish(content).await)
        }))
        .await;

        for (platform, result) in results {
            let result = match result {
                Ok(outcome) => {
                    info!(platform, %outcome, "Publish finished");
                    Ok(outcome)
                }
                Err(e) => {
                    error!(platform, error = %e, "Publish failed");
                    Err(e.to_string())
                }
            };
            report.outcomes.push(PlatformResult { platform, result });
        }

        if let Some(dir) = &self.json_output_dir {
            let archive = RunArchive {
                date,
                post: &post,
                stories: &selection,
            };
            if let Err(e) = write_run(&archive, dir).await {
                error!(error = %e, "Failed to write run archive");
            }
        }

        let elapsed = start_time.elapsed();
        info!(
            ?elapsed,
            fetched = report.fetched,
            selected = report.selected,
            failed_platforms = report.failed_platforms(),
            "Job completed"
        );

        report.post = Some(post);
        report
    }
}
