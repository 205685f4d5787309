//! # Tech News Poster
//!
//! Scrapes the Hacker News front page, ranks stories by popularity and
//! topical interest, and publishes the top ten as a social media post on a
//! weekly schedule.
//!
//! ## Usage
//!
//! ```sh
//! export LINKEDIN_ACCESS_TOKEN=... LINKEDIN_PERSON_ID=... INSTAGRAM_ACCESS_TOKEN=...
//! tech_news_poster                 # Mon/Thu/Sat at 09:00, plus once at startup
//! tech_news_poster --once --dry-run
//! ```
//!
//! ## Architecture
//!
//! Each run is an independent pipeline:
//! 1. **Fetching**: Scrape up to 30 stories from the source
//! 2. **Ranking**: Normalize points, add keyword category boosts, keep the top 10
//! 3. **Formatting**: Render the post text with medals, links and hashtags
//! 4. **Publishing**: Send the post to every platform concurrently
//! 5. **Archiving**: Optionally write the run to a JSON file

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod keywords;
mod models;
mod outputs;
mod pipeline;
mod publishers;
mod ranking;
mod scheduler;
mod scrapers;
mod utils;

use cli::Cli;
use pipeline::Pipeline;
use publishers::SocialPublisher;
use publishers::instagram::InstagramPublisher;
use publishers::linkedin::LinkedInPublisher;
use scrapers::hacker_news::HackerNews;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // Secrets (and RUST_LOG) may live in a .env file; the real environment
    // wins. Loaded before tracing so the filter sees it, logged after.
    let dotenv = dotenvy::dotenv();

    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    match dotenv {
        Ok(path) => info!(path = %path.display(), "Loaded .env"),
        Err(e) if e.not_found() => debug!("No .env file found"),
        Err(e) => error!(error = %e, "Failed to load .env; continuing with process environment"),
    }

    info!("tech_news_poster starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.config, args.once, args.dry_run, ?args.json_output_dir, "Parsed CLI arguments");

    let config = config::load_config(args.config.as_deref())?;
    let engine = config.ranking_engine()?;

    // Early check: ensure JSON output dir is writable
    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir,
                error = %e,
                "JSON output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    let publishers: Vec<SocialPublisher> = vec![
        LinkedInPublisher::new(
            args.linkedin_access_token.clone(),
            args.linkedin_person_id.clone(),
            args.dry_run,
        )?
        .into(),
        InstagramPublisher::new(
            args.instagram_access_token.clone(),
            args.instagram_account_id.clone(),
        )
        .into(),
    ];

    let source = HackerNews::new(config.source.clone())?;
    let pipeline = Pipeline::new(
        source,
        engine,
        config.post_config(),
        publishers,
        args.json_output_dir.clone(),
    );

    if args.once {
        let report = pipeline.run_job(Local::now().date_naive()).await;
        info!(
            fetched = report.fetched,
            selected = report.selected,
            failed_platforms = report.failed_platforms(),
            "Single run complete"
        );
        return Ok(());
    }

    info!(schedule = %config.schedule.describe(), "Tech news bot started; press Ctrl+C to stop");
    let pipeline = &pipeline;
    scheduler::run_scheduled(&config.schedule, move |date| pipeline.run_job(date)).await?;

    info!("Shutdown complete");
    Ok(())
}
