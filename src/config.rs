//! Application configuration loaded from an optional YAML file.
//!
//! Every section is optional; missing sections and fields fall back to the
//! built-in defaults, so an empty file is a valid configuration.
//!
//! ```yaml
//! ranking:
//!   boost_per_category: 2.0
//!   selection_size: 10
//!   normalization:
//!     kind: batch_max          # or min_max, or fixed_ceiling with `ceiling: 500.0`
//! keywords:
//!   - name: AI/ML
//!     terms: [ai, machine learning, openai]
//! post:
//!   hashtags: [TechNews, AI]
//! schedule:
//!   slots:
//!     - { weekday: Mon, at: "09:00" }
//!   run_on_start: true
//! source:
//!   max_stories: 30
//! ```
//!
//! Secrets are not read from this file; they come from the environment
//! through the CLI (see [`crate::cli::Cli`]).

use crate::keywords::{DEFAULT_CATEGORIES, KeywordCategory, KeywordMatcher};
use crate::outputs::post::PostConfig;
use crate::ranking::{Normalization, RankingConfig, RankingEngine};
use crate::scheduler::ScheduleConfig;
use crate::scrapers::SourceConfig;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub ranking: RankingConfig,
    pub keywords: Vec<KeywordCategory>,
    pub post: PostConfig,
    pub schedule: ScheduleConfig,
    pub source: SourceConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ranking: RankingConfig::default(),
            keywords: DEFAULT_CATEGORIES.clone(),
            post: PostConfig::default(),
            schedule: ScheduleConfig::default(),
            source: SourceConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, Box<dyn Error>> {
        // serde_yaml rejects an empty document, which should mean "all defaults"
        let config: AppConfig = if yaml.trim().is_empty() {
            AppConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot check on its own.
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        let boost = self.ranking.boost_per_category;
        if !boost.is_finite() || boost < 0.0 {
            return Err(format!("ranking.boost_per_category must be a non-negative number, got {boost}").into());
        }
        if self.ranking.selection_size == 0 {
            return Err("ranking.selection_size must be at least 1".into());
        }
        if let Normalization::FixedCeiling { ceiling } = self.ranking.normalization {
            if !ceiling.is_finite() || ceiling <= 0.0 {
                return Err(format!("ranking.normalization.ceiling must be positive, got {ceiling}").into());
            }
        }
        if self.post.headline_count == Some(0) {
            return Err("post.headline_count must be at least 1".into());
        }
        if self.source.max_stories == 0 {
            return Err("source.max_stories must be at least 1".into());
        }
        Ok(())
    }

    /// Post settings with the header count filled in from
    /// `ranking.selection_size` when `post.headline_count` is unset.
    pub fn post_config(&self) -> PostConfig {
        PostConfig {
            headline_count: Some(self.post.headline_count.unwrap_or(self.ranking.selection_size)),
            ..self.post.clone()
        }
    }

    /// Build the ranking engine described by this configuration.
    pub fn ranking_engine(&self) -> Result<RankingEngine, Box<dyn Error>> {
        let matcher = KeywordMatcher::from_categories(&self.keywords)?;
        Ok(RankingEngine::new(matcher, self.ranking.clone()))
    }
}

/// Load configuration from `path`, or the defaults when no path is given.
#[instrument(level = "info")]
pub fn load_config(path: Option<&str>) -> Result<AppConfig, Box<dyn Error>> {
    let Some(path) = path else {
        info!("No config file given; using defaults");
        return Ok(AppConfig::default());
    };

    let yaml = fs::read_to_string(path).map_err(|e| format!("reading config {path}: {e}"))?;
    let config = AppConfig::from_yaml(&yaml)?;
    info!(
        categories = config.keywords.len(),
        slots = config.schedule.slots.len(),
        "Loaded configuration"
    );
    Ok(config)
}
