//! Social platforms the formatted post is published to.
//!
//! Every platform implements [`Publisher`]. A publisher reports a
//! [`PublishOutcome`] rather than silently succeeding, so a platform that
//! is not configured, or not wired up yet, is visible in the run report.
//!
//! # Supported Platforms
//!
//! | Platform | Module | Credentials | Status |
//! |----------|--------|-------------|--------|
//! | LinkedIn | [`linkedin`] | access token + person id | UGC Posts API |
//! | Instagram | [`instagram`] | access token (+ business account id) | placeholder |

pub mod instagram;
pub mod linkedin;
pub mod retry;

use instagram::InstagramPublisher;
use linkedin::LinkedInPublisher;
use std::error::Error;
use std::fmt;

/// How a publish attempt ended, short of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The platform accepted the post. `id` is the platform's post id when
    /// it reports one.
    Published { id: Option<String> },
    /// Dry-run mode; nothing was sent.
    DryRun,
    /// Credentials are missing, so the platform was skipped.
    NotConfigured,
    /// The platform integration is not implemented yet.
    Unimplemented,
}

impl fmt::Display for PublishOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishOutcome::Published { id: Some(id) } => write!(f, "published ({id})"),
            PublishOutcome::Published { id: None } => write!(f, "published"),
            PublishOutcome::DryRun => write!(f, "dry run"),
            PublishOutcome::NotConfigured => write!(f, "not configured"),
            PublishOutcome::Unimplemented => write!(f, "unimplemented"),
        }
    }
}

/// A destination for the formatted post.
pub trait Publisher {
    /// Platform name used in logs and reports.
    fn platform(&self) -> &'static str;

    /// Publish `content`.
    ///
    /// Only delivery failures are errors; everything else is an outcome.
    async fn publish(&self, content: &str) -> Result<PublishOutcome, Box<dyn Error>>;
}

/// The closed set of platforms, so a run can hold them in one list.
#[derive(Debug)]
pub enum SocialPublisher {
    LinkedIn(LinkedInPublisher),
    Instagram(InstagramPublisher),
}

impl Publisher for SocialPublisher {
    fn platform(&self) -> &'static str {
        match self {
            SocialPublisher::LinkedIn(p) => p.platform(),
            SocialPublisher::Instagram(p) => p.platform(),
        }
    }

    async fn publish(&self, content: &str) -> Result<PublishOutcome, Box<dyn Error>> {
        match self {
            SocialPublisher::LinkedIn(p) => p.publish(content).await,
            SocialPublisher::Instagram(p) => p.publish(content).await,
        }
    }
}

impl From<LinkedInPublisher> for SocialPublisher {
    fn from(p: LinkedInPublisher) -> Self {
        SocialPublisher::LinkedIn(p)
    }
}

impl From<InstagramPublisher> for SocialPublisher {
    fn from(p: InstagramPublisher) -> Self {
        SocialPublisher::Instagram(p)
    }
}

/// Characters of post content shown in "would post" log lines.
pub(crate) const PREVIEW_CHARS: usize = 200;
