//! Instagram publishing placeholder.
//!
//! Instagram only accepts posts from a Business account through the Graph
//! API, and every post needs an image: an image is uploaded into a media
//! container first, then the container is published. None of that is wired
//! up, so a configured publisher reports [`PublishOutcome::Unimplemented`]
//! instead of pretending the post went out.

use super::{PREVIEW_CHARS, PublishOutcome, Publisher};
use crate::utils::truncate_for_log;
use std::error::Error;
use tracing::{info, instrument, warn};

pub const GRAPH_API_BASE: &str = "https://graph.facebook.com/v18.0";
const PLATFORM: &str = "Instagram";

#[derive(Debug)]
pub struct InstagramPublisher {
    access_token: Option<String>,
    account_id: Option<String>,
}

impl InstagramPublisher {
    pub fn new(access_token: Option<String>, account_id: Option<String>) -> Self {
        Self {
            access_token: access_token.filter(|t| !t.trim().is_empty()),
            account_id: account_id.filter(|a| !a.trim().is_empty()),
        }
    }

    /// Media container endpoint for the configured business account.
    pub fn media_endpoint(&self) -> Option<String> {
        self.account_id
            .as_ref()
            .map(|id| format!("{GRAPH_API_BASE}/{id}/media"))
    }
}

impl Publisher for InstagramPublisher {
    fn platform(&self) -> &'static str {
        PLATFORM
    }

    #[instrument(level = "info", skip_all, fields(platform = PLATFORM))]
    async fn publish(&self, content: &str) -> Result<PublishOutcome, Box<dyn Error>> {
        if self.access_token.is_none() {
            warn!("Instagram token not configured");
            return Ok(PublishOutcome::NotConfigured);
        }

        info!(
            endpoint = ?self.media_endpoint(),
            preview = %truncate_for_log(content, PREVIEW_CHARS),
            "Would post to Instagram"
        );
        warn!("Instagram publishing is not implemented; post was not sent");
        Ok(PublishOutcome::Unimplemented)
    }
}
