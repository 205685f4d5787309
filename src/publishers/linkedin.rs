//! LinkedIn publishing through the UGC Posts API.
//!
//! Posts are shared publicly as the member identified by the configured
//! person id, authenticated with a member access token.

use super::retry::{DeliverAsync, HttpStatusError, RetryDeliver};
use super::{PREVIEW_CHARS, PublishOutcome, Publisher};
use crate::utils::truncate_for_log;
use reqwest::Client;
use serde::Serialize;
use std::error::Error;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

pub const UGC_POSTS_URL: &str = "https://api.linkedin.com/v2/ugcPosts";
const PLATFORM: &str = "LinkedIn";

/// Request body of `POST /v2/ugcPosts`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UgcPost<'a> {
    author: String,
    lifecycle_state: &'static str,
    specific_content: SpecificContent<'a>,
    visibility: Visibility,
}

#[derive(Debug, Serialize)]
struct SpecificContent<'a> {
    #[serde(rename = "com.linkedin.ugc.ShareContent")]
    share_content: ShareContent<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShareContent<'a> {
    share_commentary: ShareCommentary<'a>,
    share_media_category: &'static str,
}

#[derive(Debug, Serialize)]
struct ShareCommentary<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Visibility {
    #[serde(rename = "com.linkedin.ugc.MemberNetworkVisibility")]
    member_network_visibility: &'static str,
}

impl<'a> UgcPost<'a> {
    /// A public, text-only post authored by `person_id`.
    pub fn text_share(person_id: &str, text: &'a str) -> Self {
        Self {
            author: format!("urn:li:person:{person_id}"),
            lifecycle_state: "PUBLISHED",
            specific_content: SpecificContent {
                share_content: ShareContent {
                    share_commentary: ShareCommentary { text },
                    share_media_category: "NONE",
                },
            },
            visibility: Visibility {
                member_network_visibility: "PUBLIC",
            },
        }
    }
}

/// Raw HTTP client for the UGC Posts endpoint.
#[derive(Debug)]
pub struct LinkedInClient {
    client: Client,
    endpoint: String,
    access_token: String,
    person_id: String,
}

impl DeliverAsync for LinkedInClient {
    #[instrument(level = "info", skip_all, fields(endpoint = %self.endpoint))]
    async fn deliver(&self, text: &str) -> Result<Option<String>, Box<dyn Error>> {
        let t0 = Instant::now();
        let payload = UgcPost::text_share(&self.person_id, text);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.access_token)
            .header("X-Restli-Protocol-Version", "2.0.0")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let header_id = response
            .headers()
            .get("x-restli-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        if !status.is_success() {
            warn!(
                elapsed_ms = t0.elapsed().as_millis(),
                %status,
                body = %truncate_for_log(&body, 300),
                "LinkedIn rejected post"
            );
            return Err(Box::new(HttpStatusError {
                platform: PLATFORM,
                status,
                body,
            }));
        }

        Ok(header_id.or_else(|| post_id_from_body(&body)))
    }
}

/// The `id` field of a UGC Posts response body, if present.
fn post_id_from_body(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("id")?.as_str().map(str::to_string)
}

/// Publishes the post to the member's LinkedIn feed.
#[derive(Debug)]
pub struct LinkedInPublisher {
    delivery: Option<RetryDeliver<LinkedInClient>>,
    dry_run: bool,
}

impl LinkedInPublisher {
    /// Build a publisher. Without both an access token and a person id the
    /// publisher reports [`PublishOutcome::NotConfigured`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        access_token: Option<String>,
        person_id: Option<String>,
        dry_run: bool,
    ) -> Result<Self, Box<dyn Error>> {
        Self::with_endpoint(access_token, person_id, dry_run, UGC_POSTS_URL)
    }

    /// Like [`LinkedInPublisher::new`] but posting to `endpoint`.
    pub fn with_endpoint(
        access_token: Option<String>,
        person_id: Option<String>,
        dry_run: bool,
        endpoint: &str,
    ) -> Result<Self, Box<dyn Error>> {
        let access_token = access_token.filter(|t| !t.trim().is_empty());
        let person_id = person_id.filter(|p| !p.trim().is_empty());

        let delivery = match (access_token, person_id) {
            (Some(access_token), Some(person_id)) => {
                let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
                let inner = LinkedInClient {
                    client,
                    endpoint: endpoint.to_string(),
                    access_token,
                    person_id,
                };
                Some(RetryDeliver::new(inner, 3, Duration::from_secs(1)))
            }
            _ => None,
        };

        Ok(Self { delivery, dry_run })
    }
}

impl Publisher for LinkedInPublisher {
    fn platform(&self) -> &'static str {
        PLATFORM
    }

    #[instrument(level = "info", skip_all, fields(platform = PLATFORM))]
    async fn publish(&self, content: &str) -> Result<PublishOutcome, Box<dyn Error>> {
        let Some(delivery) = &self.delivery else {
            warn!("LinkedIn token or person id not configured");
            return Ok(PublishOutcome::NotConfigured);
        };

        if self.dry_run {
            info!(preview = %truncate_for_log(content, PREVIEW_CHARS), "Would post to LinkedIn");
            return Ok(PublishOutcome::DryRun);
        }

        let id = delivery.deliver(content).await?;
        info!(id = ?id, "Posted to LinkedIn");
        Ok(PublishOutcome::Published { id })
    }
}
