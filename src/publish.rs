//! The publish sink: pushes a generated post to the social network.
//!
//! [`Publisher`] is a trait so the pipeline's "record only after a confirmed
//! publish" rule can be tested without a network. The production
//! implementation targets the LinkedIn UGC posts endpoint: bearer token,
//! author URN, JSON share payload, success signalled by HTTP 201. When an
//! article URL accompanies the text it rides along as a link-card attachment
//! rather than being pasted into the body.

use serde_json::json;
use std::error::Error;
use std::time::Duration;
use tracing::{error, info, instrument};

/// Capability for publishing a finished post.
///
/// Returning `Err` means the post is NOT live; callers must then skip every
/// ledger and history write for the run.
pub trait Publisher {
    async fn publish(&self, text: &str, article_url: Option<&str>) -> Result<(), Box<dyn Error>>;
}

/// UGC-post REST implementation.
pub struct RestPublisher {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
    author_urn: String,
}

impl RestPublisher {
    pub fn new(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
        author_urn: impl Into<String>,
    ) -> Result<Self, Box<dyn Error>> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            access_token: access_token.into(),
            author_urn: author_urn.into(),
        })
    }

    fn share_payload(&self, text: &str, article_url: Option<&str>) -> serde_json::Value {
        let mut share_content = json!({
            "shareCommentary": { "text": text },
            "shareMediaCategory": "NONE",
        });
        if let Some(url) = article_url {
            share_content["shareMediaCategory"] = json!("ARTICLE");
            share_content["media"] = json!([{ "status": "READY", "originalUrl": url }]);
        }
        json!({
            "author": self.author_urn,
            "lifecycleState": "PUBLISHED",
            "specificContent": { "com.linkedin.ugc.ShareContent": share_content },
            "visibility": { "com.linkedin.ugc.MemberNetworkVisibility": "PUBLIC" },
        })
    }
}

impl Publisher for RestPublisher {
    #[instrument(level = "info", skip_all, fields(chars = text.len()))]
    async fn publish(&self, text: &str, article_url: Option<&str>) -> Result<(), Box<dyn Error>> {
        let url = format!("{}/v2/ugcPosts", self.base_url);
        let res = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .header("X-Restli-Protocol-Version", "2.0.0")
            .json(&self.share_payload(text, article_url))
            .send()
            .await?;

        let status = res.status();
        if status.as_u16() == 201 {
            info!("Post published");
            Ok(())
        } else {
            let body = res.text().await.unwrap_or_default();
            error!(%status, body = %body, "Publish rejected");
            Err(format!("publish sink returned {status}").into())
        }
    }
}
