//! Publishing photos through the Instagram Graph API.
//!
//! A post is made in two steps: a media container is created from a public
//! image URL and a caption, then the container is published.

use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;

use crate::config::BotConfig;

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Instagram API credentials are not set")]
    MissingCredentials,
    #[error("Graph API request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Graph API rejected {step}: {error}")]
    Rejected { step: &'static str, error: Value },
}

#[derive(Debug, Deserialize)]
struct GraphReply {
    id: Option<String>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct InstagramPublisher {
    client: reqwest::Client,
    base_url: String,
    version: String,
    account_id: Option<String>,
    access_token: Option<String>,
}

impl InstagramPublisher {
    pub fn new(config: &BotConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.graph_api_base_url.clone(),
            version: config.graph_api_version.clone(),
            account_id: config.instagram_account_id.clone(),
            access_token: config.instagram_access_token.clone(),
        }
    }

    /// Posts `image_url` with `caption` and returns the new post's id.
    pub async fn publish(&self, image_url: &str, caption: &str) -> Result<String, PublishError> {
        let (Some(account_id), Some(access_token)) =
            (self.account_id.as_deref(), self.access_token.as_deref())
        else {
            return Err(PublishError::MissingCredentials);
        };
        let account_url = format!("{}/{}/{account_id}", self.base_url, self.version);

        debug!("InstagramPublisher: creating media container");
        let container_id = self
            .call(
                "media container creation",
                &format!("{account_url}/media"),
                &[
                    ("image_url", image_url),
                    ("caption", caption),
                    ("access_token", access_token),
                ],
            )
            .await?;
        info!("InstagramPublisher: media container {container_id} created");

        let post_id = self
            .call(
                "media publish",
                &format!("{account_url}/media_publish"),
                &[
                    ("creation_id", container_id.as_str()),
                    ("access_token", access_token),
                ],
            )
            .await?;
        info!("InstagramPublisher: published post {post_id}");

        Ok(post_id)
    }

    /// POSTs a form and returns the `id` of the created object.
    ///
    /// The Graph API reports most failures as a JSON body with an `error`
    /// object and no `id`, regardless of status code.
    async fn call(
        &self,
        step: &'static str,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<String, PublishError> {
        let reply: GraphReply = self.client.post(url).form(form).send().await?.json().await?;

        match reply {
            GraphReply { id: Some(id), .. } => Ok(id),
            GraphReply { error, .. } => Err(PublishError::Rejected {
                step,
                error: error.unwrap_or_else(|| Value::String("Unknown error".to_owned())),
            }),
        }
    }
}
