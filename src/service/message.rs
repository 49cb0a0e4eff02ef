use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Fallback used whenever the message collaborator is unconfigured,
/// unreachable or slow.
pub const DEFAULT_CHECK_IN_MESSAGE: &str = "Check-in successful!";

#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

/// Optional, stateless collaborator that returns a short congratulatory
/// string after a check-in. Any failure falls back to the default; it
/// never blocks or fails the check-in itself.
pub struct MessageClient {
    client: Option<reqwest::Client>,
    url: Option<String>,
}

impl MessageClient {
    pub fn from_config(url: Option<String>, timeout: Duration) -> Self {
        let client = match &url {
            Some(_) => reqwest::Client::builder().timeout(timeout).build().ok(),
            None => None,
        };
        Self { client, url }
    }

    /// A client with no collaborator configured; always the default string.
    pub fn disabled() -> Self {
        Self {
            client: None,
            url: None,
        }
    }

    pub async fn fetch_message(&self) -> String {
        let (Some(client), Some(url)) = (&self.client, &self.url) else {
            return DEFAULT_CHECK_IN_MESSAGE.to_string();
        };

        let result = async {
            let resp = client.get(url).send().await?.error_for_status()?;
            resp.json::<MessageBody>().await
        }
        .await;

        match result {
            Ok(body) if !body.message.trim().is_empty() => body.message.trim().to_string(),
            Ok(_) => DEFAULT_CHECK_IN_MESSAGE.to_string(),
            Err(e) => {
                debug!(error = %e, "message service unavailable, using fallback");
                DEFAULT_CHECK_IN_MESSAGE.to_string()
            }
        }
    }
}
