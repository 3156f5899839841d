use anyhow::Context;
use serde_json::Value as JsonValue;

const SLACK_API_URL: &str = "https://slack.com/api";

/// Thin wrapper over the Slack Web API and interaction `response_url`s.
#[derive(Debug, Clone)]
pub struct SlackClient {
    client: reqwest::Client,
    token: String,
    api_url: String,
}

impl SlackClient {
    pub fn new(token: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("building slack http client")?;
        Ok(Self {
            client,
            token: token.to_string(),
            api_url: SLACK_API_URL.to_string(),
        })
    }

    /// Base URL override for tests.
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }

    /// Posts a message to a channel via `chat.postMessage`.
    pub async fn post_message(&self, message: &JsonValue) -> anyhow::Result<JsonValue> {
        let resp = self
            .client
            .post(format!("{}/chat.postMessage", self.api_url))
            .bearer_auth(&self.token)
            .json(message)
            .send()
            .await
            .context("posting slack message")?;

        let body: JsonValue = resp.json().await.context("reading slack response")?;
        if body.get("ok").and_then(JsonValue::as_bool) != Some(true) {
            anyhow::bail!(
                "slack api error: {}",
                body.get("error").and_then(JsonValue::as_str).unwrap_or("unknown")
            );
        }
        Ok(body)
    }

    /// Replaces an interactive message in place via its `response_url`.
    pub async fn post_response(&self, response_url: &str, body: &JsonValue) -> anyhow::Result<()> {
        self.client
            .post(response_url)
            .json(body)
            .send()
            .await
            .context("posting to slack response_url")?
            .error_for_status()
            .context("slack response_url rejected update")?;
        Ok(())
    }
}
