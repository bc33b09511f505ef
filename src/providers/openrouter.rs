use std::time::Duration;
use log::{debug, trace, error};

use crate::config::OpenRouterConfig;
use crate::error::Error;
use crate::request::ChatRequest;

/// OpenRouter chat-completion client.
/// Holds no per-request state; one instance serves every request.
#[derive(Debug, Clone)]
pub struct OpenRouterClient
{   config: OpenRouterConfig
  , http_client: reqwest::Client
}

impl OpenRouterClient
{   pub fn new(config: OpenRouterConfig)
      -> Result<Self, Error>
    {   debug!("Creating OpenRouterClient for {}", config.endpoint());
        let http_client = reqwest::Client::builder()
          .timeout(Duration::from_secs(config.timeout_secs))
          .build()
          .map_err(|e| {
            error!("Failed to build HTTP client: {}", e);
            Error::InvalidConfiguration(e.to_string())
          })?;
        Ok(OpenRouterClient
        {   config
          , http_client
        })
    }

    fn api_key(&self) -> Result<&str, Error>
    {   self.config.api_key.as_deref()
          .filter(|key| !key.trim().is_empty())
          .ok_or_else(|| {
            error!("No OpenRouter API key configured");
            Error::MissingApiKey
          })
    }

    /// Build the upstream POST for an already validated prompt
    pub fn build_request(&self, prompt: &str)
      -> Result<reqwest::Request, Error>
    {   let api_key = self.api_key()?;

        let payload = ChatRequest::blueprint(&self.config.model, prompt);
        let body = serde_json::to_vec(&payload).map_err(|e| {
          error!("Failed to serialize chat payload: {}", e);
          Error::SerializeRequest(e.to_string())
        })?;
        trace!("OpenRouter request: {:?}", payload);

        let mut builder = self.http_client
          .post(self.config.endpoint())
          .header("Authorization", format!("Bearer {}", api_key))
          .header("Content-Type", "application/json")
          .header("Accept", "application/json");

        if let Some(referer) = non_blank(&self.config.referer)
        {   builder = builder.header("HTTP-Referer", referer);
        }
        if let Some(title) = non_blank(&self.config.title)
        {   builder = builder.header("X-Title", title);
        }

        builder.body(body).build().map_err(|e| {
          error!("Failed to build request: {}", e);
          Error::BuildRequest(e.to_string())
        })
    }

    /// Send a prompt and return the model's parsed JSON output
    pub async fn send_prompt(&self, prompt: &str)
      -> Result<serde_json::Value, Error>
    {   debug!("Sending prompt with model: {}", self.config.model);
        let request = self.build_request(prompt)?;

        let response = self.http_client
          .execute(request)
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            Error::UpstreamUnreachable(e.to_string())
          })?;

        let status = response.status().as_u16();
        trace!("OpenRouter response status: {}", status);

        let body = response.bytes().await.map_err(|e| {
          error!("Failed to read response body: {}", e);
          Error::UpstreamUnreadable(e.to_string())
        })?;

        crate::normalize::normalize_response(status, &body)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str>
{   value.as_deref()
      .map(str::trim)
      .filter(|v| !v.is_empty())
}
