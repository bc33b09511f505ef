use log::{debug, info};

use crate::config::BlueprintConfig;
use crate::error::Error;
use crate::providers::OpenRouterClient;
use crate::request::PromptRequest;

/// Prompt in, blueprint JSON out.
///
/// Shared read-only across requests; nothing is mutated per call.
#[derive(Debug, Clone)]
pub struct BlueprintService
{   provider: OpenRouterClient
  , strict_schema: bool
}

impl BlueprintService
{   pub fn new(config: &BlueprintConfig) -> Result<Self, Error>
    {   debug!("Creating BlueprintService");
        Ok(BlueprintService
        {   provider: OpenRouterClient::new(config.openrouter.clone())?
          , strict_schema: config.strict_schema
        })
    }

    /// Handle a raw `{prompt}` request body
    pub async fn generate_from_body(&self, body: &[u8])
      -> crate::GenerateReply
    {   let request = PromptRequest::from_slice(body)?;
        self.generate(&request).await
    }

    /// Validate the prompt, ask the model, check the result.
    /// A blank prompt never reaches the network.
    pub async fn generate(&self, request: &PromptRequest)
      -> crate::GenerateReply
    {   let prompt = request.validated_prompt()?;
        let value = self.provider.send_prompt(&prompt).await?;

        if self.strict_schema
        {   crate::blueprint::Blueprint::from_value(&value)?;
        }

        info!(
          "Blueprint generated for {} char prompt",
          prompt.chars().count()
        );
        Ok(value)
    }
}
