//! Inbound prompt and upstream chat-completion wire types

use serde::{Deserialize, Deserializer, Serialize};

/// Instruction sent ahead of every prompt.
/// The output schema is only enforced by the model following it.
pub const SYSTEM_INSTRUCTION: &str = "
You are an architectural blueprint AI.
Return STRICT JSON only.
Schema:
{
  \"rooms\": [
    { \"name\": \"string\", \"x\": number, \"y\": number, \"width\": number, \"height\": number }
  ]
}
";

pub const TEMPERATURE: f32 = 0.2;

/// Inbound `{prompt}` body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptRequest
{   #[serde(default, deserialize_with = "null_as_empty")]
    pub prompt: String
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{   Option::<String>::deserialize(deserializer)
      .map(Option::unwrap_or_default)
}

impl PromptRequest
{   /// Parse a raw request body; `null` reads as an empty prompt
    pub fn from_slice(body: &[u8])
      -> Result<Self, crate::error::Error>
    {   serde_json::from_slice::<Option<PromptRequest>>(body)
          .map(Option::unwrap_or_default)
          .map_err(|e| {
            crate::error::Error::InvalidRequest(e.to_string())
          })
    }

    /// Trimmed prompt, rejected when blank
    pub fn validated_prompt(&self)
      -> Result<String, crate::error::Error>
    {   let prompt = self.prompt.trim();
        if prompt.is_empty()
        {   return Err(crate::error::Error::PromptRequired);
        }
        Ok(prompt.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage
{   pub role: String
  , pub content: String
}

impl ChatMessage
{   pub fn system(content: &str) -> Self
    {   ChatMessage
        {   role: "system".to_string()
          , content: content.to_string()
        }
    }

    pub fn user(content: &str) -> Self
    {   ChatMessage
        {   role: "user".to_string()
          , content: content.to_string()
        }
    }
}

/// Upstream chat-completion payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest
{   pub model: String
  , pub messages: Vec<ChatMessage>
  , pub temperature: f32
}

impl ChatRequest
{   /// Fixed two-message payload: instruction, then the prompt
    pub fn blueprint(model: &str, prompt: &str) -> Self
    {   ChatRequest
        {   model: model.to_string()
          , messages: vec![
              ChatMessage::system(SYSTEM_INSTRUCTION)
            , ChatMessage::user(prompt)
            ]
          , temperature: TEMPERATURE
        }
    }
}

/// Upstream envelope. Missing or null fields read as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse
{   #[serde(default)]
    pub choices: Option<Vec<Choice>>
  , #[serde(default)]
    pub error: Option<ErrorBody>
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Choice
{   #[serde(default)]
    pub message: Option<ChoiceMessage>
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChoiceMessage
{   #[serde(default)]
    pub content: Option<String>
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody
{   #[serde(default)]
    pub message: Option<String>
}

impl ChatResponse
{   pub fn choices(&self) -> &[Choice]
    {   self.choices.as_deref().unwrap_or(&[])
    }

    /// Upstream error message, if present and not blank
    pub fn error_message(&self) -> Option<String>
    {   self.error.as_ref()
          .and_then(|e| e.message.as_ref())
          .filter(|m| !m.trim().is_empty())
          .cloned()
    }
}

impl Choice
{   pub fn content(&self) -> &str
    {   self.message.as_ref()
          .and_then(|m| m.content.as_deref())
          .unwrap_or("")
    }
}
