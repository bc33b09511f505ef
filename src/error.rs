use std::fmt;

pub const MSG_INVALID_REQUEST: &str = "Invalid request";
pub const MSG_PROMPT_REQUIRED: &str = "Prompt is required";
pub const MSG_MISSING_API_KEY: &str
  = "OPENROUTER_API_KEY or OPENROUTER_API is not configured";
pub const MSG_PREPARE_FAILED: &str = "Failed to prepare AI request";
pub const MSG_CREATE_FAILED: &str = "Failed to create AI request";
pub const MSG_REQUEST_FAILED: &str = "AI request failed";
pub const MSG_READ_FAILED: &str = "Failed to read AI response";
pub const MSG_UNREADABLE: &str
  = "AI service returned an unreadable response";
pub const MSG_AUTH_FAILED: &str
  = "OpenRouter authentication failed. Check OPENROUTER_API_KEY.";
pub const MSG_NO_CHOICES: &str = "AI response did not include any choices";
pub const MSG_EMPTY_CONTENT: &str = "AI response content was empty";
pub const MSG_INVALID_JSON: &str = "AI returned invalid JSON";
pub const MSG_SCHEMA_MISMATCH: &str
  = "AI returned a blueprint that does not match the room schema";

/// Coarse failure class; each class owns exactly one HTTP status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass
{   /// Caller sent a bad body or an empty prompt
    ClientInput
  , /// Missing credentials or local request construction failure
    Configuration
  , /// Network failure, unreadable body or unparsable envelope
    UpstreamTransport
  , /// Upstream answered 401/403
    UpstreamAuth
  , /// Upstream answered, but not with usable content
    UpstreamContent
}

impl ErrorClass
{   /// HTTP status the surrounding server should answer with
    pub fn status(self) -> u16
    {   match self
        {   ErrorClass::ClientInput => 400
          , ErrorClass::Configuration => 500
          , ErrorClass::UpstreamTransport => 502
          , ErrorClass::UpstreamAuth => 401
          , ErrorClass::UpstreamContent => 502
        }
    }
}

/// Every way a blueprint request can fail.
/// Implements Clone so results can be handed across tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// Request body is not a `{prompt}` object
    InvalidRequest(String)
  , /// Prompt is empty after trimming
    PromptRequired
  , /// No API key resolved from the environment
    MissingApiKey
  , /// Chat payload could not be serialized
    SerializeRequest(String)
  , /// Upstream HTTP request could not be constructed
    BuildRequest(String)
  , /// Transport failure talking to the upstream service
    UpstreamUnreachable(String)
  , /// Upstream body could not be read
    UpstreamUnreadable(String)
  , /// Upstream body is not an envelope object
    UpstreamUnparsable(String)
  , /// Upstream returned a failure status (not 401/403)
    UpstreamFailed
    {   status: u16
      , message: Option<String>
    }
  , /// Upstream rejected our credentials
    Authentication
    {   status: u16
      , message: Option<String>
    }
  , /// Envelope had no choices
    NoChoices
  , /// Model content was empty after fence stripping
    EmptyContent
  , /// Model content is not JSON
    InvalidModelJson(String)
  , /// Model JSON does not match the room schema (strict mode)
    SchemaMismatch(String)
  , /// Server could not be configured or started
    InvalidConfiguration(String)
}

impl Error
{   pub fn class(&self) -> ErrorClass
    {   match self
        {   Error::InvalidRequest(_)
          | Error::PromptRequired => ErrorClass::ClientInput
          , Error::MissingApiKey
          | Error::SerializeRequest(_)
          | Error::BuildRequest(_)
          | Error::InvalidConfiguration(_) => ErrorClass::Configuration
          , Error::UpstreamUnreachable(_)
          | Error::UpstreamUnreadable(_)
          | Error::UpstreamUnparsable(_)
          | Error::UpstreamFailed { .. } => ErrorClass::UpstreamTransport
          , Error::Authentication { .. } => ErrorClass::UpstreamAuth
          , Error::NoChoices
          | Error::EmptyContent
          | Error::InvalidModelJson(_)
          | Error::SchemaMismatch(_) => ErrorClass::UpstreamContent
        }
    }

    pub fn status(&self) -> u16
    {   self.class().status()
    }

    /// Message safe to hand back to the caller.
    /// Upstream-provided messages win over the generic ones.
    pub fn client_message(&self) -> String
    {   match self
        {   Error::InvalidRequest(_) => MSG_INVALID_REQUEST.to_string()
          , Error::PromptRequired => MSG_PROMPT_REQUIRED.to_string()
          , Error::MissingApiKey => MSG_MISSING_API_KEY.to_string()
          , Error::SerializeRequest(_) => MSG_PREPARE_FAILED.to_string()
          , Error::BuildRequest(_) => MSG_CREATE_FAILED.to_string()
          , Error::UpstreamUnreachable(_) => MSG_REQUEST_FAILED.to_string()
          , Error::UpstreamUnreadable(_) => MSG_READ_FAILED.to_string()
          , Error::UpstreamUnparsable(_) => MSG_UNREADABLE.to_string()
          , Error::UpstreamFailed { message, .. } => {
              message.clone()
                .unwrap_or_else(|| MSG_REQUEST_FAILED.to_string())
            }
          , Error::Authentication { message, .. } => {
              message.clone()
                .unwrap_or_else(|| MSG_AUTH_FAILED.to_string())
            }
          , Error::NoChoices => MSG_NO_CHOICES.to_string()
          , Error::EmptyContent => MSG_EMPTY_CONTENT.to_string()
          , Error::InvalidModelJson(_) => MSG_INVALID_JSON.to_string()
          , Error::SchemaMismatch(_) => MSG_SCHEMA_MISMATCH.to_string()
          , Error::InvalidConfiguration(msg) => msg.clone()
        }
    }
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::InvalidRequest(msg) => {
              write!(f, "Invalid request body: {}", msg)
            }
          , Error::PromptRequired => {
              write!(f, "Prompt is empty")
            }
          , Error::MissingApiKey => {
              write!(f, "Missing API key: {}", MSG_MISSING_API_KEY)
            }
          , Error::SerializeRequest(msg) => {
              write!(f, "Failed to serialize chat payload: {}", msg)
            }
          , Error::BuildRequest(msg) => {
              write!(f, "Failed to build upstream request: {}", msg)
            }
          , Error::UpstreamUnreachable(msg) => {
              write!(f, "HTTP error: {}", msg)
            }
          , Error::UpstreamUnreadable(msg) => {
              write!(f, "Failed to read upstream body: {}", msg)
            }
          , Error::UpstreamUnparsable(msg) => {
              write!(f, "Parse error: {}", msg)
            }
          , Error::UpstreamFailed { status, message } => {
              write!(f,
                "API error ({}): {}",
                status,
                message.as_deref().unwrap_or("no message")
              )
            }
          , Error::Authentication { status, message } => {
              write!(f,
                "Authentication failed ({}): {}",
                status,
                message.as_deref().unwrap_or("no message")
              )
            }
          , Error::NoChoices => {
              write!(f, "API response contained no choices")
            }
          , Error::EmptyContent => {
              write!(f, "Model returned empty content")
            }
          , Error::InvalidModelJson(msg) => {
              write!(f, "Model returned invalid JSON: {}", msg)
            }
          , Error::SchemaMismatch(msg) => {
              write!(f, "Blueprint schema mismatch: {}", msg)
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}
