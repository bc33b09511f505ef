//! Turns an upstream chat-completion response into a JSON value.

use log::{debug, error, trace, warn};
use serde_json::Value;

use crate::error::Error;
use crate::request::ChatResponse;

const FENCE: &str = "```";

/// Remove a code fence wrapping the whole content.
///
/// Only strips when the first line opens a fence and the last line is
/// exactly a closing fence; anything else is returned trimmed but intact.
pub fn strip_code_fence(content: &str) -> String
{   let cleaned = content.trim();
    if cleaned.starts_with(FENCE)
    {   let lines: Vec<&str> = cleaned.split('\n').collect();
        let n = lines.len();
        if n >= 3
          && lines[0].trim().starts_with(FENCE)
          && lines[n - 1].trim() == FENCE
        {   return lines[1..n - 1].join("\n").trim().to_string();
        }
    }
    cleaned.to_string()
}

/// Classify an upstream response and extract the model's JSON output.
///
/// `status` is the upstream HTTP status, `body` the raw response body.
pub fn normalize_response(status: u16, body: &[u8])
  -> Result<Value, Error>
{   let envelope: ChatResponse = serde_json::from_slice(body)
      .map_err(|e| {
        error!("Upstream envelope is not parsable: {}", e);
        Error::UpstreamUnparsable(e.to_string())
      })?;

    if status >= 400
    {   let message = envelope.error_message();
        warn!(
          "Upstream returned {}: {}",
          status,
          message.as_deref().unwrap_or("<no message>")
        );
        if status == 401 || status == 403
        {   return Err(Error::Authentication { status, message });
        }
        return Err(Error::UpstreamFailed { status, message });
    }

    let choice = envelope.choices().first().ok_or_else(|| {
      error!("No choices in response");
      Error::NoChoices
    })?;

    let content = strip_code_fence(choice.content());
    if content.is_empty()
    {   error!("Model content empty");
        return Err(Error::EmptyContent);
    }
    trace!("Model content: {}", content);

    let value: Value = serde_json::from_str(&content).map_err(|e| {
      error!("Model returned invalid JSON: {}", e);
      Error::InvalidModelJson(e.to_string())
    })?;

    debug!("Model output parsed");
    Ok(value)
}
