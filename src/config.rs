//! Configuration for the OpenRouter client and the HTTP server.
//!
//! Everything is resolved once at startup and passed by reference.

use serde::{Deserialize, Serialize};
use log::{debug, warn};

pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat-v3-0324";
pub const DEFAULT_API_BASE: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_PORT: u16 = 5000;

pub const API_KEY_VARS: &[&str] = &["OPENROUTER_API_KEY", "OPENROUTER_API"];
pub const MODEL_VARS: &[&str] = &["OPENROUTER_MODEL"];
pub const API_BASE_VARS: &[&str] = &["OPENROUTER_API_BASE"];
pub const REFERER_VARS: &[&str]
  = &["OPENROUTER_SITE_URL", "OPENROUTER_HTTP_REFERER"];
pub const TITLE_VARS: &[&str]
  = &["OPENROUTER_APP_NAME", "OPENROUTER_X_TITLE"];

pub const DEFAULT_CORS_ORIGINS: &[&str] = &[
  "http://localhost:5173",
  "http://127.0.0.1:5173",
  "http://localhost:5174",
  "http://127.0.0.1:5174",
];

/// First non-blank value among `keys`, trimmed.
/// Keys are tried in order; the first hit wins.
pub fn first_non_empty<F>(lookup: &F, keys: &[&str]) -> Option<String>
where
  F: Fn(&str) -> Option<String>,
{   for key in keys
    {   if let Some(value) = lookup(key)
        {   let value = value.trim();
            if !value.is_empty()
            {   return Some(value.to_string());
            }
        }
    }
    None
}

fn env_lookup(key: &str) -> Option<String>
{   std::env::var(key).ok()
}

/// Upstream provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenRouterConfig
{   /// Bearer key; absence is reported per request
    #[serde(skip_serializing)]
    pub api_key: Option<String>
  , /// Model identifier sent with every request
    pub model: String
  , /// API base URL, `/chat/completions` is appended
    pub api_base: String
  , /// Optional `HTTP-Referer` attribution
    pub referer: Option<String>
  , /// Optional `X-Title` attribution
    pub title: Option<String>
  , /// Request timeout in seconds
    pub timeout_secs: u64
}

impl Default for OpenRouterConfig
{   fn default() -> Self
    {   OpenRouterConfig
        {   api_key: None
          , model: DEFAULT_MODEL.to_string()
          , api_base: DEFAULT_API_BASE.to_string()
          , referer: None
          , title: None
          , timeout_secs: DEFAULT_TIMEOUT_SECS
        }
    }
}

impl OpenRouterConfig
{   pub fn from_lookup<F>(lookup: &F) -> Self
    where
      F: Fn(&str) -> Option<String>,
    {   let api_key = first_non_empty(lookup, API_KEY_VARS);
        if api_key.is_none()
        {   warn!(
              "No OpenRouter API key configured; requests will fail \
               until one of {:?} is set",
              API_KEY_VARS
            );
        }
        let model = first_non_empty(lookup, MODEL_VARS)
          .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let api_base = first_non_empty(lookup, API_BASE_VARS)
          .map(|base| base.trim_end_matches('/').to_string())
          .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        OpenRouterConfig
        {   api_key
          , model
          , api_base
          , referer: first_non_empty(lookup, REFERER_VARS)
          , title: first_non_empty(lookup, TITLE_VARS)
          , timeout_secs: DEFAULT_TIMEOUT_SECS
        }
    }

    /// Full chat-completions endpoint URL
    pub fn endpoint(&self) -> String
    {   format!("{}/chat/completions", self.api_base)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig
{   /// Port to listen on, all interfaces
    pub port: u16
  , /// Origins allowed by CORS
    pub allowed_origins: Vec<String>
}

impl Default for ServerConfig
{   fn default() -> Self
    {   ServerConfig
        {   port: DEFAULT_PORT
          , allowed_origins: DEFAULT_CORS_ORIGINS
              .iter()
              .map(|origin| origin.to_string())
              .collect()
        }
    }
}

impl ServerConfig
{   pub fn from_lookup<F>(lookup: &F)
      -> Result<Self, crate::error::Error>
    where
      F: Fn(&str) -> Option<String>,
    {   let port = match first_non_empty(lookup, &["PORT"])
        {   Some(raw) => parse_port(&raw)?
          , None => DEFAULT_PORT
        };

        let allowed_origins
          = match first_non_empty(lookup, &["BLUEPRINT_CORS_ORIGINS"])
        {   Some(raw) => raw
              .split(',')
              .map(str::trim)
              .filter(|origin| !origin.is_empty())
              .map(str::to_string)
              .collect()
          , None => ServerConfig::default().allowed_origins
        };

        Ok(ServerConfig
        {   port
          , allowed_origins
        })
    }
}

/// Accepts `5000` as well as `:5000`
pub fn parse_port(raw: &str) -> Result<u16, crate::error::Error>
{   let trimmed = raw.trim();
    let digits = trimmed.strip_prefix(':').unwrap_or(trimmed);
    digits.parse::<u16>().map_err(|e| {
      crate::error::Error::InvalidConfiguration(
        format!("PORT {:?} is not a valid port: {}", raw, e)
      )
    })
}

fn parse_flag(raw: &str) -> bool
{   matches!(
      raw.trim().to_ascii_lowercase().as_str(),
      "1" | "true" | "yes" | "on"
    )
}

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlueprintConfig
{   pub openrouter: OpenRouterConfig
  , pub server: ServerConfig
  , /// Reject model output that is not a well-formed room list
    pub strict_schema: bool
}

impl Default for BlueprintConfig
{   fn default() -> Self
    {   BlueprintConfig
        {   openrouter: OpenRouterConfig::default()
          , server: ServerConfig::default()
          , strict_schema: false
        }
    }
}

impl BlueprintConfig
{   /// Resolve from the process environment
    pub fn from_env() -> Result<Self, crate::error::Error>
    {   Self::from_lookup(&env_lookup)
    }

    pub fn from_lookup<F>(lookup: &F)
      -> Result<Self, crate::error::Error>
    where
      F: Fn(&str) -> Option<String>,
    {   let config = BlueprintConfig
        {   openrouter: OpenRouterConfig::from_lookup(lookup)
          , server: ServerConfig::from_lookup(lookup)?
          , strict_schema: first_non_empty(
                lookup, &["BLUEPRINT_STRICT_SCHEMA"]
              )
              .map(|raw| parse_flag(&raw))
              .unwrap_or(false)
        };
        debug!(
          "Resolved config: model={} port={} strict_schema={}",
          config.openrouter.model,
          config.server.port,
          config.strict_schema
        );
        Ok(config)
    }
}
