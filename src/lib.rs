pub mod error;
pub mod config;
pub mod providers;
pub mod request;
pub mod normalize;
pub mod blueprint;
pub mod client;
pub mod server;

/*

blueprint-ai turns a free-text design prompt into a JSON room list by
asking an OpenRouter-hosted model, then cleaning and parsing its reply.

blueprint-ai/
├── Cargo.toml
├── src/
│   ├── lib.rs          # Re-exports
│   ├── main.rs         # Binary: logging, config, serve
│   ├── error.rs        # Error taxonomy and status mapping
│   ├── config.rs       # Env resolution into config structs
│   ├── request.rs      # Prompt + chat-completion wire types
│   ├── normalize.rs    # Envelope classification, fence stripping
│   ├── providers/
│   │   ├── mod.rs
│   │   └── openrouter.rs
│   ├── client.rs       # BlueprintService
│   ├── blueprint.rs    # Room schema, SVG rendering
│   └── server.rs       # axum routes + CORS
└── tests/

*/

pub use blueprint::{Blueprint, Room};
pub use client::BlueprintService;
pub use config::BlueprintConfig;
pub use error::{Error, ErrorClass};

/// Result of one blueprint request
pub type GenerateReply = Result<serde_json::Value, crate::error::Error>;
