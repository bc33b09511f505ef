//! HTTP surface: routing, CORS, error serialization

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use log::{error, info, warn};
use serde_json::json;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::blueprint::{render_svg, Blueprint};
use crate::client::BlueprintService;
use crate::config::{BlueprintConfig, ServerConfig};
use crate::error::Error;

const CORS_MAX_AGE: Duration = Duration::from_secs(12 * 60 * 60);

pub struct AppState
{   pub service: BlueprintService
}

/// `{"error": "..."}` with the status of the error's class
pub fn error_response(err: &Error) -> Response
{   let status = StatusCode::from_u16(err.status())
      .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": err.client_message() })))
      .into_response()
}

async fn generate_blueprint(
  State(state): State<Arc<AppState>>
, body: Bytes
) -> Response
{   match state.service.generate_from_body(&body).await
    {   Ok(value) => (StatusCode::OK, Json(value)).into_response()
      , Err(e) => {
          warn!("Blueprint request failed: {}", e);
          error_response(&e)
        }
    }
}

async fn render_blueprint(body: Bytes) -> Response
{   match serde_json::from_slice::<Blueprint>(&body)
    {   Ok(blueprint) => (
          [(header::CONTENT_TYPE, "image/svg+xml")],
          render_svg(&blueprint),
        ).into_response()
      , Err(e) => {
          warn!("Render request rejected: {}", e);
          (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid blueprint" })),
          ).into_response()
        }
    }
}

fn cors_layer(config: &ServerConfig) -> CorsLayer
{   let origins: Vec<HeaderValue> = config.allowed_origins
      .iter()
      .filter_map(|origin| match HeaderValue::from_str(origin)
      {   Ok(value) => Some(value)
        , Err(_) => {
            warn!("Ignoring invalid CORS origin {:?}", origin);
            None
          }
      })
      .collect();

    CorsLayer::new()
      .allow_origin(AllowOrigin::list(origins))
      .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
      .allow_headers([
        header::ORIGIN,
        header::CONTENT_TYPE,
        header::AUTHORIZATION,
      ])
      .expose_headers([header::CONTENT_LENGTH])
      .allow_credentials(true)
      .max_age(CORS_MAX_AGE)
}

/// Build the router around an existing service
pub fn router(service: BlueprintService, config: &ServerConfig) -> Router
{   let state = Arc::new(AppState { service });

    Router::new()
      .route("/api/blueprint", post(generate_blueprint))
      .route("/api/blueprint/svg", post(render_blueprint))
      .layer(DefaultBodyLimit::disable())
      .layer(cors_layer(config))
      .with_state(state)
}

/// Bind on all interfaces and serve until the process stops
pub async fn run(config: BlueprintConfig) -> Result<(), Error>
{   let service = BlueprintService::new(&config)?;
    let app = router(service, &config.server);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr)
      .await
      .map_err(|e| {
        error!("Failed to bind {}: {}", addr, e);
        Error::InvalidConfiguration(format!("bind {}: {}", addr, e))
      })?;

    info!("Listening on {}", addr);
    info!("  POST /api/blueprint      - generate a blueprint");
    info!("  POST /api/blueprint/svg  - render a blueprint");

    axum::serve(listener, app)
      .await
      .map_err(|e| {
        error!("Server error: {}", e);
        Error::InvalidConfiguration(e.to_string())
      })
}
