use std::collections::HashMap;

use blueprint_ai::blueprint::{render_svg, Blueprint, Room};
use blueprint_ai::config::{
  first_non_empty, parse_port, BlueprintConfig, OpenRouterConfig,
  DEFAULT_MODEL,
};
use blueprint_ai::error::{Error, ErrorClass};
use blueprint_ai::normalize::{normalize_response, strip_code_fence};
use blueprint_ai::providers::OpenRouterClient;
use serde_json::json;

fn lookup_from(pairs: &[(&str, &str)])
  -> impl Fn(&str) -> Option<String>
{   let map: HashMap<String, String> = pairs
      .iter()
      .map(|(k, v)| (k.to_string(), v.to_string()))
      .collect();
    move |key: &str| map.get(key).cloned()
}

fn envelope(content: &str) -> Vec<u8>
{   serde_json::to_vec(&json!({
      "choices": [{ "message": { "content": content } }]
    })).unwrap()
}

// ===== Fence stripping =====

#[test]
fn test_strip_fence_with_language_tag()
{   assert_eq!(
      strip_code_fence("```json\n{\"rooms\":[]}\n```"),
      "{\"rooms\":[]}"
    );
}

#[test]
fn test_strip_fence_tolerates_surrounding_whitespace()
{   assert_eq!(
      strip_code_fence("  \n```\n  {\"a\":1}  \n  ```  \n"),
      "{\"a\":1}"
    );
}

#[test]
fn test_strip_fence_leaves_unfenced_content_trimmed()
{   for content in ["{\"a\":1}", "  {\"a\":1}\n", "not json", ""]
    {   assert_eq!(strip_code_fence(content), content.trim());
    }
}

#[test]
fn test_strip_fence_requires_closing_line()
{   let unclosed = "```json\n{\"a\":1}";
    assert_eq!(strip_code_fence(unclosed), unclosed);

    let trailing = "```json\n{\"a\":1}\n``` done";
    assert_eq!(strip_code_fence(trailing), trailing);
}

#[test]
fn test_strip_fence_two_lines_untouched()
{   let two = "```\n```";
    assert_eq!(strip_code_fence(two), two);
}

// ===== Response normalization =====

#[test]
fn test_normalize_success()
{   let value = normalize_response(200, &envelope("{\"rooms\":[]}"));
    assert_eq!(value, Ok(json!({ "rooms": [] })));
}

#[test]
fn test_normalize_unparsable_envelope()
{   let bodies: [&[u8]; 4] = [b"not json", b"[]", b"null", b"\"text\""];
    for body in bodies
    {   let err = normalize_response(200, body).unwrap_err();
        assert!(matches!(err, Error::UpstreamUnparsable(_)));
        assert_eq!(err.class(), ErrorClass::UpstreamTransport);
    }
}

#[test]
fn test_normalize_unparsable_wins_over_status()
{   let err = normalize_response(401, b"<html>").unwrap_err();
    assert!(matches!(err, Error::UpstreamUnparsable(_)));
    assert_eq!(err.status(), 502);
}

#[test]
fn test_normalize_upstream_message_verbatim()
{   let body = br#"{"error":{"message":"Rate limited upstream"}}"#;
    let err = normalize_response(429, body).unwrap_err();
    assert_eq!(err.status(), 502);
    assert_eq!(err.client_message(), "Rate limited upstream");
}

#[test]
fn test_normalize_auth_statuses()
{   for status in [401, 403]
    {   let err = normalize_response(status, b"{}").unwrap_err();
        assert_eq!(err.class(), ErrorClass::UpstreamAuth);
        assert_eq!(err.status(), 401);
        assert_eq!(
          err.client_message(),
          "OpenRouter authentication failed. Check OPENROUTER_API_KEY."
        );
    }

    let body = br#"{"error":{"message":"invalid key"}}"#;
    let err = normalize_response(401, body).unwrap_err();
    assert_eq!(err.client_message(), "invalid key");
}

#[test]
fn test_normalize_failure_status_ignores_choices()
{   let err = normalize_response(500, &envelope("{}")).unwrap_err();
    assert_eq!(
      err,
      Error::UpstreamFailed { status: 500, message: None }
    );
    assert_eq!(err.client_message(), "AI request failed");
}

#[test]
fn test_normalize_no_choices()
{   let bodies: [&[u8]; 3]
      = [br#"{"choices":[]}"#, b"{}", br#"{"choices":null}"#];
    for body in bodies
    {   assert_eq!(normalize_response(200, body), Err(Error::NoChoices));
    }
}

#[test]
fn test_normalize_empty_content()
{   assert_eq!(
      normalize_response(200, &envelope("  ")),
      Err(Error::EmptyContent)
    );
    assert_eq!(
      normalize_response(200, br#"{"choices":[{"message":{}}]}"#),
      Err(Error::EmptyContent)
    );
    assert_eq!(
      normalize_response(200, &envelope("```json\n\n```")),
      Err(Error::EmptyContent)
    );
}

#[test]
fn test_normalize_invalid_model_json()
{   let err = normalize_response(200, &envelope("not json")).unwrap_err();
    assert!(matches!(err, Error::InvalidModelJson(_)));
    assert_eq!(err.status(), 502);
    assert_eq!(err.client_message(), "AI returned invalid JSON");
}

#[test]
fn test_normalize_returns_any_json_value()
{   assert_eq!(
      normalize_response(200, &envelope("[1, 2, 3]")),
      Ok(json!([1, 2, 3]))
    );
}

// ===== Configuration =====

#[test]
fn test_first_non_empty_precedence()
{   let lookup = lookup_from(&[
      ("OPENROUTER_API_KEY", "   "),
      ("OPENROUTER_API", " second "),
    ]);
    assert_eq!(
      first_non_empty(&lookup, &["OPENROUTER_API_KEY", "OPENROUTER_API"]),
      Some("second".to_string())
    );
    assert_eq!(first_non_empty(&lookup, &["MISSING"]), None);
}

#[test]
fn test_config_defaults()
{   let config = BlueprintConfig::from_lookup(&lookup_from(&[])).unwrap();
    assert_eq!(config.openrouter.api_key, None);
    assert_eq!(config.openrouter.model, DEFAULT_MODEL);
    assert_eq!(
      config.openrouter.endpoint(),
      "https://openrouter.ai/api/v1/chat/completions"
    );
    assert_eq!(config.openrouter.timeout_secs, 60);
    assert_eq!(config.server.port, 5000);
    assert_eq!(config.server.allowed_origins.len(), 4);
    assert!(!config.strict_schema);
}

#[test]
fn test_config_from_variables()
{   let config = BlueprintConfig::from_lookup(&lookup_from(&[
      ("OPENROUTER_API_KEY", "key-1"),
      ("OPENROUTER_MODEL", "openai/gpt-4o"),
      ("OPENROUTER_HTTP_REFERER", "https://example.com"),
      ("OPENROUTER_X_TITLE", "Blueprints"),
      ("OPENROUTER_API_BASE", "http://localhost:9999/v1/"),
      ("PORT", ":8080"),
      ("BLUEPRINT_CORS_ORIGINS", "http://a.test, ,http://b.test"),
      ("BLUEPRINT_STRICT_SCHEMA", "true"),
    ])).unwrap();

    assert_eq!(config.openrouter.api_key.as_deref(), Some("key-1"));
    assert_eq!(config.openrouter.model, "openai/gpt-4o");
    assert_eq!(
      config.openrouter.referer.as_deref(),
      Some("https://example.com")
    );
    assert_eq!(config.openrouter.title.as_deref(), Some("Blueprints"));
    assert_eq!(
      config.openrouter.endpoint(),
      "http://localhost:9999/v1/chat/completions"
    );
    assert_eq!(config.server.port, 8080);
    assert_eq!(
      config.server.allowed_origins,
      vec!["http://a.test".to_string(), "http://b.test".to_string()]
    );
    assert!(config.strict_schema);
}

#[test]
fn test_invalid_port_is_configuration_error()
{   let err = parse_port("abc").unwrap_err();
    assert_eq!(err.class(), ErrorClass::Configuration);
    assert_eq!(parse_port("5000"), Ok(5000));
    assert_eq!(parse_port(" :5001 "), Ok(5001));
}

// ===== Request builder =====

fn client_with(referer: Option<&str>, title: Option<&str>)
  -> OpenRouterClient
{   OpenRouterClient::new(OpenRouterConfig
    {   api_key: Some("test-key".to_string())
      , referer: referer.map(str::to_string)
      , title: title.map(str::to_string)
      , ..OpenRouterConfig::default()
    }).unwrap()
}

#[test]
fn test_build_request_headers_and_body()
{   let client = client_with(Some("https://example.com"), Some("Blueprints"));
    let request = client.build_request("a house").unwrap();

    assert_eq!(request.method(), reqwest::Method::POST);
    assert_eq!(
      request.url().as_str(),
      "https://openrouter.ai/api/v1/chat/completions"
    );
    let headers = request.headers();
    assert_eq!(headers["Authorization"], "Bearer test-key");
    assert_eq!(headers["Content-Type"], "application/json");
    assert_eq!(headers["Accept"], "application/json");
    assert_eq!(headers["HTTP-Referer"], "https://example.com");
    assert_eq!(headers["X-Title"], "Blueprints");

    let body = request.body().and_then(|b| b.as_bytes()).unwrap();
    let body: serde_json::Value = serde_json::from_slice(body).unwrap();
    assert_eq!(body["model"], DEFAULT_MODEL);
    assert_eq!(body["temperature"], json!(0.2));
    assert_eq!(body["messages"].as_array().unwrap().len(), 2);
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(body["messages"][1]["content"], "a house");
}

#[test]
fn test_build_request_omits_blank_attribution()
{   let client = client_with(None, Some("  "));
    let request = client.build_request("a house").unwrap();
    assert!(request.headers().get("HTTP-Referer").is_none());
    assert!(request.headers().get("X-Title").is_none());
}

#[test]
fn test_build_request_without_key()
{   let client = OpenRouterClient::new(OpenRouterConfig::default())
      .unwrap();
    assert_eq!(
      client.build_request("a house").unwrap_err(),
      Error::MissingApiKey
    );
}

#[test]
fn test_build_request_with_unencodable_key()
{   let client = OpenRouterClient::new(OpenRouterConfig
    {   api_key: Some("bad\nkey".to_string())
      , ..OpenRouterConfig::default()
    }).unwrap();
    let err = client.build_request("a house").unwrap_err();
    assert!(matches!(err, Error::BuildRequest(_)));
    assert_eq!(err.status(), 500);
    assert_eq!(err.client_message(), "Failed to create AI request");
}

// ===== Blueprint =====

#[test]
fn test_blueprint_validation()
{   let ok = json!({ "rooms": [
      { "name": "kitchen", "x": 0, "y": 0, "width": 4.5, "height": 3 }
    ]});
    assert_eq!(Blueprint::from_value(&ok).unwrap().rooms.len(), 1);

    let zero_width = json!({ "rooms": [
      { "name": "closet", "x": 0, "y": 0, "width": 0, "height": 3 }
    ]});
    assert!(matches!(
      Blueprint::from_value(&zero_width),
      Err(Error::SchemaMismatch(_))
    ));

    let blank_name = json!({ "rooms": [
      { "name": " ", "x": 0, "y": 0, "width": 1, "height": 1 }
    ]});
    assert!(Blueprint::from_value(&blank_name).is_err());
}

#[test]
fn test_render_svg_escapes_names()
{   let blueprint = Blueprint
    {   rooms: vec![Room
        {   name: "Tom & Jerry's <den>".to_string()
          , x: 5.0
          , y: 10.0
          , width: 100.0
          , height: 50.5
        }]
    };
    let svg = render_svg(&blueprint);
    assert!(svg.starts_with(
      r#"<svg width="1000" height="800" xmlns="http://www.w3.org/2000/svg">"#
    ));
    assert!(svg.contains(r#"width="100" height="50.5""#));
    assert!(svg.contains(r#"<text x="15" y="30" font-size="14">"#));
    assert!(svg.contains("Tom &amp; Jerry&apos;s &lt;den&gt;"));
    assert!(svg.ends_with("</svg>"));
}

// ===== Inbound prompt =====

#[test]
fn test_prompt_request_null_reads_as_empty()
{   use blueprint_ai::request::PromptRequest;

    let bodies: [&[u8]; 3] = [br#"{"prompt":null}"#, b"null", b"{}"];
    for body in bodies
    {   let request = PromptRequest::from_slice(body).unwrap();
        assert_eq!(request.prompt, "");
        assert_eq!(request.validated_prompt(), Err(Error::PromptRequired));
    }

    assert!(matches!(
      PromptRequest::from_slice(br#"{"prompt":5}"#),
      Err(Error::InvalidRequest(_))
    ));
}
