pub mod suggest;
pub mod translate;

mod error;

pub use error::{Error, Result};

use std::time::Duration;

use regex::Regex;
use reqwest::{
	Client,
	header::{AUTHORIZATION, HeaderMap, HeaderName},
};
use serde_json::{Map, Value};

use topiq_config::LlmProviderConfig;

const RESPONSE_SNIPPET_CHARS: usize = 300;

pub fn auth_headers(api_key: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

/// Sends one chat completion and returns the trimmed message content.
pub(crate) async fn chat_completion(
	cfg: &LlmProviderConfig,
	messages: &[Value],
	temperature: f32,
	max_tokens: u32,
) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": temperature,
		"max_tokens": max_tokens,
		"messages": messages,
	});
	let res = client
		.post(&url)
		.headers(auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	tracing::debug!(provider_id = %cfg.provider_id, model = %cfg.model, "Chat completion received.");

	parse_chat_content(&json)
}

pub(crate) fn parse_chat_content(json: &Value) -> Result<String> {
	let content = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.map(str::trim)
		.unwrap_or_default();

	if content.is_empty() {
		return Err(Error::InvalidResponse {
			message: "Model returned an empty response.".to_string(),
		});
	}

	Ok(content.to_string())
}

/// Parses model output as JSON, accepting an optional Markdown code fence around it.
pub(crate) fn parse_model_json(raw: &str) -> Result<Value> {
	let fence = Regex::new(r"(?s)^```[A-Za-z]*\s*(.*?)\s*```$")?;
	let trimmed = raw.trim();
	let body = fence
		.captures(trimmed)
		.and_then(|caps| caps.get(1))
		.map_or(trimmed, |body| body.as_str());

	serde_json::from_str(body).map_err(|err| Error::InvalidResponse {
		message: format!(
			"Model returned invalid JSON. {err}. Response starts with: {:?}",
			snippet(body)
		),
	})
}

fn snippet(text: &str) -> String {
	match text.char_indices().nth(RESPONSE_SNIPPET_CHARS) {
		Some((end, _)) => format!("{}...", &text[..end]),
		None => text.to_string(),
	}
}
