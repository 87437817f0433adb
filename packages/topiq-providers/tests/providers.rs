use reqwest::header::AUTHORIZATION;
use serde_json::{Map, Value};
use uuid::Uuid;

use topiq_config::{Limits, LlmProviderConfig};
use topiq_domain::{TranslationRequest, TranslationTerm};
use topiq_providers::{Error, suggest, translate};

fn dummy_llm_provider() -> LlmProviderConfig {
	LlmProviderConfig {
		provider_id: "p".to_string(),
		api_base: "http://127.0.0.1:9".to_string(),
		api_key: "key".to_string(),
		path: "/".to_string(),
		model: "m".to_string(),
		timeout_ms: 1_000,
		default_headers: Map::new(),
		suggest_temperature: 0.2,
		translate_temperature: 0.1,
		suggest_max_tokens: 2_000,
		translate_max_tokens: 1_500,
	}
}

fn request(terms: Vec<TranslationTerm>) -> TranslationRequest {
	TranslationRequest {
		source_language: "ru".to_string(),
		target_language: "en".to_string(),
		terms,
	}
}

fn term(text: &str, context: &str) -> TranslationTerm {
	TranslationTerm { id: Uuid::new_v4(), text: text.to_string(), context: context.to_string() }
}

#[test]
fn builds_bearer_auth_header() {
	let mut defaults = Map::new();

	defaults.insert("X-Team".to_string(), Value::String("search".to_string()));

	let headers = topiq_providers::auth_headers("secret", &defaults)
		.expect("Failed to build headers.");
	let value = headers.get(AUTHORIZATION).expect("Missing authorization header.");

	assert_eq!(value, "Bearer secret");
	assert_eq!(headers.get("x-team").expect("Missing default header."), "search");
}

#[test]
fn rejects_non_string_default_headers() {
	let mut defaults = Map::new();

	defaults.insert("X-Retries".to_string(), Value::from(3));

	assert!(matches!(
		topiq_providers::auth_headers("secret", &defaults),
		Err(Error::InvalidConfig { .. })
	));
}

#[test]
fn translation_batches_are_checked_before_sending() {
	let limits = Limits { translate_batch_max_terms: 2, ..Limits::default() };
	let repeated = term("сварка", "");
	let cases = [
		request(Vec::new()),
		request(vec![term("a", ""), term("b", ""), term("c", "")]),
		request(vec![repeated.clone(), repeated]),
		request(vec![term("   ", "context")]),
	];

	for case in &cases {
		assert!(matches!(
			translate::normalize_request(case, &limits),
			Err(Error::InvalidRequest { .. })
		));
	}
}

#[test]
fn translation_batches_are_trimmed_and_capped() {
	let limits = Limits { term_text_max_chars: 4, term_context_max_chars: 3, ..Limits::default() };
	let normalized = translate::normalize_request(
		&request(vec![term("  трещина ", " металл ")]),
		&limits,
	)
	.expect("batch must be valid");

	assert_eq!(normalized[0].text, "трещ");
	assert_eq!(normalized[0].context, "мет");
}

#[tokio::test]
async fn short_descriptions_are_refused_without_a_request() {
	let result = suggest::suggest(&dummy_llm_provider(), &Limits::default(), " ab ").await;

	assert!(matches!(result, Err(Error::InvalidRequest { .. })));
}
