//! Drafts a theme (title plus the three term lists) from a free-text description.

use serde_json::Value;

use topiq_config::{Limits, LlmProviderConfig};
use topiq_domain::{SuggestedTerm, SuggestedTerms, ThemeSuggestion, ingest};

use crate::{Error, Result};

const SYSTEM_PROMPT: &str = "\
You prepare literature search themes. Read the user's description and answer with one JSON \
object and nothing else: {\"title\": string, \"keywords\": [{\"text\": string, \"context\": \
string}], \"must_have\": [...], \"excludes\": [...]}. Keywords are the core search terms, \
must_have terms must appear in every result, excludes disqualify a result. Use short terms in \
the description's language and keep each context to one sentence.";

pub async fn suggest(
	cfg: &LlmProviderConfig,
	limits: &Limits,
	description: &str,
) -> Result<ThemeSuggestion> {
	let description = description.trim();

	if description.chars().count() < limits.suggest_min_description_chars as usize {
		return Err(Error::InvalidRequest {
			message: format!(
				"Description must be at least {} characters.",
				limits.suggest_min_description_chars
			),
		});
	}

	let messages = vec![
		serde_json::json!({ "role": "system", "content": SYSTEM_PROMPT }),
		serde_json::json!({ "role": "user", "content": description }),
	];
	let content = crate::chat_completion(
		cfg,
		&messages,
		cfg.suggest_temperature,
		cfg.suggest_max_tokens,
	)
	.await?;
	let suggestion =
		parse_suggestion(&crate::parse_model_json(&content)?, limits.term_context_max_chars)?;

	tracing::info!(
		keywords = suggestion.keywords.len(),
		must_have = suggestion.must_have.len(),
		excludes = suggestion.excludes.len(),
		"Theme suggestion parsed."
	);

	Ok(suggestion)
}

fn parse_suggestion(json: &Value, context_max_chars: u32) -> Result<ThemeSuggestion> {
	let Some(object) = json.as_object() else {
		return Err(Error::InvalidResponse {
			message: "Expected a JSON object with title, keywords, must_have, and excludes."
				.to_string(),
		});
	};
	let title = object.get("title").map(value_text).unwrap_or_default();

	if title.trim().is_empty() {
		return Err(Error::InvalidResponse {
			message: "Suggestion is missing a non-empty title.".to_string(),
		});
	}

	let context_max_chars = context_max_chars as usize;
	let terms = |key: &str| ingest::normalize(&suggested_terms(object.get(key)), context_max_chars);

	Ok(ThemeSuggestion {
		title: title.trim().to_string(),
		keywords: terms("keywords"),
		must_have: terms("must_have"),
		excludes: terms("excludes"),
	})
}

/// Accepts a list of strings or `{text, context}` objects, or one comma-separated string.
/// Anything else contributes no terms.
fn suggested_terms(value: Option<&Value>) -> Vec<SuggestedTerm> {
	match value {
		Some(Value::String(joined)) => SuggestedTerms::Joined(joined.clone()).into_terms(),
		Some(Value::Array(items)) => items
			.iter()
			.filter_map(|item| match item {
				Value::String(text) => Some(SuggestedTerm::Text(text.clone())),
				Value::Object(fields) =>
					fields.get("text").filter(|text| !text.is_null()).map(|text| {
						SuggestedTerm::Detailed {
							text: value_text(text),
							context: fields.get("context").map(value_text),
						}
					}),
				_ => None,
			})
			.collect(),
		_ => Vec::new(),
	}
}

fn value_text(value: &Value) -> String {
	match value {
		Value::String(text) => text.clone(),
		Value::Null => String::new(),
		other => other.to_string(),
	}
}
