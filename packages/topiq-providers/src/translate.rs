//! Batch translation of terms into one target language.

use std::collections::{HashMap, HashSet};

use serde_json::Value;
use uuid::Uuid;

use topiq_config::{Limits, LlmProviderConfig};
use topiq_domain::{
	TermTranslation, TranslationRequest, TranslationTerm, translation::truncate_chars,
};

use crate::{Error, Result};

const SYSTEM_PROMPT: &str = "\
You translate search terms. The user message is a JSON object with source_language, \
target_language and terms, each term carrying an id, text and context. Use the context only to \
pick the right sense. Answer with one JSON object and nothing else: {\"translations\": [{\"id\": \
string, \"translation\": string}]} containing exactly one entry for every input id.";

pub async fn translate(
	cfg: &LlmProviderConfig,
	limits: &Limits,
	request: &TranslationRequest,
) -> Result<Vec<TermTranslation>> {
	let terms = normalize_request(request, limits)?;
	let payload = serde_json::json!({
		"source_language": request.source_language,
		"target_language": request.target_language,
		"terms": terms,
	});
	let messages = vec![
		serde_json::json!({ "role": "system", "content": SYSTEM_PROMPT }),
		serde_json::json!({ "role": "user", "content": serde_json::to_string(&payload)? }),
	];
	let content = crate::chat_completion(
		cfg,
		&messages,
		cfg.translate_temperature,
		cfg.translate_max_tokens,
	)
	.await?;
	let ids: Vec<Uuid> = terms.iter().map(|term| term.id).collect();
	let translations = parse_translations(&crate::parse_model_json(&content)?, &ids)?;

	tracing::info!(
		target_language = %request.target_language,
		terms = translations.len(),
		"Term translations parsed."
	);

	Ok(translations)
}

/// Checks the batch and returns it with trimmed text and capped lengths.
pub fn normalize_request(
	request: &TranslationRequest,
	limits: &Limits,
) -> Result<Vec<TranslationTerm>> {
	let invalid = |message: String| Err(Error::InvalidRequest { message });

	if request.terms.is_empty() {
		return invalid("Translation batch must not be empty.".to_string());
	}
	if request.terms.len() > limits.translate_batch_max_terms as usize {
		return invalid(format!(
			"Translation batch must not exceed {} terms.",
			limits.translate_batch_max_terms
		));
	}
	if request.target_language.trim().is_empty() {
		return invalid("Target language must not be empty.".to_string());
	}

	let mut seen = HashSet::new();
	let mut terms = Vec::with_capacity(request.terms.len());

	for term in &request.terms {
		if !seen.insert(term.id) {
			return invalid(format!("Duplicate term id {} in translation batch.", term.id));
		}

		let text = term.text.trim();

		if text.is_empty() {
			return invalid(format!("Term {} has empty text.", term.id));
		}

		terms.push(TranslationTerm {
			id: term.id,
			text: truncate_chars(text, limits.term_text_max_chars as usize),
			context: truncate_chars(term.context.trim(), limits.term_context_max_chars as usize),
		});
	}

	Ok(terms)
}

/// Validates the model's answer against the requested ids and returns it in request order.
fn parse_translations(json: &Value, requested: &[Uuid]) -> Result<Vec<TermTranslation>> {
	let invalid = |message: String| Error::InvalidResponse { message };
	let items = json
		.as_object()
		.and_then(|object| object.get("translations"))
		.ok_or_else(|| invalid("Expected a JSON object with a translations key.".to_string()))?
		.as_array()
		.ok_or_else(|| invalid("translations must be an array of objects.".to_string()))?;
	let wanted: HashSet<Uuid> = requested.iter().copied().collect();
	let mut by_id = HashMap::with_capacity(items.len());

	for item in items {
		let fields = item.as_object().ok_or_else(|| {
			invalid("Each translation must be an object with id and translation.".to_string())
		})?;
		let raw_id = fields.get("id").and_then(Value::as_str).map(str::trim).unwrap_or_default();
		let translation =
			fields.get("translation").and_then(Value::as_str).map(str::trim).unwrap_or_default();

		if raw_id.is_empty() {
			return Err(invalid("A translation is missing its id.".to_string()));
		}
		if translation.is_empty() {
			return Err(invalid(format!("No translation returned for id {raw_id}.")));
		}

		let id = Uuid::parse_str(raw_id)
			.ok()
			.filter(|id| wanted.contains(id))
			.ok_or_else(|| invalid(format!("Unexpected id {raw_id} in translations.")))?;

		if by_id.insert(id, translation.to_string()).is_some() {
			return Err(invalid(format!("Duplicate id {id} in translations.")));
		}
	}

	let missing: Vec<String> =
		requested.iter().filter(|id| !by_id.contains_key(*id)).map(Uuid::to_string).collect();

	if !missing.is_empty() {
		return Err(invalid(format!("No translations returned for ids: {}.", missing.join(", "))));
	}

	Ok(requested
		.iter()
		.filter_map(|id| {
			by_id.remove(id).map(|translation| TermTranslation { id: *id, translation })
		})
		.collect())
}
