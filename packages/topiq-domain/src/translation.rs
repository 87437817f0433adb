use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
	pool::TermPool,
	term::{Term, TermId},
};

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TranslationTerm {
	pub id: TermId,
	pub text: String,
	pub context: String,
}
impl TranslationTerm {
	/// Trims the text and truncates text and context to the given character caps.
	pub fn from_term(term: &Term, text_max_chars: usize, context_max_chars: usize) -> Self {
		Self {
			id: term.id,
			text: truncate_chars(term.text.trim(), text_max_chars),
			context: truncate_chars(term.context.trim(), context_max_chars),
		}
	}
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TranslationRequest {
	pub source_language: String,
	pub target_language: String,
	pub terms: Vec<TranslationTerm>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TermTranslation {
	pub id: TermId,
	pub translation: String,
}

/// Merges a batch for `target_language` into every pool and recomputes translation status.
///
/// Entries with a blank translation are ignored. Returns how many terms changed; zero when
/// there are no additional languages or the target is not one of them.
pub fn apply_translations<'a>(
	target_language: &str,
	batch: &[TermTranslation],
	additional: &[String],
	pools: impl IntoIterator<Item = &'a mut TermPool>,
) -> usize {
	if additional.is_empty() || !additional.iter().any(|language| language == target_language) {
		return 0;
	}

	let by_id: HashMap<TermId, &str> = batch
		.iter()
		.filter(|entry| !entry.translation.trim().is_empty())
		.map(|entry| (entry.id, entry.translation.trim()))
		.collect();

	if by_id.is_empty() {
		return 0;
	}

	pools
		.into_iter()
		.map(|pool| pool.apply_translations(target_language, &by_id, additional))
		.sum()
}

/// Keeps at most `max_chars` characters, cutting on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
	match text.char_indices().nth(max_chars) {
		Some((end, _)) => text[..end].to_string(),
		None => text.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn truncates_on_char_boundaries() {
		assert_eq!(truncate_chars("трещина", 3), "тре");
		assert_eq!(truncate_chars("weld", 10), "weld");
		assert_eq!(truncate_chars("weld", 0), "");
	}
}
