//! Normalizes suggestion payloads into canonical terms.

use serde::{Deserialize, Serialize};

use crate::{pool::TermPool, term::Term, translation::truncate_chars};

/// A suggested term arrives either as a bare string or as an object with optional context.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SuggestedTerm {
	Text(String),
	Detailed {
		text: String,
		#[serde(default)]
		context: Option<String>,
	},
}
impl SuggestedTerm {
	pub fn text(&self) -> &str {
		match self {
			Self::Text(text) | Self::Detailed { text, .. } => text,
		}
	}

	pub fn context(&self) -> &str {
		match self {
			Self::Text(_) => "",
			Self::Detailed { context, .. } => context.as_deref().unwrap_or(""),
		}
	}
}

/// A pool's worth of suggestions: a list, or a single comma-separated string.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SuggestedTerms {
	List(Vec<SuggestedTerm>),
	Joined(String),
}
impl SuggestedTerms {
	pub fn into_terms(self) -> Vec<SuggestedTerm> {
		match self {
			Self::List(items) => items,
			Self::Joined(joined) =>
				joined.split(',').map(|part| SuggestedTerm::Text(part.to_string())).collect(),
		}
	}
}
impl Default for SuggestedTerms {
	fn default() -> Self {
		Self::List(Vec::new())
	}
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ThemeSuggestion {
	pub title: String,
	#[serde(default)]
	pub keywords: Vec<SuggestedTerm>,
	#[serde(default)]
	pub must_have: Vec<SuggestedTerm>,
	#[serde(default)]
	pub excludes: Vec<SuggestedTerm>,
}

/// Trims, drops blanks and case-insensitive repeats, and caps context length.
pub fn normalize(items: &[SuggestedTerm], context_max_chars: usize) -> Vec<SuggestedTerm> {
	let mut pool = TermPool::new();
	let mut out = Vec::new();

	for item in items {
		let context = truncate_chars(item.context().trim(), context_max_chars);

		if pool.add_with_context(item.text(), &context, false).is_some() {
			out.push(SuggestedTerm::Detailed {
				text: item.text().trim().to_string(),
				context: Some(context),
			});
		}
	}

	out
}

/// Builds a fresh pool from suggestions, deduplicating the same way as `TermPool::add_unique`.
pub fn pool_from_suggestions(
	items: &[SuggestedTerm],
	has_additional_languages: bool,
	context_max_chars: usize,
) -> TermPool {
	TermPool::from_terms(normalize(items, context_max_chars).into_iter().map(|item| {
		Term::new(item.text(), item.context(), has_additional_languages)
	}))
}

/// Adds suggestions to an existing pool, skipping texts it already holds.
pub fn merge_suggestions(
	pool: &mut TermPool,
	items: &[SuggestedTerm],
	has_additional_languages: bool,
	context_max_chars: usize,
) -> usize {
	normalize(items, context_max_chars)
		.iter()
		.filter(|item| {
			pool.add_with_context(item.text(), item.context(), has_additional_languages).is_some()
		})
		.count()
}
