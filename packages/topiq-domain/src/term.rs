use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type TermId = Uuid;

/// Whether a term's translations satisfy the theme's additional languages.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationStatus {
	/// The theme has no additional languages.
	#[default]
	NotRequired,
	/// Every additional language has a non-blank translation.
	Complete,
	/// A translation is missing, or the context changed after translating.
	Stale,
}
impl TranslationStatus {
	pub fn for_new_term(has_additional_languages: bool) -> Self {
		if has_additional_languages { Self::Stale } else { Self::NotRequired }
	}

	pub fn evaluate(translations: &BTreeMap<String, String>, additional: &[String]) -> Self {
		if additional.is_empty() {
			Self::NotRequired
		} else if covers_languages(translations, additional) {
			Self::Complete
		} else {
			Self::Stale
		}
	}

	/// Only ever raises the flag; clearing it is left to a translation batch.
	pub fn after_context_edit(self, context_changed: bool, has_additional_languages: bool) -> Self {
		if self == Self::Stale || (context_changed && has_additional_languages) {
			Self::Stale
		} else {
			self
		}
	}

	pub fn after_language_change(
		self,
		translations: &BTreeMap<String, String>,
		additional: &[String],
	) -> Self {
		if additional.is_empty() {
			return Self::NotRequired;
		}
		if self == Self::Stale {
			return Self::Stale;
		}

		Self::evaluate(translations, additional)
	}

	pub fn needs_translation(self) -> bool {
		self == Self::Stale
	}
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Term {
	pub id: TermId,
	pub text: String,
	pub context: String,
	pub translations: BTreeMap<String, String>,
	pub status: TranslationStatus,
}
impl Term {
	pub fn new(text: impl Into<String>, context: impl Into<String>, has_additional: bool) -> Self {
		Self {
			id: Uuid::new_v4(),
			text: text.into(),
			context: context.into(),
			translations: BTreeMap::new(),
			status: TranslationStatus::for_new_term(has_additional),
		}
	}

	/// Rebuilds a persisted term, deriving its status from the stored translations.
	pub fn restore(
		id: TermId,
		text: impl Into<String>,
		context: impl Into<String>,
		translations: BTreeMap<String, String>,
		additional: &[String],
	) -> Self {
		let status = TranslationStatus::evaluate(&translations, additional);

		Self { id, text: text.into(), context: context.into(), translations, status }
	}

	pub fn needs_translation(&self) -> bool {
		self.status.needs_translation()
	}

	/// Comparison key for pool deduplication.
	pub fn text_key(&self) -> String {
		text_key(&self.text)
	}

	pub(crate) fn with_translation(
		&self,
		language: &str,
		translation: &str,
		additional: &[String],
	) -> Self {
		let mut translations = self.translations.clone();

		translations.insert(language.to_string(), translation.to_string());

		let status = TranslationStatus::evaluate(&translations, additional);

		Self { translations, status, ..self.clone() }
	}
}

pub fn text_key(text: &str) -> String {
	text.trim().to_lowercase()
}

pub(crate) fn covers_languages(
	translations: &BTreeMap<String, String>,
	additional: &[String],
) -> bool {
	additional.iter().all(|language| {
		translations.get(language).is_some_and(|value| !value.trim().is_empty())
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn langs(codes: &[&str]) -> Vec<String> {
		codes.iter().map(|code| code.to_string()).collect()
	}

	#[test]
	fn context_edit_is_monotonic() {
		assert_eq!(
			TranslationStatus::Complete.after_context_edit(true, true),
			TranslationStatus::Stale
		);
		assert_eq!(
			TranslationStatus::Complete.after_context_edit(false, true),
			TranslationStatus::Complete
		);
		assert_eq!(
			TranslationStatus::Stale.after_context_edit(false, false),
			TranslationStatus::Stale
		);
		assert_eq!(
			TranslationStatus::NotRequired.after_context_edit(true, false),
			TranslationStatus::NotRequired
		);
	}

	#[test]
	fn blank_translations_do_not_count() {
		let mut translations = BTreeMap::new();

		translations.insert("en".to_string(), "crack".to_string());
		translations.insert("de".to_string(), "  ".to_string());

		assert_eq!(
			TranslationStatus::evaluate(&translations, &langs(&["en", "de"])),
			TranslationStatus::Stale
		);
		assert_eq!(
			TranslationStatus::evaluate(&translations, &langs(&["en"])),
			TranslationStatus::Complete
		);
		assert_eq!(TranslationStatus::evaluate(&translations, &[]), TranslationStatus::NotRequired);
	}

	#[test]
	fn language_change_keeps_stale_terms_stale() {
		let mut translations = BTreeMap::new();

		translations.insert("en".to_string(), "crack".to_string());

		assert_eq!(
			TranslationStatus::Stale.after_language_change(&translations, &langs(&["en"])),
			TranslationStatus::Stale
		);
		assert_eq!(
			TranslationStatus::NotRequired.after_language_change(&translations, &langs(&["en"])),
			TranslationStatus::Complete
		);
		assert_eq!(
			TranslationStatus::Complete.after_language_change(&translations, &langs(&["en", "de"])),
			TranslationStatus::Stale
		);
		assert_eq!(
			TranslationStatus::Stale.after_language_change(&translations, &[]),
			TranslationStatus::NotRequired
		);
	}
}
