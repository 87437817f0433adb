use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::term::{self, Term, TermId, TranslationStatus};

/// Which of the three parallel term collections an operation targets.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TermKind {
	Keyword,
	Must,
	Exclude,
}
impl TermKind {
	pub const ALL: [TermKind; 3] = [TermKind::Keyword, TermKind::Must, TermKind::Exclude];
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TermPatch {
	pub context: Option<String>,
	pub translations: Option<BTreeMap<String, String>>,
}

/// An ordered, case-insensitively deduplicated term list. Insertion order is display order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TermPool {
	terms: Vec<Term>,
}
impl TermPool {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a pool from existing terms, keeping the first term for each text key.
	pub fn from_terms(terms: impl IntoIterator<Item = Term>) -> Self {
		let mut seen = HashSet::new();
		let terms = terms
			.into_iter()
			.filter(|term| !term.text.trim().is_empty() && seen.insert(term.text_key()))
			.collect();

		Self { terms }
	}

	pub fn terms(&self) -> &[Term] {
		&self.terms
	}

	pub fn iter(&self) -> impl Iterator<Item = &Term> {
		self.terms.iter()
	}

	pub fn ids(&self) -> Vec<TermId> {
		self.terms.iter().map(|term| term.id).collect()
	}

	pub fn len(&self) -> usize {
		self.terms.len()
	}

	pub fn is_empty(&self) -> bool {
		self.terms.is_empty()
	}

	pub fn get(&self, id: TermId) -> Option<&Term> {
		self.terms.iter().find(|term| term.id == id)
	}

	pub fn contains_text(&self, text: &str) -> bool {
		let key = term::text_key(text);

		self.terms.iter().any(|term| term.text_key() == key)
	}

	/// Appends a new term unless the trimmed text is empty or already present.
	pub fn add_unique(&mut self, text: &str, has_additional_languages: bool) -> Option<TermId> {
		self.add_with_context(text, "", has_additional_languages)
	}

	pub fn add_with_context(
		&mut self,
		text: &str,
		context: &str,
		has_additional_languages: bool,
	) -> Option<TermId> {
		let trimmed = text.trim();

		if trimmed.is_empty() || self.contains_text(trimmed) {
			return None;
		}

		let term = Term::new(trimmed, context.trim(), has_additional_languages);
		let id = term.id;

		self.terms.push(term);

		Some(id)
	}

	/// Removes the term only; references held by queries are left for the caller to retract.
	pub fn remove_by_id(&mut self, id: TermId) -> Option<Term> {
		let index = self.terms.iter().position(|term| term.id == id)?;

		Some(self.terms.remove(index))
	}

	/// Returns `false` when the id is unknown or the patch leaves the term unchanged.
	pub fn update_term(
		&mut self,
		id: TermId,
		patch: TermPatch,
		has_additional_languages: bool,
	) -> bool {
		let Some(slot) = self.terms.iter_mut().find(|term| term.id == id) else {
			return false;
		};
		let context = patch.context.unwrap_or_else(|| slot.context.clone());
		let context_changed = context != slot.context;
		let translations = patch.translations.unwrap_or_else(|| slot.translations.clone());
		let status = slot.status.after_context_edit(context_changed, has_additional_languages);
		let updated = Term { context, translations, status, ..slot.clone() };

		if updated == *slot {
			return false;
		}

		*slot = updated;

		true
	}

	/// Merges one language's translations in; returns how many terms changed.
	pub fn apply_translations(
		&mut self,
		language: &str,
		batch: &HashMap<TermId, &str>,
		additional: &[String],
	) -> usize {
		let mut changed = 0;

		for slot in &mut self.terms {
			let Some(translation) = batch.get(&slot.id) else {
				continue;
			};
			let updated = slot.with_translation(language, translation, additional);

			if updated != *slot {
				*slot = updated;
				changed += 1;
			}
		}

		changed
	}

	pub fn recompute_for_languages(&mut self, additional: &[String]) -> usize {
		let mut changed = 0;

		for slot in &mut self.terms {
			let status: TranslationStatus =
				slot.status.after_language_change(&slot.translations, additional);

			if status != slot.status {
				slot.status = status;
				changed += 1;
			}
		}

		changed
	}
}

/// The keyword, must-have, and exclude pools a query can reference.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TermPools {
	pub keyword_terms: TermPool,
	pub must_terms: TermPool,
	pub exclude_terms: TermPool,
}
impl TermPools {
	pub fn pool(&self, kind: TermKind) -> &TermPool {
		match kind {
			TermKind::Keyword => &self.keyword_terms,
			TermKind::Must => &self.must_terms,
			TermKind::Exclude => &self.exclude_terms,
		}
	}

	pub fn pool_mut(&mut self, kind: TermKind) -> &mut TermPool {
		match kind {
			TermKind::Keyword => &mut self.keyword_terms,
			TermKind::Must => &mut self.must_terms,
			TermKind::Exclude => &mut self.exclude_terms,
		}
	}

	pub fn is_empty(&self) -> bool {
		TermKind::ALL.iter().all(|kind| self.pool(*kind).is_empty())
	}

	pub fn pools_mut(&mut self) -> [&mut TermPool; 3] {
		[&mut self.keyword_terms, &mut self.must_terms, &mut self.exclude_terms]
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn add_unique_trims_and_ignores_case() {
		let mut pool = TermPool::new();

		assert!(pool.add_unique("  Ultrasound ", false).is_some());
		assert!(pool.add_unique("ultrasound", false).is_none());
		assert!(pool.add_unique("ULTRASOUND  ", true).is_none());
		assert!(pool.add_unique("   ", false).is_none());
		assert_eq!(pool.len(), 1);
		assert_eq!(pool.terms()[0].text, "Ultrasound");
	}

	#[test]
	fn new_terms_need_translation_only_with_additional_languages() {
		let mut pool = TermPool::new();
		let plain = pool.add_unique("crack", false).expect("term must be added");
		let multi = pool.add_unique("weld", true).expect("term must be added");

		assert!(!pool.get(plain).expect("term exists").needs_translation());
		assert!(pool.get(multi).expect("term exists").needs_translation());
	}

	#[test]
	fn update_with_identical_patch_is_a_no_op() {
		let mut pool = TermPool::new();
		let id = pool.add_unique("crack", false).expect("term must be added");

		assert!(!pool.update_term(id, TermPatch::default(), false));
		assert!(!pool.update_term(uuid::Uuid::new_v4(), TermPatch::default(), false));
		assert!(pool.update_term(
			id,
			TermPatch { context: Some("metal fatigue".to_string()), translations: None },
			false,
		));
		assert_eq!(pool.get(id).expect("term exists").context, "metal fatigue");
	}

	#[test]
	fn from_terms_drops_duplicates_and_blanks() {
		let pool = TermPool::from_terms([
			Term::new("Weld", "", false),
			Term::new("weld", "other", false),
			Term::new(" ", "", false),
			Term::new("seam", "", false),
		]);
		let texts: Vec<_> = pool.iter().map(|term| term.text.as_str()).collect();

		assert_eq!(texts, vec!["Weld", "seam"]);
	}
}
