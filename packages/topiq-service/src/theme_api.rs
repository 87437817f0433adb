//! Wire shapes for loading a theme and for saving it back.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use topiq_domain::{
	MAX_SAVED_QUERIES, SavedQuery, SlotIndex, Term, TermId, TermKind, TermPool, Theme, TopicDraft,
};

use crate::{Error, Result};

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TermRecord {
	pub id: Uuid,
	pub text: String,
	#[serde(default)]
	pub context: String,
	#[serde(default)]
	pub translations: BTreeMap<String, String>,
}
impl TermRecord {
	fn from_term(term: &Term) -> Self {
		Self {
			id: term.id,
			text: term.text.clone(),
			context: term.context.clone(),
			translations: term.translations.clone(),
		}
	}

	fn into_term(self, additional: &[String]) -> Term {
		Term::restore(self.id, self.text.trim(), self.context, self.translations, additional)
	}
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SavedQueryRecord {
	/// Slot number, 1 through 3.
	pub order_index: u8,
	pub query_model: SavedQuery,
}

/// A persisted theme with its saved queries. Loading and saving use the same shape.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ThemeRecord {
	#[serde(default)]
	pub id: Option<Uuid>,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub languages: Vec<String>,
	#[serde(default)]
	pub keywords: Vec<TermRecord>,
	#[serde(default)]
	pub must_have: Vec<TermRecord>,
	#[serde(default)]
	pub exclude: Vec<TermRecord>,
	#[serde(default)]
	pub search_queries: Vec<SavedQueryRecord>,
}
impl ThemeRecord {
	/// Builds the save payload from a session. Empty slots are omitted.
	///
	/// Each term list is the theme list followed by the query-builder pool terms it lacks, so
	/// every id a saved query references survives a reload. A pool term whose text matches a
	/// theme term under another id is folded into that theme term.
	pub fn from_draft(id: Option<Uuid>, draft: &TopicDraft) -> Self {
		let theme = draft.theme();
		let mut substitutions = HashMap::new();
		let mut terms = |kind: TermKind| {
			merged_terms(theme.list(kind), draft.pools().pool(kind), &mut substitutions)
		};
		let keywords = terms(TermKind::Keyword);
		let must_have = terms(TermKind::Must);
		let exclude = terms(TermKind::Exclude);
		let search_queries = draft
			.slots()
			.saved_queries()
			.map(|(index, query)| {
				let mut query_model = query.clone();

				for (from, to) in &substitutions {
					query_model.substitute_term(*from, *to);
				}

				SavedQueryRecord { order_index: index.get(), query_model }
			})
			.collect();

		Self {
			id,
			title: theme.title.clone(),
			description: theme.description.clone(),
			languages: theme.languages().to_vec(),
			keywords,
			must_have,
			exclude,
			search_queries,
		}
	}

	/// Splits the record into a theme and its saved slots.
	pub fn into_parts(self) -> Result<(Theme, [Option<SavedQuery>; MAX_SAVED_QUERIES])> {
		let mut saved: [Option<SavedQuery>; MAX_SAVED_QUERIES] = Default::default();

		for record in self.search_queries {
			let index = SlotIndex::new(record.order_index).ok_or_else(|| Error::InvalidRequest {
				message: format!("Saved query order_index {} is outside 1-3.", record.order_index),
			})?;
			let slot = &mut saved[usize::from(index.get()) - 1];

			if slot.is_some() {
				return Err(Error::Conflict {
					message: format!("Two saved queries claim order_index {}.", index.get()),
				});
			}

			*slot = Some(record.query_model);
		}

		let mut theme = Theme::with_languages(self.languages);
		let additional = theme.additional_languages().to_vec();
		let pool = |records: Vec<TermRecord>| {
			TermPool::from_terms(records.into_iter().map(|record| record.into_term(&additional)))
		};

		theme.title = self.title;
		theme.description = self.description;
		theme.keywords = pool(self.keywords);
		theme.required_words = pool(self.must_have);
		theme.excluded_words = pool(self.exclude);

		Ok((theme, saved))
	}
}

pub type ThemeSaveRequest = ThemeRecord;

fn merged_terms(
	list: &TermPool,
	pool: &TermPool,
	substitutions: &mut HashMap<TermId, TermId>,
) -> Vec<TermRecord> {
	let mut terms: Vec<&Term> = list.iter().collect();

	for term in pool.iter() {
		if terms.iter().any(|known| known.id == term.id) {
			continue;
		}

		let key = term.text_key();
		let same_text = terms.iter().find(|known| known.text_key() == key).map(|known| known.id);

		match same_text {
			Some(known) => {
				substitutions.insert(term.id, known);
			},
			None => terms.push(term),
		}
	}

	terms.into_iter().map(TermRecord::from_term).collect()
}
