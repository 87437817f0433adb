//! One analyst session over a theme: theme metadata, query-builder pools, query slots, and the
//! status of outstanding suggestion and translation calls.
//!
//! Every mutator returns whether it changed anything. A change marks the topic dirty; a
//! rejected call leaves the whole session, status included, untouched.

use crate::{
	compile,
	ingest::{self, ThemeSuggestion},
	pool::{TermKind, TermPatch, TermPool, TermPools},
	query::{GroupOp, MustMode, SavedQuery},
	slots::{MAX_SAVED_QUERIES, QuerySlots, SlotIndex},
	term::{Term, TermId},
	theme::Theme,
	translation::{self, TermTranslation},
};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TopicStatus {
	#[default]
	Empty,
	Loaded,
	Dirty,
}

/// Progress of one kind of external call.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RequestState {
	loading: bool,
	error: Option<String>,
}
impl RequestState {
	pub fn is_loading(&self) -> bool {
		self.loading
	}

	pub fn error(&self) -> Option<&str> {
		self.error.as_deref()
	}

	pub fn begin(&mut self) {
		self.loading = true;
		self.error = None;
	}

	pub fn succeed(&mut self) {
		self.loading = false;
		self.error = None;
	}

	pub fn fail(&mut self, message: impl Into<String>) {
		self.loading = false;
		self.error = Some(message.into());
	}

	pub fn clear_error(&mut self) {
		self.error = None;
	}
}

#[derive(Clone, Debug, Default)]
pub struct TopicDraft {
	status: TopicStatus,
	theme: Theme,
	pools: TermPools,
	slots: QuerySlots,
	pub suggest: RequestState,
	pub translate: RequestState,
}
impl TopicDraft {
	pub fn new(default_languages: Vec<String>) -> Self {
		Self { theme: Theme::with_languages(default_languages), ..Self::default() }
	}

	pub fn status(&self) -> TopicStatus {
		self.status
	}

	pub fn theme(&self) -> &Theme {
		&self.theme
	}

	pub fn pools(&self) -> &TermPools {
		&self.pools
	}

	pub fn slots(&self) -> &QuerySlots {
		&self.slots
	}

	pub fn draft(&self) -> &SavedQuery {
		self.slots.draft()
	}

	pub fn reset_to_empty(&mut self, default_languages: Vec<String>) {
		*self = Self::new(default_languages);
	}

	/// Installs a persisted theme. The pools start as copies of the theme lists; the draft
	/// becomes the default draft unless every pool is empty.
	pub fn load(&mut self, theme: Theme, saved: [Option<SavedQuery>; MAX_SAVED_QUERIES]) {
		let pools = TermPools {
			keyword_terms: theme.keywords.clone(),
			must_terms: theme.required_words.clone(),
			exclude_terms: theme.excluded_words.clone(),
		};
		let draft = if pools.is_empty() {
			self.slots.draft().clone()
		} else {
			SavedQuery::default_draft(&pools)
		};

		self.theme = theme;
		self.pools = pools;
		self.slots = QuerySlots::restore(draft, saved);
		self.status = TopicStatus::Loaded;
	}

	/// Call once the caller confirmed an external save.
	pub fn set_status_loaded(&mut self) {
		self.status = TopicStatus::Loaded;
	}

	pub fn set_title(&mut self, title: &str) -> bool {
		self.touch_if(|topic| replace_string(&mut topic.theme.title, title))
	}

	pub fn set_description(&mut self, description: &str) -> bool {
		self.touch_if(|topic| replace_string(&mut topic.theme.description, description))
	}

	pub fn set_primary_language(&mut self, code: &str) -> bool {
		self.touch_if(|topic| {
			let changed = topic.theme.set_primary_language(code);

			if changed {
				topic.recompute_translation_status();
			}

			changed
		})
	}

	pub fn add_additional_language(&mut self, code: &str) -> bool {
		self.touch_if(|topic| {
			let changed = topic.theme.add_additional_language(code);

			if changed {
				topic.recompute_translation_status();
			}

			changed
		})
	}

	pub fn remove_additional_language(&mut self, code: &str) -> bool {
		self.touch_if(|topic| {
			let changed = topic.theme.remove_additional_language(code);

			if changed {
				topic.recompute_translation_status();
			}

			changed
		})
	}

	pub fn add_theme_term(&mut self, kind: TermKind, text: &str) -> Option<TermId> {
		let has_additional = self.theme.has_additional_languages();
		let id = self.theme.list_mut(kind).add_unique(text, has_additional)?;

		self.mark_dirty();

		Some(id)
	}

	pub fn remove_theme_term(&mut self, kind: TermKind, id: TermId) -> bool {
		self.touch_if(|topic| topic.theme.list_mut(kind).remove_by_id(id).is_some())
	}

	pub fn update_theme_term(&mut self, kind: TermKind, id: TermId, patch: TermPatch) -> bool {
		let has_additional = self.theme.has_additional_languages();

		self.touch_if(|topic| topic.theme.list_mut(kind).update_term(id, patch, has_additional))
	}

	/// Adds a term to a query-builder pool. When this is the first term in any pool and the
	/// draft is still empty and idle, the draft becomes the default draft.
	pub fn add_search_term(&mut self, kind: TermKind, text: &str) -> Option<TermId> {
		let has_additional = self.theme.has_additional_languages();
		let was_empty = self.pools.is_empty();
		let id = self.pools.pool_mut(kind).add_unique(text, has_additional)?;

		if was_empty && self.slots.editing_index().is_none() && self.slots.draft().is_empty() {
			self.slots.replace_draft(SavedQuery::default_draft(&self.pools));
		}

		self.mark_dirty();

		Some(id)
	}

	/// Removes a pool term and retracts it from the draft in the same step.
	pub fn remove_search_term(&mut self, kind: TermKind, id: TermId) -> bool {
		self.touch_if(|topic| {
			if topic.pools.pool_mut(kind).remove_by_id(id).is_none() {
				return false;
			}

			topic.slots.edit_draft(|draft| draft.retract(id));

			true
		})
	}

	pub fn update_search_term(&mut self, kind: TermKind, id: TermId, patch: TermPatch) -> bool {
		let has_additional = self.theme.has_additional_languages();

		self.touch_if(|topic| topic.pools.pool_mut(kind).update_term(id, patch, has_additional))
	}

	pub fn set_search_draft(&mut self, query: SavedQuery) -> bool {
		self.touch_if(|topic| topic.slots.set_draft(query))
	}

	pub fn move_keyword_to_group(&mut self, term_id: TermId, group_index: usize) -> bool {
		self.edit_draft(|draft| draft.keywords.move_to_group(term_id, group_index))
	}

	pub fn move_keyword_to_unused(&mut self, term_id: TermId) -> bool {
		self.edit_draft(|draft| draft.keywords.move_to_unused(term_id))
	}

	pub fn set_group_op(&mut self, group_index: usize, op: GroupOp) -> bool {
		self.edit_draft(|draft| draft.keywords.set_group_op(group_index, op))
	}

	pub fn set_connector(&mut self, connector_index: usize, op: GroupOp) -> bool {
		self.edit_draft(|draft| draft.keywords.set_connector(connector_index, op))
	}

	pub fn add_keyword_group(&mut self) -> bool {
		self.edit_draft(|draft| {
			draft.keywords.add_group();

			true
		})
	}

	pub fn remove_keyword_group(&mut self, group_index: usize) -> bool {
		self.edit_draft(|draft| draft.keywords.remove_group(group_index))
	}

	pub fn set_must_mode(&mut self, mode: MustMode) -> bool {
		self.edit_draft(|draft| draft.set_must_mode(mode))
	}

	pub fn move_must_to_group(&mut self, term_id: TermId) -> bool {
		self.edit_draft(|draft| draft.include_must(term_id))
	}

	pub fn move_must_to_unused(&mut self, term_id: TermId) -> bool {
		self.edit_draft(|draft| draft.drop_must(term_id))
	}

	pub fn move_exclude_to_group(&mut self, term_id: TermId) -> bool {
		self.edit_draft(|draft| draft.include_exclude(term_id))
	}

	pub fn move_exclude_to_unused(&mut self, term_id: TermId) -> bool {
		self.edit_draft(|draft| draft.drop_exclude(term_id))
	}

	pub fn save_current_query(&mut self) -> Option<SlotIndex> {
		let index = self.slots.save_current()?;

		self.mark_dirty();

		Some(index)
	}

	/// Loads a saved query into the draft. Viewing a query does not dirty the topic.
	pub fn start_editing_query(&mut self, index: SlotIndex) -> bool {
		self.slots.start_editing(index)
	}

	pub fn new_query_after_confirm(&mut self, save_changes: bool) {
		let fresh = SavedQuery::default_draft(&self.pools);

		self.slots.new_query(save_changes, fresh);
		self.mark_dirty();
	}

	pub fn delete_saved_query(&mut self, index: SlotIndex) -> bool {
		self.touch_if(|topic| topic.slots.delete_saved(index))
	}

	/// Merges a translation batch into theme lists and pools alike.
	pub fn apply_translations(&mut self, target_language: &str, batch: &[TermTranslation]) -> usize {
		let additional = self.theme.additional_languages().to_vec();
		let Self { theme, pools, .. } = self;
		let [keywords, required, excluded] = theme.lists_mut();
		let [keyword_terms, must_terms, exclude_terms] = pools.pools_mut();
		let changed = translation::apply_translations(
			target_language,
			batch,
			&additional,
			[keywords, required, excluded, keyword_terms, must_terms, exclude_terms],
		);

		if changed > 0 {
			self.mark_dirty();
		}

		changed
	}

	/// Terms that still need translating, theme lists first, each id once.
	pub fn stale_terms(&self) -> Vec<&Term> {
		let mut seen = std::collections::HashSet::new();

		self.all_lists()
			.into_iter()
			.flat_map(TermPool::iter)
			.filter(|term| term.needs_translation() && seen.insert(term.id))
			.collect()
	}

	/// Replaces the theme lists and the pools with the suggested terms and resets the draft.
	/// Saved queries are kept.
	pub fn apply_suggestions(&mut self, suggestion: &ThemeSuggestion, context_max_chars: usize) {
		let has_additional = self.theme.has_additional_languages();
		let keyword_terms =
			ingest::pool_from_suggestions(&suggestion.keywords, has_additional, context_max_chars);
		let must_terms =
			ingest::pool_from_suggestions(&suggestion.must_have, has_additional, context_max_chars);
		let exclude_terms =
			ingest::pool_from_suggestions(&suggestion.excludes, has_additional, context_max_chars);
		let title = suggestion.title.trim();

		if !title.is_empty() {
			self.theme.title = title.to_string();
		}

		self.theme.keywords = keyword_terms.clone();
		self.theme.required_words = must_terms.clone();
		self.theme.excluded_words = exclude_terms.clone();
		self.pools = TermPools { keyword_terms, must_terms, exclude_terms };
		self.slots.reset_draft(SavedQuery::default_draft(&self.pools));
		self.mark_dirty();
	}

	pub fn compile_draft(&self) -> String {
		compile::compile(&self.pools, self.slots.draft())
	}

	pub fn compile_saved(&self, index: SlotIndex) -> Option<String> {
		self.slots.saved(index).map(|query| compile::compile(&self.pools, query))
	}

	pub fn unused_keyword_terms(&self) -> Vec<&Term> {
		self.slots.draft().unused_keyword_terms(&self.pools.keyword_terms)
	}

	pub fn unused_must_terms(&self) -> Vec<&Term> {
		self.slots.draft().unused_must_terms(&self.pools.must_terms)
	}

	pub fn unused_exclude_terms(&self) -> Vec<&Term> {
		self.slots.draft().unused_exclude_terms(&self.pools.exclude_terms)
	}

	fn all_lists(&self) -> [&TermPool; 6] {
		[
			&self.theme.keywords,
			&self.theme.required_words,
			&self.theme.excluded_words,
			&self.pools.keyword_terms,
			&self.pools.must_terms,
			&self.pools.exclude_terms,
		]
	}

	fn recompute_translation_status(&mut self) {
		let additional = self.theme.additional_languages().to_vec();

		for pool in self.theme.lists_mut().into_iter().chain(self.pools.pools_mut()) {
			pool.recompute_for_languages(&additional);
		}
	}

	fn edit_draft(&mut self, edit: impl FnOnce(&mut SavedQuery) -> bool) -> bool {
		self.touch_if(|topic| topic.slots.edit_draft(edit))
	}

	fn touch_if(&mut self, mutate: impl FnOnce(&mut Self) -> bool) -> bool {
		let changed = mutate(self);

		if changed {
			self.mark_dirty();
		}

		changed
	}

	fn mark_dirty(&mut self) {
		self.status = TopicStatus::Dirty;
	}
}

fn replace_string(target: &mut String, value: &str) -> bool {
	if target == value {
		return false;
	}

	*target = value.to_string();

	true
}
