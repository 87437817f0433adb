use serde::{Deserialize, Serialize};

use crate::query::SavedQuery;

pub const MAX_SAVED_QUERIES: usize = 3;

/// A saved-query slot number, always in `1..=3`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SlotIndex(u8);
impl SlotIndex {
	pub const ALL: [SlotIndex; MAX_SAVED_QUERIES] = [SlotIndex(1), SlotIndex(2), SlotIndex(3)];

	pub fn new(value: u8) -> Option<Self> {
		(1..=MAX_SAVED_QUERIES as u8).contains(&value).then_some(Self(value))
	}

	pub fn get(self) -> u8 {
		self.0
	}

	fn offset(self) -> usize {
		usize::from(self.0) - 1
	}
}
impl TryFrom<u8> for SlotIndex {
	type Error = String;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		Self::new(value).ok_or_else(|| format!("Slot index {value} is outside 1-3."))
	}
}
impl From<SlotIndex> for u8 {
	fn from(index: SlotIndex) -> Self {
		index.0
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EditingState {
	Idle,
	EditingSaved(SlotIndex),
}

/// The live draft plus up to three saved queries, and which saved slot the draft mirrors.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct QuerySlots {
	draft: SavedQuery,
	saved: [Option<SavedQuery>; MAX_SAVED_QUERIES],
	editing: Option<SlotIndex>,
	is_editing_draft: bool,
}
impl QuerySlots {
	pub fn new(draft: SavedQuery) -> Self {
		Self { draft, ..Self::default() }
	}

	/// Restores a persisted set of slots; the session starts idle.
	pub fn restore(draft: SavedQuery, saved: [Option<SavedQuery>; MAX_SAVED_QUERIES]) -> Self {
		Self { draft, saved, editing: None, is_editing_draft: false }
	}

	pub fn draft(&self) -> &SavedQuery {
		&self.draft
	}

	pub fn saved(&self, index: SlotIndex) -> Option<&SavedQuery> {
		self.saved[index.offset()].as_ref()
	}

	pub fn saved_queries(&self) -> impl Iterator<Item = (SlotIndex, &SavedQuery)> {
		SlotIndex::ALL.into_iter().filter_map(|index| self.saved(index).map(|query| (index, query)))
	}

	pub fn saved_count(&self) -> usize {
		self.saved.iter().filter(|slot| slot.is_some()).count()
	}

	pub fn editing_index(&self) -> Option<SlotIndex> {
		self.editing
	}

	pub fn state(&self) -> EditingState {
		match self.editing {
			Some(index) => EditingState::EditingSaved(index),
			None => EditingState::Idle,
		}
	}

	/// True when the draft diverged from the saved slot it mirrors.
	pub fn is_editing_draft(&self) -> bool {
		self.is_editing_draft
	}

	/// Applies `edit` to the draft. The unsaved-changes flag is only raised while a saved slot
	/// is being edited and the edit actually changed something.
	pub fn edit_draft(&mut self, edit: impl FnOnce(&mut SavedQuery) -> bool) -> bool {
		let changed = edit(&mut self.draft);

		if changed && self.editing.is_some() {
			self.is_editing_draft = true;
		}

		changed
	}

	pub fn set_draft(&mut self, query: SavedQuery) -> bool {
		self.edit_draft(|draft| {
			if *draft == query {
				return false;
			}

			*draft = query;

			true
		})
	}

	/// Replaces the draft without touching the editing session.
	pub(crate) fn replace_draft(&mut self, query: SavedQuery) {
		self.draft = query;
	}

	/// Resets the draft and returns to idle, keeping saved slots.
	pub(crate) fn reset_draft(&mut self, query: SavedQuery) {
		self.draft = query;
		self.editing = None;
		self.is_editing_draft = false;
	}

	/// Commits the draft. Returns the slot written, or `None` when all slots are taken.
	pub fn save_current(&mut self) -> Option<SlotIndex> {
		let target = match self.editing {
			Some(index) => index,
			None => SlotIndex::ALL.into_iter().find(|index| self.saved(*index).is_none())?,
		};

		self.saved[target.offset()] = Some(self.draft.clone());
		self.editing = Some(target);
		self.is_editing_draft = false;

		Some(target)
	}

	/// Loads a saved slot into the draft. No-op for an empty slot.
	pub fn start_editing(&mut self, index: SlotIndex) -> bool {
		let Some(query) = self.saved(index).cloned() else {
			return false;
		};

		self.draft = query;
		self.editing = Some(index);
		self.is_editing_draft = false;

		true
	}

	/// Optionally commits the draft into the slot being edited, then starts over from `fresh`.
	pub fn new_query(&mut self, save_changes: bool, fresh: SavedQuery) {
		if save_changes && let Some(index) = self.editing {
			let draft = std::mem::take(&mut self.draft);

			self.saved[index.offset()] = Some(draft);
		}

		self.reset_draft(fresh);
	}

	/// Deletes a saved slot and compacts the rest towards slot 1, tracking the edited slot.
	pub fn delete_saved(&mut self, index: SlotIndex) -> bool {
		if self.saved(index).is_none() {
			return false;
		}

		self.saved[index.offset()] = None;

		let mut remaining: Vec<SavedQuery> =
			self.saved.iter_mut().filter_map(Option::take).collect();

		for slot in self.saved.iter_mut() {
			*slot = if remaining.is_empty() { None } else { Some(remaining.remove(0)) };
		}

		self.editing = match self.editing {
			Some(editing) if editing == index => None,
			Some(editing) if editing > index => SlotIndex::new(editing.get() - 1),
			other => other,
		};

		if self.editing.is_none() {
			self.is_editing_draft = false;
		}

		true
	}
}
