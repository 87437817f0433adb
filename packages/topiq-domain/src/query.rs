use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
	pool::{TermPool, TermPools},
	term::{Term, TermId},
};

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GroupOp {
	#[default]
	Or,
	And,
}
impl GroupOp {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Or => "OR",
			Self::And => "AND",
		}
	}
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MustMode {
	#[default]
	All,
	Any,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordGroup {
	pub id: Uuid,
	#[serde(default)]
	pub op: GroupOp,
	#[serde(default)]
	pub term_ids: Vec<TermId>,
}
impl KeywordGroup {
	pub fn new(op: GroupOp, term_ids: Vec<TermId>) -> Self {
		Self { id: Uuid::new_v4(), op, term_ids }
	}
}

/// Keyword groups plus the connectors joining neighbours.
///
/// Invariants: `connectors.len() == max(groups.len() - 1, 0)` and a term id sits in at most one
/// group. Deserialized input is repaired to satisfy both.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(from = "RawKeywordQuery")]
pub struct KeywordQuery {
	pub(crate) groups: Vec<KeywordGroup>,
	pub(crate) connectors: Vec<GroupOp>,
}
impl KeywordQuery {
	/// Builds a query from loose parts, dropping repeated memberships and resizing connectors.
	pub fn from_parts(groups: Vec<KeywordGroup>, connectors: Vec<GroupOp>) -> Self {
		let mut seen = HashSet::new();
		let groups: Vec<KeywordGroup> = groups
			.into_iter()
			.map(|group| KeywordGroup {
				term_ids: group.term_ids.into_iter().filter(|id| seen.insert(*id)).collect(),
				..group
			})
			.collect();
		let mut connectors = connectors;

		connectors.resize(groups.len().saturating_sub(1), GroupOp::And);

		Self { groups, connectors }
	}

	pub fn groups(&self) -> &[KeywordGroup] {
		&self.groups
	}

	pub fn connectors(&self) -> &[GroupOp] {
		&self.connectors
	}

	pub fn used_term_ids(&self) -> HashSet<TermId> {
		self.groups.iter().flat_map(|group| group.term_ids.iter().copied()).collect()
	}

	pub fn group_of(&self, term_id: TermId) -> Option<usize> {
		self.groups.iter().position(|group| group.term_ids.contains(&term_id))
	}
}

#[derive(Deserialize)]
struct RawKeywordQuery {
	#[serde(default)]
	groups: Vec<KeywordGroup>,
	#[serde(default)]
	connectors: Vec<GroupOp>,
}
impl From<RawKeywordQuery> for KeywordQuery {
	fn from(raw: RawKeywordQuery) -> Self {
		Self::from_parts(raw.groups, raw.connectors)
	}
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MustClause {
	#[serde(default)]
	pub mode: MustMode,
	#[serde(default)]
	pub term_ids: Vec<TermId>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcludeClause {
	#[serde(default)]
	pub term_ids: Vec<TermId>,
}

/// The structured query model. Cloning produces a fully independent copy.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct SavedQuery {
	#[serde(default)]
	pub keywords: KeywordQuery,
	#[serde(default)]
	pub must: MustClause,
	#[serde(default)]
	pub exclude: ExcludeClause,
}
impl SavedQuery {
	pub fn empty() -> Self {
		Self::default()
	}

	/// One OR group with every keyword, every must term in ALL mode, and every exclude term.
	pub fn default_draft(pools: &TermPools) -> Self {
		let keyword_ids = pools.keyword_terms.ids();
		let groups = if keyword_ids.is_empty() {
			Vec::new()
		} else {
			vec![KeywordGroup::new(GroupOp::Or, keyword_ids)]
		};

		Self {
			keywords: KeywordQuery { groups, connectors: Vec::new() },
			must: MustClause { mode: MustMode::All, term_ids: pools.must_terms.ids() },
			exclude: ExcludeClause { term_ids: pools.exclude_terms.ids() },
		}
	}

	pub fn is_empty(&self) -> bool {
		self.keywords.groups.is_empty()
			&& self.must.term_ids.is_empty()
			&& self.exclude.term_ids.is_empty()
	}

	pub fn set_must_mode(&mut self, mode: MustMode) -> bool {
		if self.must.mode == mode {
			return false;
		}

		self.must.mode = mode;

		true
	}

	pub fn include_must(&mut self, term_id: TermId) -> bool {
		include_id(&mut self.must.term_ids, term_id)
	}

	pub fn drop_must(&mut self, term_id: TermId) -> bool {
		drop_id(&mut self.must.term_ids, term_id)
	}

	pub fn include_exclude(&mut self, term_id: TermId) -> bool {
		include_id(&mut self.exclude.term_ids, term_id)
	}

	pub fn drop_exclude(&mut self, term_id: TermId) -> bool {
		drop_id(&mut self.exclude.term_ids, term_id)
	}

	/// Drops every reference to `term_id` from groups, must, and exclude.
	pub fn retract(&mut self, term_id: TermId) -> bool {
		let keyword = self.keywords.move_to_unused(term_id);
		let must = self.drop_must(term_id);
		let exclude = self.drop_exclude(term_id);

		keyword || must || exclude
	}

	/// Points every reference to `from` at `to`. Where `to` is already referenced, the `from`
	/// reference is dropped so memberships stay unique.
	pub fn substitute_term(&mut self, from: TermId, to: TermId) -> bool {
		if from == to {
			return false;
		}

		let keyword = if self.keywords.group_of(to).is_some() {
			self.keywords.move_to_unused(from)
		} else {
			let mut replaced = false;

			for id in self.keywords.groups.iter_mut().flat_map(|group| group.term_ids.iter_mut()) {
				if *id == from {
					*id = to;
					replaced = true;
				}
			}

			replaced
		};
		let must = substitute_id(&mut self.must.term_ids, from, to);
		let exclude = substitute_id(&mut self.exclude.term_ids, from, to);

		keyword || must || exclude
	}

	pub fn unused_keyword_terms<'a>(&self, pool: &'a TermPool) -> Vec<&'a Term> {
		let used = self.keywords.used_term_ids();

		pool.iter().filter(|term| !used.contains(&term.id)).collect()
	}

	pub fn unused_must_terms<'a>(&self, pool: &'a TermPool) -> Vec<&'a Term> {
		pool.iter().filter(|term| !self.must.term_ids.contains(&term.id)).collect()
	}

	pub fn unused_exclude_terms<'a>(&self, pool: &'a TermPool) -> Vec<&'a Term> {
		pool.iter().filter(|term| !self.exclude.term_ids.contains(&term.id)).collect()
	}
}

fn include_id(ids: &mut Vec<TermId>, term_id: TermId) -> bool {
	if ids.contains(&term_id) {
		return false;
	}

	ids.push(term_id);

	true
}

fn substitute_id(ids: &mut Vec<TermId>, from: TermId, to: TermId) -> bool {
	if !ids.contains(&from) {
		return false;
	}
	if ids.contains(&to) {
		return drop_id(ids, from);
	}

	for id in ids.iter_mut().filter(|id| **id == from) {
		*id = to;
	}

	true
}

fn drop_id(ids: &mut Vec<TermId>, term_id: TermId) -> bool {
	let before = ids.len();

	ids.retain(|id| *id != term_id);

	ids.len() != before
}
