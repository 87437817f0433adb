//! Structural edits on the keyword groups of a query.
//!
//! Every edit that changes the group count adjusts the connectors in the same step, so
//! `connectors.len() == max(groups.len() - 1, 0)` holds after each call.

use uuid::Uuid;

use crate::{
	query::{GroupOp, KeywordGroup, KeywordQuery},
	term::TermId,
};

impl KeywordQuery {
	/// Moves `term_id` out of whatever group holds it and appends it to `group_index`.
	pub fn move_to_group(&mut self, term_id: TermId, group_index: usize) -> bool {
		if group_index >= self.groups.len() {
			return false;
		}

		for group in &mut self.groups {
			group.term_ids.retain(|id| *id != term_id);
		}

		self.groups[group_index].term_ids.push(term_id);
		self.debug_assert_invariants();

		true
	}

	/// Takes `term_id` out of every group. Groups and connectors keep their shape.
	pub fn move_to_unused(&mut self, term_id: TermId) -> bool {
		let mut removed = false;

		for group in &mut self.groups {
			let before = group.term_ids.len();

			group.term_ids.retain(|id| *id != term_id);

			removed |= group.term_ids.len() != before;
		}

		removed
	}

	pub fn set_group_op(&mut self, group_index: usize, op: GroupOp) -> bool {
		let Some(group) = self.groups.get_mut(group_index) else {
			return false;
		};

		if group.op == op {
			return false;
		}

		group.op = op;

		true
	}

	pub fn set_connector(&mut self, connector_index: usize, op: GroupOp) -> bool {
		let Some(connector) = self.connectors.get_mut(connector_index) else {
			return false;
		};

		if *connector == op {
			return false;
		}

		*connector = op;

		true
	}

	/// Appends an empty OR group, joined to the previous one with AND.
	pub fn add_group(&mut self) -> Uuid {
		let group = KeywordGroup::new(GroupOp::Or, Vec::new());
		let id = group.id;

		if !self.groups.is_empty() {
			self.connectors.push(GroupOp::And);
		}

		self.groups.push(group);
		self.debug_assert_invariants();

		id
	}

	/// Removes a group and re-homes its terms into the first remaining group.
	///
	/// Refused when it is the last group or the index is out of range. The connector on the
	/// group's left goes with it; for the first group the connector on its right goes instead.
	pub fn remove_group(&mut self, group_index: usize) -> bool {
		if self.groups.len() <= 1 || group_index >= self.groups.len() {
			return false;
		}

		let removed = self.groups.remove(group_index);

		self.connectors.remove(group_index.saturating_sub(1));
		self.groups[0].term_ids.extend(removed.term_ids);
		self.debug_assert_invariants();

		true
	}

	fn debug_assert_invariants(&self) {
		debug_assert_eq!(
			self.connectors.len(),
			self.groups.len().saturating_sub(1),
			"Connector count must be one less than group count."
		);
		debug_assert!(
			{
				let mut seen = std::collections::HashSet::new();

				self.groups.iter().flat_map(|group| &group.term_ids).all(|id| seen.insert(*id))
			},
			"A term must belong to at most one group."
		);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ids(n: usize) -> Vec<TermId> {
		(0..n).map(|_| Uuid::new_v4()).collect()
	}

	#[test]
	fn remove_first_group_drops_right_connector() {
		let mut query = KeywordQuery::default();

		query.add_group();
		query.add_group();
		query.add_group();
		query.set_connector(0, GroupOp::Or);

		assert!(query.remove_group(0));
		assert_eq!(query.connectors(), &[GroupOp::And]);
	}

	#[test]
	fn remove_middle_group_drops_left_connector() {
		let mut query = KeywordQuery::default();

		query.add_group();
		query.add_group();
		query.add_group();
		query.set_connector(0, GroupOp::Or);

		assert!(query.remove_group(1));
		assert_eq!(query.groups().len(), 2);
		assert_eq!(query.connectors(), &[GroupOp::And]);
	}

	#[test]
	fn move_to_unused_is_idempotent() {
		let terms = ids(1);
		let mut query = KeywordQuery::default();

		query.add_group();
		query.move_to_group(terms[0], 0);

		assert!(query.move_to_unused(terms[0]));
		assert!(!query.move_to_unused(terms[0]));
		assert!(query.groups()[0].term_ids.is_empty());
	}
}
