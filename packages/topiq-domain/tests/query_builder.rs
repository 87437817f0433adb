use uuid::Uuid;

use topiq_domain::{
	EMPTY_QUERY_PLACEHOLDER, GroupOp, KeywordGroup, KeywordQuery, MustMode, SavedQuery, TermKind,
	TermPools, TopicDraft, compile,
};

fn topic_with_keywords(texts: &[&str]) -> TopicDraft {
	let mut topic = TopicDraft::new(vec!["en".to_string()]);

	for text in texts {
		topic.add_search_term(TermKind::Keyword, text).expect("keyword must be new");
	}

	topic
}

fn keyword_id(topic: &TopicDraft, text: &str) -> Uuid {
	topic
		.pools()
		.keyword_terms
		.iter()
		.find(|term| term.text == text)
		.map(|term| term.id)
		.expect("keyword must exist")
}

fn assert_shape(query: &KeywordQuery) {
	assert_eq!(query.connectors().len(), query.groups().len().saturating_sub(1));

	let mut seen = std::collections::HashSet::new();

	for group in query.groups() {
		for id in &group.term_ids {
			assert!(seen.insert(*id), "term {id} appears in two groups");
		}
	}
}

#[test]
fn empty_query_compiles_to_placeholder() {
	assert_eq!(compile(&TermPools::default(), &SavedQuery::empty()), EMPTY_QUERY_PLACEHOLDER);
}

#[test]
fn single_or_group_quotes_only_multiword_terms() {
	let topic = topic_with_keywords(&["ultrasound", "fatigue crack"]);

	assert_eq!(topic.compile_draft(), "(ultrasound OR \"fatigue crack\")");
}

#[test]
fn must_terms_are_appended_after_keywords() {
	let mut topic = topic_with_keywords(&["ultrasound"]);
	let safety = topic.add_search_term(TermKind::Must, "safety").expect("must term must be new");

	assert!(topic.move_must_to_group(safety));
	assert_eq!(topic.compile_draft(), "(ultrasound) MUST(safety)");
	assert!(topic.set_must_mode(MustMode::Any));

	let second = topic.add_search_term(TermKind::Must, "hazard").expect("must term must be new");

	assert!(topic.move_must_to_group(second));
	assert_eq!(topic.compile_draft(), "(ultrasound) MUST(safety OR hazard)");
}

#[test]
fn exclude_terms_are_always_or_joined() {
	let mut topic = topic_with_keywords(&["weld"]);
	let first = topic.add_search_term(TermKind::Exclude, "plastic").expect("exclude must be new");
	let second = topic.add_search_term(TermKind::Exclude, "wood glue").expect("exclude must be new");

	topic.move_exclude_to_group(first);
	topic.move_exclude_to_group(second);

	assert_eq!(topic.compile_draft(), "(weld) NOT(plastic OR \"wood glue\")");
	assert!(topic.move_exclude_to_unused(first));
	assert_eq!(topic.compile_draft(), "(weld) NOT(\"wood glue\")");
}

#[test]
fn connectors_realign_to_surviving_groups() {
	let mut topic = topic_with_keywords(&["a", "b", "c"]);
	let b = keyword_id(&topic, "b");
	let c = keyword_id(&topic, "c");

	assert!(topic.add_keyword_group());
	assert!(topic.add_keyword_group());
	assert!(topic.move_keyword_to_unused(b));
	assert!(topic.move_keyword_to_group(c, 2));
	assert!(topic.set_connector(0, GroupOp::Or));
	assert!(topic.set_group_op(2, GroupOp::And));

	// The middle group is empty, so the first connector joins groups 0 and 2.
	assert_eq!(topic.compile_draft(), "(a) OR (c)");
}

#[test]
fn dangling_ids_are_skipped() {
	let mut pools = TermPools::default();
	let known = pools.keyword_terms.add_unique("sonar", false).expect("term must be new");
	let keywords = KeywordQuery::from_parts(
		vec![
			KeywordGroup::new(GroupOp::And, vec![Uuid::new_v4(), known]),
			KeywordGroup::new(GroupOp::Or, vec![Uuid::new_v4()]),
		],
		vec![GroupOp::Or],
	);
	let mut query = SavedQuery { keywords, ..SavedQuery::empty() };

	query.include_must(known);

	// Ids only resolve against their own pool.
	assert_eq!(compile(&pools, &query), "(sonar)");
}

#[test]
fn removed_group_terms_land_in_group_zero() {
	let mut topic = topic_with_keywords(&["a", "b"]);
	let b = keyword_id(&topic, "b");

	assert!(topic.add_keyword_group());
	assert!(topic.move_keyword_to_group(b, 1));
	assert!(topic.remove_keyword_group(1));
	assert!(topic.add_keyword_group());

	let groups = topic.draft().keywords.groups();

	assert_eq!(groups.len(), 2);
	assert!(groups[0].term_ids.contains(&b));
	assert!(groups[1].term_ids.is_empty());
	assert_shape(&topic.draft().keywords);
}

#[test]
fn last_group_cannot_be_removed() {
	let mut topic = topic_with_keywords(&["a"]);

	assert!(!topic.remove_keyword_group(0));
	assert!(!topic.remove_keyword_group(5));
	assert_eq!(topic.draft().keywords.groups().len(), 1);
}

#[test]
fn removing_first_group_drops_its_right_connector() {
	let mut topic = topic_with_keywords(&["a", "b", "c"]);
	let c = keyword_id(&topic, "c");

	topic.add_keyword_group();
	topic.add_keyword_group();
	topic.set_connector(1, GroupOp::Or);
	topic.move_keyword_to_group(c, 2);

	assert!(topic.remove_keyword_group(0));
	assert_eq!(topic.draft().keywords.connectors(), &[GroupOp::Or]);
	assert_eq!(topic.draft().keywords.groups()[0].term_ids.len(), 2);
}

#[test]
fn group_invariants_hold_across_edit_sequences() {
	let mut topic = topic_with_keywords(&["a", "b", "c", "d"]);
	let ids: Vec<Uuid> = topic.pools().keyword_terms.ids();

	for step in 0..60_usize {
		let id = ids[step % ids.len()];

		match step % 7 {
			0 => {
				topic.add_keyword_group();
			},
			1 => {
				topic.move_keyword_to_group(id, step % 4);
			},
			2 => {
				topic.remove_keyword_group(step % 3);
			},
			3 => {
				topic.move_keyword_to_unused(id);
			},
			4 => {
				topic.set_connector(step % 2, GroupOp::Or);
			},
			5 => {
				topic.move_keyword_to_group(id, 0);
			},
			_ => {
				topic.remove_keyword_group(0);
			},
		}

		assert_shape(&topic.draft().keywords);
	}
}

#[test]
fn unused_views_list_unreferenced_pool_terms() {
	let mut topic = topic_with_keywords(&["a", "b"]);
	let a = keyword_id(&topic, "a");
	let must = topic.add_search_term(TermKind::Must, "m").expect("must term must be new");

	assert!(topic.unused_keyword_terms().is_empty());
	assert!(topic.move_keyword_to_unused(a));

	let unused: Vec<&str> =
		topic.unused_keyword_terms().iter().map(|term| term.text.as_str()).collect();

	assert_eq!(unused, vec!["a"]);
	assert_eq!(topic.unused_must_terms().len(), 1);
	assert!(topic.move_must_to_group(must));
	assert!(topic.unused_must_terms().is_empty());
	assert!(topic.unused_exclude_terms().is_empty());
}
