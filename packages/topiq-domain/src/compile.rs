//! Renders a structured query into its human-readable boolean expression.
//!
//! Ids are resolved against their own pool (keywords against the keyword pool and so on); ids
//! that no longer resolve are skipped. Groups that resolve to nothing are omitted, and the
//! connectors are then applied by position among the surviving groups: the k-th surviving group
//! is joined to the previous one with `connectors[k - 1]`, falling back to AND.

use crate::{
	pool::{TermPool, TermPools},
	query::{GroupOp, MustMode, SavedQuery},
	term::TermId,
};

pub const EMPTY_QUERY_PLACEHOLDER: &str = "No parameters configured. Add keywords to build a query.";

pub fn compile(pools: &TermPools, query: &SavedQuery) -> String {
	let mut parts = Vec::new();

	if let Some(keywords) = compile_keywords(&pools.keyword_terms, query) {
		parts.push(keywords);
	}

	let must = resolve(&pools.must_terms, &query.must.term_ids);

	if !must.is_empty() {
		let op = match query.must.mode {
			MustMode::All => GroupOp::And,
			MustMode::Any => GroupOp::Or,
		};

		parts.push(format!("MUST({})", join(&must, op)));
	}

	let exclude = resolve(&pools.exclude_terms, &query.exclude.term_ids);

	if !exclude.is_empty() {
		parts.push(format!("NOT({})", join(&exclude, GroupOp::Or)));
	}

	if parts.is_empty() {
		return EMPTY_QUERY_PLACEHOLDER.to_string();
	}

	parts.join(" ")
}

fn compile_keywords(pool: &TermPool, query: &SavedQuery) -> Option<String> {
	let groups: Vec<String> = query
		.keywords
		.groups()
		.iter()
		.filter_map(|group| {
			let terms = resolve(pool, &group.term_ids);

			(!terms.is_empty()).then(|| format!("({})", join(&terms, group.op)))
		})
		.collect();
	let (first, rest) = groups.split_first()?;
	let connectors = query.keywords.connectors();
	let mut expr = first.clone();

	for (position, group) in rest.iter().enumerate() {
		let connector = connectors.get(position).copied().unwrap_or(GroupOp::And);

		expr.push(' ');
		expr.push_str(connector.as_str());
		expr.push(' ');
		expr.push_str(group);
	}

	Some(expr)
}

fn resolve(pool: &TermPool, ids: &[TermId]) -> Vec<String> {
	ids.iter()
		.filter_map(|id| pool.get(*id))
		.map(|term| term.text.trim())
		.filter(|text| !text.is_empty())
		.map(quote)
		.collect()
}

fn quote(text: &str) -> String {
	if text.chars().any(char::is_whitespace) { format!("\"{text}\"") } else { text.to_string() }
}

fn join(terms: &[String], op: GroupOp) -> String {
	terms.join(match op {
		GroupOp::And => " AND ",
		GroupOp::Or => " OR ",
	})
}
