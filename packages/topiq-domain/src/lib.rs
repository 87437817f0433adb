pub mod compile;
pub mod group;
pub mod ingest;
pub mod pool;
pub mod query;
pub mod slots;
pub mod term;
pub mod theme;
pub mod topic;
pub mod translation;

pub use compile::{EMPTY_QUERY_PLACEHOLDER, compile};
pub use ingest::{SuggestedTerm, SuggestedTerms, ThemeSuggestion};
pub use pool::{TermKind, TermPatch, TermPool, TermPools};
pub use query::{
	ExcludeClause, GroupOp, KeywordGroup, KeywordQuery, MustClause, MustMode, SavedQuery,
};
pub use slots::{EditingState, MAX_SAVED_QUERIES, QuerySlots, SlotIndex};
pub use term::{Term, TermId, TranslationStatus};
pub use theme::Theme;
pub use topic::{RequestState, TopicDraft, TopicStatus};
pub use translation::{TermTranslation, TranslationRequest, TranslationTerm};
