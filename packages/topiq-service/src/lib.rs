pub mod theme_api;

mod error;

pub use error::{Error, Result};
pub use theme_api::{SavedQueryRecord, TermRecord, ThemeRecord, ThemeSaveRequest};

use std::{future::Future, pin::Pin, sync::Arc};

use uuid::Uuid;

use topiq_config::{Config, Limits, LlmProviderConfig};
use topiq_domain::{
	TermTranslation, ThemeSuggestion, TopicDraft, TranslationRequest, TranslationTerm,
};
use topiq_providers::{suggest, translate};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait SuggestProvider
where
	Self: Send + Sync,
{
	fn suggest<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		limits: &'a Limits,
		description: &'a str,
	) -> BoxFuture<'a, Result<ThemeSuggestion>>;
}

pub trait TranslateProvider
where
	Self: Send + Sync,
{
	fn translate<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		limits: &'a Limits,
		request: &'a TranslationRequest,
	) -> BoxFuture<'a, Result<Vec<TermTranslation>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub suggest: Arc<dyn SuggestProvider>,
	pub translate: Arc<dyn TranslateProvider>,
}
impl Providers {
	pub fn new(suggest: Arc<dyn SuggestProvider>, translate: Arc<dyn TranslateProvider>) -> Self {
		Self { suggest, translate }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { suggest: provider.clone(), translate: provider }
	}
}

struct DefaultProviders;
impl SuggestProvider for DefaultProviders {
	fn suggest<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		limits: &'a Limits,
		description: &'a str,
	) -> BoxFuture<'a, Result<ThemeSuggestion>> {
		Box::pin(async move { Ok(suggest::suggest(cfg, limits, description).await?) })
	}
}
impl TranslateProvider for DefaultProviders {
	fn translate<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		limits: &'a Limits,
		request: &'a TranslationRequest,
	) -> BoxFuture<'a, Result<Vec<TermTranslation>>> {
		Box::pin(async move { Ok(translate::translate(cfg, limits, request).await?) })
	}
}

/// One editing session over a theme, with the provider calls that feed it.
pub struct TopicService {
	pub cfg: Config,
	pub providers: Providers,
	theme_id: Option<Uuid>,
	draft: TopicDraft,
}
impl TopicService {
	pub fn new(cfg: Config) -> Self {
		Self::with_providers(cfg, Providers::default())
	}

	pub fn with_providers(cfg: Config, providers: Providers) -> Self {
		let draft = TopicDraft::new(cfg.theme.default_languages.clone());

		Self { cfg, providers, theme_id: None, draft }
	}

	pub fn theme_id(&self) -> Option<Uuid> {
		self.theme_id
	}

	pub fn draft(&self) -> &TopicDraft {
		&self.draft
	}

	/// Synchronous mutators go straight to the session.
	pub fn draft_mut(&mut self) -> &mut TopicDraft {
		&mut self.draft
	}

	pub fn reset(&mut self) {
		self.theme_id = None;
		self.draft.reset_to_empty(self.cfg.theme.default_languages.clone());
	}

	pub fn load_theme(&mut self, record: ThemeRecord) -> Result<()> {
		let id = record.id;
		let (theme, saved) = record.into_parts()?;

		self.draft.load(theme, saved);
		self.theme_id = id;

		tracing::info!(
			theme_id = ?id,
			saved_queries = self.draft.slots().saved_count(),
			"Theme loaded."
		);

		Ok(())
	}

	pub fn save_request(&self) -> ThemeSaveRequest {
		ThemeRecord::from_draft(self.theme_id, &self.draft)
	}

	/// Marks the session clean once the caller confirmed the save went through.
	pub fn acknowledge_save(&mut self, id: Option<Uuid>) {
		if id.is_some() {
			self.theme_id = id;
		}

		self.draft.set_status_loaded();
	}

	/// Replaces the theme lists and pools with a suggestion drafted from the description.
	pub async fn suggest_from_description(&mut self) -> Result<()> {
		let description = self.draft.theme().description.trim().to_string();
		let min_chars = self.cfg.limits.suggest_min_description_chars;

		if description.chars().count() < min_chars as usize {
			let message = format!("Description must be at least {min_chars} characters.");

			self.draft.suggest.fail(message.clone());

			return Err(Error::InvalidRequest { message });
		}

		self.draft.suggest.begin();

		let result = self
			.providers
			.suggest
			.suggest(&self.cfg.providers.llm, &self.cfg.limits, &description)
			.await;

		match result {
			Ok(suggestion) => {
				let context_max_chars = self.cfg.limits.term_context_max_chars as usize;

				self.draft.apply_suggestions(&suggestion, context_max_chars);
				self.draft.suggest.succeed();

				tracing::info!(
					keywords = self.draft.pools().keyword_terms.len(),
					must = self.draft.pools().must_terms.len(),
					exclude = self.draft.pools().exclude_terms.len(),
					"Suggestion applied."
				);

				Ok(())
			},
			Err(err) => {
				tracing::warn!(error = %err, "Suggestion failed.");

				self.draft.suggest.fail(err.to_string());

				Err(err)
			},
		}
	}

	/// Translates every term still missing a translation into `target_language`.
	///
	/// Batches are applied as they arrive; the first failure is recorded and ends the run,
	/// keeping what earlier batches delivered. Returns how many terms changed.
	pub async fn translate_missing(&mut self, target_language: &str) -> Result<usize> {
		let target_language = target_language.trim();
		let theme = self.draft.theme();

		if !theme.additional_languages().iter().any(|language| language == target_language) {
			return Ok(0);
		}

		let source_language = theme.primary_language().unwrap_or_default().to_string();
		let limits = &self.cfg.limits;
		let terms: Vec<TranslationTerm> = self
			.draft
			.stale_terms()
			.into_iter()
			.map(|term| {
				TranslationTerm::from_term(
					term,
					limits.term_text_max_chars as usize,
					limits.term_context_max_chars as usize,
				)
			})
			.collect();

		if terms.is_empty() {
			return Ok(0);
		}

		let batch_size = (self.cfg.limits.translate_batch_max_terms as usize).max(1);
		let mut changed = 0;

		self.draft.translate.begin();

		for chunk in terms.chunks(batch_size) {
			let request = TranslationRequest {
				source_language: source_language.clone(),
				target_language: target_language.to_string(),
				terms: chunk.to_vec(),
			};
			let result = self
				.providers
				.translate
				.translate(&self.cfg.providers.llm, &self.cfg.limits, &request)
				.await;

			match result {
				Ok(batch) => changed += self.draft.apply_translations(target_language, &batch),
				Err(err) => {
					tracing::warn!(error = %err, target_language, "Translation batch failed.");

					self.draft.translate.fail(err.to_string());

					return Err(err);
				},
			}
		}

		self.draft.translate.succeed();

		tracing::info!(target_language, terms = terms.len(), changed, "Translation finished.");

		Ok(changed)
	}
}
