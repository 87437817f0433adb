mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Limits, LlmProviderConfig, Providers, Service, ThemeDefaults};

use std::{collections::HashSet, fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	let llm = &cfg.providers.llm;

	for (label, value) in [
		("providers.llm.api_base", &llm.api_base),
		("providers.llm.api_key", &llm.api_key),
		("providers.llm.model", &llm.model),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if llm.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.llm.timeout_ms must be greater than zero.".to_string(),
		});
	}

	for (label, temperature) in [
		("providers.llm.suggest_temperature", llm.suggest_temperature),
		("providers.llm.translate_temperature", llm.translate_temperature),
	] {
		if !temperature.is_finite() {
			return Err(Error::Validation { message: format!("{label} must be a finite number.") });
		}
		if !(0.0..=2.0).contains(&temperature) {
			return Err(Error::Validation {
				message: format!("{label} must be in the range 0.0-2.0."),
			});
		}
	}

	for (label, value) in [
		("providers.llm.suggest_max_tokens", llm.suggest_max_tokens),
		("providers.llm.translate_max_tokens", llm.translate_max_tokens),
		("limits.translate_batch_max_terms", cfg.limits.translate_batch_max_terms),
		("limits.term_text_max_chars", cfg.limits.term_text_max_chars),
		("limits.term_context_max_chars", cfg.limits.term_context_max_chars),
	] {
		if value == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	let mut seen = HashSet::new();

	for code in &cfg.theme.default_languages {
		if code.trim().is_empty() {
			return Err(Error::Validation {
				message: "theme.default_languages must not contain empty codes.".to_string(),
			});
		}
		if !seen.insert(code.trim().to_lowercase()) {
			return Err(Error::Validation {
				message: format!("theme.default_languages contains duplicate code {code:?}."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.providers.llm.api_base = cfg.providers.llm.api_base.trim_end_matches('/').to_string();

	if cfg.service.log_level.trim().is_empty() {
		cfg.service.log_level = "info".to_string();
	}

	for code in &mut cfg.theme.default_languages {
		*code = code.trim().to_string();
	}
}
