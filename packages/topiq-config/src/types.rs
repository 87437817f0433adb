use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub providers: Providers,
	#[serde(default)]
	pub limits: Limits,
	#[serde(default)]
	pub theme: ThemeDefaults,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Providers {
	pub llm: LlmProviderConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
	#[serde(default = "default_suggest_temperature")]
	pub suggest_temperature: f32,
	#[serde(default = "default_translate_temperature")]
	pub translate_temperature: f32,
	#[serde(default = "default_suggest_max_tokens")]
	pub suggest_max_tokens: u32,
	#[serde(default = "default_translate_max_tokens")]
	pub translate_max_tokens: u32,
}

/// Input caps shared by ingestion, translation batching, and the providers.
#[derive(Clone, Debug, Deserialize)]
pub struct Limits {
	#[serde(default = "default_suggest_min_description_chars")]
	pub suggest_min_description_chars: u32,
	#[serde(default = "default_translate_batch_max_terms")]
	pub translate_batch_max_terms: u32,
	#[serde(default = "default_term_text_max_chars")]
	pub term_text_max_chars: u32,
	#[serde(default = "default_term_context_max_chars")]
	pub term_context_max_chars: u32,
}
impl Default for Limits {
	fn default() -> Self {
		Self {
			suggest_min_description_chars: default_suggest_min_description_chars(),
			translate_batch_max_terms: default_translate_batch_max_terms(),
			term_text_max_chars: default_term_text_max_chars(),
			term_context_max_chars: default_term_context_max_chars(),
		}
	}
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ThemeDefaults {
	/// Languages a fresh theme starts with; the first entry is the primary language.
	#[serde(default)]
	pub default_languages: Vec<String>,
}

fn default_suggest_temperature() -> f32 {
	0.2
}

fn default_translate_temperature() -> f32 {
	0.1
}

fn default_suggest_max_tokens() -> u32 {
	2_000
}

fn default_translate_max_tokens() -> u32 {
	1_500
}

fn default_suggest_min_description_chars() -> u32 {
	3
}

fn default_translate_batch_max_terms() -> u32 {
	50
}

fn default_term_text_max_chars() -> u32 {
	120
}

fn default_term_context_max_chars() -> u32 {
	600
}
