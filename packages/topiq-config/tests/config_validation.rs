use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use topiq_config::{Config, Error};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

static COUNTER: AtomicU64 = AtomicU64::new(0);

fn write_temp_config(payload: String) -> PathBuf {
	let nanos =
		SystemTime::now().duration_since(UNIX_EPOCH).expect("Clock went backwards.").as_nanos();
	let seq = COUNTER.fetch_add(1, Ordering::SeqCst);
	let path = env::temp_dir().join(format!("topiq_config_{nanos}_{seq}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn sample_with(edit: impl FnOnce(&mut toml::Table)) -> String {
	let mut value: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");

	edit(value.as_table_mut().expect("Template config must be a table."));

	toml::to_string(&value).expect("Failed to render template config.")
}

fn llm_table(root: &mut toml::Table) -> &mut toml::Table {
	root.get_mut("providers")
		.and_then(Value::as_table_mut)
		.and_then(|providers| providers.get_mut("llm"))
		.and_then(Value::as_table_mut)
		.expect("Template config must include [providers.llm].")
}

fn load_str(payload: String) -> topiq_config::Result<Config> {
	let path = write_temp_config(payload);
	let result = topiq_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn expect_validation(result: topiq_config::Result<Config>, needle: &str) {
	match result {
		Err(Error::Validation { message }) => {
			assert!(message.contains(needle), "Unexpected message: {message}");
		},
		other => panic!("Expected validation error containing {needle:?}, got {other:?}."),
	}
}

#[test]
fn loads_sample_config_and_normalizes_api_base() {
	let cfg = load_str(SAMPLE_CONFIG_TEMPLATE_TOML.to_string()).expect("Sample config must load.");

	assert_eq!(cfg.providers.llm.api_base, "https://api.deepseek.com");
	assert_eq!(cfg.theme.default_languages, vec!["ru".to_string(), "en".to_string()]);
	assert_eq!(cfg.limits.translate_batch_max_terms, 50);
}

#[test]
fn applies_defaults_when_optional_sections_are_missing() {
	let payload = sample_with(|root| {
		root.remove("limits");
		root.remove("theme");

		let llm = llm_table(root);

		llm.remove("default_headers");
	});
	let cfg = load_str(payload).expect("Config without optional sections must load.");

	assert_eq!(cfg.limits.term_context_max_chars, 600);
	assert_eq!(cfg.limits.suggest_min_description_chars, 3);
	assert!(cfg.theme.default_languages.is_empty());
	assert!((cfg.providers.llm.suggest_temperature - 0.2).abs() < f32::EPSILON);
	assert_eq!(cfg.providers.llm.translate_max_tokens, 1_500);
}

#[test]
fn rejects_blank_api_key() {
	let payload = sample_with(|root| {
		llm_table(root).insert("api_key".to_string(), Value::String("  ".to_string()));
	});

	expect_validation(load_str(payload), "providers.llm.api_key");
}

#[test]
fn rejects_zero_timeout() {
	let payload = sample_with(|root| {
		llm_table(root).insert("timeout_ms".to_string(), Value::Integer(0));
	});

	expect_validation(load_str(payload), "timeout_ms");
}

#[test]
fn rejects_out_of_range_temperature() {
	let payload = sample_with(|root| {
		llm_table(root).insert("translate_temperature".to_string(), Value::Float(3.5));
	});

	expect_validation(load_str(payload), "translate_temperature");
}

#[test]
fn rejects_zero_batch_size() {
	let payload = sample_with(|root| {
		let limits = root
			.get_mut("limits")
			.and_then(Value::as_table_mut)
			.expect("Template config must include [limits].");

		limits.insert("translate_batch_max_terms".to_string(), Value::Integer(0));
	});

	expect_validation(load_str(payload), "translate_batch_max_terms");
}

#[test]
fn rejects_duplicate_default_languages() {
	let payload = sample_with(|root| {
		let theme = root
			.get_mut("theme")
			.and_then(Value::as_table_mut)
			.expect("Template config must include [theme].");

		theme.insert(
			"default_languages".to_string(),
			Value::Array(vec![Value::String("en".to_string()), Value::String("EN".to_string())]),
		);
	});

	expect_validation(load_str(payload), "duplicate");
}

#[test]
fn reports_parse_errors_with_path() {
	let result = load_str("not = [valid".to_string());

	assert!(matches!(result, Err(Error::ParseConfig { .. })));
}

#[test]
fn missing_file_error_names_the_topiq_config_path() {
	let path = env::temp_dir().join("topiq_config_missing_for_read_error.toml");
	let err = topiq_config::load(&path).expect_err("Missing config must fail to load.");
	let rendered = err.to_string();

	assert!(matches!(err, Error::ReadConfig { .. }));
	assert!(rendered.starts_with("Cannot read topiq config"), "Unexpected message: {rendered}");
	assert!(rendered.contains("topiq_config_missing_for_read_error.toml"));
}

#[test]
fn validation_errors_render_with_the_topiq_prefix() {
	let payload = sample_with(|root| {
		llm_table(root).insert("api_key".to_string(), Value::String(String::new()));
	});
	let err = load_str(payload).expect_err("Blank api key must be rejected.");

	assert_eq!(err.to_string(), "Invalid topiq config: providers.llm.api_key must be non-empty.");
}
