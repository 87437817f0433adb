use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Cannot read topiq config {path:?}; pass an existing TOML file with --config: {source}.")]
	ReadConfig { path: PathBuf, source: std::io::Error },
	#[error("Topiq config {path:?} is not valid TOML: {source}")]
	ParseConfig { path: PathBuf, source: toml::de::Error },
	#[error("Invalid topiq config: {message}")]
	Validation { message: String },
}
