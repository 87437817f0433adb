pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
}
impl From<topiq_providers::Error> for Error {
	fn from(err: topiq_providers::Error) -> Self {
		match err {
			topiq_providers::Error::InvalidRequest { message } => Self::InvalidRequest { message },
			other => Self::Provider { message: other.to_string() },
		}
	}
}
