pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{message}")]
	InvalidRequest { message: String },
	#[error("{message}")]
	NotFound { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Index error: {message}")]
	Index { message: String },
	#[error("{operation} timed out after {timeout_ms} ms.")]
	Timeout { operation: &'static str, timeout_ms: u64 },
}
impl From<mm_providers::Error> for Error {
	fn from(err: mm_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

impl From<mm_storage::Error> for Error {
	fn from(err: mm_storage::Error) -> Self {
		match err {
			mm_storage::Error::InvalidArgument(message) => Self::Index { message },
			mm_storage::Error::Qdrant(inner) => Self::Index { message: inner.to_string() },
		}
	}
}

impl From<mm_domain::plan::PlanError> for Error {
	fn from(err: mm_domain::plan::PlanError) -> Self {
		Self::InvalidRequest { message: err.to_string() }
	}
}
