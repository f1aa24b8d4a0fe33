mod config;
mod embedder;
mod error;
mod index;
mod qdrant;

pub use config::{
	ACADEMIC_FIELD, PROFESSIONAL_FIELD, TEST_VECTOR_DIM, TOPIC_FIELD, match_use_case,
	match_with_peer_fallback, recommend_use_case, test_config,
};
pub use embedder::StubEmbedder;
pub use error::{Error, Result};
pub use index::{Candidate, InMemoryIndex, RecordedSearch};
pub use qdrant::{TestCollection, env_qdrant_url};
