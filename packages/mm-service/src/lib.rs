pub mod matching;
pub mod recommend;
pub mod request;

mod error;
mod materialize;
mod pipeline;

pub use error::{Error, Result};
pub use matching::MatchResponse;
pub use recommend::RecommendResponse;
pub use request::MatchRequest;

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use serde_json::{Map, Value};

use mm_config::{Config, EmbeddingProviderConfig};
use mm_domain::{plan::SimilarityQuery, scoring::ScoredId};
use mm_providers::embedding;
use mm_storage::qdrant::QdrantStore;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Stored profile of one candidate, keyed by attribute name.
pub type Profile = Map<String, Value>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	/// One vector per text, in input order.
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>>;
}

pub trait SimilarityIndex
where
	Self: Send + Sync,
{
	/// Up to `query.k` hits, best first, scored in `[0, 2]`.
	fn search<'a>(&'a self, query: &'a SimilarityQuery) -> BoxFuture<'a, Result<Vec<ScoredId>>>;

	fn get<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Option<Profile>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
}
impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>) -> Self {
		Self { embedding }
	}
}
impl Default for Providers {
	fn default() -> Self {
		Self { embedding: Arc::new(DefaultProviders) }
	}
}

pub struct MatchService {
	pub cfg: Config,
	pub index: Arc<dyn SimilarityIndex>,
	pub providers: Providers,
}
impl MatchService {
	pub fn new(cfg: Config, index: Arc<dyn SimilarityIndex>) -> Self {
		Self { cfg, index, providers: Providers::default() }
	}

	pub fn with_providers(
		cfg: Config,
		index: Arc<dyn SimilarityIndex>,
		providers: Providers,
	) -> Self {
		Self { cfg, index, providers }
	}

	fn index_timeout(&self) -> Duration {
		Duration::from_millis(self.cfg.storage.qdrant.timeout_ms)
	}
}

struct DefaultProviders;
impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		Box::pin(async move {
			embedding::embed(cfg, texts).await.map_err(|err| {
				if err.is_timeout() {
					Error::Timeout { operation: "Embedding", timeout_ms: cfg.timeout_ms }
				} else {
					Error::from(err)
				}
			})
		})
	}
}

impl SimilarityIndex for QdrantStore {
	fn search<'a>(&'a self, query: &'a SimilarityQuery) -> BoxFuture<'a, Result<Vec<ScoredId>>> {
		Box::pin(async move { Ok(QdrantStore::search(self, query).await?) })
	}

	fn get<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Option<Profile>>> {
		Box::pin(async move { Ok(QdrantStore::get(self, id).await?) })
	}
}

/// Runs `fut` under `timeout`; running out of time is an error, never an empty result.
pub(crate) async fn with_deadline<F, T>(
	operation: &'static str,
	timeout: Duration,
	fut: F,
) -> Result<T>
where
	F: Future<Output = Result<T>>,
{
	match tokio::time::timeout(timeout, fut).await {
		Ok(result) => result,
		Err(_) => Err(Error::Timeout {
			operation,
			timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
		}),
	}
}
