use std::{
	collections::HashMap,
	sync::{Arc, Mutex},
};

use mm_config::EmbeddingProviderConfig;
use mm_service::{BoxFuture, EmbeddingProvider, Error, Result};

/// Deterministic [`EmbeddingProvider`] backed by a text-to-vector table.
///
/// Unknown texts embed to a vector of ones sized to the configured dimensions. Every batch it
/// receives is kept for inspection.
#[derive(Clone, Default)]
pub struct StubEmbedder {
	table: HashMap<String, Vec<f32>>,
	failing: bool,
	batches: Arc<Mutex<Vec<Vec<String>>>>,
}
impl StubEmbedder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn failing() -> Self {
		Self { failing: true, ..Self::default() }
	}

	pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
		self.table.insert(text.to_string(), vector);

		self
	}

	pub fn batches(&self) -> Vec<Vec<String>> {
		self.batches.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}
}
impl EmbeddingProvider for StubEmbedder {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		self.batches.lock().unwrap_or_else(|err| err.into_inner()).push(texts.to_vec());

		Box::pin(async move {
			if self.failing {
				return Err(Error::Provider { message: "Embedding backend is down.".to_string() });
			}

			let dim = cfg.dimensions as usize;

			Ok(texts
				.iter()
				.map(|text| self.table.get(text).cloned().unwrap_or_else(|| vec![1.0; dim]))
				.collect())
		})
	}
}
