use std::{collections::HashMap, env, thread, time::Duration};

use qdrant_client::{
	Payload, Qdrant,
	qdrant::{
		CreateCollectionBuilder, Distance, PointStruct, UpsertPointsBuilder, Vector,
		VectorParamsBuilder, VectorsConfigBuilder,
	},
};
use tokio::{runtime::Builder, time};
use uuid::Uuid;

use crate::{Candidate, Error, Result};

pub fn env_qdrant_url() -> Option<String> {
	env::var("MM_QDRANT_URL").ok()
}

/// Throwaway Qdrant collection with one named cosine vector per field, deleted on cleanup or drop.
pub struct TestCollection {
	url: String,
	name: String,
	client: Qdrant,
	cleaned: bool,
}
impl TestCollection {
	pub async fn new(url: &str, vector_fields: &[String], vector_dim: u32) -> Result<Self> {
		let client = Qdrant::from_url(url)
			.build()
			.map_err(|err| Error::Message(format!("Failed to build Qdrant client: {err}.")))?;
		let name = format!("mm_test_{}", Uuid::new_v4().simple());
		let mut vectors_config = VectorsConfigBuilder::default();

		for field in vector_fields {
			vectors_config.add_named_vector_params(
				field.as_str(),
				VectorParamsBuilder::new(vector_dim.into(), Distance::Cosine),
			);
		}

		time::timeout(
			Duration::from_secs(10),
			client.create_collection(
				CreateCollectionBuilder::new(name.clone()).vectors_config(vectors_config),
			),
		)
		.await
		.map_err(|_| Error::Message("Qdrant create_collection timed out.".to_string()))??;

		Ok(Self { url: url.to_string(), name, client, cleaned: false })
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Stores candidates under the point ids the service resolves them by.
	pub async fn insert(&self, candidates: &[Candidate]) -> Result<()> {
		let mut points = Vec::with_capacity(candidates.len());

		for candidate in candidates {
			let vectors: HashMap<String, Vector> = candidate
				.vectors
				.iter()
				.map(|(field, vector)| (field.clone(), Vector::from(vector.clone())))
				.collect();
			let payload = Payload::from(candidate.profile.clone());

			points.push(PointStruct::new(
				mm_storage::qdrant::point_id(&candidate.id),
				vectors,
				payload,
			));
		}

		self.client
			.upsert_points(UpsertPointsBuilder::new(self.name.clone(), points).wait(true))
			.await?;

		Ok(())
	}

	pub async fn cleanup(mut self) -> Result<()> {
		self.client.delete_collection(self.name.clone()).await?;

		self.cleaned = true;

		Ok(())
	}
}
impl Drop for TestCollection {
	fn drop(&mut self) {
		if self.cleaned {
			return;
		}

		let url = self.url.clone();
		let name = self.name.clone();
		let cleanup_thread = thread::spawn(move || {
			let runtime = match Builder::new_current_thread().enable_all().build() {
				Ok(runtime) => runtime,
				Err(err) => {
					eprintln!("Test collection cleanup failed: {err}.");

					return;
				},
			};
			let result = runtime.block_on(async {
				let client = Qdrant::from_url(&url).build()?;

				client.delete_collection(name.clone()).await?;

				Ok::<_, Error>(())
			});

			if let Err(err) = result {
				eprintln!("Test collection cleanup failed for {name:?}: {err}.");
			}
		});
		let _ = cleanup_thread.join();
	}
}
