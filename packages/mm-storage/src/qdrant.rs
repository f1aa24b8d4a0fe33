use std::time::Duration;

use qdrant_client::{
	Qdrant,
	qdrant::{Condition, Filter, GetPointsBuilder, PointId, Query, QueryPointsBuilder},
};
use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

use mm_domain::{
	plan::SimilarityQuery,
	scoring::{SIMILARITY_SHIFT, ScoredId},
};

use crate::{Error, Result, payload};

/// Namespace for point ids derived from caller-facing candidate ids.
pub const POINT_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6d2f_1c0e_7b1a_5c43_9e58_0a3f_4d71_b2c9);

pub struct QdrantStore {
	pub client: Qdrant,
	pub collection: String,
	pub vector_dim: u32,
	pub id_field: String,
	pub population_field: String,
}
impl QdrantStore {
	pub fn new(cfg: &mm_config::Qdrant) -> Result<Self> {
		let client = Qdrant::from_url(&cfg.url)
			.api_key(cfg.api_key.clone())
			.timeout(Duration::from_millis(cfg.timeout_ms))
			.build()?;

		Ok(Self {
			client,
			collection: cfg.collection.clone(),
			vector_dim: cfg.vector_dim,
			id_field: cfg.id_field.clone(),
			population_field: cfg.population_field.clone(),
		})
	}

	/// Top-k nearest neighbours on one named vector, best first.
	///
	/// Scores are shifted by [`SIMILARITY_SHIFT`] so that they land in `[0, 2]`.
	pub async fn search(&self, query: &SimilarityQuery) -> Result<Vec<ScoredId>> {
		if query.vector.len() != self.vector_dim as usize {
			return Err(Error::InvalidArgument(format!(
				"Query vector has {} dimensions, collection expects {}.",
				query.vector.len(),
				self.vector_dim
			)));
		}

		let filter = Filter::must([Condition::matches(
			self.population_field.as_str(),
			query.populations.clone(),
		)]);
		let request = QueryPointsBuilder::new(self.collection.clone())
			.query(Query::new_nearest(query.vector.clone()))
			.using(query.field.as_str())
			.filter(filter)
			.limit(u64::from(query.k))
			.with_payload(true);
		let response = self.client.query(request).await?;
		let mut hits = Vec::with_capacity(response.result.len());

		for point in response.result {
			let id = payload::payload_string(&point.payload, &self.id_field)
				.or_else(|| point.id.as_ref().and_then(payload::point_id_to_string));
			let Some(id) = id else {
				tracing::warn!(
					collection = %self.collection,
					"Search hit without an id. Skipping."
				);

				continue;
			};

			hits.push(ScoredId::new(id, f64::from(point.score) + SIMILARITY_SHIFT));
		}

		Ok(hits)
	}

	/// Payload of the point stored for `id`, or `None` when it does not exist.
	pub async fn get(&self, id: &str) -> Result<Option<Map<String, JsonValue>>> {
		let request = GetPointsBuilder::new(self.collection.clone(), vec![point_id(id)])
			.with_payload(true)
			.with_vectors(false);
		let response = self.client.get_points(request).await?;

		Ok(response.result.into_iter().next().map(|point| payload::payload_to_json(point.payload)))
	}
}

pub fn point_id_for(id: &str) -> Uuid {
	Uuid::new_v5(&POINT_ID_NAMESPACE, id.as_bytes())
}

/// Point id for a candidate id.
///
/// Ids that already are point ids (a UUID or an unsigned integer) map to themselves, so ids read
/// back from a hit without an id payload resolve to the same point. Anything else is hashed with
/// [`point_id_for`].
pub fn point_id(id: &str) -> PointId {
	if let Ok(uuid) = Uuid::parse_str(id) {
		return PointId::from(uuid.to_string());
	}
	if let Ok(num) = id.parse::<u64>() {
		return PointId::from(num);
	}

	PointId::from(point_id_for(id).to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn point_ids_are_stable_per_candidate() {
		assert_eq!(point_id_for("u-1"), point_id_for("u-1"));
		assert_ne!(point_id_for("u-1"), point_id_for("u-2"));
		assert_eq!(point_id_for("u-1").get_version_num(), 5);
	}

	#[test]
	fn point_id_uses_uuid_form() {
		let expected = point_id_for("mentor-42").to_string();

		assert_eq!(payload::point_id_to_string(&point_id("mentor-42")), Some(expected));
	}

	#[test]
	fn fallback_ids_resolve_to_the_point_they_came_from() {
		let uuid = PointId::from("0b6c4bb0-5f44-4f0f-a0d7-8a5b7c6c1a11".to_string());
		let num = PointId::from(9_u64);

		for original in [uuid, num] {
			let id = payload::point_id_to_string(&original).expect("Point id has a value.");

			assert_eq!(point_id(&id), original);
		}
	}

	fn store_config() -> mm_config::Qdrant {
		mm_config::Qdrant {
			url: "http://127.0.0.1:6334".to_string(),
			api_key: None,
			collection: "profiles".to_string(),
			vector_dim: 3,
			timeout_ms: 250,
			id_field: "user_id".to_string(),
			population_field: "user_type".to_string(),
			topic_field: "topic".to_string(),
			vector_fields: vec!["academic_vec".to_string()],
		}
	}

	#[tokio::test]
	async fn rejects_vectors_of_the_wrong_dimension() {
		let store = QdrantStore::new(&store_config()).expect("Failed to build store.");
		let query = SimilarityQuery {
			field: "academic_vec".to_string(),
			vector: vec![0.1, 0.2],
			k: 3,
			populations: vec!["mentor".to_string()],
		};

		assert!(matches!(store.search(&query).await, Err(Error::InvalidArgument(_))));
	}
}
