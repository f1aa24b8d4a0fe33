use std::{
	collections::{HashMap, HashSet},
	sync::Mutex,
	time::Duration,
};

use serde_json::Value;

use mm_domain::{
	plan::SimilarityQuery,
	scoring::{self, SIMILARITY_SHIFT, ScoredId},
};
use mm_service::{BoxFuture, Error, Profile, Result, SimilarityIndex};

/// A stored profile with its population and named vectors.
#[derive(Clone, Debug)]
pub struct Candidate {
	pub id: String,
	pub population: String,
	pub vectors: HashMap<String, Vec<f32>>,
	pub profile: Profile,
}
impl Candidate {
	pub fn new(id: &str, population: &str) -> Self {
		let mut profile = Profile::new();

		profile.insert("user_id".to_string(), Value::String(id.to_string()));
		profile.insert("user_type".to_string(), Value::String(population.to_string()));

		Self {
			id: id.to_string(),
			population: population.to_string(),
			vectors: HashMap::new(),
			profile,
		}
	}

	pub fn vector(mut self, field: &str, vector: Vec<f32>) -> Self {
		self.vectors.insert(field.to_string(), vector);

		self
	}

	pub fn attr(mut self, key: &str, value: impl Into<Value>) -> Self {
		self.profile.insert(key.to_string(), value.into());

		self
	}
}

/// Search call seen by [`InMemoryIndex`].
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedSearch {
	pub field: String,
	pub k: u32,
	pub populations: Vec<String>,
}

/// In-process [`SimilarityIndex`] that also records every call made against it.
///
/// Hits come from scripted per-field scores when present, otherwise from cosine similarity over
/// the stored vectors. Stored records keep their vectors so that callers can prove they strip them.
#[derive(Default)]
pub struct InMemoryIndex {
	candidates: Vec<Candidate>,
	scripted: HashMap<String, HashMap<String, f64>>,
	failing_fields: HashSet<String>,
	failing_gets: HashSet<String>,
	search_delay: Option<Duration>,
	searches: Mutex<Vec<RecordedSearch>>,
	gets: Mutex<Vec<String>>,
}
impl InMemoryIndex {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_candidate(mut self, candidate: Candidate) -> Self {
		self.candidates.push(candidate);

		self
	}

	/// Fixes the raw scores `field` returns, overriding vector similarity for that field.
	pub fn with_scores(mut self, field: &str, scores: &[(&str, f64)]) -> Self {
		let table = self.scripted.entry(field.to_string()).or_default();

		for (id, score) in scores {
			table.insert((*id).to_string(), *score);
		}

		self
	}

	pub fn failing_search_on(mut self, field: &str) -> Self {
		self.failing_fields.insert(field.to_string());

		self
	}

	pub fn failing_get_for(mut self, id: &str) -> Self {
		self.failing_gets.insert(id.to_string());

		self
	}

	pub fn with_search_delay(mut self, delay: Duration) -> Self {
		self.search_delay = Some(delay);

		self
	}

	pub fn searches(&self) -> Vec<RecordedSearch> {
		self.searches.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	pub fn search_count(&self) -> usize {
		self.searches.lock().unwrap_or_else(|err| err.into_inner()).len()
	}

	pub fn gets(&self) -> Vec<String> {
		self.gets.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	fn hits(&self, query: &SimilarityQuery) -> Vec<ScoredId> {
		let scripted = self.scripted.get(&query.field);
		let mut hits: Vec<ScoredId> = self
			.candidates
			.iter()
			.filter(|candidate| query.populations.contains(&candidate.population))
			.filter_map(|candidate| {
				let score = match scripted {
					Some(table) => *table.get(&candidate.id)?,
					None => cosine(&query.vector, candidate.vectors.get(&query.field)?)
						+ SIMILARITY_SHIFT,
				};

				Some(ScoredId::new(candidate.id.clone(), score))
			})
			.collect();

		hits.sort_by(scoring::cmp_ranked);
		hits.truncate(query.k as usize);

		hits
	}
}
impl SimilarityIndex for InMemoryIndex {
	fn search<'a>(&'a self, query: &'a SimilarityQuery) -> BoxFuture<'a, Result<Vec<ScoredId>>> {
		self.searches.lock().unwrap_or_else(|err| err.into_inner()).push(RecordedSearch {
			field: query.field.clone(),
			k: query.k,
			populations: query.populations.clone(),
		});

		Box::pin(async move {
			if let Some(delay) = self.search_delay {
				tokio::time::sleep(delay).await;
			}
			if self.failing_fields.contains(&query.field) {
				return Err(Error::Index {
					message: format!("Search on {} is unavailable.", query.field),
				});
			}

			Ok(self.hits(query))
		})
	}

	fn get<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Option<Profile>>> {
		self.gets.lock().unwrap_or_else(|err| err.into_inner()).push(id.to_string());

		Box::pin(async move {
			if self.failing_gets.contains(id) {
				return Err(Error::Index { message: format!("Lookup of {id} failed.") });
			}

			Ok(self.candidates.iter().find(|candidate| candidate.id == id).map(|candidate| {
				let mut record = candidate.profile.clone();

				for (field, vector) in &candidate.vectors {
					record.insert(field.clone(), Value::from(vector.clone()));
				}

				record
			}))
		})
	}
}

fn cosine(a: &[f32], b: &[f32]) -> f64 {
	let dot: f64 = a.iter().zip(b).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum();
	let norm_a = a.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
	let norm_b = b.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();

	if norm_a == 0.0 || norm_b == 0.0 {
		return 0.0;
	}

	dot / (norm_a * norm_b)
}
