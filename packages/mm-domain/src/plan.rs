//! Construction of per-signal similarity queries.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
	#[error("Vector field {field:?} is not a known vector field.")]
	UnknownField { field: String },
	#[error("Query size k must be at least 1.")]
	ZeroK,
	#[error("Population filter must be non-empty.")]
	EmptyPopulations,
	#[error("Query vector must be non-empty.")]
	EmptyVector,
}

/// Nearest-neighbour request over one named vector field, restricted to a set of populations.
///
/// Scores returned for it are cosine similarity shifted into `[0, 2]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityQuery {
	pub field: String,
	pub vector: Vec<f32>,
	pub k: u32,
	pub populations: Vec<String>,
}

pub fn plan(
	known_fields: &[String],
	field: &str,
	vector: Vec<f32>,
	k: u32,
	populations: &[String],
) -> Result<SimilarityQuery, PlanError> {
	if !known_fields.iter().any(|known| known == field) {
		return Err(PlanError::UnknownField { field: field.to_string() });
	}
	if k == 0 {
		return Err(PlanError::ZeroK);
	}
	if populations.is_empty() {
		return Err(PlanError::EmptyPopulations);
	}
	if vector.is_empty() {
		return Err(PlanError::EmptyVector);
	}

	Ok(SimilarityQuery { field: field.to_string(), vector, k, populations: populations.to_vec() })
}
