use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	pub use_cases: UseCases,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub qdrant: Qdrant,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Qdrant {
	pub url: String,
	#[serde(default)]
	pub api_key: Option<String>,
	pub collection: String,
	pub vector_dim: u32,
	/// Applied to every search and point lookup independently.
	pub timeout_ms: u64,
	/// Payload attribute that carries the caller-facing candidate id.
	#[serde(default = "default_id_field")]
	pub id_field: String,
	/// Payload attribute that carries the population label.
	#[serde(default = "default_population_field")]
	pub population_field: String,
	/// Profile attribute holding the stored topic of an identity.
	#[serde(default = "default_topic_field")]
	pub topic_field: String,
	/// Named vectors that exist in the collection. Never exposed in responses.
	#[serde(default = "default_vector_fields")]
	pub vector_fields: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UseCases {
	#[serde(rename = "match")]
	pub matching: UseCase,
	pub recommend: UseCase,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UseCase {
	pub default_top_k: u32,
	pub max_top_k: u32,
	pub primary: Vec<String>,
	#[serde(default)]
	pub secondary: Vec<String>,
	#[serde(default)]
	pub strategy: Strategy,
	pub labels: UseCaseLabels,
	pub signals: Vec<Signal>,
}

/// What happens when the primary population cannot fill `top_k`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
	/// Primary population only.
	#[default]
	None,
	/// Fill the remaining slots from the secondary population, appended after the primary results.
	Backfill,
	/// Rank the secondary population instead, but only when the primary yields nothing.
	Fallback,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UseCaseLabels {
	pub primary_search_type: String,
	#[serde(default)]
	pub secondary_search_type: Option<String>,
	pub found: String,
	pub empty: String,
	#[serde(default)]
	pub secondary: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Signal {
	pub field: String,
	pub input: SignalInput,
	pub weight: f64,
}

/// Request text a signal embeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalInput {
	Academic,
	Professional,
	Topic,
	/// `professional + " " + topic`, embedded as one string.
	ProfessionalTopic,
}

fn default_id_field() -> String {
	"user_id".to_string()
}

fn default_population_field() -> String {
	"user_type".to_string()
}

fn default_topic_field() -> String {
	"topic".to_string()
}

fn default_vector_fields() -> Vec<String> {
	["academic_vec", "professional_vec", "mentorship_topic_vec"]
		.into_iter()
		.map(str::to_string)
		.collect()
}
