use serde_json::Map;

use mm_config::{
	Config, EmbeddingProviderConfig, Providers, Qdrant, Service, Signal, SignalInput, Storage,
	Strategy, UseCase, UseCaseLabels, UseCases,
};

pub const TEST_VECTOR_DIM: u32 = 3;

pub const ACADEMIC_FIELD: &str = "academic_vec";
pub const PROFESSIONAL_FIELD: &str = "professional_vec";
pub const TOPIC_FIELD: &str = "mentorship_topic_vec";

/// Valid configuration with the stock `match` and `recommend` use cases over 3-d vectors.
pub fn test_config() -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		storage: Storage {
			qdrant: Qdrant {
				url: "http://127.0.0.1:6334".to_string(),
				api_key: None,
				collection: "profiles_test".to_string(),
				vector_dim: TEST_VECTOR_DIM,
				timeout_ms: 1_000,
				id_field: "user_id".to_string(),
				population_field: "user_type".to_string(),
				topic_field: "topic".to_string(),
				vector_fields: [ACADEMIC_FIELD, PROFESSIONAL_FIELD, TOPIC_FIELD]
					.into_iter()
					.map(str::to_string)
					.collect(),
			},
		},
		providers: Providers {
			embedding: EmbeddingProviderConfig {
				provider_id: "stub".to_string(),
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/embeddings".to_string(),
				model: "stub-model".to_string(),
				dimensions: TEST_VECTOR_DIM,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
		},
		use_cases: UseCases { matching: match_use_case(), recommend: recommend_use_case() },
	}
}

pub fn match_use_case() -> UseCase {
	UseCase {
		default_top_k: 5,
		max_top_k: 50,
		primary: vec!["mentor".to_string()],
		secondary: Vec::new(),
		strategy: Strategy::None,
		labels: UseCaseLabels {
			primary_search_type: "mentors".to_string(),
			secondary_search_type: None,
			found: "Found mentors for you!".to_string(),
			empty: "No mentors found.".to_string(),
			secondary: None,
		},
		signals: vec![
			signal(ACADEMIC_FIELD, SignalInput::Academic, 0.2),
			signal(PROFESSIONAL_FIELD, SignalInput::Professional, 0.3),
			signal(TOPIC_FIELD, SignalInput::Topic, 0.5),
		],
	}
}

/// The `match` use case switched to fall back on peers when no mentor is found.
pub fn match_with_peer_fallback() -> UseCase {
	let mut use_case = match_use_case();

	use_case.secondary = vec!["mentee".to_string(), "normal_user".to_string()];
	use_case.strategy = Strategy::Fallback;
	use_case.labels.secondary_search_type = Some("peers".to_string());
	use_case.labels.secondary =
		Some("No mentors available, showing similar peers instead".to_string());

	use_case
}

pub fn recommend_use_case() -> UseCase {
	UseCase {
		default_top_k: 5,
		max_top_k: 50,
		primary: vec!["normal_user".to_string()],
		secondary: vec!["mentee".to_string()],
		strategy: Strategy::Backfill,
		labels: UseCaseLabels {
			primary_search_type: "normal_users".to_string(),
			secondary_search_type: None,
			found: "Normal_user first, then mentee recommendations".to_string(),
			empty: "No recommendations found.".to_string(),
			secondary: None,
		},
		signals: vec![
			signal(ACADEMIC_FIELD, SignalInput::Academic, 0.3),
			signal(PROFESSIONAL_FIELD, SignalInput::ProfessionalTopic, 0.7),
		],
	}
}

fn signal(field: &str, input: SignalInput, weight: f64) -> Signal {
	Signal { field: field.to_string(), input, weight }
}
