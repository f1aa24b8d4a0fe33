mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, EmbeddingProviderConfig, Providers, Qdrant, Service, Signal, SignalInput, Storage,
	Strategy, UseCase, UseCaseLabels, UseCases,
};

use std::{fs, path::Path};

/// Allowed drift of a weight table sum away from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.qdrant.collection.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.qdrant.collection must be non-empty.".to_string(),
		});
	}
	if cfg.storage.qdrant.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "storage.qdrant.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.storage.qdrant.vector_fields.is_empty() {
		return Err(Error::Validation {
			message: "storage.qdrant.vector_fields must be non-empty.".to_string(),
		});
	}

	for (label, value) in [
		("storage.qdrant.id_field", &cfg.storage.qdrant.id_field),
		("storage.qdrant.population_field", &cfg.storage.qdrant.population_field),
		("storage.qdrant.topic_field", &cfg.storage.qdrant.topic_field),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match storage.qdrant.vector_dim."
				.to_string(),
		});
	}
	if cfg.providers.embedding.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.api_key.trim().is_empty() {
		return Err(Error::Validation {
			message: "Provider embedding api_key must be non-empty.".to_string(),
		});
	}

	validate_use_case("use_cases.match", &cfg.use_cases.matching, &cfg.storage.qdrant)?;
	validate_use_case("use_cases.recommend", &cfg.use_cases.recommend, &cfg.storage.qdrant)?;

	Ok(())
}

fn validate_use_case(label: &str, use_case: &UseCase, qdrant: &Qdrant) -> Result<()> {
	if use_case.default_top_k == 0 {
		return Err(Error::Validation {
			message: format!("{label}.default_top_k must be greater than zero."),
		});
	}
	if use_case.max_top_k < use_case.default_top_k {
		return Err(Error::Validation {
			message: format!("{label}.max_top_k must be at least {label}.default_top_k."),
		});
	}
	if use_case.primary.is_empty() {
		return Err(Error::Validation { message: format!("{label}.primary must be non-empty.") });
	}
	if use_case.primary.iter().chain(&use_case.secondary).any(|population| population.is_empty()) {
		return Err(Error::Validation {
			message: format!("{label} population labels must be non-empty."),
		});
	}

	match use_case.strategy {
		Strategy::None =>
			if !use_case.secondary.is_empty() {
				return Err(Error::Validation {
					message: format!("{label}.secondary must be empty when strategy is none."),
				});
			},
		Strategy::Backfill | Strategy::Fallback => {
			if use_case.secondary.is_empty() {
				return Err(Error::Validation {
					message: format!(
						"{label}.secondary must be non-empty when strategy is backfill or fallback."
					),
				});
			}
			if use_case.primary.iter().any(|population| use_case.secondary.contains(population)) {
				return Err(Error::Validation {
					message: format!("{label}.primary and {label}.secondary must not overlap."),
				});
			}
		},
	}

	if use_case.strategy == Strategy::Fallback
		&& (use_case.labels.secondary.is_none() || use_case.labels.secondary_search_type.is_none())
	{
		return Err(Error::Validation {
			message: format!(
				"{label}.labels.secondary and {label}.labels.secondary_search_type are required when strategy is fallback."
			),
		});
	}

	validate_signals(label, &use_case.signals, qdrant)
}

fn validate_signals(label: &str, signals: &[Signal], qdrant: &Qdrant) -> Result<()> {
	if signals.is_empty() {
		return Err(Error::Validation { message: format!("{label}.signals must be non-empty.") });
	}

	let mut sum = 0.0;

	for signal in signals {
		if !qdrant.vector_fields.contains(&signal.field) {
			return Err(Error::Validation {
				message: format!(
					"{label}.signals.field {:?} is not one of storage.qdrant.vector_fields.",
					signal.field
				),
			});
		}
		if !signal.weight.is_finite() {
			return Err(Error::Validation {
				message: format!("{label}.signals.weight must be a finite number."),
			});
		}
		if !(0.0..=1.0).contains(&signal.weight) {
			return Err(Error::Validation {
				message: format!("{label}.signals.weight must be in the range 0.0-1.0."),
			});
		}

		sum += signal.weight;
	}

	if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
		return Err(Error::Validation {
			message: format!("{label}.signals weights must sum to 1.0, got {sum}."),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.storage.qdrant.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
		cfg.storage.qdrant.api_key = None;
	}

	for use_case in [&mut cfg.use_cases.matching, &mut cfg.use_cases.recommend] {
		for population in use_case.primary.iter_mut().chain(use_case.secondary.iter_mut()) {
			*population = population.trim().to_string();
		}

		if use_case.labels.secondary.as_deref().map(|text| text.trim().is_empty()).unwrap_or(false)
		{
			use_case.labels.secondary = None;
		}
		if use_case
			.labels
			.secondary_search_type
			.as_deref()
			.map(|text| text.trim().is_empty())
			.unwrap_or(false)
		{
			use_case.labels.secondary_search_type = None;
		}
	}

	let api_base = cfg.providers.embedding.api_base.trim_end_matches('/').to_string();

	cfg.providers.embedding.api_base = api_base;
}
