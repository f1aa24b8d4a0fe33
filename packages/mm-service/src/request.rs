use serde::{Deserialize, Serialize};

use mm_config::UseCase;

use crate::{Error, Result};

/// Body shared by `/match` and `/recommend`.
///
/// Required fields are optional here so that a missing one surfaces as a named validation error
/// instead of a generic decode failure.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MatchRequest {
	#[serde(default)]
	pub user_id: Option<String>,
	#[serde(default)]
	pub acad_string: Option<String>,
	#[serde(default)]
	pub prof_string: Option<String>,
	/// Falls back to the stored profile topic when absent.
	#[serde(default)]
	pub topic_string: Option<String>,
	#[serde(default)]
	pub top_k: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ValidatedRequest {
	pub(crate) user_id: String,
	pub(crate) academic: String,
	pub(crate) professional: String,
	pub(crate) topic: Option<String>,
	pub(crate) top_k: u32,
}

impl MatchRequest {
	pub(crate) fn validate(self, use_case: &UseCase) -> Result<ValidatedRequest> {
		let user_id = required("user_id", self.user_id)?;
		let academic = required("acad_string", self.acad_string)?;
		let professional = required("prof_string", self.prof_string)?;
		let topic = self.topic_string.filter(|topic| !topic.trim().is_empty());
		let top_k = self.top_k.unwrap_or(use_case.default_top_k);

		if top_k == 0 {
			return Err(Error::InvalidRequest {
				message: "top_k must be at least 1.".to_string(),
			});
		}
		if top_k > use_case.max_top_k {
			return Err(Error::InvalidRequest {
				message: format!("top_k must be at most {}.", use_case.max_top_k),
			});
		}

		Ok(ValidatedRequest {
			user_id: user_id.trim().to_string(),
			academic,
			professional,
			topic,
			top_k,
		})
	}
}

fn required(field: &str, value: Option<String>) -> Result<String> {
	match value {
		Some(value) if !value.trim().is_empty() => Ok(value),
		_ => Err(Error::InvalidRequest { message: format!("Missing required field: {field}") }),
	}
}

#[cfg(test)]
mod tests {
	use mm_config::{Signal, SignalInput, Strategy, UseCaseLabels};

	use super::*;

	fn use_case() -> UseCase {
		UseCase {
			default_top_k: 5,
			max_top_k: 20,
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
			signals: vec![Signal {
				field: "academic_vec".to_string(),
				input: SignalInput::Academic,
				weight: 1.0,
			}],
		}
	}

	fn request() -> MatchRequest {
		MatchRequest {
			user_id: Some("u-1".to_string()),
			acad_string: Some("MSc Computer Science".to_string()),
			prof_string: Some("Backend engineer".to_string()),
			topic_string: None,
			top_k: None,
		}
	}

	#[test]
	fn applies_default_top_k() {
		let validated = request().validate(&use_case()).expect("Expected a valid request.");

		assert_eq!(validated.top_k, 5);
		assert_eq!(validated.topic, None);
	}

	#[test]
	fn names_the_first_missing_field() {
		let req = MatchRequest { acad_string: None, prof_string: None, ..request() };
		let err = req.validate(&use_case()).expect_err("Expected a validation error.");

		assert_eq!(err.to_string(), "Missing required field: acad_string");
	}

	#[test]
	fn blank_fields_count_as_missing() {
		let req = MatchRequest { user_id: Some("  ".to_string()), ..request() };
		let err = req.validate(&use_case()).expect_err("Expected a validation error.");

		assert_eq!(err.to_string(), "Missing required field: user_id");
	}

	#[test]
	fn top_k_must_be_positive_and_bounded() {
		let zero = MatchRequest { top_k: Some(0), ..request() };
		let huge = MatchRequest { top_k: Some(21), ..request() };

		assert!(matches!(zero.validate(&use_case()), Err(Error::InvalidRequest { .. })));
		assert!(matches!(huge.validate(&use_case()), Err(Error::InvalidRequest { .. })));
	}

	#[test]
	fn blank_topic_defers_to_stored_profile() {
		let req = MatchRequest { topic_string: Some(" ".to_string()), ..request() };
		let validated = req.validate(&use_case()).expect("Expected a valid request.");

		assert_eq!(validated.topic, None);
	}
}
