pub mod embedding;

mod error;

pub use error::{Error, Result};

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName};
use serde_json::{Map, Value};

pub fn auth_headers(api_key: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: format!("Default header {key:?} must be a string."),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn builds_bearer_and_default_headers() {
		let mut defaults = Map::new();

		defaults.insert("x-tenant".to_string(), Value::String("acme".to_string()));

		let headers = auth_headers("secret", &defaults).expect("Expected headers.");

		assert_eq!(headers[AUTHORIZATION], "Bearer secret");
		assert_eq!(headers["x-tenant"], "acme");
	}

	#[test]
	fn rejects_non_string_default_header() {
		let mut defaults = Map::new();

		defaults.insert("x-retries".to_string(), Value::from(3));

		assert!(matches!(auth_headers("secret", &defaults), Err(Error::InvalidConfig { .. })));
	}
}
