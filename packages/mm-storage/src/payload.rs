use std::collections::HashMap;

use qdrant_client::qdrant::{PointId, Value, point_id::PointIdOptions, value::Kind};
use serde_json::{Map, Number, Value as JsonValue};

pub fn payload_to_json(payload: HashMap<String, Value>) -> Map<String, JsonValue> {
	payload.into_iter().map(|(key, value)| (key, value_to_json(value))).collect()
}

pub fn value_to_json(value: Value) -> JsonValue {
	match value.kind {
		None | Some(Kind::NullValue(_)) => JsonValue::Null,
		Some(Kind::BoolValue(flag)) => JsonValue::Bool(flag),
		Some(Kind::IntegerValue(number)) => JsonValue::from(number),
		Some(Kind::DoubleValue(number)) =>
			Number::from_f64(number).map(JsonValue::Number).unwrap_or(JsonValue::Null),
		Some(Kind::StringValue(text)) => JsonValue::String(text),
		Some(Kind::ListValue(list)) =>
			JsonValue::Array(list.values.into_iter().map(value_to_json).collect()),
		Some(Kind::StructValue(object)) => JsonValue::Object(
			object.fields.into_iter().map(|(key, value)| (key, value_to_json(value))).collect(),
		),
	}
}

pub fn payload_string(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
	match &payload.get(key)?.kind {
		Some(Kind::StringValue(text)) => Some(text.clone()),
		Some(Kind::IntegerValue(number)) => Some(number.to_string()),
		_ => None,
	}
}

pub fn point_id_to_string(point_id: &PointId) -> Option<String> {
	match &point_id.point_id_options {
		Some(PointIdOptions::Uuid(id)) => Some(id.clone()),
		Some(PointIdOptions::Num(id)) => Some(id.to_string()),
		None => None,
	}
}

#[cfg(test)]
mod tests {
	use qdrant_client::qdrant::{ListValue, Struct};

	use super::*;

	#[test]
	fn converts_nested_payload_values() {
		let nested = Value {
			kind: Some(Kind::StructValue(Struct {
				fields: HashMap::from([("years".to_string(), Value::from(7_i64))]),
			})),
		};
		let skills = Value {
			kind: Some(Kind::ListValue(ListValue {
				values: vec![Value::from("rust".to_string()), Value::from("sql".to_string())],
			})),
		};
		let payload = HashMap::from([
			("name".to_string(), Value::from("Ada".to_string())),
			("active".to_string(), Value::from(true)),
			("rating".to_string(), Value::from(4.5_f64)),
			("skills".to_string(), skills),
			("experience".to_string(), nested),
			("missing".to_string(), Value { kind: None }),
		]);
		let json = JsonValue::Object(payload_to_json(payload));

		assert_eq!(
			json,
			serde_json::json!({
				"name": "Ada",
				"active": true,
				"rating": 4.5,
				"skills": ["rust", "sql"],
				"experience": { "years": 7 },
				"missing": null
			})
		);
	}

	#[test]
	fn reads_string_and_integer_ids() {
		let payload = HashMap::from([
			("user_id".to_string(), Value::from("u-1".to_string())),
			("legacy_id".to_string(), Value::from(42_i64)),
			("flag".to_string(), Value::from(false)),
		]);

		assert_eq!(payload_string(&payload, "user_id").as_deref(), Some("u-1"));
		assert_eq!(payload_string(&payload, "legacy_id").as_deref(), Some("42"));
		assert_eq!(payload_string(&payload, "flag"), None);
		assert_eq!(payload_string(&payload, "absent"), None);
	}

	#[test]
	fn formats_point_ids() {
		assert_eq!(point_id_to_string(&PointId::from(9_u64)).as_deref(), Some("9"));
		assert_eq!(
			point_id_to_string(&PointId::from("0b6c4bb0-5f44-4f0f-a0d7-8a5b7c6c1a11".to_string()))
				.as_deref(),
			Some("0b6c4bb0-5f44-4f0f-a0d7-8a5b7c6c1a11")
		);
	}
}
