//! Renewal envelope validation and `data` flattening.
//!
//! The renew endpoint answers with a JSON envelope such as
//! `{"lease_id": "...", "renewable": true, "lease_duration": 60, "data": {...}}`.
//! [`decode_renewal`] enforces the status and MIME contract, then flattens `data` into a
//! `String → String` map: null members are dropped, strings pass through verbatim, and every
//! other JSON value is rendered as canonical JSON text.

// crates.io
use serde_json::{Map, Value};
// self
use crate::{
	_prelude::*,
	error::{BodyError, ResponseError},
	http::RawResponse,
};

/// The only status accepted by the decoder.
pub const EXPECTED_STATUS: u16 = 200;
/// The only MIME type accepted by the decoder.
pub const EXPECTED_CONTENT_TYPE: &str = "application/json";

/// Decoded renewal envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenewalEnvelope {
	/// HTTP status of the response.
	pub status: u16,
	/// Lease identifier echoed by the server, if any.
	pub lease_id: Option<String>,
	/// Remaining lease duration in seconds, if reported.
	pub lease_duration: Option<u64>,
	/// Whether the lease may be renewed again, if reported.
	pub renewable: Option<bool>,
	/// Flattened `data` members.
	pub data: HashMap<String, String>,
}

#[derive(Deserialize)]
struct WireEnvelope {
	#[serde(default)]
	lease_id: Option<String>,
	#[serde(default)]
	lease_duration: Option<u64>,
	#[serde(default)]
	renewable: Option<bool>,
	#[serde(default)]
	data: Option<Map<String, Value>>,
}

/// Validates `response` and extracts the renewal envelope.
pub fn decode_renewal(response: &RawResponse) -> Result<RenewalEnvelope, ResponseError> {
	if response.status != EXPECTED_STATUS {
		return Err(ResponseError::UnexpectedStatus { status: response.status });
	}

	let content_type = response.content_type.as_deref().unwrap_or("null");

	if content_type != EXPECTED_CONTENT_TYPE {
		return Err(ResponseError::UnexpectedContentType { content_type: content_type.into() });
	}

	let text = std::str::from_utf8(&response.body).map_err(BodyError::from)?;
	let document = serde_json::from_str::<Value>(text).map_err(BodyError::from)?;

	if !document.is_object() {
		return Err(BodyError::NotAnObject { found: json_type(&document) }.into());
	}

	let wire: WireEnvelope = serde_path_to_error::deserialize(document).map_err(BodyError::from)?;

	Ok(RenewalEnvelope {
		status: response.status,
		lease_id: wire.lease_id,
		lease_duration: wire.lease_duration,
		renewable: wire.renewable,
		data: wire.data.map(flatten_data).unwrap_or_default(),
	})
}

fn flatten_data(members: Map<String, Value>) -> HashMap<String, String> {
	members
		.into_iter()
		.filter_map(|(key, value)| match value {
			Value::Null => None,
			Value::String(s) => Some((key, s)),
			other => Some((key, other.to_string())),
		})
		.collect()
}

fn json_type(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}
