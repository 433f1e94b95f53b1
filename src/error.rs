//! Error types shared across the encoder, decoder, transport, and renewal executor.

// self
use crate::{_prelude::*, increment::TimeUnit};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Increment used a unit the wire protocol cannot express.
	#[error(transparent)]
	UnsupportedUnit(#[from] UnsupportedUnit),

	/// Every permitted attempt failed; wraps the failure of the final attempt.
	#[error("Lease renewal failed after {attempts} attempt(s).")]
	RetriesExhausted {
		/// Total attempts consumed, including the initial one.
		attempts: u32,
		/// Failure observed on the last attempt.
		#[source]
		source: AttemptError,
	},
}
impl Error {
	/// Returns the last per-attempt failure when retries were exhausted.
	pub fn last_attempt_error(&self) -> Option<&AttemptError> {
		match self {
			Self::RetriesExhausted { source, .. } => Some(source),
			_ => None,
		}
	}
}

/// Configuration and validation failures raised while building clients.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Server address cannot be parsed.
	#[error("Vault address `{address}` is invalid.")]
	InvalidAddress {
		/// Address as supplied.
		address: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Lease identifier does not form a valid request target.
	#[error("Lease id `{lease_id}` does not form a valid renew URL: {reason}.")]
	InvalidLeaseId {
		/// Lease identifier as supplied.
		lease_id: String,
		/// Why the identifier was rejected.
		reason: &'static str,
	},
	/// Token contains bytes that are not allowed in an HTTP header.
	#[error("Vault token is not a valid header value.")]
	InvalidToken(#[from] http::header::InvalidHeaderValue),
	/// A required setting was not supplied.
	#[error("Missing required setting `{name}`.")]
	Missing {
		/// Setting name.
		name: &'static str,
	},
	/// A setting was supplied but could not be parsed.
	#[error("Setting `{name}` has invalid value `{value}`.")]
	InvalidValue {
		/// Setting name.
		name: &'static str,
		/// Raw value as supplied.
		value: String,
	},
	/// PEM file could not be read.
	#[error("Unable to read PEM file `{path}`.")]
	PemRead {
		/// Path that failed to load.
		path: String,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Raised when an increment uses a unit without a wire code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ThisError)]
#[error("Invalid time unit: {unit}.")]
pub struct UnsupportedUnit {
	/// Offending unit.
	pub unit: TimeUnit,
}

/// Failure of a single renew attempt; the retry loop classifies these.
#[derive(Debug, ThisError)]
pub enum AttemptError {
	/// Request never produced a response.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response violated the renewal envelope contract.
	#[error(transparent)]
	Response(#[from] ResponseError),
}
impl AttemptError {
	/// Returns the HTTP status when the failure came from a non-200 response.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Response(ResponseError::UnexpectedStatus { status }) => Some(*status),
			_ => None,
		}
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the renew endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the renew endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Response envelope contract violations.
#[derive(Debug, ThisError)]
pub enum ResponseError {
	/// Status code other than 200.
	#[error("Vault responded with HTTP status code: {status}.")]
	UnexpectedStatus {
		/// Status code returned.
		status: u16,
	},
	/// MIME type other than `application/json`.
	#[error("Vault responded with MIME type: {content_type}.")]
	UnexpectedContentType {
		/// Reported MIME type, or `null` when absent.
		content_type: String,
	},
	/// Body could not be decoded into a renewal envelope.
	#[error("Vault responded with a malformed body.")]
	MalformedBody {
		/// Decoding failure.
		#[source]
		source: BodyError,
	},
}
impl From<BodyError> for ResponseError {
	fn from(source: BodyError) -> Self {
		Self::MalformedBody { source }
	}
}

/// Reasons a response body is rejected.
#[derive(Debug, ThisError)]
pub enum BodyError {
	/// Body is not UTF-8 text.
	#[error("Body is not valid UTF-8.")]
	Utf8(#[from] std::str::Utf8Error),
	/// Body is not JSON.
	#[error("Body is not valid JSON.")]
	Json(#[from] serde_json::Error),
	/// Body parsed, but the top-level value is not an object.
	#[error("Body is a JSON {found}, expected an object.")]
	NotAnObject {
		/// JSON type that was found instead.
		found: &'static str,
	},
	/// A known envelope field has the wrong type.
	#[error("Envelope field has an unexpected shape.")]
	Envelope(#[from] serde_path_to_error::Error<serde_json::Error>),
}
