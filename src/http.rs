//! Transport primitives for renew calls.
//!
//! The module exposes [`LeaseHttpClient`] alongside the wire-level [`LeaseRequest`] and
//! [`RawResponse`] types so downstream crates can plug in custom HTTP stacks (or scripted
//! fakes in tests) without touching the retry loop. The default [`ReqwestHttpClient`] is
//! built from a [`VaultConfig`] and carries its timeouts and TLS material.

// crates.io
use http::{HeaderMap, Method};
// self
use crate::{_prelude::*, error::TransportError};
#[cfg(feature = "reqwest")] use crate::{config::VaultConfig, error::ConfigError};

/// Boxed future returned by [`LeaseHttpClient::dispatch`].
pub type DispatchFuture<'a> =
	Pin<Box<dyn Future<Output = Result<RawResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing renew requests.
///
/// The trait is the executor's only dependency on an HTTP stack. Implementations must be
/// `Send + Sync + 'static` so one transport can be shared across renewers and concurrent
/// calls, and must report the response as-is: status, content type, and body are judged by
/// the decoder, never by the transport.
pub trait LeaseHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and returns the raw response.
	fn dispatch(&self, request: LeaseRequest) -> DispatchFuture<'_>;
}

/// Fully built renew request.
#[derive(Clone, Debug)]
pub struct LeaseRequest {
	/// HTTP method (always `PUT` for renewals).
	pub method: Method,
	/// Absolute request target.
	pub url: Url,
	/// Request headers; the token header is marked sensitive.
	pub headers: HeaderMap,
	/// Optional JSON body.
	pub body: Option<Vec<u8>>,
}

/// Response as observed on the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawResponse {
	/// HTTP status code.
	pub status: u16,
	/// MIME type without parameters, if the server sent one.
	pub content_type: Option<String>,
	/// Raw body bytes.
	pub body: Vec<u8>,
}
impl RawResponse {
	/// Creates a response from its parts.
	pub fn new(status: u16, content_type: Option<String>, body: Vec<u8>) -> Self {
		Self { status, content_type, body }
	}
}

/// Strips parameters (`; charset=utf-8`) from a `Content-Type` value.
pub fn mime_essence(raw: &str) -> &str {
	raw.split(';').next().unwrap_or_default().trim()
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
/// Renew requests do not follow redirects, since the renew endpoint answers directly.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client honoring the configured timeouts and TLS material.
	pub fn from_config(config: &VaultConfig) -> Result<Self, ConfigError> {
		let mut builder = ReqwestClient::builder().redirect(reqwest::redirect::Policy::none());

		if let Some(timeout) = config.open_timeout {
			builder = builder.connect_timeout(timeout);
		}
		if let Some(timeout) = config.read_timeout {
			builder = builder.read_timeout(timeout);
		}
		if let Some(pem) = config.tls.pem_utf8.as_deref() {
			builder = builder.add_root_certificate(reqwest::Certificate::from_pem(pem.as_bytes())?);
		}
		if !config.tls.verify {
			builder = builder.danger_accept_invalid_certs(true);
		}

		Ok(Self(builder.build()?))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl LeaseHttpClient for ReqwestHttpClient {
	fn dispatch(&self, request: LeaseRequest) -> DispatchFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let mut builder = client.request(request.method, request.url).headers(request.headers);

			if let Some(body) = request.body {
				builder = builder.body(body);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let content_type = response
				.headers()
				.get(reqwest::header::CONTENT_TYPE)
				.and_then(|value| value.to_str().ok())
				.map(|value| mime_essence(value).to_owned());
			let body = response.bytes().await?.to_vec();

			Ok(RawResponse { status, content_type, body })
		})
	}
}
