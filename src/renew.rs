//! Lease renewal with bounded fixed-delay retries.
//!
//! [`LeaseRenewer::renew_lease`] builds a `PUT /v1/sys/renew/{lease_id}` request, dispatches
//! it through a [`LeaseHttpClient`], and decodes the envelope. Any failure (transport error,
//! non-200 status, wrong MIME type, malformed body) is offered to the configured
//! [`RetryPredicate`]; while the predicate agrees and retries remain, the renewer sleeps for
//! the policy interval and tries again. Only the terminal outcome reaches the caller.
//!
//! Each call owns its attempt counter, so one renewer may serve any number of concurrent
//! callers. Dropping the returned future cancels the call at its next await point (dispatch
//! or sleep).

mod metrics;

pub use metrics::RenewMetrics;

// crates.io
use http::{HeaderMap, HeaderName, HeaderValue, Method, header::CONTENT_TYPE};
// self
use crate::{
	_prelude::*,
	config::VaultConfig,
	decode::{self, RenewalEnvelope},
	error::{AttemptError, UnsupportedUnit},
	http::{LeaseHttpClient, LeaseRequest},
	increment::Increment,
	obs::{self, RenewOutcome, RenewSpan},
	retry::{RetryAll, RetryPredicate},
};
#[cfg(feature = "reqwest")] use crate::{error::ConfigError, http::ReqwestHttpClient};

/// Header carrying the Vault token.
pub const TOKEN_HEADER: &str = "x-vault-token";

#[cfg(feature = "reqwest")]
/// Renewer specialized for the crate's default reqwest transport.
pub type ReqwestLeaseRenewer = LeaseRenewer<ReqwestHttpClient>;

/// Normalized outcome of a successful renewal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenewalResult {
	/// HTTP status of the successful response.
	pub status: u16,
	/// Failed attempts that preceded the successful one.
	pub retries: u32,
	/// Lease identifier reported by the server, or the requested one when omitted.
	pub lease_id: String,
	/// Remaining lease duration in seconds, if reported.
	pub lease_duration: Option<u64>,
	/// Whether the lease may be renewed again, if reported.
	pub renewable: Option<bool>,
	/// Flattened `data` members of the envelope.
	pub data: HashMap<String, String>,
}
impl RenewalResult {
	fn from_envelope(envelope: RenewalEnvelope, requested: &str, retries: u32) -> Self {
		let lease_id = envelope
			.lease_id
			.filter(|id| !id.is_empty())
			.unwrap_or_else(|| requested.to_owned());

		Self {
			status: envelope.status,
			retries,
			lease_id,
			lease_duration: envelope.lease_duration,
			renewable: envelope.renewable,
			data: envelope.data,
		}
	}
}

/// Issues renew calls against a single Vault server.
///
/// The renewer owns shared handles to an immutable [`VaultConfig`], the transport, and the
/// retry predicate; cloning it is cheap and clones share [`RenewMetrics`].
///
/// The pause between attempts uses [`tokio::time::sleep`], so renew futures must be polled
/// inside a Tokio runtime with the time driver enabled, even when `C` is not reqwest-based.
/// Polling them on another executor panics at the first retry.
pub struct LeaseRenewer<C>
where
	C: ?Sized + LeaseHttpClient,
{
	/// Immutable connection and retry settings.
	pub config: Arc<VaultConfig>,
	/// Transport used for every outbound request.
	pub http_client: Arc<C>,
	/// Predicate deciding which failures consume a retry.
	pub retry_predicate: Arc<dyn RetryPredicate>,
	/// Shared counters for renew outcomes.
	pub metrics: Arc<RenewMetrics>,
}
impl<C> LeaseRenewer<C>
where
	C: ?Sized + LeaseHttpClient,
{
	/// Creates a renewer that reuses the caller-provided transport.
	///
	/// Every failure is retried ([`RetryAll`]) until overridden with
	/// [`with_retry_predicate`](Self::with_retry_predicate).
	pub fn with_http_client(
		config: impl Into<Arc<VaultConfig>>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			config: config.into(),
			http_client: http_client.into(),
			retry_predicate: Arc::new(RetryAll),
			metrics: Default::default(),
		}
	}

	/// Replaces the retry predicate.
	pub fn with_retry_predicate(mut self, predicate: impl 'static + RetryPredicate) -> Self {
		self.retry_predicate = Arc::new(predicate);

		self
	}

	/// Renews `lease_id` without requesting a specific increment.
	pub async fn renew_lease_default(&self, lease_id: &str) -> Result<RenewalResult> {
		self.renew_lease(lease_id, None).await
	}

	/// Renews `lease_id`, optionally requesting `increment`.
	///
	/// An increment whose unit has no wire code fails immediately with
	/// [`Error::UnsupportedUnit`]; it is a caller bug and never retried. Every other failure
	/// surfaces as [`Error::RetriesExhausted`] once the retry budget is spent or the predicate
	/// rejects the error.
	pub async fn renew_lease(
		&self,
		lease_id: &str,
		increment: Option<Increment>,
	) -> Result<RenewalResult> {
		let span = RenewSpan::new("renew_lease", lease_id);
		let result: Result<RenewalResult> = span
			.instrument(async move {
				let body = increment_body(increment)?;
				let url = self.config.renew_url(lease_id)?;
				let headers = self.headers(body.is_some());
				let policy = self.config.retry;
				let mut retries = 0_u32;

				loop {
					let request = LeaseRequest {
						method: Method::PUT,
						url: url.clone(),
						headers: headers.clone(),
						body: body.clone(),
					};

					obs::record_renew_outcome(RenewOutcome::Attempt);
					self.metrics.record_attempt();

					match self.attempt(request).await {
						Ok(envelope) => {
							obs::log_renewed(retries, envelope.lease_duration);

							return Ok(RenewalResult::from_envelope(envelope, lease_id, retries));
						},
						Err(err) => {
							let retryable = self.retry_predicate.is_retryable(&err);

							if retryable && retries < policy.max_retries {
								obs::log_retry(retries, policy.max_retries, policy.interval, &err);
								obs::record_renew_outcome(RenewOutcome::Retry);
								self.metrics.record_retry();

								retries += 1;

								tokio::time::sleep(policy.interval).await;

								continue;
							}

							let attempts = retries.saturating_add(1);

							obs::log_exhausted(attempts, retryable, &err);

							return Err(Error::RetriesExhausted { attempts, source: err });
						},
					}
				}
			})
			.await;

		match &result {
			Ok(_) => {
				obs::record_renew_outcome(RenewOutcome::Success);
				self.metrics.record_success();
			},
			Err(_) => {
				obs::record_renew_outcome(RenewOutcome::Failure);
				self.metrics.record_failure();
			},
		}

		result
	}

	async fn attempt(&self, request: LeaseRequest) -> Result<RenewalEnvelope, AttemptError> {
		let response = self.http_client.dispatch(request).await?;

		Ok(decode::decode_renewal(&response)?)
	}

	fn headers(&self, with_body: bool) -> HeaderMap {
		let mut headers = HeaderMap::new();

		headers.insert(HeaderName::from_static(TOKEN_HEADER), self.config.token.header_value());

		if with_body {
			headers.insert(CONTENT_TYPE, HeaderValue::from_static(decode::EXPECTED_CONTENT_TYPE));
		}

		headers
	}
}
#[cfg(feature = "reqwest")]
impl LeaseRenewer<ReqwestHttpClient> {
	/// Creates a renewer backed by a reqwest transport built from `config`.
	pub fn new(config: impl Into<Arc<VaultConfig>>) -> Result<Self, ConfigError> {
		let config = config.into();
		let http_client = ReqwestHttpClient::from_config(&config)?;

		Ok(Self::with_http_client(config, http_client))
	}
}
impl<C> Clone for LeaseRenewer<C>
where
	C: ?Sized + LeaseHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			config: self.config.clone(),
			http_client: self.http_client.clone(),
			retry_predicate: self.retry_predicate.clone(),
			metrics: self.metrics.clone(),
		}
	}
}
impl<C> Debug for LeaseRenewer<C>
where
	C: ?Sized + LeaseHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LeaseRenewer")
			.field("address", &self.config.address.as_str())
			.field("retry", &self.config.retry)
			.finish()
	}
}

/// Builds `{"increment":"<encoded>"}` when an increment was requested.
fn increment_body(increment: Option<Increment>) -> Result<Option<Vec<u8>>, UnsupportedUnit> {
	let Some(increment) = increment else {
		return Ok(None);
	};
	let body = serde_json::json!({ "increment": increment.encode()? });

	Ok(Some(body.to_string().into_bytes()))
}
