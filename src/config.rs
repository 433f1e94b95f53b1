//! Immutable client configuration: server address, token, timeouts, TLS material, and retry
//! policy.
//!
//! Build values with [`VaultConfig::builder`] or load them from `VAULT_*` environment
//! variables via [`VaultConfig::from_env`]. Once built, a configuration is shared read-only
//! (typically behind an [`Arc`]) by every renewer that uses it.

mod env;
mod token;

pub use env::*;
pub use token::*;

// self
use crate::{_prelude::*, error::ConfigError, retry::RetryPolicy};

/// TLS material handed to the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TlsMaterial {
	/// Extra PEM-encoded root certificate(s) to trust.
	pub pem_utf8: Option<String>,
	/// Whether server certificates are verified.
	pub verify: bool,
}
impl Default for TlsMaterial {
	fn default() -> Self {
		Self { pem_utf8: None, verify: true }
	}
}

/// Connection and retry settings for a Vault server.
#[derive(Clone, Debug)]
pub struct VaultConfig {
	/// Base address, e.g. `https://vault.example.com:8200`.
	pub address: Url,
	/// Token sent as `X-Vault-Token`.
	pub token: VaultToken,
	/// Connect timeout.
	pub open_timeout: Option<Duration>,
	/// Read timeout.
	pub read_timeout: Option<Duration>,
	/// TLS material.
	pub tls: TlsMaterial,
	/// Retry policy applied to every renew call.
	pub retry: RetryPolicy,
}
impl VaultConfig {
	/// Creates a builder for the provided address and token.
	pub fn builder(address: impl Into<String>, token: impl Into<String>) -> VaultConfigBuilder {
		VaultConfigBuilder::new(address, token)
	}

	/// Loads configuration from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Resolves `/v1/sys/renew/{lease_id}` against the configured address.
	///
	/// Slashes inside the lease id remain path separators, as the server expects. Every other
	/// byte is kept inside its segment: `?`, `#`, and `%` are percent-encoded, and `.`/`..`
	/// segments are rejected so the request can never leave the renew endpoint.
	pub fn renew_url(&self, lease_id: &str) -> Result<Url, ConfigError> {
		let invalid =
			|reason| ConfigError::InvalidLeaseId { lease_id: lease_id.into(), reason };
		let mut url = self.address.clone();

		url.set_query(None);
		url.set_fragment(None);

		{
			let mut segments =
				url.path_segments_mut().map_err(|()| invalid("address cannot carry a path"))?;

			segments.pop_if_empty().extend(["v1", "sys", "renew"]);

			for segment in lease_id.split('/') {
				if matches!(segment, "." | "..") {
					return Err(invalid("dot segments are not allowed"));
				}

				segments.push(segment);
			}
		}

		Ok(url)
	}
}

/// Builder for [`VaultConfig`] values.
#[derive(Debug)]
pub struct VaultConfigBuilder {
	/// Raw server address.
	pub address: String,
	/// Raw token.
	pub token: String,
	/// Connect timeout.
	pub open_timeout: Option<Duration>,
	/// Read timeout.
	pub read_timeout: Option<Duration>,
	/// TLS material.
	pub tls: TlsMaterial,
	/// Retry policy.
	pub retry: RetryPolicy,
}
impl VaultConfigBuilder {
	/// Creates a new builder seeded with the address and token.
	pub fn new(address: impl Into<String>, token: impl Into<String>) -> Self {
		Self {
			address: address.into(),
			token: token.into(),
			open_timeout: None,
			read_timeout: None,
			tls: TlsMaterial::default(),
			retry: RetryPolicy::default(),
		}
	}

	/// Sets the connect timeout.
	pub fn open_timeout(mut self, timeout: Duration) -> Self {
		self.open_timeout = Some(timeout);

		self
	}

	/// Sets the read timeout.
	pub fn read_timeout(mut self, timeout: Duration) -> Self {
		self.read_timeout = Some(timeout);

		self
	}

	/// Trusts an additional PEM-encoded certificate.
	pub fn ssl_pem_utf8(mut self, pem: impl Into<String>) -> Self {
		self.tls.pem_utf8 = Some(pem.into());

		self
	}

	/// Enables or disables server certificate verification.
	pub fn ssl_verify(mut self, verify: bool) -> Self {
		self.tls.verify = verify;

		self
	}

	/// Overrides the retry policy.
	pub fn retry(mut self, policy: RetryPolicy) -> Self {
		self.retry = policy;

		self
	}

	/// Shorthand for [`retry`](Self::retry) with a max retry count and interval.
	pub fn max_retries(mut self, max_retries: u32, interval_millis: u64) -> Self {
		self.retry = RetryPolicy::new(max_retries, interval_millis);

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<VaultConfig, ConfigError> {
		if self.address.trim().is_empty() {
			return Err(ConfigError::Missing { name: VAULT_ADDR });
		}
		if self.token.is_empty() {
			return Err(ConfigError::Missing { name: VAULT_TOKEN });
		}

		let address = Url::parse(self.address.trim()).map_err(|source| {
			ConfigError::InvalidAddress { address: self.address.clone(), source }
		})?;

		if address.cannot_be_a_base() {
			return Err(ConfigError::InvalidAddress {
				address: self.address,
				source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
			});
		}

		Ok(VaultConfig {
			address,
			token: VaultToken::new(self.token)?,
			open_timeout: self.open_timeout,
			read_timeout: self.read_timeout,
			tls: self.tls,
			retry: self.retry,
		})
	}
}
