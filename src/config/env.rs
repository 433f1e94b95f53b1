//! `VAULT_*` environment variable loading.

// std
use std::fs;
// self
use crate::{
	_prelude::*,
	config::{VaultConfig, VaultConfigBuilder},
	error::ConfigError,
	retry::RetryPolicy,
};

/// Server address.
pub const VAULT_ADDR: &str = "VAULT_ADDR";
/// Authentication token.
pub const VAULT_TOKEN: &str = "VAULT_TOKEN";
/// Connect timeout in seconds.
pub const VAULT_OPEN_TIMEOUT: &str = "VAULT_OPEN_TIMEOUT";
/// Read timeout in seconds.
pub const VAULT_READ_TIMEOUT: &str = "VAULT_READ_TIMEOUT";
/// `true`/`false` toggle for certificate verification.
pub const VAULT_SSL_VERIFY: &str = "VAULT_SSL_VERIFY";
/// Path to a PEM file with extra trusted certificates.
pub const VAULT_SSL_CERT: &str = "VAULT_SSL_CERT";
/// Retries after the initial attempt.
pub const VAULT_MAX_RETRIES: &str = "VAULT_MAX_RETRIES";
/// Pause between attempts in milliseconds.
pub const VAULT_RETRY_INTERVAL_MS: &str = "VAULT_RETRY_INTERVAL_MS";

impl VaultConfig {
	/// Loads configuration through `lookup`, which maps a variable name to its value.
	///
	/// [`from_env`](Self::from_env) passes [`std::env::var`]; tests pass a map.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let get = |name: &'static str| lookup(name).filter(|value| !value.trim().is_empty());
		let address = get(VAULT_ADDR).ok_or(ConfigError::Missing { name: VAULT_ADDR })?;
		let token = get(VAULT_TOKEN).ok_or(ConfigError::Missing { name: VAULT_TOKEN })?;
		let mut builder = VaultConfigBuilder::new(address, token);

		if let Some(raw) = get(VAULT_OPEN_TIMEOUT) {
			builder = builder.open_timeout(Duration::from_secs(parse(VAULT_OPEN_TIMEOUT, &raw)?));
		}
		if let Some(raw) = get(VAULT_READ_TIMEOUT) {
			builder = builder.read_timeout(Duration::from_secs(parse(VAULT_READ_TIMEOUT, &raw)?));
		}
		if let Some(raw) = get(VAULT_SSL_VERIFY) {
			builder = builder.ssl_verify(parse(VAULT_SSL_VERIFY, &raw)?);
		}
		if let Some(path) = get(VAULT_SSL_CERT) {
			let pem = fs::read_to_string(&path)
				.map_err(|source| ConfigError::PemRead { path: path.clone(), source })?;

			builder = builder.ssl_pem_utf8(pem);
		}

		let defaults = RetryPolicy::default();
		let max_retries = match get(VAULT_MAX_RETRIES) {
			Some(raw) => parse(VAULT_MAX_RETRIES, &raw)?,
			None => defaults.max_retries,
		};
		let interval = match get(VAULT_RETRY_INTERVAL_MS) {
			Some(raw) => Duration::from_millis(parse(VAULT_RETRY_INTERVAL_MS, &raw)?),
			None => defaults.interval,
		};

		builder.retry(RetryPolicy { max_retries, interval }).build()
	}
}

fn parse<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
	T: FromStr,
{
	raw.trim().parse().map_err(|_| ConfigError::InvalidValue { name, value: raw.into() })
}
