//! Vault token wrapper that keeps the secret out of logs and request dumps.

// crates.io
use http::HeaderValue;
// self
use crate::{_prelude::*, error::ConfigError};

/// Vault token validated as an HTTP header value at construction.
///
/// `Debug` and `Display` redact the secret, and the header form is marked sensitive so
/// `http`-aware loggers skip it as well.
#[derive(Clone, PartialEq, Eq)]
pub struct VaultToken {
	raw: String,
	header: HeaderValue,
}
impl VaultToken {
	/// Wraps `value`, rejecting bytes that cannot travel in `X-Vault-Token`.
	pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
		let raw = value.into();
		let mut header = HeaderValue::from_str(&raw)?;

		header.set_sensitive(true);

		Ok(Self { raw, header })
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.raw
	}

	/// Returns the sensitive header value sent as `X-Vault-Token`.
	pub fn header_value(&self) -> HeaderValue {
		self.header.clone()
	}
}
impl Debug for VaultToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("VaultToken").field(&"<redacted>").finish()
	}
}
impl Display for VaultToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn token_formatters_redact() {
		let token = VaultToken::new("s.super-secret").expect("Token should be accepted.");

		assert_eq!(format!("{token:?}"), "VaultToken(\"<redacted>\")");
		assert_eq!(format!("{token}"), "<redacted>");
		assert_eq!(token.expose(), "s.super-secret");
	}

	#[test]
	fn header_value_is_sensitive() {
		let header = VaultToken::new("s.super-secret")
			.expect("Token should be accepted.")
			.header_value();

		assert!(header.is_sensitive());
		assert_eq!(header.to_str().ok(), Some("s.super-secret"));
		assert_eq!(format!("{header:?}"), "Sensitive");
	}

	#[test]
	fn control_characters_are_rejected() {
		let err = VaultToken::new("s.split\r\nx-injected: 1").expect_err("CRLF must be rejected.");

		assert!(matches!(err, ConfigError::InvalidToken(_)));
	}
}
