//! Demonstrates renewing a lease with the default reqwest transport against a mock Vault
//! server, requesting a one-hour increment and allowing a couple of retries.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use vault_lease::{
	config::VaultConfig,
	increment::{Increment, TimeUnit},
	renew::LeaseRenewer,
	retry::RetryTransient,
};

const LEASE_ID: &str = "database/creds/readonly/2f6a614c-4aa2-7b19-24b9-ad944a8d4de6";

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let renew_mock = server
		.mock_async(|when, then| {
			when.method(PUT)
				.path(format!("/v1/sys/renew/{LEASE_ID}"))
				.header("x-vault-token", "s.demo-token")
				.body(r#"{"increment":"1h"}"#);
			then.status(200).header("content-type", "application/json").body(format!(
				"{{\"lease_id\":\"{LEASE_ID}\",\"renewable\":true,\"lease_duration\":3600,\"data\":null}}"
			));
		})
		.await;
	// The mock server presents a certificate from its own private CA; point `ssl_pem_utf8` at
	// a real Vault CA instead of disabling verification outside of demos.
	let config = VaultConfig::builder(server.base_url(), "s.demo-token")
		.max_retries(2, 250)
		.ssl_verify(false)
		.build()?;
	let renewer = LeaseRenewer::new(config)?.with_retry_predicate(RetryTransient);
	let renewed = renewer.renew_lease(LEASE_ID, Some(Increment::new(1, TimeUnit::Hours))).await?;

	println!(
		"Renewed {} for {:?}s after {} retries.",
		renewed.lease_id, renewed.lease_duration, renewed.retries
	);

	renew_mock.assert_async().await;

	Ok(())
}
