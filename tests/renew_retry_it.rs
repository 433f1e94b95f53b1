// std
use std::{
	collections::VecDeque,
	sync::{Arc, Mutex},
	time::{Duration, Instant},
};
// crates.io
use http::Method;
// self
use vault_lease::{
	config::VaultConfig,
	error::{AttemptError, ConfigError, Error, ResponseError, TransportError},
	http::{DispatchFuture, LeaseHttpClient, LeaseRequest, RawResponse},
	increment::{Increment, TimeUnit},
	renew::LeaseRenewer,
	retry::{RetryPolicy, RetryTransient},
};

const LEASE_ID: &str = "database/creds/readonly/2f6a614c-4aa2-7b19-24b9-ad944a8d4de6";

#[derive(Debug)]
enum Step {
	Fail,
	Respond(RawResponse),
}

/// Transport that replays a fixed script and records every request it receives.
#[derive(Default)]
struct ScriptedHttpClient {
	script: Mutex<VecDeque<Step>>,
	requests: Mutex<Vec<LeaseRequest>>,
}
impl ScriptedHttpClient {
	fn new(steps: impl IntoIterator<Item = Step>) -> Self {
		Self { script: Mutex::new(steps.into_iter().collect()), requests: Default::default() }
	}

	fn requests(&self) -> Vec<LeaseRequest> {
		self.requests.lock().expect("Request log lock should not be poisoned.").clone()
	}
}
impl LeaseHttpClient for ScriptedHttpClient {
	fn dispatch(&self, request: LeaseRequest) -> DispatchFuture<'_> {
		self.requests.lock().expect("Request log lock should not be poisoned.").push(request);

		let step = self.script.lock().expect("Script lock should not be poisoned.").pop_front();

		Box::pin(async move {
			match step {
				Some(Step::Respond(response)) => Ok(response),
				Some(Step::Fail) | None =>
					Err(TransportError::Io(std::io::Error::other("connection refused"))),
			}
		})
	}
}

fn ok_envelope() -> Step {
	Step::Respond(RawResponse::new(
		200,
		Some("application/json".into()),
		format!(
			r#"{{"lease_id":"{LEASE_ID}","renewable":true,"lease_duration":600,"data":{{"username":"v-token-ro","ttl":600,"note":null}}}}"#
		)
		.into_bytes(),
	))
}

fn status(status: u16) -> Step {
	Step::Respond(RawResponse::new(status, Some("application/json".into()), b"{}".to_vec()))
}

fn renewer(
	client: &Arc<ScriptedHttpClient>,
	max_retries: u32,
) -> LeaseRenewer<ScriptedHttpClient> {
	let config = VaultConfig::builder("http://127.0.0.1:8200", "s.scripted")
		.retry(RetryPolicy::new(max_retries, 0))
		.build()
		.expect("Scripted configuration should build.");

	LeaseRenewer::with_http_client(config, client.clone())
}

#[tokio::test]
async fn succeeds_after_transient_failures_and_reports_retries() {
	let client = Arc::new(ScriptedHttpClient::new([Step::Fail, Step::Fail, ok_envelope()]));
	let renewer = renewer(&client, 2);
	let result = renewer
		.renew_lease_default(LEASE_ID)
		.await
		.expect("Third attempt should succeed within the retry budget.");

	assert_eq!(result.retries, 2);
	assert_eq!(result.status, 200);
	assert_eq!(result.lease_id, LEASE_ID);
	assert_eq!(result.lease_duration, Some(600));
	assert_eq!(result.renewable, Some(true));
	assert_eq!(result.data.get("username").map(String::as_str), Some("v-token-ro"));
	assert_eq!(result.data.get("ttl").map(String::as_str), Some("600"));
	assert!(!result.data.contains_key("note"));
	assert_eq!(client.requests().len(), 3);
	assert_eq!(renewer.metrics.attempts(), 3);
	assert_eq!(renewer.metrics.retries(), 2);
	assert_eq!(renewer.metrics.successes(), 1);
}

#[tokio::test]
async fn first_attempt_success_reports_zero_retries() {
	let client = Arc::new(ScriptedHttpClient::new([ok_envelope()]));
	let result = renewer(&client, 5)
		.renew_lease_default(LEASE_ID)
		.await
		.expect("First attempt should succeed.");

	assert_eq!(result.retries, 0);
	assert_eq!(client.requests().len(), 1);
}

#[tokio::test]
async fn exhausts_after_max_retries_plus_one_attempts() {
	let client = Arc::new(ScriptedHttpClient::new([]));
	let renewer = renewer(&client, 1);
	let err = renewer
		.renew_lease_default(LEASE_ID)
		.await
		.expect_err("Always-failing transport must exhaust retries.");

	match err {
		Error::RetriesExhausted { attempts, source: AttemptError::Transport(_) } =>
			assert_eq!(attempts, 2),
		other => panic!("Unexpected error variant: {other:?}."),
	}

	assert_eq!(client.requests().len(), 2);
	assert_eq!(renewer.metrics.failures(), 1);
}

#[tokio::test]
async fn zero_retries_fails_on_first_error() {
	let client = Arc::new(ScriptedHttpClient::new([status(503), ok_envelope()]));
	let err = renewer(&client, 0)
		.renew_lease_default(LEASE_ID)
		.await
		.expect_err("No retries are permitted.");

	assert!(matches!(err, Error::RetriesExhausted { attempts: 1, .. }));
	assert_eq!(err.last_attempt_error().and_then(AttemptError::status), Some(503));
	assert_eq!(client.requests().len(), 1);
}

#[tokio::test]
async fn contract_violations_are_retried_by_default() {
	let client = Arc::new(ScriptedHttpClient::new([
		status(400),
		Step::Respond(RawResponse::new(200, Some("text/plain".into()), b"ok".to_vec())),
		Step::Respond(RawResponse::new(200, Some("application/json".into()), b"[]".to_vec())),
		ok_envelope(),
	]));
	let result = renewer(&client, 3)
		.renew_lease_default(LEASE_ID)
		.await
		.expect("Fourth attempt should succeed.");

	assert_eq!(result.retries, 3);
}

#[tokio::test]
async fn transient_predicate_fails_fast_on_client_errors() {
	let client = Arc::new(ScriptedHttpClient::new([status(503), status(403), ok_envelope()]));
	let err = renewer(&client, 5)
		.with_retry_predicate(RetryTransient)
		.renew_lease_default(LEASE_ID)
		.await
		.expect_err("A 403 must not be retried under the transient predicate.");

	match err {
		Error::RetriesExhausted {
			attempts,
			source: AttemptError::Response(ResponseError::UnexpectedStatus { status }),
		} => {
			assert_eq!(attempts, 2);
			assert_eq!(status, 403);
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	assert_eq!(client.requests().len(), 2);
}

#[tokio::test]
async fn request_carries_token_path_and_increment() {
	let client = Arc::new(ScriptedHttpClient::new([ok_envelope(), ok_envelope()]));
	let renewer = renewer(&client, 0);

	renewer
		.renew_lease(LEASE_ID, Some(Increment::new(100, TimeUnit::Minutes)))
		.await
		.expect("Renewal with increment should succeed.");
	renewer
		.renew_lease_default(LEASE_ID)
		.await
		.expect("Renewal without increment should succeed.");

	let requests = client.requests();
	let with_increment = &requests[0];

	assert_eq!(with_increment.method, Method::PUT);
	assert_eq!(with_increment.url.path(), format!("/v1/sys/renew/{LEASE_ID}"));
	assert_eq!(
		with_increment.headers.get("x-vault-token").and_then(|v| v.to_str().ok()),
		Some("s.scripted")
	);
	assert_eq!(with_increment.body.as_deref(), Some(br#"{"increment":"100m"}"#.as_slice()));
	assert!(requests[1].body.is_none());
}

#[tokio::test]
async fn unsupported_unit_is_not_dispatched() {
	let client = Arc::new(ScriptedHttpClient::new([ok_envelope()]));
	let renewer = renewer(&client, 3);
	let err = renewer
		.renew_lease(LEASE_ID, Some(Increment::new(1, TimeUnit::Days)))
		.await
		.expect_err("Days have no wire code.");

	assert!(matches!(err, Error::UnsupportedUnit(unit) if unit.unit == TimeUnit::Days));
	assert!(client.requests().is_empty());
	assert_eq!(renewer.metrics.attempts(), 0);
	assert_eq!(renewer.metrics.failures(), 1);
}

#[tokio::test]
async fn rejected_lease_id_is_counted_as_failure() {
	let client = Arc::new(ScriptedHttpClient::new([ok_envelope()]));
	let renewer = renewer(&client, 3);
	let err = renewer
		.renew_lease_default("database/../../sys/seal")
		.await
		.expect_err("Dot segments must not reach the transport.");

	assert!(matches!(err, Error::Config(ConfigError::InvalidLeaseId { .. })));
	assert!(client.requests().is_empty());
	assert_eq!(renewer.metrics.attempts(), 0);
	assert_eq!(renewer.metrics.failures(), 1);
	assert_eq!(renewer.metrics.successes(), 0);
}

#[tokio::test]
async fn unbounded_retry_budget_reports_consumed_attempts() {
	let client = Arc::new(ScriptedHttpClient::new([status(503), status(403)]));
	let err = renewer(&client, u32::MAX)
		.with_retry_predicate(RetryTransient)
		.renew_lease_default(LEASE_ID)
		.await
		.expect_err("A 403 must stop the loop.");

	assert!(matches!(err, Error::RetriesExhausted { attempts: 2, .. }));
	assert_eq!(client.requests().len(), 2);
}

#[tokio::test]
async fn retry_interval_is_waited_between_attempts() {
	let client = Arc::new(ScriptedHttpClient::new([Step::Fail, ok_envelope()]));
	let config = VaultConfig::builder("http://127.0.0.1:8200", "s.scripted")
		.retry(RetryPolicy::new(1, 50))
		.build()
		.expect("Scripted configuration should build.");
	let renewer: LeaseRenewer<ScriptedHttpClient> =
		LeaseRenewer::with_http_client(config, client.clone());
	let started = Instant::now();
	let result = renewer.renew_lease_default(LEASE_ID).await.expect("Retry should succeed.");

	assert_eq!(result.retries, 1);
	assert!(started.elapsed() >= Duration::from_millis(50));
}
