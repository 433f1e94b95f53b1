//! Fixed-delay retry policy and the predicates that decide which failures are retried.

// self
use crate::{
	_prelude::*,
	error::{AttemptError, ResponseError},
};

/// Bounded, fixed-delay retry settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
	/// Retries permitted after the initial attempt.
	pub max_retries: u32,
	/// Pause between consecutive attempts.
	pub interval: Duration,
}
impl RetryPolicy {
	const DEFAULT_INTERVAL: Duration = Duration::from_millis(1_000);

	/// Creates a policy with `max_retries` and an interval in milliseconds.
	pub const fn new(max_retries: u32, interval_millis: u64) -> Self {
		Self { max_retries, interval: Duration::from_millis(interval_millis) }
	}

	/// Policy that never retries.
	pub const fn no_retries() -> Self {
		Self { max_retries: 0, interval: Self::DEFAULT_INTERVAL }
	}

	/// Total attempts the policy allows, including the first.
	pub const fn max_attempts(&self) -> u32 {
		self.max_retries.saturating_add(1)
	}
}
impl Default for RetryPolicy {
	fn default() -> Self {
		Self::no_retries()
	}
}

/// Decides whether a failed attempt may be retried.
pub trait RetryPredicate
where
	Self: Send + Sync,
{
	/// Returns `true` when `error` should consume another attempt.
	fn is_retryable(&self, error: &AttemptError) -> bool;
}

/// Retries every failure uniformly, including permanent 4xx responses and malformed bodies.
#[derive(Clone, Copy, Debug, Default)]
pub struct RetryAll;
impl RetryPredicate for RetryAll {
	fn is_retryable(&self, _: &AttemptError) -> bool {
		true
	}
}

/// Retries only transport failures and 5xx responses; everything else fails fast.
#[derive(Clone, Copy, Debug, Default)]
pub struct RetryTransient;
impl RetryPredicate for RetryTransient {
	fn is_retryable(&self, error: &AttemptError) -> bool {
		match error {
			AttemptError::Transport(_) => true,
			AttemptError::Response(ResponseError::UnexpectedStatus { status }) =>
				(500..600).contains(status),
			AttemptError::Response(_) => false,
		}
	}
}
