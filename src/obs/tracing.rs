// self
use crate::{_prelude::*, error::AttemptError};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedRenew<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedRenew<F> = F;

/// A span builder used by the renew executor.
#[derive(Clone, Debug)]
pub struct RenewSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl RenewSpan {
	/// Creates a new span tagged with the stage and lease identifier.
	pub fn new(stage: &'static str, lease_id: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("vault_lease.renew", stage, lease_id);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (stage, lease_id);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedRenew<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Logs a failed attempt that will be retried after `interval`.
pub fn log_retry(retries: u32, max_retries: u32, interval: Duration, error: &AttemptError) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(
			retry = retries + 1,
			max_retries,
			interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
			error = %error,
			"Lease renewal attempt failed; retrying."
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (retries, max_retries, interval, error);
	}
}

/// Logs the failure that ends the retry loop.
pub fn log_exhausted(attempts: u32, retryable: bool, error: &AttemptError) {
	#[cfg(feature = "tracing")]
	{
		tracing::error!(attempts, retryable, error = %error, "Lease renewal failed.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (attempts, retryable, error);
	}
}

/// Logs a successful renewal.
pub fn log_renewed(retries: u32, lease_duration: Option<u64>) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(retries, lease_duration, "Lease renewed.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (retries, lease_duration);
	}
}
