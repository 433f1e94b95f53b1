//! Optional observability helpers for renew calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `vault_lease.renew` with the `stage` (call
//!   site) and `lease_id` fields, plus per-attempt diagnostics.
//! - Enable `metrics` to increment the `vault_lease_renew_total` counter labeled by `outcome`:
//!   `attempt` and `retry` once per dispatched request and scheduled retry, `success` and
//!   `failure` once per renew call.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded by the renew executor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenewOutcome {
	/// A request dispatched to the server.
	Attempt,
	/// A failed attempt that will be retried.
	Retry,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl RenewOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RenewOutcome::Attempt => "attempt",
			RenewOutcome::Retry => "retry",
			RenewOutcome::Success => "success",
			RenewOutcome::Failure => "failure",
		}
	}
}
impl Display for RenewOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
