// self
use crate::obs::RenewOutcome;

/// Records a renew outcome via the global metrics recorder (when enabled).
pub fn record_renew_outcome(outcome: RenewOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("vault_lease_renew_total", "outcome" => outcome.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}
