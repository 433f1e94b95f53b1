//! Renewal increments and their compact wire encoding (`10s`, `100m`, `250ms`, `2h`).

// self
use crate::{_prelude::*, error::UnsupportedUnit};

/// Time units accepted when describing an increment.
///
/// Only [`Milliseconds`](Self::Milliseconds), [`Seconds`](Self::Seconds),
/// [`Minutes`](Self::Minutes), and [`Hours`](Self::Hours) have a wire code; the rest fail
/// to encode with [`UnsupportedUnit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimeUnit {
	/// Nanoseconds.
	Nanoseconds,
	/// Microseconds.
	Microseconds,
	/// Milliseconds (`ms`).
	Milliseconds,
	/// Seconds (`s`).
	Seconds,
	/// Minutes (`m`).
	Minutes,
	/// Hours (`h`).
	Hours,
	/// Days.
	Days,
}
impl TimeUnit {
	/// Returns the wire code for the unit, if one exists.
	pub const fn code(self) -> Option<&'static str> {
		match self {
			Self::Milliseconds => Some("ms"),
			Self::Seconds => Some("s"),
			Self::Minutes => Some("m"),
			Self::Hours => Some("h"),
			Self::Nanoseconds | Self::Microseconds | Self::Days => None,
		}
	}

	/// Returns a stable, human-readable label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Nanoseconds => "nanoseconds",
			Self::Microseconds => "microseconds",
			Self::Milliseconds => "milliseconds",
			Self::Seconds => "seconds",
			Self::Minutes => "minutes",
			Self::Hours => "hours",
			Self::Days => "days",
		}
	}
}
impl Display for TimeUnit {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Encodes `amount` + `unit` into the compact form expected by the renew endpoint.
pub fn encode_increment(amount: u64, unit: TimeUnit) -> Result<String, UnsupportedUnit> {
	let code = unit.code().ok_or(UnsupportedUnit { unit })?;

	Ok(format!("{amount}{code}"))
}

/// Requested lease extension attached to a renew call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Increment {
	/// Magnitude of the extension.
	pub amount: u64,
	/// Unit the amount is expressed in.
	pub unit: TimeUnit,
}
impl Increment {
	/// Creates an increment from an amount and unit.
	pub const fn new(amount: u64, unit: TimeUnit) -> Self {
		Self { amount, unit }
	}

	/// Shorthand for an increment in seconds.
	pub const fn seconds(amount: u64) -> Self {
		Self::new(amount, TimeUnit::Seconds)
	}

	/// Converts a duration using the coarsest unit that represents it exactly.
	///
	/// Anything below a millisecond is truncated.
	pub fn from_duration(duration: Duration) -> Self {
		let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);

		if millis == 0 || millis % 1_000 != 0 {
			return Self::new(millis, TimeUnit::Milliseconds);
		}

		let secs = millis / 1_000;

		if secs % 3_600 == 0 {
			Self::new(secs / 3_600, TimeUnit::Hours)
		} else if secs % 60 == 0 {
			Self::new(secs / 60, TimeUnit::Minutes)
		} else {
			Self::new(secs, TimeUnit::Seconds)
		}
	}

	/// Encodes the increment via [`encode_increment`].
	pub fn encode(&self) -> Result<String, UnsupportedUnit> {
		encode_increment(self.amount, self.unit)
	}
}
impl From<Duration> for Increment {
	fn from(duration: Duration) -> Self {
		Self::from_duration(duration)
	}
}
