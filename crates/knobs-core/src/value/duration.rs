//! Durations, persisted as a number of seconds

use chrono::TimeDelta;

use super::{ValueKind, ValueType, invalid};
use crate::prelude::*;

const MSG_REAL: &str = "This value must be a real number.";

#[derive(Clone, Copy, Debug, Default)]
pub struct DurationValue;

impl DurationValue {
	pub fn new() -> Self {
		Self
	}
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn seconds_to_delta(seconds: f64) -> ClResult<TimeDelta> {
	if !seconds.is_finite() {
		return Err(invalid(MSG_REAL));
	}
	let max = TimeDelta::MAX;
	let micros = (seconds * 1_000_000.0).round();
	let limit = max.num_microseconds().unwrap_or(i64::MAX) as f64;
	if micros.abs() >= limit {
		return Err(invalid(format!("The maximum allowed value is {}", max)));
	}
	Ok(TimeDelta::microseconds(micros as i64))
}

fn delta_to_seconds(delta: &TimeDelta) -> String {
	let secs = delta.num_seconds();
	let micros = delta.subsec_nanos() / 1_000;
	if micros == 0 {
		secs.to_string()
	} else {
		let frac = format!("{:06}", micros.unsigned_abs());
		let sign = if secs == 0 && micros < 0 { "-" } else { "" };
		format!("{}{}.{}", sign, secs, frac.trim_end_matches('0'))
	}
}

impl ValueType for DurationValue {
	type Native = Option<TimeDelta>;

	fn kind(&self) -> ValueKind {
		ValueKind::Duration
	}

	fn parse(&self, stored: &str) -> ClResult<Option<TimeDelta>> {
		let s = stored.trim();
		if s.is_empty() {
			return Ok(None);
		}
		let seconds: f64 = s.parse().map_err(|_| invalid(MSG_REAL))?;
		seconds_to_delta(seconds).map(Some)
	}

	fn serialize(&self, value: &Option<TimeDelta>) -> String {
		value.as_ref().map(delta_to_seconds).unwrap_or_default()
	}

	fn uninitialized(&self) -> Option<TimeDelta> {
		None
	}
}


// vim: ts=4
