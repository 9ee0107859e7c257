//! Integer, float, decimal and percent values.
//!
//! All numeric kinds map empty input to `None` instead of failing.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::{ValueKind, ValueType, invalid};
use crate::prelude::*;

const MSG_INTEGER: &str = "Enter a whole number.";
const MSG_NUMBER: &str = "Enter a number.";

fn check_min<T: PartialOrd + std::fmt::Display>(value: &T, min: Option<T>) -> ClResult<()> {
	match min {
		Some(min) if *value < min => {
			Err(invalid(format!("Ensure this value is greater than or equal to {}.", min)))
		}
		_ => Ok(()),
	}
}

fn check_max<T: PartialOrd + std::fmt::Display>(value: &T, max: Option<T>) -> ClResult<()> {
	match max {
		Some(max) if *value > max => {
			Err(invalid(format!("Ensure this value is less than or equal to {}.", max)))
		}
		_ => Ok(()),
	}
}

/// Counts (total digits, decimal places) the way a fixed-point form field does:
/// `0.05` has 2 digits and 2 decimals, `1.50` has 3 digits and 2 decimals.
fn digit_counts(value: &Decimal) -> (u32, u32) {
	let mantissa = value.mantissa().unsigned_abs();
	let len = if mantissa == 0 { 1 } else { mantissa.ilog10() + 1 };
	let scale = value.scale();
	if mantissa == 0 {
		(scale.max(1), scale)
	} else if scale > len {
		(scale, scale)
	} else {
		(len, scale)
	}
}

fn check_digits(value: &Decimal, max_digits: Option<u32>, decimal_places: Option<u32>) -> ClResult<()> {
	let (digits, decimals) = digit_counts(value);
	if let Some(max_digits) = max_digits
		&& digits > max_digits
	{
		return Err(invalid(format!(
			"Ensure that there are no more than {} digits in total.",
			max_digits
		)));
	}
	if let Some(places) = decimal_places
		&& decimals > places
	{
		return Err(invalid(format!("Ensure that there are no more than {} decimal places.", places)));
	}
	if let (Some(max_digits), Some(places)) = (max_digits, decimal_places) {
		let whole = max_digits.saturating_sub(places);
		if digits - decimals > whole {
			return Err(invalid(format!(
				"Ensure that there are no more than {} digits before the decimal point.",
				whole
			)));
		}
	}
	Ok(())
}

fn parse_decimal(s: &str) -> ClResult<Decimal> {
	Decimal::from_str(s).or_else(|_| Decimal::from_scientific(s)).map_err(|_| invalid(MSG_NUMBER))
}

// IntegerValue //
//**************//
#[derive(Clone, Debug, Default)]
pub struct IntegerValue {
	min_value: Option<i64>,
	max_value: Option<i64>,
}

impl IntegerValue {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn min_value(mut self, min: i64) -> Self {
		self.min_value = Some(min);
		self
	}

	pub fn max_value(mut self, max: i64) -> Self {
		self.max_value = Some(max);
		self
	}
}

impl ValueType for IntegerValue {
	type Native = Option<i64>;

	fn kind(&self) -> ValueKind {
		ValueKind::Integer
	}

	fn parse(&self, stored: &str) -> ClResult<Option<i64>> {
		let s = stored.trim();
		if s.is_empty() {
			return Ok(None);
		}
		let value = s.parse::<i64>().map_err(|_| invalid(MSG_INTEGER))?;
		check_min(&value, self.min_value)?;
		check_max(&value, self.max_value)?;
		Ok(Some(value))
	}

	fn serialize(&self, value: &Option<i64>) -> String {
		value.map(|v| v.to_string()).unwrap_or_default()
	}

	fn uninitialized(&self) -> Option<i64> {
		None
	}
}

// PositiveIntegerValue //
//**********************//
#[derive(Clone, Debug)]
pub struct PositiveIntegerValue {
	inner: IntegerValue,
}

impl PositiveIntegerValue {
	pub fn new() -> Self {
		Self { inner: IntegerValue::new().min_value(0) }
	}

	pub fn max_value(mut self, max: i64) -> Self {
		self.inner = self.inner.max_value(max);
		self
	}
}

impl Default for PositiveIntegerValue {
	fn default() -> Self {
		Self::new()
	}
}

impl ValueType for PositiveIntegerValue {
	type Native = Option<i64>;

	fn kind(&self) -> ValueKind {
		ValueKind::PositiveInteger
	}

	fn parse(&self, stored: &str) -> ClResult<Option<i64>> {
		self.inner.parse(stored)
	}

	fn serialize(&self, value: &Option<i64>) -> String {
		self.inner.serialize(value)
	}

	fn uninitialized(&self) -> Option<i64> {
		None
	}
}

// FloatValue //
//************//
#[derive(Clone, Debug, Default)]
pub struct FloatValue;

impl FloatValue {
	pub fn new() -> Self {
		Self
	}
}

impl ValueType for FloatValue {
	type Native = Option<f64>;

	fn kind(&self) -> ValueKind {
		ValueKind::Float
	}

	fn parse(&self, stored: &str) -> ClResult<Option<f64>> {
		let s = stored.trim();
		if s.is_empty() {
			return Ok(None);
		}
		match s.parse::<f64>() {
			Ok(v) if v.is_finite() => Ok(Some(v)),
			_ => Err(invalid(MSG_NUMBER)),
		}
	}

	fn serialize(&self, value: &Option<f64>) -> String {
		value.map(|v| v.to_string()).unwrap_or_default()
	}

	fn uninitialized(&self) -> Option<f64> {
		None
	}
}

// DecimalValue //
//**************//
#[derive(Clone, Debug, Default)]
pub struct DecimalValue {
	max_digits: Option<u32>,
	decimal_places: Option<u32>,
}

impl DecimalValue {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn max_digits(mut self, max_digits: u32) -> Self {
		self.max_digits = Some(max_digits);
		self
	}

	pub fn decimal_places(mut self, places: u32) -> Self {
		self.decimal_places = Some(places);
		self
	}
}

impl ValueType for DecimalValue {
	type Native = Option<Decimal>;

	fn kind(&self) -> ValueKind {
		ValueKind::Decimal
	}

	fn parse(&self, stored: &str) -> ClResult<Option<Decimal>> {
		let s = stored.trim();
		if s.is_empty() {
			return Ok(None);
		}
		let value = parse_decimal(s)?;
		check_digits(&value, self.max_digits, self.decimal_places)?;
		Ok(Some(value))
	}

	fn serialize(&self, value: &Option<Decimal>) -> String {
		value.map(|v| v.to_string()).unwrap_or_default()
	}

	fn uninitialized(&self) -> Option<Decimal> {
		None
	}
}

// PercentValue //
//**************//
/// Fraction stored and edited as a percentage between 0 and 100 with at most
/// two decimal places; `"15"` is the native value `0.15`.
#[derive(Clone, Debug, Default)]
pub struct PercentValue;

impl PercentValue {
	pub const MAX_DIGITS: u32 = 5;
	pub const DECIMAL_PLACES: u32 = 2;

	pub fn new() -> Self {
		Self
	}
}

impl ValueType for PercentValue {
	type Native = Option<Decimal>;

	fn kind(&self) -> ValueKind {
		ValueKind::Percent
	}

	fn parse(&self, stored: &str) -> ClResult<Option<Decimal>> {
		let s = stored.trim().trim_end_matches('%').trim_end();
		if s.is_empty() {
			return Ok(None);
		}
		let percent = parse_decimal(s)?;
		check_max(&percent, Some(Decimal::ONE_HUNDRED))?;
		check_min(&percent, Some(Decimal::ZERO))?;
		check_digits(&percent, Some(Self::MAX_DIGITS), Some(Self::DECIMAL_PLACES))?;
		Ok(Some(percent / Decimal::ONE_HUNDRED))
	}

	fn serialize(&self, value: &Option<Decimal>) -> String {
		value
			.and_then(|fraction| fraction.checked_mul(Decimal::ONE_HUNDRED))
			.map(|percent| percent.normalize().to_string())
			.unwrap_or_default()
	}

	fn uninitialized(&self) -> Option<Decimal> {
		None
	}
}


// vim: ts=4
