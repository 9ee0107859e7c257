//! Date and time values.
//!
//! Input is tried against an ordered list of formats, the first match wins.
//! Values are always serialized with the first format of the list, and parsed
//! values keep only the precision that format writes back.

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt::Write;

use super::{ValueKind, ValueType, invalid};
use crate::prelude::*;

pub const DATETIME_INPUT_FORMATS: &[&str] = &[
	"%Y-%m-%d %H:%M:%S%.f",
	"%Y-%m-%d %H:%M",
	"%Y-%m-%d",
	"%m/%d/%Y %H:%M:%S%.f",
	"%m/%d/%Y %H:%M",
	"%m/%d/%Y",
	"%m/%d/%y %H:%M:%S%.f",
	"%m/%d/%y %H:%M",
	"%m/%d/%y",
];

pub const DATE_INPUT_FORMATS: &[&str] = &[
	"%Y-%m-%d",
	"%m/%d/%Y",
	"%m/%d/%y",
	"%b %d %Y",
	"%b %d, %Y",
	"%d %b %Y",
	"%d %b, %Y",
	"%B %d %Y",
	"%B %d, %Y",
	"%d %B %Y",
	"%d %B, %Y",
];

pub const TIME_INPUT_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];

/// Ordered, validated list of strftime formats
#[derive(Clone, Debug)]
struct Formats(Box<[Box<str>]>);

impl Formats {
	fn from_static(formats: &[&str]) -> Self {
		Self(formats.iter().map(|f| Box::from(*f)).collect())
	}

	fn custom<I, S>(formats: I) -> ClResult<Self>
	where
		I: IntoIterator<Item = S>,
		S: Into<Box<str>>,
	{
		let formats: Box<[Box<str>]> = formats.into_iter().map(Into::into).collect();
		if formats.is_empty() {
			return Err(Error::DeclarationConflict("At least one input format is required".into()));
		}
		if let Some(bad) =
			formats.iter().find(|f| StrftimeItems::new(f).any(|item| matches!(item, Item::Error)))
		{
			return Err(Error::DeclarationConflict(format!("Invalid date/time format: {}", bad)));
		}
		Ok(Self(formats))
	}

	fn canonical(&self) -> &str {
		self.0.first().map_or("", |f| f)
	}

	fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(|f| &**f)
	}

	/// Parses with the first matching format, then re-reads the value through
	/// the canonical format so that a later write of the same input compares equal
	fn parse_first<T>(
		&self,
		s: &str,
		parse: impl Fn(&str, &str) -> Option<T>,
		format: impl Fn(&T, &str) -> String,
	) -> Option<T> {
		let value = self.iter().find_map(|fmt| parse(s, fmt))?;
		let canonical = self.canonical();
		Some(parse(&format(&value, canonical), canonical).unwrap_or(value))
	}
}

fn format_with<D: std::fmt::Display>(value: D) -> String {
	let mut out = String::new();
	if write!(out, "{}", value).is_err() {
		out.clear();
	}
	out
}

// DateTimeValue //
//***************//
#[derive(Clone, Debug)]
pub struct DateTimeValue {
	formats: Formats,
}

impl DateTimeValue {
	pub fn new() -> Self {
		Self { formats: Formats::from_static(DATETIME_INPUT_FORMATS) }
	}

	pub fn with_formats<I, S>(formats: I) -> ClResult<Self>
	where
		I: IntoIterator<Item = S>,
		S: Into<Box<str>>,
	{
		Ok(Self { formats: Formats::custom(formats)? })
	}
}

impl Default for DateTimeValue {
	fn default() -> Self {
		Self::new()
	}
}

impl ValueType for DateTimeValue {
	type Native = Option<NaiveDateTime>;

	fn kind(&self) -> ValueKind {
		ValueKind::DateTime
	}

	fn parse(&self, stored: &str) -> ClResult<Option<NaiveDateTime>> {
		let s = stored.trim();
		if s.is_empty() {
			return Ok(None);
		}
		self.formats
			.parse_first(
				s,
				|s, fmt| {
					NaiveDateTime::parse_from_str(s, fmt).ok().or_else(|| {
						NaiveDate::parse_from_str(s, fmt).ok().and_then(|d| d.and_hms_opt(0, 0, 0))
					})
				},
				|v, fmt| format_with(v.format(fmt)),
			)
			.map(Some)
			.ok_or_else(|| invalid("Enter a valid date/time."))
	}

	fn serialize(&self, value: &Option<NaiveDateTime>) -> String {
		value.map(|v| format_with(v.format(self.formats.canonical()))).unwrap_or_default()
	}

	fn uninitialized(&self) -> Option<NaiveDateTime> {
		None
	}
}

// DateValue //
//***********//
#[derive(Clone, Debug)]
pub struct DateValue {
	formats: Formats,
}

impl DateValue {
	pub fn new() -> Self {
		Self { formats: Formats::from_static(DATE_INPUT_FORMATS) }
	}

	pub fn with_formats<I, S>(formats: I) -> ClResult<Self>
	where
		I: IntoIterator<Item = S>,
		S: Into<Box<str>>,
	{
		Ok(Self { formats: Formats::custom(formats)? })
	}
}

impl Default for DateValue {
	fn default() -> Self {
		Self::new()
	}
}

impl ValueType for DateValue {
	type Native = Option<NaiveDate>;

	fn kind(&self) -> ValueKind {
		ValueKind::Date
	}

	fn parse(&self, stored: &str) -> ClResult<Option<NaiveDate>> {
		let s = stored.trim();
		if s.is_empty() {
			return Ok(None);
		}
		self.formats
			.parse_first(
				s,
				|s, fmt| NaiveDate::parse_from_str(s, fmt).ok(),
				|v, fmt| format_with(v.format(fmt)),
			)
			.map(Some)
			.ok_or_else(|| invalid("Enter a valid date."))
	}

	fn serialize(&self, value: &Option<NaiveDate>) -> String {
		value.map(|v| format_with(v.format(self.formats.canonical()))).unwrap_or_default()
	}

	fn uninitialized(&self) -> Option<NaiveDate> {
		None
	}
}

// TimeValue //
//***********//
#[derive(Clone, Debug)]
pub struct TimeValue {
	formats: Formats,
}

impl TimeValue {
	pub fn new() -> Self {
		Self { formats: Formats::from_static(TIME_INPUT_FORMATS) }
	}

	pub fn with_formats<I, S>(formats: I) -> ClResult<Self>
	where
		I: IntoIterator<Item = S>,
		S: Into<Box<str>>,
	{
		Ok(Self { formats: Formats::custom(formats)? })
	}
}

impl Default for TimeValue {
	fn default() -> Self {
		Self::new()
	}
}

impl ValueType for TimeValue {
	type Native = Option<NaiveTime>;

	fn kind(&self) -> ValueKind {
		ValueKind::Time
	}

	fn parse(&self, stored: &str) -> ClResult<Option<NaiveTime>> {
		let s = stored.trim();
		if s.is_empty() {
			return Ok(None);
		}
		self.formats
			.parse_first(
				s,
				|s, fmt| NaiveTime::parse_from_str(s, fmt).ok(),
				|v, fmt| format_with(v.format(fmt)),
			)
			.map(Some)
			.ok_or_else(|| invalid("Enter a valid time."))
	}

	fn serialize(&self, value: &Option<NaiveTime>) -> String {
		value.map(|v| format_with(v.format(self.formats.canonical()))).unwrap_or_default()
	}

	fn uninitialized(&self) -> Option<NaiveTime> {
		None
	}
}


// vim: ts=4
