//! Typed setting kinds.
//!
//! Every setting is persisted as a string. A [`ValueType`] converts between
//! that string and the native value handed to application code, and decides
//! what "no value yet" looks like for its kind.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::prelude::*;

mod boolean;
mod datetime;
mod duration;
mod image;
mod numeric;
mod text;

pub use boolean::BooleanValue;
pub use datetime::{
	DATE_INPUT_FORMATS, DATETIME_INPUT_FORMATS, DateTimeValue, DateValue, TIME_INPUT_FORMATS,
	TimeValue,
};
pub use duration::DurationValue;
pub use image::ImageValue;
pub use numeric::{DecimalValue, FloatValue, IntegerValue, PercentValue, PositiveIntegerValue};
pub use text::{EmailValue, MultiSeparatorValue, PasswordValue, StringValue, TextValue};

pub const MSG_REQUIRED: &str = "This field is required.";

/// Kind of a value type, lets an editing layer pick a suitable control
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
	Boolean,
	Integer,
	PositiveInteger,
	Float,
	Decimal,
	Percent,
	String,
	Text,
	Email,
	Password,
	MultiSeparator,
	DateTime,
	Date,
	Time,
	Image,
	Duration,
}

/// Conversion between the persisted string form and a native value
pub trait ValueType: Debug + Send + Sync + 'static {
	type Native: Clone + PartialEq + Debug + Send + Sync + 'static;

	fn kind(&self) -> ValueKind;

	/// Storage (or user input) to native value
	fn parse(&self, stored: &str) -> ClResult<Self::Native>;

	/// Native value to storage
	fn serialize(&self, value: &Self::Native) -> String;

	/// Value used when nothing is stored and no default was declared
	fn uninitialized(&self) -> Self::Native;

	/// Whether the input counts as "no value"
	fn is_empty(&self, stored: &str) -> bool {
		stored.trim().is_empty()
	}

	/// Value shown in an editing control
	fn to_editor(&self, value: &Self::Native) -> String {
		self.serialize(value)
	}

	/// Blank input is a regular value for this kind, never "missing"
	fn blank_allowed(&self) -> bool {
		false
	}

	/// Blank input in an editor keeps the current value
	fn keeps_on_blank(&self) -> bool {
		false
	}

	fn default_help_text(&self) -> Option<&'static str> {
		None
	}

	/// Validates user input.
	///
	/// Empty input is rejected when `required`, otherwise it yields
	/// [`ValueType::uninitialized`].
	fn clean(&self, input: &str, required: bool) -> ClResult<Self::Native> {
		if self.is_empty(input) && !self.blank_allowed() {
			if required {
				return Err(Error::ValidationError(MSG_REQUIRED.into()));
			}
			return Ok(self.uninitialized());
		}
		self.parse(input)
	}
}

pub(crate) fn invalid(msg: impl Into<String>) -> Error {
	Error::ValidationError(msg.into())
}

// vim: ts=4
