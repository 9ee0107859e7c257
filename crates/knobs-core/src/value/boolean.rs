use super::{ValueKind, ValueType};
use crate::prelude::*;

const TRUE_VALUES: &[&str] = &["t", "true", "True", "TRUE", "1", "on"];

#[derive(Clone, Copy, Debug, Default)]
pub struct BooleanValue;

impl BooleanValue {
	pub fn new() -> Self {
		Self
	}
}

impl ValueType for BooleanValue {
	type Native = bool;

	fn kind(&self) -> ValueKind {
		ValueKind::Boolean
	}

	fn parse(&self, stored: &str) -> ClResult<bool> {
		Ok(TRUE_VALUES.contains(&stored.trim()))
	}

	fn serialize(&self, value: &bool) -> String {
		if *value { "True".into() } else { "False".into() }
	}

	fn uninitialized(&self) -> bool {
		false
	}

	// An unchecked box submits nothing
	fn blank_allowed(&self) -> bool {
		true
	}
}


// vim: ts=4
