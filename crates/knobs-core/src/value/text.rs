//! String-like values

use regex::Regex;
use std::sync::LazyLock;

use super::{ValueKind, ValueType, invalid};
use crate::prelude::*;

static RE_EMAIL: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@.]+$").ok());

/// Single-line text
#[derive(Clone, Debug, Default)]
pub struct StringValue;

impl StringValue {
	pub fn new() -> Self {
		Self
	}
}

impl ValueType for StringValue {
	type Native = String;

	fn kind(&self) -> ValueKind {
		ValueKind::String
	}

	fn parse(&self, stored: &str) -> ClResult<String> {
		Ok(stored.to_owned())
	}

	fn serialize(&self, value: &String) -> String {
		value.clone()
	}

	fn uninitialized(&self) -> String {
		String::new()
	}
}

/// Multi-line text
#[derive(Clone, Debug, Default)]
pub struct TextValue;

impl TextValue {
	pub fn new() -> Self {
		Self
	}
}

impl ValueType for TextValue {
	type Native = String;

	fn kind(&self) -> ValueKind {
		ValueKind::Text
	}

	fn parse(&self, stored: &str) -> ClResult<String> {
		Ok(stored.to_owned())
	}

	fn serialize(&self, value: &String) -> String {
		value.clone()
	}

	fn uninitialized(&self) -> String {
		String::new()
	}
}

#[derive(Clone, Debug, Default)]
pub struct EmailValue;

impl EmailValue {
	pub fn new() -> Self {
		Self
	}
}

impl ValueType for EmailValue {
	type Native = String;

	fn kind(&self) -> ValueKind {
		ValueKind::Email
	}

	fn parse(&self, stored: &str) -> ClResult<String> {
		let s = stored.trim();
		if s.is_empty() {
			return Ok(String::new());
		}
		match RE_EMAIL.as_ref() {
			Some(re) if re.is_match(s) => Ok(s.to_owned()),
			_ => Err(invalid("Enter a valid email address.")),
		}
	}

	fn serialize(&self, value: &String) -> String {
		value.clone()
	}

	fn uninitialized(&self) -> String {
		String::new()
	}
}

/// Secret text; an editor never has to resubmit it to keep it
#[derive(Clone, Debug, Default)]
pub struct PasswordValue;

impl PasswordValue {
	pub fn new() -> Self {
		Self
	}
}

impl ValueType for PasswordValue {
	type Native = String;

	fn kind(&self) -> ValueKind {
		ValueKind::Password
	}

	fn parse(&self, stored: &str) -> ClResult<String> {
		Ok(stored.to_owned())
	}

	fn serialize(&self, value: &String) -> String {
		value.clone()
	}

	fn uninitialized(&self) -> String {
		String::new()
	}

	fn to_editor(&self, _value: &String) -> String {
		String::new()
	}

	fn keeps_on_blank(&self) -> bool {
		true
	}

	fn default_help_text(&self) -> Option<&'static str> {
		Some("Leave empty in order to retain old password. Provide new value to change.")
	}
}

/// List of strings stored joined by a separator.
///
/// `"a@b.com; c@d.com"` with the default `;` separator reads back as
/// `["a@b.com", "c@d.com"]`.
#[derive(Clone, Debug)]
pub struct MultiSeparatorValue {
	separator: Box<str>,
}

impl MultiSeparatorValue {
	pub const DEFAULT_SEPARATOR: &'static str = ";";

	pub fn new() -> Self {
		Self { separator: Self::DEFAULT_SEPARATOR.into() }
	}

	pub fn with_separator(separator: impl Into<Box<str>>) -> Self {
		let separator: Box<str> = separator.into();
		if separator.is_empty() {
			return Self::new();
		}
		Self { separator }
	}

	pub fn separator(&self) -> &str {
		&self.separator
	}
}

impl Default for MultiSeparatorValue {
	fn default() -> Self {
		Self::new()
	}
}

impl ValueType for MultiSeparatorValue {
	type Native = Vec<String>;

	fn kind(&self) -> ValueKind {
		ValueKind::MultiSeparator
	}

	fn parse(&self, stored: &str) -> ClResult<Vec<String>> {
		if stored.is_empty() {
			return Ok(Vec::new());
		}
		Ok(stored.split(&*self.separator).map(|item| item.trim().to_owned()).collect())
	}

	fn serialize(&self, value: &Vec<String>) -> String {
		value.join(&self.separator)
	}

	fn uninitialized(&self) -> Vec<String> {
		Vec::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_string_kept_verbatim() {
		let v = StringValue::new();
		assert_eq!(v.parse("Ni!").ok().as_deref(), Some("Ni!"));
		assert_eq!(v.parse("").ok().as_deref(), Some(""));
		assert_eq!(
			v.clean("", true).expect_err("required").user_message(),
			"This field is required."
		);
	}

	#[test]
	fn test_email_validation() {
		let v = EmailValue::new();
		assert_eq!(v.parse(" a@b.com ").ok().as_deref(), Some("a@b.com"));
		assert_eq!(
			v.parse("not-an-email").expect_err("invalid").user_message(),
			"Enter a valid email address."
		);
		assert_eq!(v.parse("").ok().as_deref(), Some(""));
	}

	#[test]
	fn test_password_editor_hides_value() {
		let v = PasswordValue::new();
		assert_eq!(v.to_editor(&"secret".to_owned()), "");
		assert!(v.keeps_on_blank());
		assert!(v.default_help_text().is_some());
	}

	#[test]
	fn test_list_semicolon_trims() {
		let v = MultiSeparatorValue::new();
		assert_eq!(
			v.parse("a@b.com; c@d.com ").ok(),
			Some(vec!["a@b.com".to_owned(), "c@d.com".to_owned()])
		);
	}

	#[test]
	fn test_list_comma_trims() {
		let v = MultiSeparatorValue::with_separator(",");
		assert_eq!(
			v.parse("a@b.com ,c@d.com").ok(),
			Some(vec!["a@b.com".to_owned(), "c@d.com".to_owned()])
		);
	}

	#[test]
	fn test_list_empty() {
		let v = MultiSeparatorValue::new();
		assert_eq!(v.parse("").ok(), Some(Vec::new()));
		assert_eq!(v.serialize(&Vec::new()), "");
	}

	#[test]
	fn test_list_round_trip_strips_elements() {
		let v = MultiSeparatorValue::new();
		let items = vec![" one".to_owned(), "two ".to_owned(), "three".to_owned()];
		let expected: Vec<String> = items.iter().map(|s| s.trim().to_owned()).collect();
		assert_eq!(v.parse(&v.serialize(&items)).ok(), Some(expected));
	}
}

// vim: ts=4
