//! Groups of setting declarations.
//!
//! A [`Group`] is a reusable template: an ordered set of declarations that
//! only becomes concrete when it is attached to an owner.
//!
//! ```ignore
//! let mut group = Group::new("email_options").verbose_name("E-mail");
//! let host = group.declare("host", StringValue::new()).default("localhost".into()).build()?;
//! let port = group.declare("port", IntegerValue::new()).default(Some(25)).build()?;
//! ```

use std::ops::Add;
use std::sync::Arc;

use knobs_types::utils::{capfirst, description_from_name};

use crate::declaration::{Choice, Declaration, Setting};
use crate::prelude::*;
use crate::value::ValueType;

/// Separator used in editor field names, not allowed in setting names
pub const FIELD_SEPARATOR: &str = "__";

fn check_name(name: &str) -> ClResult<()> {
	let valid_start = name.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
	if !valid_start || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
		return Err(Error::DeclarationConflict(format!("Invalid setting name: '{}'", name)));
	}
	if name.contains(FIELD_SEPARATOR) {
		return Err(Error::DeclarationConflict(format!(
			"Setting name '{}' must not contain '{}'",
			name, FIELD_SEPARATOR
		)));
	}
	Ok(())
}

#[derive(Clone, Debug)]
pub struct Group {
	name: Box<str>,
	verbose_name: Box<str>,
	app_label: Option<Box<str>>,
	declarations: Vec<Arc<Declaration>>,
}

impl Group {
	pub fn new(name: impl Into<Box<str>>) -> Self {
		let name = name.into();
		let verbose_name = capfirst(&description_from_name(&name)).into();
		Self { name, verbose_name, app_label: None, declarations: Vec::new() }
	}

	pub fn verbose_name(mut self, verbose_name: impl Into<Box<str>>) -> Self {
		self.verbose_name = verbose_name.into();
		self
	}

	/// App the settings belong to, overriding the one derived from the namespace
	pub fn app_label(mut self, app_label: impl Into<Box<str>>) -> Self {
		self.app_label = Some(app_label.into());
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn label(&self) -> &str {
		&self.verbose_name
	}

	pub fn app(&self) -> Option<&str> {
		self.app_label.as_deref()
	}

	/// Starts declaring a setting on this group
	pub fn declare<V: ValueType>(
		&mut self,
		name: impl Into<Box<str>>,
		value_type: V,
	) -> DeclarationBuilder<'_, V> {
		DeclarationBuilder {
			group: self,
			name: name.into(),
			value_type,
			description: None,
			help_text: None,
			required: true,
			default: None,
			choices: Vec::new(),
		}
	}

	/// Setting names in declaration order
	pub fn keys(&self) -> Vec<&str> {
		self.declarations.iter().map(|d| d.name()).collect()
	}

	pub fn declarations(&self) -> &[Arc<Declaration>] {
		&self.declarations
	}

	pub fn get(&self, name: &str) -> Option<&Arc<Declaration>> {
		self.declarations.iter().find(|d| d.name() == name)
	}

	pub fn len(&self) -> usize {
		self.declarations.len()
	}

	pub fn is_empty(&self) -> bool {
		self.declarations.is_empty()
	}

	fn insert(&mut self, decl: Declaration) -> ClResult<()> {
		if self.get(decl.name()).is_some() {
			return Err(Error::DeclarationConflict(format!(
				"Setting '{}' is declared twice in group '{}'",
				decl.name(),
				self.name
			)));
		}
		let counter = decl.creation_counter();
		let pos = self.declarations.partition_point(|d| d.creation_counter() <= counter);
		self.declarations.insert(pos, Arc::new(decl));
		Ok(())
	}

	/// Combines two groups: `self`'s settings followed by `other`'s, each
	/// copied and renumbered. Handles of either group resolve on the result.
	pub fn merge(&self, other: &Group) -> ClResult<Group> {
		let mut merged = Group {
			name: format!("{}+{}", self.name, other.name).into(),
			verbose_name: self.verbose_name.clone(),
			app_label: self.app_label.clone().or_else(|| other.app_label.clone()),
			declarations: Vec::with_capacity(self.len() + other.len()),
		};
		for decl in self.declarations.iter().chain(other.declarations.iter()) {
			merged.insert(decl.renumbered())?;
		}
		Ok(merged)
	}
}

impl Add for &Group {
	type Output = ClResult<Group>;

	fn add(self, other: &Group) -> ClResult<Group> {
		self.merge(other)
	}
}

/// Collects the attributes of one declaration
#[derive(Debug)]
pub struct DeclarationBuilder<'a, V: ValueType> {
	group: &'a mut Group,
	name: Box<str>,
	value_type: V,
	description: Option<Box<str>>,
	help_text: Option<Box<str>>,
	required: bool,
	default: Option<V::Native>,
	choices: Vec<Choice>,
}

impl<V: ValueType> DeclarationBuilder<'_, V> {
	/// Defaults to the name with underscores replaced by spaces
	pub fn description(mut self, description: impl Into<Box<str>>) -> Self {
		self.description = Some(description.into());
		self
	}

	pub fn help_text(mut self, help_text: impl Into<Box<str>>) -> Self {
		self.help_text = Some(help_text.into());
		self
	}

	/// Whether the editor rejects blank input (defaults to true)
	pub fn required(mut self, required: bool) -> Self {
		self.required = required;
		self
	}

	pub fn default(mut self, default: V::Native) -> Self {
		self.default = Some(default);
		self
	}

	pub fn choice(mut self, value: impl Into<Box<str>>, label: impl Into<Box<str>>) -> Self {
		self.choices.push(Choice::new(value, label));
		self
	}

	pub fn choices<I, S, L>(mut self, choices: I) -> Self
	where
		I: IntoIterator<Item = (S, L)>,
		S: Into<Box<str>>,
		L: Into<Box<str>>,
	{
		self.choices.extend(choices.into_iter().map(|(v, l)| Choice::new(v, l)));
		self
	}

	pub fn build(self) -> ClResult<Setting<V>> {
		check_name(&self.name)?;
		let mut decl = Declaration::new(&self.name, self.value_type, self.default);
		decl.configure(self.description, self.help_text, self.required, self.choices);
		let handle = Setting::new(&decl);
		self.group.insert(decl)?;
		debug!("Declared setting {} on group {}", handle.name(), self.group.name);
		Ok(handle)
	}
}


// vim: ts=4
