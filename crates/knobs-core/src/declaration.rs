//! Setting declarations.
//!
//! A [`Declaration`] carries everything known about one setting: its key,
//! metadata for an editing layer, and a type-erased value type with its
//! default. Typed access goes through [`Setting`] handles.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use knobs_types::store_adapter::StoredValue;
use knobs_types::utils::{capfirst, description_from_name};

use crate::prelude::*;
use crate::value::{ValueKind, ValueType};

static CREATION_COUNTER: AtomicU64 = AtomicU64::new(0);
static LINEAGE: AtomicU64 = AtomicU64::new(0);

/// Next value of the process-wide creation counter
pub fn next_counter() -> u64 {
	CREATION_COUNTER.fetch_add(1, Ordering::Relaxed)
}

fn next_lineage() -> u64 {
	LINEAGE.fetch_add(1, Ordering::Relaxed)
}

/// One allowed value of a setting with choices
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
	pub value: Box<str>,
	pub label: Box<str>,
}

impl Choice {
	pub fn new(value: impl Into<Box<str>>, label: impl Into<Box<str>>) -> Self {
		Self { value: value.into(), label: label.into() }
	}
}

/// Type-erased value operations used by the registry and editing layers
pub trait DynValue: Debug + Send + Sync {
	fn kind(&self) -> ValueKind;

	/// The declared default in storage form
	fn default_serialized(&self) -> String;

	/// Validates user input, returns it in storage form
	fn clean(&self, input: &str, required: bool) -> ClResult<String>;

	/// Checks that a storage-form value parses
	fn check(&self, serialized: &str) -> ClResult<()>;

	/// Value shown in an editing control
	fn editor_value(&self, stored: &StoredValue) -> String;

	/// Whether `serialized` differs from the stored value
	fn differs(&self, stored: &StoredValue, serialized: &str) -> bool;

	fn keeps_on_blank(&self) -> bool;

	fn default_help_text(&self) -> Option<&'static str>;

	fn as_any(&self) -> &dyn Any;
}

/// A value type together with its declared default
#[derive(Debug)]
pub struct Typed<V: ValueType> {
	pub value_type: V,
	pub default: Option<V::Native>,
}

impl<V: ValueType> Typed<V> {
	pub fn default_value(&self) -> V::Native {
		self.default.clone().unwrap_or_else(|| self.value_type.uninitialized())
	}

	/// Native value of a stored value.
	///
	/// A value that was never persisted yields the default. A persisted value
	/// that no longer parses yields the uninitialized value.
	pub fn current(&self, stored: &StoredValue) -> V::Native {
		if !stored.persisted {
			return self.default_value();
		}
		match self.value_type.parse(&stored.value) {
			Ok(value) => value,
			Err(err) => {
				warn!("Stored value {:?} does not parse: {}", stored.value, err);
				self.value_type.uninitialized()
			}
		}
	}
}

impl<V: ValueType> DynValue for Typed<V> {
	fn kind(&self) -> ValueKind {
		self.value_type.kind()
	}

	fn default_serialized(&self) -> String {
		self.value_type.serialize(&self.default_value())
	}

	fn clean(&self, input: &str, required: bool) -> ClResult<String> {
		let value = self.value_type.clean(input, required)?;
		Ok(self.value_type.serialize(&value))
	}

	fn check(&self, serialized: &str) -> ClResult<()> {
		self.value_type.parse(serialized).map(|_| ())
	}

	fn editor_value(&self, stored: &StoredValue) -> String {
		self.value_type.to_editor(&self.current(stored))
	}

	fn differs(&self, stored: &StoredValue, serialized: &str) -> bool {
		match self.value_type.parse(serialized) {
			Ok(value) => value != self.current(stored),
			Err(_) => *stored.value != *serialized,
		}
	}

	fn keeps_on_blank(&self) -> bool {
		self.value_type.keeps_on_blank()
	}

	fn default_help_text(&self) -> Option<&'static str> {
		self.value_type.default_help_text()
	}

	fn as_any(&self) -> &dyn Any {
		self
	}
}

/// A setting declaration.
///
/// Until its group is attached to an owner the key only holds the name.
#[derive(Clone, Debug)]
pub struct Declaration {
	key: SettingKey,
	app: Box<str>,
	description: Box<str>,
	help_text: Option<Box<str>>,
	required: bool,
	choices: Vec<Choice>,
	verbose_name: Box<str>,
	creation_counter: u64,
	lineage: u64,
	value: Arc<dyn DynValue>,
}

impl Declaration {
	pub(crate) fn new<V: ValueType>(
		name: &str,
		value_type: V,
		default: Option<V::Native>,
	) -> Self {
		Self {
			key: SettingKey::new("", "", name),
			app: Box::default(),
			description: description_from_name(name).into(),
			help_text: None,
			required: true,
			choices: Vec::new(),
			verbose_name: Box::default(),
			creation_counter: next_counter(),
			lineage: next_lineage(),
			value: Arc::new(Typed { value_type, default }),
		}
	}

	pub(crate) fn configure(
		&mut self,
		description: Option<Box<str>>,
		help_text: Option<Box<str>>,
		required: bool,
		choices: Vec<Choice>,
	) {
		if let Some(description) = description {
			self.description = description;
		}
		self.help_text = help_text;
		self.required = required;
		self.choices = choices;
	}

	pub fn key(&self) -> &SettingKey {
		&self.key
	}

	pub fn name(&self) -> &str {
		&self.key.name
	}

	pub fn namespace(&self) -> &str {
		&self.key.namespace
	}

	pub fn scope(&self) -> &str {
		&self.key.scope
	}

	pub fn app(&self) -> &str {
		&self.app
	}

	pub fn description(&self) -> &str {
		&self.description
	}

	/// Declared help text, or the value type's own hint
	pub fn help_text(&self) -> Option<&str> {
		self.help_text.as_deref().or_else(|| self.value.default_help_text())
	}

	pub fn required(&self) -> bool {
		self.required
	}

	pub fn choices(&self) -> &[Choice] {
		&self.choices
	}

	pub fn verbose_name(&self) -> &str {
		&self.verbose_name
	}

	pub fn creation_counter(&self) -> u64 {
		self.creation_counter
	}

	pub fn kind(&self) -> ValueKind {
		self.value.kind()
	}

	pub fn value(&self) -> &dyn DynValue {
		&*self.value
	}

	/// Where the setting lives: its scope, or its namespace for
	/// namespace-level settings
	pub fn location(&self) -> &str {
		if self.key.is_namespace_level() { &self.key.namespace } else { &self.key.scope }
	}

	/// Permission an actor needs to edit this setting. Namespace-level
	/// settings share `<app>.can_edit__settings`.
	pub fn permission_codename(&self) -> String {
		format!("{}.can_edit_{}_settings", self.app, self.key.scope.to_lowercase())
	}

	/// Label of the permission, for hosts that create it
	pub fn permission_label(&self) -> String {
		let name = if self.verbose_name.is_empty() { self.location() } else { &self.verbose_name };
		format!("Can edit {} settings", name)
	}

	/// Label shown in an editing layer
	pub fn label(&self) -> String {
		capfirst(&self.description)
	}

	pub fn default_serialized(&self) -> String {
		self.value.default_serialized()
	}

	pub fn editor_value(&self, stored: &StoredValue) -> String {
		self.value.editor_value(stored)
	}

	/// Validates user input against the value type, the required flag and
	/// the choices. Returns the storage form.
	pub fn clean(&self, input: &str) -> ClResult<String> {
		let cleaned = self.value.clean(input, self.required)?;
		self.check_choice(&cleaned)?;
		Ok(cleaned)
	}

	/// Validates a storage-form value written by application code.
	/// The required flag is not enforced.
	pub fn check(&self, serialized: &str) -> ClResult<()> {
		self.value.check(serialized)?;
		self.check_choice(serialized)
	}

	fn check_choice(&self, serialized: &str) -> ClResult<()> {
		if self.choices.is_empty()
			|| serialized.is_empty()
			|| self.choices.iter().any(|c| *c.value == *serialized)
		{
			return Ok(());
		}
		Err(Error::ValidationError(format!(
			"Select a valid choice. {} is not one of the available choices.",
			serialized
		)))
	}

	/// Typed view of the value, if `V` is the declared value type
	pub fn typed<V: ValueType>(&self) -> Option<&Typed<V>> {
		self.value.as_any().downcast_ref::<Typed<V>>()
	}

	/// Copy with the same metadata and creation counter
	pub fn copy(&self) -> Self {
		self.clone()
	}

	/// Copy with a fresh creation counter
	pub(crate) fn renumbered(&self) -> Self {
		Self { creation_counter: next_counter(), ..self.clone() }
	}

	pub(crate) fn with_key(&self, key: SettingKey) -> Self {
		Self { key, ..self.clone() }
	}

	pub(crate) fn finalize(
		&self,
		namespace: &str,
		scope: &str,
		app: &str,
		verbose_name: &str,
	) -> Self {
		let mut decl = self.renumbered();
		decl.key = SettingKey::new(namespace, scope, &*self.key.name);
		decl.app = app.into();
		if decl.verbose_name.is_empty() {
			decl.verbose_name = verbose_name.into();
		}
		decl
	}

	pub(crate) fn set_app(&mut self, app: &str) {
		self.app = app.into();
	}

	pub(crate) fn lineage(&self) -> u64 {
		self.lineage
	}
}

/// Typed handle of a declared setting.
///
/// Returned by [`crate::group::DeclarationBuilder::build`] and resolved
/// against an attached group to read or write the value.
#[derive(Debug)]
pub struct Setting<V: ValueType> {
	name: Box<str>,
	lineage: u64,
	_type: PhantomData<fn() -> V>,
}

impl<V: ValueType> Setting<V> {
	pub(crate) fn new(decl: &Declaration) -> Self {
		Self { name: decl.name().into(), lineage: decl.lineage, _type: PhantomData }
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub(crate) fn lineage(&self) -> u64 {
		self.lineage
	}
}

impl<V: ValueType> Clone for Setting<V> {
	fn clone(&self) -> Self {
		Self { name: self.name.clone(), lineage: self.lineage, _type: PhantomData }
	}
}


// vim: ts=4
