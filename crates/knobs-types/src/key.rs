//! Setting identity: the `(namespace, scope, name)` triple

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::types::TnId;

/// Prefix of every cache key written by the registry
pub const CACHE_PREFIX: &str = "knobs";

static RE_FIELD_NAME: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r"^(.+)__(.*)__(.+)$").ok());

/// Permanent identity of a setting once its owner is known.
///
/// `scope` is the owning type name, or an empty string for settings that
/// belong directly to a namespace.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SettingKey {
	pub namespace: Box<str>,
	pub scope: Box<str>,
	pub name: Box<str>,
}

impl SettingKey {
	pub fn new(
		namespace: impl Into<Box<str>>,
		scope: impl Into<Box<str>>,
		name: impl Into<Box<str>>,
	) -> Self {
		Self { namespace: namespace.into(), scope: scope.into(), name: name.into() }
	}

	pub fn is_namespace_level(&self) -> bool {
		self.scope.is_empty()
	}

	/// Cache key, optionally partitioned by tenant
	pub fn cache_key(&self, tn_id: Option<TnId>) -> String {
		match tn_id {
			Some(tn_id) => format!(
				"{}.{}.{}.{}.{}",
				CACHE_PREFIX, self.namespace, self.scope, self.name, tn_id
			),
			None => format!("{}.{}.{}.{}", CACHE_PREFIX, self.namespace, self.scope, self.name),
		}
	}

	/// Form field name: `namespace__scope__name`
	pub fn field_name(&self) -> String {
		format!("{}__{}__{}", self.namespace, self.scope, self.name)
	}

	/// Parses a form field name produced by [`SettingKey::field_name`]
	pub fn from_field_name(field: &str) -> Option<Self> {
		let caps = RE_FIELD_NAME.as_ref()?.captures(field)?;
		Some(Self::new(caps.get(1)?.as_str(), caps.get(2)?.as_str(), caps.get(3)?.as_str()))
	}
}

impl std::fmt::Display for SettingKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}.{}.{}", self.namespace, self.scope, self.name)
	}
}


// vim: ts=4
