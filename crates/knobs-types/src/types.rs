//! Common types used throughout the settings registry.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

// TnId //
//******//
/// Tenant (site) identifier used to partition stored settings
#[derive(Clone, Copy, Debug, Default, Hash)]
pub struct TnId(pub u32);

impl std::fmt::Display for TnId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl std::cmp::PartialEq for TnId {
	fn eq(&self, other: &Self) -> bool {
		self.0 == other.0
	}
}

impl std::cmp::Eq for TnId {}

impl Serialize for TnId {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_u32(self.0)
	}
}

impl<'de> Deserialize<'de> for TnId {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		Ok(TnId(u32::deserialize(deserializer)?))
	}
}

// Timestamp //
//***********//
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub i64);

impl std::fmt::Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Serialize for Timestamp {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_i64(self.0)
	}
}

impl<'de> Deserialize<'de> for Timestamp {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		Ok(Timestamp(i64::deserialize(deserializer)?))
	}
}

pub fn now() -> Timestamp {
	let res = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
	Timestamp(i64::try_from(res.as_secs()).unwrap_or(i64::MAX))
}

// Context //
//*********//
/// Per-call execution context: which tenant the call is made for and who makes it
#[derive(Clone, Debug, Default)]
pub struct Context {
	pub tn_id: TnId,
	pub actor: Option<Box<str>>,
}

impl Context {
	/// Context for process-level access (tenant 0, no actor)
	pub fn global() -> Self {
		Self::default()
	}

	pub fn tenant(tn_id: TnId) -> Self {
		Self { tn_id, actor: None }
	}

	pub fn with_actor(mut self, actor: impl Into<Box<str>>) -> Self {
		self.actor = Some(actor.into());
		self
	}
}

// vim: ts=4
