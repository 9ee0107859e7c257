//! Durable settings store adapter trait and record types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::key::SettingKey;
use crate::prelude::*;
use crate::types::Timestamp;

/// One persisted setting row.
///
/// `tn_id` is `None` unless tenant partitioning is enabled.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SettingRow {
	pub key: SettingKey,
	pub value: Box<str>,
	pub tn_id: Option<TnId>,
	pub updated_at: Timestamp,
}

/// Value handed out by the cache layer.
///
/// A value with `persisted == false` is synthesized from the declaration's
/// default; it is cached but never written to the durable store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredValue {
	pub value: Box<str>,
	pub persisted: bool,
	pub updated_at: Option<Timestamp>,
}

impl StoredValue {
	pub fn transient(default: impl Into<Box<str>>) -> Self {
		Self { value: default.into(), persisted: false, updated_at: None }
	}
}

impl From<SettingRow> for StoredValue {
	fn from(row: SettingRow) -> Self {
		Self { value: row.value, persisted: true, updated_at: Some(row.updated_at) }
	}
}

#[async_trait]
pub trait StoreAdapter: Debug + Send + Sync {
	/// Reads a single row. `Ok(None)` means there is no row; it is not an error.
	async fn read_setting(&self, tn_id: Option<TnId>, key: &SettingKey)
	-> ClResult<Option<SettingRow>>;

	/// Inserts or replaces a row
	async fn write_setting(&self, tn_id: Option<TnId>, key: &SettingKey, value: &str)
	-> ClResult<()>;

	/// Deletes a row, returns whether one existed
	async fn delete_setting(&self, tn_id: Option<TnId>, key: &SettingKey) -> ClResult<bool>;

	/// Lists stored rows, optionally restricted to one namespace
	async fn list_settings(
		&self,
		tn_id: Option<TnId>,
		namespace: Option<&str>,
	) -> ClResult<Vec<SettingRow>>;
}

// vim: ts=4
