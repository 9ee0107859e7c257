//! In-memory store adapter.
//!
//! Useful for tests and single-process setups that do not need durability.
//! An outage can be simulated with [`MemoryStoreAdapter::set_available`].

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use knobs_types::store_adapter::{SettingRow, StoreAdapter};
use knobs_types::types::now;

use crate::prelude::*;

type RowKey = (Option<TnId>, SettingKey);

/// Tenant 0 is the unpartitioned store, the same as no tenant
fn tn(tn_id: Option<TnId>) -> Option<TnId> {
	tn_id.filter(|tn_id| tn_id.0 != 0)
}

#[derive(Debug)]
pub struct MemoryStoreAdapter {
	rows: RwLock<HashMap<RowKey, SettingRow>>,
	available: AtomicBool,
	reads: AtomicU64,
	writes: AtomicU64,
}

impl Default for MemoryStoreAdapter {
	fn default() -> Self {
		Self::new()
	}
}

impl MemoryStoreAdapter {
	pub fn new() -> Self {
		Self {
			rows: RwLock::new(HashMap::new()),
			available: AtomicBool::new(true),
			reads: AtomicU64::new(0),
			writes: AtomicU64::new(0),
		}
	}

	/// Makes every following call fail with [`Error::DbError`] (or succeed again)
	pub fn set_available(&self, available: bool) {
		self.available.store(available, Ordering::Relaxed);
	}

	/// Number of `read_setting` calls served
	pub fn reads(&self) -> u64 {
		self.reads.load(Ordering::Relaxed)
	}

	/// Number of `write_setting` calls served
	pub fn writes(&self) -> u64 {
		self.writes.load(Ordering::Relaxed)
	}

	/// Removes a row without going through the cache layer, as another
	/// process or an operator would
	pub fn remove_row(&self, tn_id: Option<TnId>, key: &SettingKey) -> bool {
		self.rows.write().remove(&(tn(tn_id), key.clone())).is_some()
	}

	fn check(&self) -> ClResult<()> {
		if self.available.load(Ordering::Relaxed) {
			Ok(())
		} else {
			warn!("DB: memory store unavailable");
			Err(Error::DbError)
		}
	}
}

#[async_trait]
impl StoreAdapter for MemoryStoreAdapter {
	async fn read_setting(
		&self,
		tn_id: Option<TnId>,
		key: &SettingKey,
	) -> ClResult<Option<SettingRow>> {
		self.check()?;
		self.reads.fetch_add(1, Ordering::Relaxed);
		Ok(self.rows.read().get(&(tn(tn_id), key.clone())).cloned())
	}

	async fn write_setting(
		&self,
		tn_id: Option<TnId>,
		key: &SettingKey,
		value: &str,
	) -> ClResult<()> {
		self.check()?;
		self.writes.fetch_add(1, Ordering::Relaxed);
		let tn_id = tn(tn_id);
		let row = SettingRow { key: key.clone(), value: value.into(), tn_id, updated_at: now() };
		self.rows.write().insert((tn_id, key.clone()), row);
		Ok(())
	}

	async fn delete_setting(&self, tn_id: Option<TnId>, key: &SettingKey) -> ClResult<bool> {
		self.check()?;
		Ok(self.remove_row(tn_id, key))
	}

	async fn list_settings(
		&self,
		tn_id: Option<TnId>,
		namespace: Option<&str>,
	) -> ClResult<Vec<SettingRow>> {
		self.check()?;
		let tn_id = tn(tn_id);
		let mut rows: Vec<SettingRow> = self
			.rows
			.read()
			.values()
			.filter(|row| row.tn_id == tn_id)
			.filter(|row| namespace.is_none_or(|ns| *row.key.namespace == *ns))
			.cloned()
			.collect();
		rows.sort_by(|a, b| a.key.cmp(&b.key));
		Ok(rows)
	}
}


// vim: ts=4
