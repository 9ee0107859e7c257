//! Read-through / write-through cache in front of the durable store.
//!
//! Reads consult the cache first and fall back to the store. A missing row is
//! cached as a transient value holding the declared default, so an unset
//! setting costs one store round trip per cache lifetime. Writes go to the
//! store first and then delete the cache entry; the next read (in any process
//! sharing the cache) repopulates it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use knobs_types::cache_adapter::CacheAdapter;
use knobs_types::store_adapter::{SettingRow, StoreAdapter, StoredValue};

use crate::declaration::Declaration;
use crate::opts::SettingsOpts;
use crate::prelude::*;

/// Counters of the operations that reached the durable store or the cache
#[derive(Debug, Default)]
pub struct StoreStats {
	durable_reads: AtomicU64,
	durable_writes: AtomicU64,
	invalidations: AtomicU64,
}

impl StoreStats {
	pub fn durable_reads(&self) -> u64 {
		self.durable_reads.load(Ordering::Relaxed)
	}

	pub fn durable_writes(&self) -> u64 {
		self.durable_writes.load(Ordering::Relaxed)
	}

	pub fn invalidations(&self) -> u64 {
		self.invalidations.load(Ordering::Relaxed)
	}
}

#[derive(Debug)]
pub struct CachedStore {
	store: Arc<dyn StoreAdapter>,
	cache: Option<Arc<dyn CacheAdapter>>,
	use_tenants: bool,
	value_length: usize,
	stats: StoreStats,
}

impl CachedStore {
	/// `cache` is ignored when `opts.use_cache` is off
	pub fn new(
		store: Arc<dyn StoreAdapter>,
		cache: Option<Arc<dyn CacheAdapter>>,
		opts: &SettingsOpts,
	) -> Self {
		Self {
			store,
			cache: cache.filter(|_| opts.use_cache),
			use_tenants: opts.use_tenants,
			value_length: opts.value_length,
			stats: StoreStats::default(),
		}
	}

	pub fn stats(&self) -> &StoreStats {
		&self.stats
	}

	pub fn store(&self) -> &Arc<dyn StoreAdapter> {
		&self.store
	}

	fn tn_id(&self, ctx: &Context) -> Option<TnId> {
		if self.use_tenants { Some(ctx.tn_id) } else { None }
	}

	/// Returns the stored value of a declaration, or a transient value with
	/// its default when nothing is stored
	pub async fn get(&self, ctx: &Context, decl: &Declaration) -> ClResult<StoredValue> {
		let tn_id = self.tn_id(ctx);
		let cache_key = decl.key().cache_key(tn_id);
		if let Some(cache) = &self.cache
			&& let Some(value) = cache.get(&cache_key).await
		{
			// A missing row is cached as a marker, the default always comes
			// from the declaration being read
			if !value.persisted {
				return Ok(StoredValue::transient(decl.default_serialized()));
			}
			return Ok(value);
		}

		self.stats.durable_reads.fetch_add(1, Ordering::Relaxed);
		let value = match self.store.read_setting(tn_id, decl.key()).await? {
			Some(row) => StoredValue::from(row),
			None => StoredValue::transient(decl.default_serialized()),
		};
		if let Some(cache) = &self.cache {
			cache.set(&cache_key, value.clone()).await;
		}
		Ok(value)
	}

	/// Writes a value and invalidates its cache entry
	pub async fn set(&self, ctx: &Context, key: &SettingKey, value: &str) -> ClResult<()> {
		let len = value.chars().count();
		if len > self.value_length {
			return Err(Error::ValidationError(format!(
				"Ensure this value has at most {} characters (it has {}).",
				self.value_length, len
			)));
		}
		let tn_id = self.tn_id(ctx);
		self.stats.durable_writes.fetch_add(1, Ordering::Relaxed);
		self.store.write_setting(tn_id, key, value).await?;
		self.evict(tn_id, key).await;
		Ok(())
	}

	/// Removes a stored value, reads fall back to the default afterwards
	pub async fn delete(&self, ctx: &Context, key: &SettingKey) -> ClResult<bool> {
		let tn_id = self.tn_id(ctx);
		let deleted = self.store.delete_setting(tn_id, key).await?;
		self.evict(tn_id, key).await;
		Ok(deleted)
	}

	/// Whether a row exists in the durable store, ignoring the cache
	pub async fn contains(&self, ctx: &Context, key: &SettingKey) -> ClResult<bool> {
		let tn_id = self.tn_id(ctx);
		Ok(self.store.read_setting(tn_id, key).await?.is_some())
	}

	/// Drops the cache entry of a key, e.g. after the row changed out of band
	pub async fn invalidate(&self, ctx: &Context, key: &SettingKey) {
		self.evict(self.tn_id(ctx), key).await;
	}

	pub async fn list(&self, ctx: &Context, namespace: Option<&str>) -> ClResult<Vec<SettingRow>> {
		self.store.list_settings(self.tn_id(ctx), namespace).await
	}

	async fn evict(&self, tn_id: Option<TnId>, key: &SettingKey) {
		if let Some(cache) = &self.cache {
			self.stats.invalidations.fetch_add(1, Ordering::Relaxed);
			cache.delete(&key.cache_key(tn_id)).await;
		}
	}
}


// vim: ts=4
