//! Settings builder - wires adapters and options into a [`Settings`] service

use std::sync::Arc;

use knobs_core::cache::LruCacheAdapter;
use knobs_core::opts::{SettingsOpts, StoreFallback};
use knobs_core::registry::Registry;
use knobs_core::store::CachedStore;
use knobs_types::cache_adapter::CacheAdapter;
use knobs_types::media_adapter::MediaAdapter;
use knobs_types::store_adapter::StoreAdapter;

use crate::prelude::*;

#[derive(Debug, Default)]
pub struct SettingsBuilder {
	opts: SettingsOpts,
	registry: Option<Arc<Registry>>,
	store_adapter: Option<Arc<dyn StoreAdapter>>,
	cache_adapter: Option<Arc<dyn CacheAdapter>>,
	media_adapter: Option<Arc<dyn MediaAdapter>>,
}

impl SettingsBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Starts from options read from `KNOBS_*` environment variables
	pub fn from_env() -> ClResult<Self> {
		Ok(Self { opts: SettingsOpts::from_env()?, ..Self::default() })
	}

	// Opts
	pub fn opts(&mut self, opts: SettingsOpts) -> &mut Self {
		self.opts = opts;
		self
	}

	pub fn use_cache(&mut self, use_cache: bool) -> &mut Self {
		self.opts.use_cache = use_cache;
		self
	}

	pub fn use_tenants(&mut self, use_tenants: bool) -> &mut Self {
		self.opts.use_tenants = use_tenants;
		self
	}

	pub fn value_length(&mut self, value_length: usize) -> &mut Self {
		self.opts.value_length = value_length;
		self
	}

	pub fn cache_capacity(&mut self, cache_capacity: usize) -> &mut Self {
		self.opts.cache_capacity = cache_capacity;
		self
	}

	pub fn store_fallback(&mut self, store_fallback: StoreFallback) -> &mut Self {
		self.opts.store_fallback = store_fallback;
		self
	}

	/// Shares a registry between several services
	pub fn registry(&mut self, registry: Arc<Registry>) -> &mut Self {
		self.registry = Some(registry);
		self
	}

	// Adapters
	pub fn store_adapter(&mut self, store_adapter: Arc<dyn StoreAdapter>) -> &mut Self {
		self.store_adapter = Some(store_adapter);
		self
	}

	/// Defaults to an in-process LRU cache when caching is enabled
	pub fn cache_adapter(&mut self, cache_adapter: Arc<dyn CacheAdapter>) -> &mut Self {
		self.cache_adapter = Some(cache_adapter);
		self
	}

	pub fn media_adapter(&mut self, media_adapter: Arc<dyn MediaAdapter>) -> &mut Self {
		self.media_adapter = Some(media_adapter);
		self
	}

	pub fn build(&self) -> ClResult<Settings> {
		let Some(store_adapter) = self.store_adapter.clone() else {
			error!("FATAL: No store adapter configured");
			return Err(Error::ConfigError("No store adapter configured".into()));
		};
		if self.opts.value_length == 0 {
			return Err(Error::ConfigError("value_length must be positive".into()));
		}

		let cache = if self.opts.use_cache {
			Some(self.cache_adapter.clone().unwrap_or_else(|| {
				Arc::new(LruCacheAdapter::new(self.opts.cache_capacity)) as Arc<dyn CacheAdapter>
			}))
		} else {
			None
		};
		let store = CachedStore::new(store_adapter, cache, &self.opts);
		let registry = self.registry.clone().unwrap_or_default();

		info!(
			"Settings initialized (cache: {}, tenants: {}, fallback: {})",
			self.opts.use_cache, self.opts.use_tenants, self.opts.store_fallback
		);
		Ok(Settings::new(registry, Arc::new(store), self.media_adapter.clone(), self.opts.clone()))
	}
}


// vim: ts=4
