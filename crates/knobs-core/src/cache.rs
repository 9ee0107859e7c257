//! In-process cache adapter backed by an LRU map

use async_trait::async_trait;
use lru::LruCache;
use parking_lot::Mutex;
use std::fmt;
use std::num::NonZeroUsize;

use knobs_types::cache_adapter::CacheAdapter;
use knobs_types::store_adapter::StoredValue;

const FALLBACK_CAPACITY: NonZeroUsize = match NonZeroUsize::new(100) {
	Some(n) => n,
	None => NonZeroUsize::MIN,
};

pub struct LruCacheAdapter {
	cache: Mutex<LruCache<Box<str>, StoredValue>>,
}

impl LruCacheAdapter {
	pub fn new(capacity: usize) -> Self {
		let capacity = NonZeroUsize::new(capacity).unwrap_or(FALLBACK_CAPACITY);
		Self { cache: Mutex::new(LruCache::new(capacity)) }
	}

	pub fn len(&self) -> usize {
		self.cache.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.cache.lock().is_empty()
	}
}

impl fmt::Debug for LruCacheAdapter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let cache = self.cache.lock();
		f.debug_struct("LruCacheAdapter")
			.field("len", &cache.len())
			.field("cap", &cache.cap())
			.finish()
	}
}

#[async_trait]
impl CacheAdapter for LruCacheAdapter {
	async fn get(&self, key: &str) -> Option<StoredValue> {
		self.cache.lock().get(key).cloned()
	}

	async fn set(&self, key: &str, value: StoredValue) {
		self.cache.lock().put(key.into(), value);
	}

	async fn delete(&self, key: &str) {
		self.cache.lock().pop(key);
	}

	async fn clear(&self) {
		self.cache.lock().clear();
	}
}


// vim: ts=4
