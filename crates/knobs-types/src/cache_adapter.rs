//! Cache adapter trait.
//!
//! The cache is expected to be shared between processes (e.g. an external
//! key-value service), so invalidation done by one process is seen by all.
//! An in-process LRU implementation lives in `knobs-core`.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::store_adapter::StoredValue;

#[async_trait]
pub trait CacheAdapter: Debug + Send + Sync {
	async fn get(&self, key: &str) -> Option<StoredValue>;
	async fn set(&self, key: &str, value: StoredValue);
	async fn delete(&self, key: &str);
	async fn clear(&self);
}

// vim: ts=4
