//! Media adapter trait, used by image settings to persist uploaded files.
//!
//! Paths are relative to the adapter's root; the setting itself only stores
//! the relative path.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::prelude::*;

/// An uploaded file as received from the editing layer
#[derive(Clone, Debug)]
pub struct Upload {
	pub name: Box<str>,
	pub data: Box<[u8]>,
}

impl Upload {
	pub fn new(name: impl Into<Box<str>>, data: impl Into<Box<[u8]>>) -> Self {
		Self { name: name.into(), data: data.into() }
	}
}

#[async_trait]
pub trait MediaAdapter: Debug + Send + Sync {
	/// Writes a file, creating parent directories as needed
	async fn store_file(&self, path: &str, data: &[u8]) -> ClResult<()>;

	/// Reads a file
	async fn read_file(&self, path: &str) -> ClResult<Box<[u8]>>;

	/// Checks if a file exists, returns its size
	async fn stat_file(&self, path: &str) -> Option<u64>;
}

// vim: ts=4
