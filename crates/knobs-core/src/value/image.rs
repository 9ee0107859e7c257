//! Image settings.
//!
//! The setting holds a path relative to the media adapter's root. Uploaded
//! files get a fresh, content-independent name so browsers never serve a
//! stale cached image.

use sha2::{Digest, Sha256};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use knobs_types::media_adapter::{MediaAdapter, Upload};

use super::{ValueKind, ValueType};
use crate::prelude::*;

#[derive(Clone, Debug, Default)]
pub struct ImageValue {
	upload_to: Box<str>,
}

impl ImageValue {
	pub fn new() -> Self {
		Self::default()
	}

	/// Directory, relative to the media root, uploads are stored in
	pub fn upload_to(mut self, dir: impl Into<Box<str>>) -> Self {
		self.upload_to = dir.into();
		self
	}

	/// Generates the stored path for an uploaded file, keeping its extension
	pub fn stored_name(&self, original: &str) -> String {
		let nanos = SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.as_nanos());
		let mut hasher = Sha256::new();
		hasher.update(nanos.to_le_bytes());
		hasher.update(original.as_bytes());
		let digest = format!("{:x}", hasher.finalize());
		let stem = &digest[..32];

		let file_name = match Path::new(original).extension().and_then(|ext| ext.to_str()) {
			Some(ext) => format!("{}.{}", stem, ext.to_ascii_lowercase()),
			None => stem.to_owned(),
		};
		let dir = self.upload_to.trim_matches('/');
		if dir.is_empty() { file_name } else { format!("{}/{}", dir, file_name) }
	}

	/// Stores an upload through the media adapter. An empty upload stores
	/// nothing and returns `None`.
	pub async fn save_upload(
		&self,
		media: &dyn MediaAdapter,
		upload: &Upload,
	) -> ClResult<Option<Box<str>>> {
		if upload.data.is_empty() {
			return Ok(None);
		}
		let path = self.stored_name(&upload.name);
		media.store_file(&path, &upload.data).await?;
		debug!("Stored image {} as {}", upload.name, path);
		Ok(Some(path.into()))
	}
}

impl ValueType for ImageValue {
	type Native = Option<Box<str>>;

	fn kind(&self) -> ValueKind {
		ValueKind::Image
	}

	fn parse(&self, stored: &str) -> ClResult<Option<Box<str>>> {
		let s = stored.trim();
		Ok(if s.is_empty() { None } else { Some(s.into()) })
	}

	fn serialize(&self, value: &Option<Box<str>>) -> String {
		value.as_deref().unwrap_or_default().to_owned()
	}

	fn uninitialized(&self) -> Option<Box<str>> {
		None
	}

	fn keeps_on_blank(&self) -> bool {
		true
	}
}


// vim: ts=4
