//! Filesystem media adapter. Stores uploaded files under a root directory,
//! addressed by their relative path.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::{
	fs::{File, create_dir_all, metadata},
	io::{AsyncReadExt, AsyncWriteExt},
};

use knobs::{media_adapter, prelude::*};

/// Resolves a relative media path below the root, rejecting anything that
/// would escape it
fn file_path(root: &Path, path: &str) -> ClResult<PathBuf> {
	let rel = Path::new(path);
	if path.is_empty() || !rel.components().all(|c| matches!(c, Component::Normal(_))) {
		return Err(Error::ValidationError(format!("Invalid media path '{}'", path)));
	}
	Ok(root.join(rel))
}

#[derive(Debug)]
pub struct MediaAdapterFs {
	root: Box<Path>,
}

impl MediaAdapterFs {
	pub async fn new(root: impl Into<PathBuf>) -> ClResult<Self> {
		let root = root.into();
		create_dir_all(&root).await?;
		Ok(Self { root: root.into_boxed_path() })
	}

	pub fn root(&self) -> &Path {
		&self.root
	}
}

#[async_trait]
impl media_adapter::MediaAdapter for MediaAdapterFs {
	async fn store_file(&self, path: &str, data: &[u8]) -> ClResult<()> {
		let full = file_path(&self.root, path)?;
		debug!("store_file: {:?}", full);
		if let Some(parent) = full.parent() {
			create_dir_all(parent).await?;
		}

		let mut file = File::create(&full).await?;
		file.write_all(data).await?;
		file.sync_all().await?;

		Ok(())
	}

	async fn read_file(&self, path: &str) -> ClResult<Box<[u8]>> {
		let mut file =
			File::open(file_path(&self.root, path)?).await.map_err(|_| Error::NotFound)?;
		let mut buf: Vec<u8> = Vec::new();
		file.read_to_end(&mut buf).await?;

		Ok(buf.into_boxed_slice())
	}

	async fn stat_file(&self, path: &str) -> Option<u64> {
		let full = file_path(&self.root, path).ok()?;
		let file_metadata = metadata(&full).await.ok()?;
		file_metadata.is_file().then_some(file_metadata.len())
	}
}


// vim: ts=4
