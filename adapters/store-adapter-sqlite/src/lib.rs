//! SQLite store adapter for knobs settings

#![forbid(unsafe_code)]

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};
use std::path::Path;

use knobs::prelude::*;
use knobs::store_adapter::{SettingRow, StoreAdapter};

mod schema;
mod setting;

fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

#[derive(Debug)]
pub struct StoreAdapterSqlite {
	db: SqlitePool,
}

impl StoreAdapterSqlite {
	/// Opens (or creates) the database at `path`. A directory gets a
	/// `settings.db` file inside it.
	pub async fn new(path: impl AsRef<Path>) -> ClResult<Self> {
		let path = path.as_ref();
		let file = if path.is_dir() { path.join("settings.db") } else { path.to_path_buf() };
		let opts = sqlite::SqliteConnectOptions::new()
			.filename(&file)
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(inspect)
			.map_err(|_| Error::DbError)?;

		schema::init_db(&db).await.inspect_err(inspect).map_err(|_| Error::DbError)?;
		info!("Settings database opened: {}", file.display());

		Ok(Self { db })
	}
}

#[async_trait]
impl StoreAdapter for StoreAdapterSqlite {
	async fn read_setting(
		&self,
		tn_id: Option<TnId>,
		key: &SettingKey,
	) -> ClResult<Option<SettingRow>> {
		setting::read(&self.db, tn_id, key).await
	}

	async fn write_setting(
		&self,
		tn_id: Option<TnId>,
		key: &SettingKey,
		value: &str,
	) -> ClResult<()> {
		setting::write(&self.db, tn_id, key, value).await
	}

	async fn delete_setting(&self, tn_id: Option<TnId>, key: &SettingKey) -> ClResult<bool> {
		setting::delete(&self.db, tn_id, key).await
	}

	async fn list_settings(
		&self,
		tn_id: Option<TnId>,
		namespace: Option<&str>,
	) -> ClResult<Vec<SettingRow>> {
		setting::list(&self.db, tn_id, namespace).await
	}
}

// vim: ts=4
