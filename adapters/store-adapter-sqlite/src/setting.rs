//! Setting rows: one string value per `(tenant, namespace, scope, name)`

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use knobs::prelude::*;
use knobs::store_adapter::SettingRow;
use knobs::types::now;

use crate::inspect;

fn tn(tn_id: Option<TnId>) -> i64 {
	i64::from(tn_id.map_or(0, |tn_id| tn_id.0))
}

fn to_row(row: &SqliteRow, tn_id: Option<TnId>) -> Result<SettingRow, sqlx::Error> {
	let namespace: String = row.try_get("namespace")?;
	let scope: String = row.try_get("scope")?;
	let name: String = row.try_get("name")?;
	let value: String = row.try_get("value")?;
	let updated_at: i64 = row.try_get("updated_at")?;
	Ok(SettingRow {
		key: SettingKey::new(namespace, scope, name),
		value: value.into(),
		tn_id,
		updated_at: Timestamp(updated_at),
	})
}

pub(crate) async fn read(
	db: &SqlitePool,
	tn_id: Option<TnId>,
	key: &SettingKey,
) -> ClResult<Option<SettingRow>> {
	let row = sqlx::query(
		"SELECT namespace, scope, name, value, updated_at FROM settings
		WHERE tn_id = ? AND namespace = ? AND scope = ? AND name = ?",
	)
	.bind(tn(tn_id))
	.bind(&*key.namespace)
	.bind(&*key.scope)
	.bind(&*key.name)
	.fetch_optional(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	row.map(|row| to_row(&row, tn_id).inspect_err(inspect).map_err(|_| Error::DbError))
		.transpose()
}

pub(crate) async fn write(
	db: &SqlitePool,
	tn_id: Option<TnId>,
	key: &SettingKey,
	value: &str,
) -> ClResult<()> {
	sqlx::query(
		"INSERT OR REPLACE INTO settings (tn_id, namespace, scope, name, value, updated_at)
		VALUES (?, ?, ?, ?, ?, ?)",
	)
	.bind(tn(tn_id))
	.bind(&*key.namespace)
	.bind(&*key.scope)
	.bind(&*key.name)
	.bind(value)
	.bind(now().0)
	.execute(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	Ok(())
}

pub(crate) async fn delete(db: &SqlitePool, tn_id: Option<TnId>, key: &SettingKey) -> ClResult<bool> {
	let res = sqlx::query(
		"DELETE FROM settings WHERE tn_id = ? AND namespace = ? AND scope = ? AND name = ?",
	)
	.bind(tn(tn_id))
	.bind(&*key.namespace)
	.bind(&*key.scope)
	.bind(&*key.name)
	.execute(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	Ok(res.rows_affected() > 0)
}

pub(crate) async fn list(
	db: &SqlitePool,
	tn_id: Option<TnId>,
	namespace: Option<&str>,
) -> ClResult<Vec<SettingRow>> {
	let res = if let Some(namespace) = namespace {
		sqlx::query(
			"SELECT namespace, scope, name, value, updated_at FROM settings
			WHERE tn_id = ? AND namespace = ? ORDER BY namespace, scope, name",
		)
		.bind(tn(tn_id))
		.bind(namespace)
		.fetch_all(db)
		.await
	} else {
		sqlx::query(
			"SELECT namespace, scope, name, value, updated_at FROM settings
			WHERE tn_id = ? ORDER BY namespace, scope, name",
		)
		.bind(tn(tn_id))
		.fetch_all(db)
		.await
	};
	let rows = res.inspect_err(inspect).map_err(|_| Error::DbError)?;

	rows.iter()
		.map(|row| to_row(row, tn_id).inspect_err(inspect).map_err(|_| Error::DbError))
		.collect()
}

// vim: ts=4
