//! Database schema initialization

use sqlx::SqlitePool;

/// Creates the settings table if it does not exist yet.
///
/// `tn_id` 0 holds values stored without tenant partitioning.
pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS settings (
		tn_id integer NOT NULL DEFAULT 0,
		namespace text NOT NULL,
		scope text NOT NULL DEFAULT '',
		name text NOT NULL,
		value text NOT NULL,
		updated_at integer NOT NULL DEFAULT (unixepoch()),
		PRIMARY KEY(tn_id, namespace, scope, name)
	)",
	)
	.execute(&mut *tx)
	.await?;

	sqlx::query("CREATE INDEX IF NOT EXISTS idx_settings_namespace ON settings(tn_id, namespace)")
		.execute(&mut *tx)
		.await?;

	tx.commit().await?;
	Ok(())
}

// vim: ts=4
