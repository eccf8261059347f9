use crate::DbConnection;
use artist_settings::{normalize_value, NewSettingRecord, SettingUpdate, SettingsStore, StoreError};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use shared_types::SettingRecord;
use std::sync::MutexGuard;

const SETTING_COLUMNS: &str =
    "id, user_id, project_id, category, key, value, description, created_at, updated_at";

/// Settings store backed by the `user_settings` table
pub struct SqliteSettingsStore {
    connection: DbConnection,
}

impl SqliteSettingsStore {
    pub fn new(connection: DbConnection) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.connection
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("Lock error: {}", e)))
    }
}

fn setting_from_row(row: &Row<'_>) -> rusqlite::Result<SettingRecord> {
    Ok(SettingRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        project_id: row.get(2)?,
        category: row.get(3)?,
        key: row.get(4)?,
        value: row.get(5)?,
        description: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn store_error(e: rusqlite::Error) -> StoreError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            StoreError::Conflict(e.to_string())
        }
        _ => StoreError::Unavailable(e.to_string()),
    }
}

fn fetch(conn: &Connection, id: i64) -> Result<SettingRecord, StoreError> {
    conn.query_row(
        &format!("SELECT {SETTING_COLUMNS} FROM user_settings WHERE id = ?1"),
        params![id],
        setting_from_row,
    )
    .optional()
    .map_err(store_error)?
    .ok_or(StoreError::NotFound(id))
}

#[async_trait]
impl SettingsStore for SqliteSettingsStore {
    async fn list_by_scope(
        &self,
        user_id: i64,
        project_id: i64,
        category: Option<&str>,
    ) -> Result<Vec<SettingRecord>, StoreError> {
        let conn = self.lock()?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {SETTING_COLUMNS} FROM user_settings
                 WHERE user_id = ?1 AND project_id = ?2 AND (?3 IS NULL OR category = ?3)
                 ORDER BY id"
            ))
            .map_err(store_error)?;

        let records = stmt
            .query_map(params![user_id, project_id, category], setting_from_row)
            .map_err(store_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(store_error)?;

        Ok(records)
    }

    async fn create(&self, record: NewSettingRecord) -> Result<SettingRecord, StoreError> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO user_settings
                (user_id, project_id, category, key, value, description, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.user_id,
                record.project_id,
                record.category,
                record.key,
                normalize_value(record.value),
                record.description,
                chrono::Utc::now().timestamp(),
            ],
        )
        .map_err(store_error)?;

        fetch(&conn, conn.last_insert_rowid())
    }

    async fn update_by_id(
        &self,
        id: i64,
        update: SettingUpdate,
    ) -> Result<SettingRecord, StoreError> {
        let conn = self.lock()?;
        let current = fetch(&conn, id)?;

        let value = match update.value {
            Some(value) => normalize_value(Some(value)),
            None => current.value,
        };
        let description = update.description.or(current.description);

        conn.execute(
            "UPDATE user_settings SET value = ?1, description = ?2, updated_at = ?3 WHERE id = ?4",
            params![value, description, chrono::Utc::now().timestamp(), id],
        )
        .map_err(store_error)?;

        fetch(&conn, id)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        let conn = self.lock()?;
        let deleted = conn
            .execute("DELETE FROM user_settings WHERE id = ?1", params![id])
            .map_err(store_error)?;

        if deleted == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn get_by_id(&self, id: i64) -> Result<SettingRecord, StoreError> {
        let conn = self.lock()?;
        fetch(&conn, id)
    }
}
