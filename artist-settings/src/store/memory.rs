use crate::store::{normalize_value, NewSettingRecord, SettingUpdate, SettingsStore, StoreError};
use shared_types::SettingRecord;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct Inner {
    next_id: i64,
    records: BTreeMap<i64, SettingRecord>,
}

/// Settings store kept in process memory.
///
/// Enforces the (user, project, category, key) uniqueness the SQLite store
/// declares, so engine tests observe the same conflicts.
#[derive(Clone, Default)]
pub struct InMemorySettingsStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with rows; ids continue after the largest one given
    pub fn with_records(records: Vec<SettingRecord>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.inner.lock().unwrap_or_else(|e| e.into_inner());
            for record in records {
                inner.next_id = inner.next_id.max(record.id);
                inner.records.insert(record.id, record);
            }
        }
        store
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .records
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("Lock error: {}", e)))
    }
}

#[async_trait::async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn list_by_scope(
        &self,
        user_id: i64,
        project_id: i64,
        category: Option<&str>,
    ) -> Result<Vec<SettingRecord>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .records
            .values()
            .filter(|r| r.user_id == user_id && r.project_id == project_id)
            .filter(|r| category.map_or(true, |c| r.category == c))
            .cloned()
            .collect())
    }

    async fn create(&self, record: NewSettingRecord) -> Result<SettingRecord, StoreError> {
        let mut inner = self.lock()?;

        let duplicate = inner.records.values().any(|r| {
            r.user_id == record.user_id
                && r.project_id == record.project_id
                && r.category == record.category
                && r.key == record.key
        });
        if duplicate {
            return Err(StoreError::Conflict(format!(
                "setting '{}' already exists in category '{}'",
                record.key, record.category
            )));
        }

        inner.next_id += 1;
        let created = SettingRecord {
            id: inner.next_id,
            user_id: record.user_id,
            project_id: record.project_id,
            category: record.category,
            key: record.key,
            value: normalize_value(record.value),
            description: record.description,
            created_at: chrono::Utc::now().timestamp(),
            updated_at: None,
        };
        inner.records.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_by_id(
        &self,
        id: i64,
        update: SettingUpdate,
    ) -> Result<SettingRecord, StoreError> {
        let mut inner = self.lock()?;
        let record = inner.records.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        if let Some(value) = update.value {
            record.value = normalize_value(Some(value));
        }
        if let Some(description) = update.description {
            record.description = Some(description);
        }
        record.updated_at = Some(chrono::Utc::now().timestamp());

        Ok(record.clone())
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner
            .records
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn get_by_id(&self, id: i64) -> Result<SettingRecord, StoreError> {
        let inner = self.lock()?;
        inner.records.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_record(key: &str, value: &str) -> NewSettingRecord {
        NewSettingRecord {
            user_id: 1,
            project_id: 10,
            category: "maya".to_string(),
            key: key.to_string(),
            value: Some(value.to_string()),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_list_by_scope() {
        let store = InMemorySettingsStore::new();
        store.create(new_record("ui_scale", "1.5")).await.unwrap();
        store
            .create(NewSettingRecord {
                category: "blender".to_string(),
                ..new_record("samples", "64")
            })
            .await
            .unwrap();
        store
            .create(NewSettingRecord {
                project_id: 11,
                ..new_record("ui_scale", "2")
            })
            .await
            .unwrap();

        let all = store.list_by_scope(1, 10, None).await.unwrap();
        assert_eq!(all.len(), 2);

        let maya = store.list_by_scope(1, 10, Some("maya")).await.unwrap();
        assert_eq!(maya.len(), 1);
        assert_eq!(maya[0].value.as_deref(), Some("1.5"));

        assert!(store.list_by_scope(2, 10, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_scope_key_conflicts() {
        let store = InMemorySettingsStore::new();
        store.create(new_record("ui_scale", "1.5")).await.unwrap();
        let err = store.create(new_record("ui_scale", "2")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_ids() {
        let store = InMemorySettingsStore::new();
        let created = store.create(new_record("ui_scale", "1.5")).await.unwrap();

        let updated = store
            .update_by_id(
                created.id,
                SettingUpdate {
                    value: Some("2".to_string()),
                    description: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.value.as_deref(), Some("2"));
        assert!(updated.updated_at.is_some());

        let cleared = store
            .update_by_id(
                created.id,
                SettingUpdate {
                    value: Some(String::new()),
                    description: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.value, None);

        assert_eq!(
            store.update_by_id(99, SettingUpdate::default()).await,
            Err(StoreError::NotFound(99))
        );

        store.delete_by_id(created.id).await.unwrap();
        assert_eq!(store.get_by_id(created.id).await, Err(StoreError::NotFound(created.id)));
        assert_eq!(store.delete_by_id(created.id).await, Err(StoreError::NotFound(created.id)));
    }

    #[tokio::test]
    async fn test_len_counts_records_after_poisoned_lock() {
        let store = InMemorySettingsStore::new();
        store.create(new_record("ui_scale", "1.5")).await.unwrap();

        let inner = store.inner.clone();
        let _ = std::thread::spawn(move || {
            let _guard = inner.lock().unwrap();
            panic!("writer panicked while holding the lock");
        })
        .join();

        assert!(store.inner.is_poisoned());
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
    }
}
