use async_trait::async_trait;
use shared_types::SettingRecord;

mod memory;

pub use memory::InMemorySettingsStore;

/// Fields of a setting row to insert; id and timestamps are assigned by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSettingRecord {
    pub user_id: i64,
    pub project_id: i64,
    pub category: String,
    pub key: String,
    pub value: Option<String>,
    pub description: Option<String>,
}

/// Partial update of a setting row. `None` fields are left untouched, an
/// empty value clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingUpdate {
    pub value: Option<String>,
    pub description: Option<String>,
}

/// Persistence for setting rows scoped by (user, project, category)
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Rows of one user in one project, optionally narrowed to a category,
    /// ordered by id
    async fn list_by_scope(
        &self,
        user_id: i64,
        project_id: i64,
        category: Option<&str>,
    ) -> Result<Vec<SettingRecord>, StoreError>;

    async fn create(&self, record: NewSettingRecord) -> Result<SettingRecord, StoreError>;

    async fn update_by_id(
        &self,
        id: i64,
        update: SettingUpdate,
    ) -> Result<SettingRecord, StoreError>;

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError>;

    async fn get_by_id(&self, id: i64) -> Result<SettingRecord, StoreError>;
}

/// Values travel string-encoded; the empty string is persisted as unset
pub fn normalize_value(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Setting {0} not found")]
    NotFound(i64),

    #[error("Setting conflict: {0}")]
    Conflict(String),

    #[error("Settings store unavailable: {0}")]
    Unavailable(String),
}
