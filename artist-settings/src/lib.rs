//! Settings reconciliation for DCC plugin settings.
//!
//! A plugin publishes a [`PluginSchema`]; an artist's persisted
//! [`SettingRecord`]s for one (user, project, plugin) scope are merged with it
//! into an editable [`FormState`]. Submitted forms are validated against the
//! schema and diffed against the fetched records into a write plan, which is
//! then applied to a [`SettingsStore`].

pub mod catalog;
pub mod editor;
pub mod error;
pub mod reconcile;
pub mod schema;
pub mod scope;
pub mod store;

pub use catalog::{CatalogError, PluginRegistry, SchemaCatalog};
pub use editor::{EditSession, SettingsEditor, SubmitOutcome};
pub use error::ReconcileError;
pub use reconcile::{
    apply_write_plan, build_write_plan, initialize_form_state, validate_submission, ApplyOutcome,
    ApplyReport, ApplyResult, FormState,
};
pub use schema::{validate_schema, SchemaError};
pub use scope::{ScopeContext, SettingsScope};
pub use store::{
    normalize_value, InMemorySettingsStore, NewSettingRecord, SettingUpdate, SettingsStore,
    StoreError,
};

pub use shared_types::{
    DefaultValue, FieldViolation, PluginSchema, PluginSummary, SettingDefinition, SettingRecord,
    SettingType, WritePlanEntry,
};
