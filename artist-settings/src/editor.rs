use crate::catalog::SchemaCatalog;
use crate::error::ReconcileError;
use crate::reconcile::{
    apply_write_plan, build_write_plan, initialize_form_state, validate_submission, ApplyReport,
    FormState,
};
use crate::scope::{ScopeContext, SettingsScope};
use crate::store::SettingsStore;
use shared_types::{PluginSchema, SettingRecord, WritePlanEntry};
use std::sync::Arc;

/// Snapshot an edit session starts from
#[derive(Debug, Clone)]
pub struct EditSession {
    pub scope: SettingsScope,
    pub schema: PluginSchema,
    pub records: Vec<SettingRecord>,
    pub form: FormState,
}

#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub plan: Vec<WritePlanEntry>,
    pub report: ApplyReport,
}

/// Runs edit sessions for plugin settings against a catalog and a store
#[derive(Clone)]
pub struct SettingsEditor {
    catalog: Arc<dyn SchemaCatalog>,
    store: Arc<dyn SettingsStore>,
}

impl SettingsEditor {
    pub fn new(catalog: Arc<dyn SchemaCatalog>, store: Arc<dyn SettingsStore>) -> Self {
        Self { catalog, store }
    }

    pub fn store(&self) -> &Arc<dyn SettingsStore> {
        &self.store
    }

    /// Fetch the schema and the scope's records for a plugin
    async fn snapshot(
        &self,
        ctx: &ScopeContext,
        plugin: &str,
    ) -> Result<(SettingsScope, PluginSchema, Vec<SettingRecord>), ReconcileError> {
        let scope = ctx.require_project()?;
        let schema = self.catalog.get_schema(plugin)?;
        let records = self
            .store
            .list_by_scope(scope.user_id, scope.project_id, Some(&schema.name))
            .await?;
        Ok((scope, schema, records))
    }

    pub async fn open(&self, ctx: &ScopeContext, plugin: &str) -> Result<EditSession, ReconcileError> {
        let (scope, schema, records) = self.snapshot(ctx, plugin).await?;
        let form = initialize_form_state(&schema, &records);

        tracing::debug!(
            plugin = %schema.name,
            project_id = scope.project_id,
            records = records.len(),
            "Opened settings edit session"
        );

        Ok(EditSession {
            scope,
            schema,
            records,
            form,
        })
    }

    /// Validate a form and compute its write plan without touching the store
    pub async fn preview(
        &self,
        ctx: &ScopeContext,
        plugin: &str,
        form: &FormState,
    ) -> Result<Vec<WritePlanEntry>, ReconcileError> {
        let (_, schema, records) = self.snapshot(ctx, plugin).await?;
        validate_submission(&schema, form)?;
        Ok(build_write_plan(&schema, &records, form))
    }

    /// Validate, plan and apply a submitted form.
    ///
    /// The plan is diffed against records fetched at submit time. Writes that
    /// failed turn the whole call into `PartialApplyFailure`; the others stay
    /// applied.
    pub async fn submit(
        &self,
        ctx: &ScopeContext,
        plugin: &str,
        form: &FormState,
    ) -> Result<SubmitOutcome, ReconcileError> {
        let (scope, schema, records) = self.snapshot(ctx, plugin).await?;

        if let Err(e) = validate_submission(&schema, form) {
            tracing::info!(plugin = %schema.name, error = %e, "Rejected settings submission");
            return Err(e);
        }

        let plan = build_write_plan(&schema, &records, form);
        let report = apply_write_plan(&plan, self.store.as_ref(), scope)
            .await
            .into_result()?;

        Ok(SubmitOutcome { plan, report })
    }
}
