use crate::error::ReconcileError;
use crate::scope::SettingsScope;
use crate::store::{NewSettingRecord, SettingUpdate, SettingsStore, StoreError};
use futures_util::future::join_all;
use shared_types::{SettingRecord, WritePlanEntry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    Created(SettingRecord),
    Updated(SettingRecord),
    Unchanged,
    Failed(StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub key: String,
    pub outcome: ApplyOutcome,
}

impl ApplyResult {
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, ApplyOutcome::Failed(_))
    }
}

/// Per-entry results of applying a write plan, in plan order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub results: Vec<ApplyResult>,
}

impl ApplyReport {
    pub fn has_failures(&self) -> bool {
        self.results.iter().any(ApplyResult::is_failure)
    }

    /// Keys whose write went through
    pub fn succeeded(&self) -> Vec<String> {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, ApplyOutcome::Created(_) | ApplyOutcome::Updated(_)))
            .map(|r| r.key.clone())
            .collect()
    }

    pub fn failed(&self) -> Vec<(String, StoreError)> {
        self.results
            .iter()
            .filter_map(|r| match &r.outcome {
                ApplyOutcome::Failed(e) => Some((r.key.clone(), e.clone())),
                _ => None,
            })
            .collect()
    }

    /// Number of store calls that were issued
    pub fn writes(&self) -> usize {
        self.results
            .iter()
            .filter(|r| !matches!(r.outcome, ApplyOutcome::Unchanged))
            .count()
    }

    pub fn into_result(self) -> Result<Self, ReconcileError> {
        if self.has_failures() {
            Err(ReconcileError::PartialApplyFailure {
                succeeded: self.succeeded(),
                failed: self.failed(),
            })
        } else {
            Ok(self)
        }
    }
}

async fn apply_entry(
    entry: &WritePlanEntry,
    store: &dyn SettingsStore,
    scope: SettingsScope,
) -> ApplyResult {
    let outcome = match entry {
        WritePlanEntry::NoChange { .. } => ApplyOutcome::Unchanged,
        WritePlanEntry::Create {
            category,
            key,
            value,
            description,
        } => store
            .create(NewSettingRecord {
                user_id: scope.user_id,
                project_id: scope.project_id,
                category: category.clone(),
                key: key.clone(),
                value: Some(value.clone()),
                description: description.clone(),
            })
            .await
            .map_or_else(ApplyOutcome::Failed, ApplyOutcome::Created),
        WritePlanEntry::Update {
            record_id,
            value,
            description,
            ..
        } => store
            .update_by_id(
                *record_id,
                SettingUpdate {
                    value: Some(value.clone()),
                    description: description.clone(),
                },
            )
            .await
            .map_or_else(ApplyOutcome::Failed, ApplyOutcome::Updated),
    };

    if let ApplyOutcome::Failed(e) = &outcome {
        tracing::warn!(key = %entry.key(), error = %e, "Setting write failed");
    }

    ApplyResult {
        key: entry.key().to_string(),
        outcome,
    }
}

/// Execute the writes of a plan against the store.
///
/// Entries target disjoint records, so their store calls run concurrently. A
/// failing entry does not prevent the others from being attempted; `NoChange`
/// entries never reach the store.
pub async fn apply_write_plan(
    plan: &[WritePlanEntry],
    store: &dyn SettingsStore,
    scope: SettingsScope,
) -> ApplyReport {
    let results = join_all(plan.iter().map(|entry| apply_entry(entry, store, scope))).await;
    let report = ApplyReport { results };

    tracing::info!(
        user_id = scope.user_id,
        project_id = scope.project_id,
        writes = report.writes(),
        failed = report.failed().len(),
        "Applied write plan"
    );

    report
}
