use crate::catalog::CatalogError;
use crate::store::StoreError;
use shared_types::FieldViolation;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("Schema not found for plugin '{0}'")]
    SchemaNotFound(String),

    #[error("No project selected")]
    NoProjectSelected,

    #[error("Validation failed: {}", join_violations(.violations))]
    ValidationFailure { violations: Vec<FieldViolation> },

    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),

    #[error("{} of {} writes failed", .failed.len(), .succeeded.len() + .failed.len())]
    PartialApplyFailure {
        succeeded: Vec<String>,
        failed: Vec<(String, StoreError)>,
    },
}

impl From<CatalogError> for ReconcileError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(name) => ReconcileError::SchemaNotFound(name),
        }
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
