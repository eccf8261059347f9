use crate::error::ReconcileError;
use serde::{Deserialize, Serialize};

/// Active user and (optionally) selected project of the caller's session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeContext {
    pub user_id: i64,
    pub project_id: Option<i64>,
}

impl ScopeContext {
    pub fn new(user_id: i64, project_id: Option<i64>) -> Self {
        Self {
            user_id,
            project_id,
        }
    }

    /// Resolve the scope of an edit session, failing when no project is selected
    pub fn require_project(&self) -> Result<SettingsScope, ReconcileError> {
        self.project_id
            .map(|project_id| SettingsScope {
                user_id: self.user_id,
                project_id,
            })
            .ok_or(ReconcileError::NoProjectSelected)
    }
}

/// (user, project) pair every engine store call is bound to; the category is
/// the plugin name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SettingsScope {
    pub user_id: i64,
    pub project_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_project() {
        let ctx = ScopeContext::new(3, Some(12));
        assert_eq!(
            ctx.require_project().unwrap(),
            SettingsScope {
                user_id: 3,
                project_id: 12
            }
        );

        let ctx = ScopeContext::new(3, None);
        assert!(matches!(
            ctx.require_project(),
            Err(ReconcileError::NoProjectSelected)
        ));
    }
}
