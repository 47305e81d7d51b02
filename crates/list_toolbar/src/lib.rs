use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{
    domain::ParentRef,
    error::LookupError,
    protocol::{FetchPolicy, LookupResponse},
};

pub mod bulk;
pub mod filter;
pub mod profile;
pub mod toolbar;
pub mod viewport;
pub mod wizard;

pub use bulk::{BulkAction, BulkActionAvailability, BulkActionGate, BulkDispatch};
pub use filter::{
    ClearPolicy, FilterCoordinator, FilterPredicate, FilterState, ListQuery, OutOfProfile,
};
pub use profile::{ListProfile, ProfileKind, SortMenuEntry};
pub use toolbar::{ListToolbar, ToolbarOptions, ToolbarSnapshot};
pub use viewport::{select_affordance, SortAffordance, SortPresenter, Viewport};
pub use wizard::{WizardPhase, WizardState, WizardTrigger};

/// Read-only lookup of a parent resource and its current plan.
#[async_trait]
pub trait ResourceLookup: Send + Sync {
    async fn query(
        &self,
        parent: &ParentRef,
        policy: FetchPolicy,
    ) -> Result<LookupResponse, LookupError>;
}

pub struct MissingResourceLookup;

#[async_trait]
impl ResourceLookup for MissingResourceLookup {
    async fn query(
        &self,
        parent: &ParentRef,
        _policy: FetchPolicy,
    ) -> Result<LookupResponse, LookupError> {
        Err(LookupError::unavailable(format!(
            "no lookup service configured for {parent}"
        )))
    }
}

/// Executes destructive bulk operations over the currently filtered items.
#[async_trait]
pub trait BatchExecutor: Send + Sync {
    async fn delete_all(&self) -> Result<()>;
    async fn purge_all(&self) -> Result<()>;
}

pub struct MissingBatchExecutor;

#[async_trait]
impl BatchExecutor for MissingBatchExecutor {
    async fn delete_all(&self) -> Result<()> {
        Err(anyhow!("batch executor unavailable for delete_all"))
    }

    async fn purge_all(&self) -> Result<()> {
        Err(anyhow!("batch executor unavailable for purge_all"))
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
