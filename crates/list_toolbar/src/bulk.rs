use anyhow::Result;
use serde::{Deserialize, Serialize};
use shared::domain::ItemCapabilities;
use tracing::{debug, info};

use crate::BatchExecutor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    DeleteAll,
    PurgeAll,
}

impl BulkAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DeleteAll => "delete_all",
            Self::PurgeAll => "purge_all",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BulkActionAvailability {
    pub delete_all_enabled: bool,
    pub purge_all_enabled: bool,
}

impl BulkActionAvailability {
    pub fn compute(total_filtered_items: usize, capabilities: ItemCapabilities) -> Self {
        let any = total_filtered_items > 0;
        Self {
            delete_all_enabled: any,
            purge_all_enabled: any && capabilities.supports_purge,
        }
    }

    pub fn is_enabled(&self, action: BulkAction) -> bool {
        match action {
            BulkAction::DeleteAll => self.delete_all_enabled,
            BulkAction::PurgeAll => self.purge_all_enabled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkDispatch {
    Dispatched,
    Skipped,
}

/// Decides whether bulk actions may run and hands them to the executor.
/// Retries and rollback belong to the executor.
#[derive(Debug, Clone, Copy)]
pub struct BulkActionGate {
    capabilities: ItemCapabilities,
}

impl BulkActionGate {
    pub fn new(capabilities: ItemCapabilities) -> Self {
        Self { capabilities }
    }

    pub fn availability(&self, total_filtered_items: usize) -> BulkActionAvailability {
        BulkActionAvailability::compute(total_filtered_items, self.capabilities)
    }

    pub async fn run(
        &self,
        action: BulkAction,
        total_filtered_items: usize,
        executor: &dyn BatchExecutor,
    ) -> Result<BulkDispatch> {
        if !self.availability(total_filtered_items).is_enabled(action) {
            debug!(
                action = action.as_str(),
                total_filtered_items, "bulk: action disabled; skipped"
            );
            return Ok(BulkDispatch::Skipped);
        }

        match action {
            BulkAction::DeleteAll => executor.delete_all().await?,
            BulkAction::PurgeAll => executor.purge_all().await?,
        }
        info!(
            action = action.as_str(),
            total_filtered_items, "bulk: action dispatched"
        );
        Ok(BulkDispatch::Dispatched)
    }
}

#[cfg(test)]
#[path = "tests/bulk_tests.rs"]
mod tests;
