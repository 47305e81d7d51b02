//! File-backed collaborators for driving the toolbar without a console backend.

use std::{collections::HashMap, path::Path, time::Duration};

use anyhow::{Context, Result};
use async_trait::async_trait;
use list_toolbar::{BatchExecutor, ResourceLookup};
use shared::{
    domain::ParentRef,
    error::LookupError,
    protocol::{FetchPolicy, LookupResponse},
};
use tracing::info;

/// Lookup answers keyed by `namespace/name`.
pub struct FixtureLookup {
    responses: HashMap<String, LookupResponse>,
    delay: Duration,
}

impl FixtureLookup {
    pub fn new(responses: HashMap<String, LookupResponse>, delay: Duration) -> Self {
        Self { responses, delay }
    }

    pub fn from_json(raw: &str, delay: Duration) -> Result<Self, LookupError> {
        let responses = serde_json::from_str(raw)?;
        Ok(Self::new(responses, delay))
    }

    pub async fn load(path: &Path, delay: Duration) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read fixture '{}'", path.display()))?;
        Self::from_json(&raw, delay)
            .with_context(|| format!("invalid fixture '{}'", path.display()))
    }
}

#[async_trait]
impl ResourceLookup for FixtureLookup {
    async fn query(
        &self,
        parent: &ParentRef,
        policy: FetchPolicy,
    ) -> Result<LookupResponse, LookupError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        info!(parent = %parent, ?policy, "fixture: lookup");
        Ok(self
            .responses
            .get(&parent.to_string())
            .cloned()
            .unwrap_or_default())
    }
}

/// Accepts bulk actions and only records them in the log.
pub struct LoggingExecutor;

#[async_trait]
impl BatchExecutor for LoggingExecutor {
    async fn delete_all(&self) -> Result<()> {
        info!("batch: delete_all accepted");
        Ok(())
    }

    async fn purge_all(&self) -> Result<()> {
        info!("batch: purge_all accepted");
        Ok(())
    }
}
