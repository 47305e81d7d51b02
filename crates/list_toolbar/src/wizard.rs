//! Create-wizard launcher.
//!
//! `Closed --activate--> Opening --settle--> Open --close--> Closed`. Without a
//! parent reference activation goes straight to `Open`. The wizard counts as
//! open while the plan lookup is still in flight, so it can render before a
//! plan is known.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared::{
    domain::{ParentRef, PlanId},
    error::LookupError,
    protocol::{FetchPolicy, LookupResponse},
};
use tokio::{
    runtime::Handle,
    sync::oneshot::{self, error::TryRecvError},
    task::JoinHandle,
};
use tracing::{debug, warn};

use crate::ResourceLookup;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardPhase {
    #[default]
    Closed,
    Opening,
    Open,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WizardState {
    pub phase: WizardPhase,
    pub resolved_plan: Option<PlanId>,
    pub refetch_on_create: Option<bool>,
}

impl WizardState {
    pub fn is_open(&self) -> bool {
        self.phase != WizardPhase::Closed
    }
}

type LookupResult = Result<LookupResponse, LookupError>;

struct PendingLookup {
    parent: ParentRef,
    outcome: oneshot::Receiver<LookupResult>,
    task: JoinHandle<()>,
}

impl Drop for PendingLookup {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub struct WizardTrigger {
    lookup: Arc<dyn ResourceLookup>,
    parent: Option<ParentRef>,
    refetch_on_create: Option<bool>,
    state: WizardState,
    pending: Option<PendingLookup>,
    refetch_requested: bool,
}

impl WizardTrigger {
    pub fn new(
        lookup: Arc<dyn ResourceLookup>,
        parent: Option<ParentRef>,
        refetch_on_create: Option<bool>,
    ) -> Self {
        Self {
            lookup,
            parent,
            refetch_on_create,
            state: WizardState::default(),
            pending: None,
            refetch_requested: false,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn parent(&self) -> Option<&ParentRef> {
        self.parent.as_ref()
    }

    pub fn is_resolving(&self) -> bool {
        self.pending.is_some()
    }

    /// Opens the wizard; returns false when it is already open.
    ///
    /// Activation never closes the wizard. A repeated call while it is open is
    /// a no-op; only [`close`](Self::close) and [`complete`](Self::complete)
    /// close it.
    ///
    /// With a parent reference a bypass-cache plan lookup is spawned on the
    /// current tokio runtime and this returns without waiting for it. Outside a
    /// runtime the lookup cannot run and the wizard opens without a plan.
    pub fn activate(&mut self) -> bool {
        if self.state.is_open() {
            debug!("wizard: activate ignored, wizard already open");
            return false;
        }

        self.state = WizardState {
            phase: WizardPhase::Open,
            resolved_plan: None,
            refetch_on_create: self.refetch_on_create,
        };

        let Some(parent) = self.parent.clone() else {
            debug!("wizard: no parent reference, opening without plan");
            return true;
        };

        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(err) => {
                warn!(parent = %parent, "wizard: plan lookup needs a tokio runtime: {err}");
                return true;
            }
        };

        let (tx, rx) = oneshot::channel();
        let lookup = Arc::clone(&self.lookup);
        let task_parent = parent.clone();
        let task = runtime.spawn(async move {
            let result = lookup.query(&task_parent, FetchPolicy::NetworkOnly).await;
            // The receiver is gone when the wizard was closed or torn down.
            let _ = tx.send(result);
        });

        debug!(parent = %parent, "wizard: resolving parent plan");
        self.state.phase = WizardPhase::Opening;
        self.pending = Some(PendingLookup {
            parent,
            outcome: rx,
            task,
        });
        true
    }

    /// Waits for the in-flight lookup, if any, and applies its outcome.
    ///
    /// Cancel safe: dropping the future leaves the lookup pending.
    pub async fn settle(&mut self) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };
        let result = match (&mut pending.outcome).await {
            Ok(result) => result,
            Err(_) => Err(LookupError::unavailable(
                "lookup task ended without a result",
            )),
        };
        self.finish_lookup(result);
        true
    }

    /// Applies the lookup outcome if it has already arrived.
    pub fn try_settle(&mut self) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };
        let result = match pending.outcome.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Closed) => Err(LookupError::unavailable(
                "lookup task ended without a result",
            )),
        };
        self.finish_lookup(result);
        true
    }

    pub fn close(&mut self) -> bool {
        if !self.state.is_open() {
            return false;
        }
        if self.pending.take().is_some() {
            debug!("wizard: closed while plan lookup in flight; result discarded");
        }
        self.state = WizardState::default();
        true
    }

    /// Closes the wizard after a successful creation.
    pub fn complete(&mut self) -> bool {
        if !self.state.is_open() {
            return false;
        }
        if self.state.refetch_on_create == Some(true) {
            self.refetch_requested = true;
        }
        self.close()
    }

    /// Hands a pending refetch request to the list page exactly once.
    pub fn take_refetch_request(&mut self) -> bool {
        std::mem::take(&mut self.refetch_requested)
    }

    fn finish_lookup(&mut self, result: LookupResult) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        match result {
            Ok(response) => match response.first_plan() {
                Some(plan) => {
                    debug!(parent = %pending.parent, plan = %plan, "wizard: parent plan resolved");
                    self.state.resolved_plan = Some(plan);
                }
                None => {
                    debug!(parent = %pending.parent, "wizard: no matching parent resource");
                }
            },
            Err(err) => {
                warn!(parent = %pending.parent, "wizard: parent plan lookup failed: {err}");
            }
        }
        self.state.phase = WizardPhase::Open;
    }
}

#[cfg(test)]
#[path = "tests/wizard_tests.rs"]
mod tests;
