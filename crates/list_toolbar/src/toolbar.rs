//! Page-level toolbar: filters, create wizard, bulk actions and sort
//! presentation for one list profile.

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use shared::domain::ParentRef;
use tokio::sync::watch;

use crate::{
    bulk::{BulkAction, BulkActionAvailability, BulkActionGate, BulkDispatch},
    filter::{ClearPolicy, FilterCoordinator, ListQuery},
    profile::{ListProfile, ProfileKind, SortMenuEntry},
    viewport::{SortAffordance, SortPresenter, DEFAULT_MOBILE_BREAKPOINT},
    wizard::{WizardState, WizardTrigger},
    BatchExecutor, ResourceLookup,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolbarOptions {
    pub mobile_breakpoint: u32,
    pub clear_policy: ClearPolicy,
    /// `None` when the page has no refetch hook for newly created items.
    pub refetch_on_create: Option<bool>,
}

impl Default for ToolbarOptions {
    fn default() -> Self {
        Self {
            mobile_breakpoint: DEFAULT_MOBILE_BREAKPOINT,
            clear_policy: ClearPolicy::default(),
            refetch_on_create: Some(true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolbarSnapshot {
    pub profile: ProfileKind,
    pub query: ListQuery,
    pub total_items: usize,
    pub availability: BulkActionAvailability,
    pub affordance: SortAffordance,
    pub wizard: WizardState,
}

pub struct ListToolbar {
    filters: FilterCoordinator,
    wizard: WizardTrigger,
    gate: BulkActionGate,
    presenter: SortPresenter,
    executor: Arc<dyn BatchExecutor>,
}

impl ListToolbar {
    /// `parent` is only used by profiles that resolve a parent plan before
    /// creating items.
    pub fn new(
        profile: ListProfile,
        options: ToolbarOptions,
        parent: Option<ParentRef>,
        lookup: Arc<dyn ResourceLookup>,
        executor: Arc<dyn BatchExecutor>,
        viewport: watch::Receiver<u32>,
    ) -> Self {
        let parent = parent.filter(|_| profile.resolves_parent_plan);
        Self {
            gate: BulkActionGate::new(profile.capabilities),
            wizard: WizardTrigger::new(lookup, parent, options.refetch_on_create),
            presenter: SortPresenter::new(viewport, options.mobile_breakpoint),
            filters: FilterCoordinator::new(profile, options.clear_policy),
            executor,
        }
    }

    pub fn profile(&self) -> &ListProfile {
        self.filters.profile()
    }

    pub fn filters(&self) -> &FilterCoordinator {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FilterCoordinator {
        &mut self.filters
    }

    pub fn wizard(&self) -> &WizardTrigger {
        &self.wizard
    }

    pub fn wizard_mut(&mut self) -> &mut WizardTrigger {
        &mut self.wizard
    }

    pub fn presenter_mut(&mut self) -> &mut SortPresenter {
        &mut self.presenter
    }

    pub fn sort_menu(&self) -> &'static [SortMenuEntry] {
        self.profile().sort_menu
    }

    pub fn availability(&self) -> BulkActionAvailability {
        self.gate.availability(self.filters.total_items())
    }

    pub fn affordance(&self) -> SortAffordance {
        self.presenter.current()
    }

    pub fn create(&mut self) -> bool {
        self.wizard.activate()
    }

    pub async fn delete_all(&self) -> Result<BulkDispatch> {
        self.run_bulk(BulkAction::DeleteAll).await
    }

    pub async fn purge_all(&self) -> Result<BulkDispatch> {
        self.run_bulk(BulkAction::PurgeAll).await
    }

    async fn run_bulk(&self, action: BulkAction) -> Result<BulkDispatch> {
        self.gate
            .run(action, self.filters.total_items(), self.executor.as_ref())
            .await
    }

    pub fn snapshot(&self) -> ToolbarSnapshot {
        ToolbarSnapshot {
            profile: self.profile().kind,
            query: self.filters.snapshot(),
            total_items: self.filters.total_items(),
            availability: self.availability(),
            affordance: self.affordance(),
            wizard: self.wizard.state().clone(),
        }
    }
}

#[cfg(test)]
#[path = "tests/toolbar_tests.rs"]
mod tests;
