//! Filter and sort state for a list page.
//!
//! The coordinator is the only writer. Every accepted change is published as a
//! [`ListQuery`] on a watch channel; writes that leave the query untouched do
//! not wake subscribers, so the data fetcher never refetches for a no-op.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use shared::domain::{FilterKind, SortKey, SortState, StatusFilter, TypeFilter};
use thiserror::Error;
use tokio::sync::watch;
use tracing::debug;

use crate::profile::ListProfile;

/// A value the enum allows but the list page does not offer. Nothing is
/// published; `Ok(false)` is reserved for writes that equal the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OutOfProfile {
    #[error("filter kind '{0}' is not offered by this list")]
    FilterKind(FilterKind),
    #[error("namespace tokens are not offered by this list")]
    Namespace,
    #[error("type '{0}' is not listed on this page")]
    Type(TypeFilter),
    #[error("status '{0}' is not offered by this list")]
    Status(StatusFilter),
    #[error("sort key '{0}' is not in this list's menu")]
    SortKey(SortKey),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub kind: FilterKind,
    pub names: BTreeSet<String>,
    pub namespaces: BTreeSet<String>,
    pub type_filter: Option<TypeFilter>,
    pub status_filter: Option<StatusFilter>,
}

impl FilterState {
    pub fn new(kind: FilterKind) -> Self {
        Self {
            kind,
            names: BTreeSet::new(),
            namespaces: BTreeSet::new(),
            type_filter: None,
            status_filter: None,
        }
    }

    /// True when no predicate narrows the list.
    pub fn is_unfiltered(&self) -> bool {
        self.names.is_empty()
            && self.namespaces.is_empty()
            && self.type_filter.is_none()
            && self.status_filter.is_none()
    }

    pub fn predicates(&self) -> Vec<FilterPredicate> {
        let mut predicates = Vec::new();
        predicates.extend(self.names.iter().cloned().map(FilterPredicate::Name));
        predicates.extend(
            self.namespaces
                .iter()
                .cloned()
                .map(FilterPredicate::Namespace),
        );
        if let Some(value) = self.type_filter {
            predicates.push(FilterPredicate::Type(value));
        }
        if let Some(value) = self.status_filter {
            predicates.push(FilterPredicate::Status(value));
        }
        predicates
    }

    fn clear(&mut self, default_kind: FilterKind) -> bool {
        let cleared = Self::new(default_kind);
        replace_if_changed(self, cleared)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FilterPredicate {
    Name(String),
    Namespace(String),
    Type(TypeFilter),
    Status(StatusFilter),
}

/// Snapshot handed to the external data fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub filter: FilterState,
    pub sort: Option<SortState>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClearPolicy {
    /// Whether "clear all filters" also drops the active sort.
    pub reset_sort: bool,
}

pub struct FilterCoordinator {
    profile: ListProfile,
    policy: ClearPolicy,
    query: watch::Sender<ListQuery>,
    total_items: usize,
}

impl FilterCoordinator {
    pub fn new(profile: ListProfile, policy: ClearPolicy) -> Self {
        let (query, _) = watch::channel(ListQuery {
            filter: FilterState::new(profile.default_filter_kind),
            sort: None,
        });
        Self {
            profile,
            policy,
            query,
            total_items: 0,
        }
    }

    pub fn profile(&self) -> &ListProfile {
        &self.profile
    }

    pub fn policy(&self) -> ClearPolicy {
        self.policy
    }

    /// Receiver that wakes on every real change of the query.
    pub fn subscribe(&self) -> watch::Receiver<ListQuery> {
        self.query.subscribe()
    }

    pub fn snapshot(&self) -> ListQuery {
        self.query.borrow().clone()
    }

    pub fn filter(&self) -> FilterState {
        self.query.borrow().filter.clone()
    }

    pub fn sort(&self) -> Option<SortState> {
        self.query.borrow().sort
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn set_filter_kind(&mut self, kind: FilterKind) -> Result<bool, OutOfProfile> {
        if !self.profile.offers(kind) {
            debug!(kind = %kind, "filter: kind not offered by this list; ignored");
            return Err(OutOfProfile::FilterKind(kind));
        }
        Ok(self.update("kind", |query| replace_if_changed(&mut query.filter.kind, kind)))
    }

    pub fn add_name_token(&mut self, token: &str) -> bool {
        let Some(token) = normalize_token(token) else {
            return false;
        };
        self.update("add_name", |query| query.filter.names.insert(token))
    }

    pub fn remove_name_token(&mut self, token: &str) -> bool {
        let token = token.trim();
        self.update("remove_name", |query| query.filter.names.remove(token))
    }

    pub fn add_namespace_token(&mut self, token: &str) -> Result<bool, OutOfProfile> {
        if !self.profile.accepts_namespaces() {
            debug!("filter: namespace tokens not offered by this list; ignored");
            return Err(OutOfProfile::Namespace);
        }
        let Some(token) = normalize_token(token) else {
            return Ok(false);
        };
        Ok(self.update("add_namespace", |query| {
            query.filter.namespaces.insert(token)
        }))
    }

    pub fn remove_namespace_token(&mut self, token: &str) -> bool {
        let token = token.trim();
        self.update("remove_namespace", |query| {
            query.filter.namespaces.remove(token)
        })
    }

    pub fn set_type_filter(&mut self, value: Option<TypeFilter>) -> Result<bool, OutOfProfile> {
        if let Some(value) = value {
            if !self.profile.accepts_type(value) {
                debug!(type_filter = %value, "filter: type not listed on this page; ignored");
                return Err(OutOfProfile::Type(value));
            }
        }
        Ok(self.update("type", |query| {
            replace_if_changed(&mut query.filter.type_filter, value)
        }))
    }

    pub fn set_status_filter(
        &mut self,
        value: Option<StatusFilter>,
    ) -> Result<bool, OutOfProfile> {
        if let Some(value) = value {
            if !self.profile.accepts_status() {
                debug!(status = %value, "filter: status filter not offered by this list; ignored");
                return Err(OutOfProfile::Status(value));
            }
        }
        Ok(self.update("status", |query| {
            replace_if_changed(&mut query.filter.status_filter, value)
        }))
    }

    /// Out-of-profile inputs are rejected with [`OutOfProfile`] and leave the
    /// query untouched; `Ok(false)` means the value was already in place.
    pub fn set_sort(&mut self, sort: Option<SortState>) -> Result<bool, OutOfProfile> {
        if let Some(sort) = sort {
            if self.profile.sort_entry(sort.key).is_none() {
                debug!(key = %sort.key, "filter: sort key not in this list's menu; ignored");
                return Err(OutOfProfile::SortKey(sort.key));
            }
        }
        Ok(self.update("sort", |query| replace_if_changed(&mut query.sort, sort)))
    }

    /// Records the filtered item count reported by the data fetcher.
    pub fn set_total_items(&mut self, total: usize) -> bool {
        replace_if_changed(&mut self.total_items, total)
    }

    pub fn clear_all(&mut self) -> bool {
        let default_kind = self.profile.default_filter_kind;
        let reset_sort = self.policy.reset_sort;
        self.update("clear_all", |query| {
            let filter_changed = query.filter.clear(default_kind);
            let sort_changed = reset_sort && query.sort.take().is_some();
            filter_changed || sort_changed
        })
    }

    fn update(&mut self, op: &'static str, apply: impl FnOnce(&mut ListQuery) -> bool) -> bool {
        let changed = self.query.send_if_modified(apply);
        if changed {
            debug!(op, "filter: query changed");
        }
        changed
    }
}

fn normalize_token(token: &str) -> Option<String> {
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

#[cfg(test)]
#[path = "tests/filter_tests.rs"]
mod tests;
