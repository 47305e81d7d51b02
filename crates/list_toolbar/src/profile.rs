//! Static description of the list pages that share the toolbar.

use serde::{Deserialize, Serialize};
use shared::domain::{FilterKind, ItemCapabilities, SortKey, TypeFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    Address,
    AddressSpace,
}

/// One entry of the sort menu. `ordinal_hint` only orders the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortMenuEntry {
    pub key: SortKey,
    pub label: &'static str,
    pub ordinal_hint: u8,
}

const fn entry(key: SortKey, label: &'static str, ordinal_hint: u8) -> SortMenuEntry {
    SortMenuEntry {
        key,
        label,
        ordinal_hint,
    }
}

const ADDRESS_SORT_MENU: &[SortMenuEntry] = &[
    entry(SortKey::Name, "Address", 1),
    entry(SortKey::CreationTimestamp, "Time Created", 4),
    entry(SortKey::MessageIn, "Message In", 5),
    entry(SortKey::MessageOut, "Message Out", 6),
    entry(SortKey::StoredMessages, "Stored Messages", 7),
    entry(SortKey::Senders, "Senders", 8),
    entry(SortKey::Receivers, "Receivers", 9),
];

const ADDRESS_SPACE_SORT_MENU: &[SortMenuEntry] = &[
    entry(SortKey::Name, "Name", 1),
    entry(SortKey::CreationTimestamp, "Time Created", 4),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListProfile {
    pub kind: ProfileKind,
    pub default_filter_kind: FilterKind,
    pub filter_kinds: &'static [FilterKind],
    pub sort_menu: &'static [SortMenuEntry],
    pub capabilities: ItemCapabilities,
    /// Whether creating an item first resolves the parent address space plan.
    pub resolves_parent_plan: bool,
}

impl ListProfile {
    pub fn for_kind(kind: ProfileKind) -> Self {
        match kind {
            ProfileKind::Address => Self::address(),
            ProfileKind::AddressSpace => Self::address_space(),
        }
    }

    pub fn address() -> Self {
        Self {
            kind: ProfileKind::Address,
            default_filter_kind: FilterKind::Address,
            filter_kinds: &[FilterKind::Address, FilterKind::Type, FilterKind::Status],
            sort_menu: ADDRESS_SORT_MENU,
            capabilities: ItemCapabilities {
                supports_purge: true,
            },
            resolves_parent_plan: true,
        }
    }

    pub fn address_space() -> Self {
        Self {
            kind: ProfileKind::AddressSpace,
            default_filter_kind: FilterKind::Name,
            filter_kinds: &[FilterKind::Name, FilterKind::Namespace, FilterKind::Type],
            sort_menu: ADDRESS_SPACE_SORT_MENU,
            capabilities: ItemCapabilities::default(),
            resolves_parent_plan: false,
        }
    }

    pub fn offers(&self, kind: FilterKind) -> bool {
        self.filter_kinds.contains(&kind)
    }

    pub fn accepts_type(&self, value: TypeFilter) -> bool {
        match self.kind {
            ProfileKind::Address => !value.is_address_space_type(),
            ProfileKind::AddressSpace => value.is_address_space_type(),
        }
    }

    pub fn accepts_status(&self) -> bool {
        self.offers(FilterKind::Status)
    }

    pub fn accepts_namespaces(&self) -> bool {
        self.offers(FilterKind::Namespace)
    }

    pub fn sort_entry(&self, key: SortKey) -> Option<&SortMenuEntry> {
        self.sort_menu.iter().find(|entry| entry.key == key)
    }
}
