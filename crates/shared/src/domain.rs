use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::UnknownKeyword;

macro_rules! name_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

name_newtype!(ResourceName);
name_newtype!(Namespace);
name_newtype!(PlanId);

/// Identifies the parent address space a child resource is created under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParentRef {
    pub name: ResourceName,
    pub namespace: Namespace,
}

impl ParentRef {
    /// Builds a reference only when both parts are present and non-blank.
    pub fn from_parts(name: Option<&str>, namespace: Option<&str>) -> Option<Self> {
        let name = name.map(str::trim).filter(|v| !v.is_empty())?;
        let namespace = namespace.map(str::trim).filter(|v| !v.is_empty())?;
        Some(Self {
            name: name.into(),
            namespace: namespace.into(),
        })
    }
}

impl fmt::Display for ParentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

macro_rules! keyword_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownKeyword;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let value = value.trim();
                $(
                    if value.eq_ignore_ascii_case($text) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(UnknownKeyword::new(stringify!($name), value))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

keyword_enum!(
    /// Which field the toolbar's filter input currently edits.
    FilterKind {
        Name => "name",
        Namespace => "namespace",
        Address => "address",
        Type => "type",
        Status => "status",
    }
);

keyword_enum!(TypeFilter {
    Standard => "standard",
    Brokered => "brokered",
    Queue => "queue",
    Topic => "topic",
    Anycast => "anycast",
    Multicast => "multicast",
    Subscription => "subscription",
});

impl TypeFilter {
    pub fn is_address_space_type(self) -> bool {
        matches!(self, Self::Standard | Self::Brokered)
    }
}

keyword_enum!(StatusFilter {
    Active => "active",
    Configuring => "configuring",
    Pending => "pending",
    Failed => "failed",
    Terminating => "terminating",
});

keyword_enum!(SortKey {
    Name => "name",
    CreationTimestamp => "creationTimestamp",
    MessageIn => "messageIn",
    MessageOut => "messageOut",
    StoredMessages => "storedMessage",
    Senders => "senders",
    Receivers => "receivers",
});

keyword_enum!(SortDirection {
    Asc => "asc",
    Desc => "desc",
});

impl Default for SortDirection {
    fn default() -> Self {
        Self::Asc
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }
}

/// Capabilities of the item type listed on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemCapabilities {
    pub supports_purge: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_ref_requires_both_parts() {
        assert!(ParentRef::from_parts(Some("space"), None).is_none());
        assert!(ParentRef::from_parts(None, Some("ns")).is_none());
        assert!(ParentRef::from_parts(Some(" "), Some("ns")).is_none());

        let parent = ParentRef::from_parts(Some(" space "), Some("ns")).expect("parent");
        assert_eq!(parent.name.as_str(), "space");
        assert_eq!(parent.to_string(), "ns/space");
    }

    #[test]
    fn keywords_parse_case_insensitively() {
        assert_eq!("Address".parse::<FilterKind>().expect("kind"), FilterKind::Address);
        assert_eq!(
            "creationtimestamp".parse::<SortKey>().expect("key"),
            SortKey::CreationTimestamp
        );
        let err = "bogus".parse::<StatusFilter>().expect_err("should fail");
        assert_eq!(err.to_string(), "unknown StatusFilter 'bogus'");
    }

    #[test]
    fn keywords_serialize_as_their_text() {
        let json = serde_json::to_string(&SortKey::StoredMessages).expect("encode");
        assert_eq!(json, "\"storedMessage\"");
        let kind: FilterKind = serde_json::from_str("\"namespace\"").expect("decode");
        assert_eq!(kind, FilterKind::Namespace);
    }
}
