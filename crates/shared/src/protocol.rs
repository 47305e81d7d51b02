use serde::{Deserialize, Serialize};

use crate::{domain::PlanId, error::LookupError};

/// Cache behaviour requested from the resource lookup service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchPolicy {
    #[default]
    CacheFirst,
    NetworkOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupItem {
    pub plan: PlanRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LookupResponse {
    #[serde(default)]
    pub items: Vec<LookupItem>,
}

impl LookupResponse {
    pub fn from_plans<I, S>(plans: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: plans
                .into_iter()
                .map(|id| LookupItem {
                    plan: PlanRef { id: id.into() },
                })
                .collect(),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, LookupError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Plan of the first matching resource, ignoring a blank identifier.
    pub fn first_plan(&self) -> Option<PlanId> {
        let id = self.items.first()?.plan.id.trim();
        if id.is_empty() {
            None
        } else {
            Some(PlanId(id.to_string()))
        }
    }
}
