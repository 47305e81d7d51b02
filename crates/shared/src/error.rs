use thiserror::Error;

/// Failure modes of a parent-plan lookup.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("lookup service unavailable: {0}")]
    Unavailable(String),
    #[error("malformed lookup response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl LookupError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

/// A keyword that does not name any member of the target enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownKeyword {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownKeyword {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
