use serde::{Deserialize, Serialize};

use crate::error::RepositoryError;

/// Construction-time settings for a repository.
///
/// ```ignore
/// let config = RepositoryConfig::from_json(r#"{ "kind": "people", "first_id": 100 }"#)?;
/// let repo = InMemoryRepository::<User>::with_config(&config)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Kind name override. Defaults to the shape's own kind.
    pub kind: Option<String>,
    /// First identifier the in-memory backend hands out. Values below 1 are raised to 1.
    pub first_id: i64,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            kind: None,
            first_id: 1,
        }
    }
}

impl RepositoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_first_id(mut self, first_id: i64) -> Self {
        self.first_id = first_id;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, RepositoryError> {
        Ok(serde_json::from_str(json)?)
    }
}
