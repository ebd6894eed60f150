//! Identifier types shared across the workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// All backend primary keys are numeric.
pub type DbId = i64;

/// Opaque template identifier.
///
/// Persisted templates carry the decimal form of their [`DbId`]; built-in
/// ready-made templates carry their fixed catalog id. Only the backend
/// form can be sent over the wire, see [`TemplateId::db_id`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(String);

impl TemplateId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse into the backend's numeric id format.
    ///
    /// Only positive base-10 integers are accepted; anything else is
    /// rejected rather than guessed at.
    pub fn db_id(&self) -> Result<DbId, CoreError> {
        match self.0.trim().parse::<DbId>() {
            Ok(id) if id > 0 => Ok(id),
            _ => Err(CoreError::Validation(format!(
                "Template id '{}' is not a valid backend id",
                self.0
            ))),
        }
    }
}

impl From<DbId> for TemplateId {
    fn from(id: DbId) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for TemplateId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reject missing event ids before any request is built.
pub fn validate_event_id(event_id: &str) -> Result<(), CoreError> {
    if event_id.trim().is_empty() {
        return Err(CoreError::Validation("Event id is required".to_string()));
    }
    Ok(())
}
