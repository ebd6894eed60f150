use lanyard_core::error::CoreError;
use lanyard_core::types::{DbId, TemplateId};

/// Errors surfaced by [`TemplateService`](crate::service::TemplateService).
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ServiceError {
    /// Validation, not-found, network, and decode failures from the core
    /// and the repository.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The template was marked default but moving the event pointer failed.
    /// Retry with [`TemplateService::repair_pointer`](crate::service::TemplateService::repair_pointer).
    #[error(
        "Template {template_id} is marked default but event {event_id} was not updated: {source}"
    )]
    Consistency {
        event_id: String,
        template_id: DbId,
        source: CoreError,
    },

    #[error("Selection of template {expected} not observed after {attempts} attempts")]
    NotObserved { expected: TemplateId, attempts: u32 },
}

impl ServiceError {
    /// The `(event_id, template_id)` pointer write still owed after a
    /// [`ServiceError::Consistency`] failure.
    pub fn pending_pointer(&self) -> Option<(&str, DbId)> {
        match self {
            ServiceError::Consistency {
                event_id,
                template_id,
                ..
            } => Some((event_id.as_str(), *template_id)),
            _ => None,
        }
    }
}
