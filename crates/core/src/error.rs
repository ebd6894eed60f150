#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A backend call failed. `status` is absent when no response arrived.
    #[error("Network error: {message}")]
    Network { status: Option<u16>, message: String },

    #[error("Malformed backend payload: {0}")]
    Decode(String),
}
