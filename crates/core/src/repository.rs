//! The backend seam used by the template service.
//!
//! One method per REST operation on events and their badge templates.
//! Implementations report transport and non-2xx failures as
//! [`CoreError::Network`] and malformed bodies as [`CoreError::Decode`].

use async_trait::async_trait;

use crate::codec::{ApiPayload, BadgeTemplateRecord, EventRecord};
use crate::error::CoreError;
use crate::types::DbId;

#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// `GET /events/{event_id}`
    async fn get_event(&self, event_id: &str) -> Result<EventRecord, CoreError>;

    /// `GET /events/{event_id}/badges`
    async fn list_templates(&self, event_id: &str) -> Result<Vec<BadgeTemplateRecord>, CoreError>;

    /// `POST /events/{event_id}/badges`
    async fn create_template(
        &self,
        event_id: &str,
        payload: &ApiPayload,
    ) -> Result<BadgeTemplateRecord, CoreError>;

    /// `PUT /events/{event_id}/badges/{id}`
    async fn update_template(
        &self,
        event_id: &str,
        id: DbId,
        payload: &ApiPayload,
    ) -> Result<BadgeTemplateRecord, CoreError>;

    /// `DELETE /events/{event_id}/badges/{id}`
    async fn delete_template(&self, event_id: &str, id: DbId) -> Result<(), CoreError>;

    /// `PUT /events/{event_id}` with `{ event: { active_badge_id } }`
    async fn set_active_template(
        &self,
        event_id: &str,
        template_id: DbId,
    ) -> Result<EventRecord, CoreError>;
}
