//! Template orchestration over a [`TemplateRepository`].
//!
//! The service holds no mutable state of its own: every call fetches what
//! it needs, so concurrent callers never observe each other's partial
//! work. Nothing is retried automatically and nothing is rolled back.

use std::sync::Arc;

use lanyard_core::codec::{decode, decode_event, encode, BadgeTemplateRecord};
use lanyard_core::error::CoreError;
use lanyard_core::repository::TemplateRepository;
use lanyard_core::selection::{resolve, Selection};
use lanyard_core::template::{
    is_ready_made_id, ready_made_by_id, EventBadgeSelection, TemplateModel,
};
use lanyard_core::types::{validate_event_id, DbId, TemplateId};

use crate::error::ServiceError;
use crate::poll::{next_delay, PollConfig};

const TEMPLATE_ENTITY: &str = "badge template";

/// Decoded templates for one event plus the resolved active one.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub event: EventBadgeSelection,
    pub templates: Vec<TemplateModel>,
    pub selected: Option<Selection>,
}

impl Listing {
    pub fn selected_id(&self) -> Option<&TemplateId> {
        self.selected.as_ref().and_then(Selection::id)
    }
}

/// Outcome of [`TemplateService::select_as_default`], taken from the
/// response bodies of both writes.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultSelection {
    pub template: TemplateModel,
    pub event: EventBadgeSelection,
}

pub struct TemplateService {
    repo: Arc<dyn TemplateRepository>,
}

impl TemplateService {
    pub fn new(repo: Arc<dyn TemplateRepository>) -> Self {
        Self { repo }
    }

    /// Fetch the event and its templates concurrently, decode every
    /// template, and resolve the active one.
    ///
    /// Resolution only runs once both fetches have succeeded.
    pub async fn list(
        &self,
        event_id: &str,
        legacy_cached_id: Option<&TemplateId>,
    ) -> Result<Listing, ServiceError> {
        validate_event_id(event_id)?;

        let (event, records) = tokio::try_join!(
            self.repo.get_event(event_id),
            self.repo.list_templates(event_id),
        )
        .inspect_err(|e| tracing::warn!(event_id, error = %e, "Failed to load badge templates"))?;

        let event = decode_event(&event);
        let templates: Vec<TemplateModel> = records.iter().map(decode).collect();
        let selected = resolve(&event, &templates, legacy_cached_id);

        tracing::info!(
            event_id,
            template_count = templates.len(),
            selected = ?selected.as_ref().and_then(Selection::id),
            source = ?selected.as_ref().map(|s| s.source),
            "Loaded badge templates",
        );

        Ok(Listing {
            event,
            templates,
            selected,
        })
    }

    /// Fetch a single decoded template.
    pub async fn get(&self, event_id: &str, id: &TemplateId) -> Result<TemplateModel, ServiceError> {
        validate_event_id(event_id)?;
        let db_id = id.db_id()?;

        let records = self.repo.list_templates(event_id).await?;
        find_record(&records, db_id)
            .map(decode)
            .ok_or_else(|| not_found(id).into())
    }

    /// Persist a new template. Any id on `template` is ignored; the
    /// backend assigns one.
    pub async fn create(
        &self,
        event_id: &str,
        template: &TemplateModel,
    ) -> Result<TemplateModel, ServiceError> {
        validate_event_id(event_id)?;
        template.validate()?;

        let mut draft = template.clone();
        draft.id = None;

        let record = self.repo.create_template(event_id, &encode(&draft)).await?;
        tracing::info!(event_id, template_id = record.id, name = %draft.name, "Badge template created");
        Ok(decode(&record))
    }

    /// Replace a persisted template.
    ///
    /// When `template` carries no background image, the image stored on
    /// the backend (hosted or embedded) is re-attached first so the save
    /// cannot drop it.
    pub async fn update(
        &self,
        event_id: &str,
        id: &TemplateId,
        template: &TemplateModel,
    ) -> Result<TemplateModel, ServiceError> {
        validate_event_id(event_id)?;
        let db_id = id.db_id()?;
        template.validate()?;

        let mut draft = template.clone();
        draft.id = Some(TemplateId::from(db_id));

        if draft.background.image.is_none() {
            let records = self.repo.list_templates(event_id).await?;
            let stored_image = find_record(&records, db_id)
                .map(decode)
                .and_then(|stored| stored.background.image);
            if let Some(image) = stored_image {
                tracing::debug!(
                    event_id,
                    template_id = db_id,
                    hosted = image.is_hosted(),
                    "Re-attaching stored background image",
                );
                draft.background.image = Some(image);
            }
        }

        let record = self
            .repo
            .update_template(event_id, db_id, &encode(&draft))
            .await?;
        tracing::info!(event_id, template_id = db_id, "Badge template updated");
        Ok(decode(&record))
    }

    /// Delete a persisted template. Ids that are not backend ids cannot
    /// name a persisted template and report `NotFound`.
    pub async fn delete(&self, event_id: &str, id: &TemplateId) -> Result<(), ServiceError> {
        validate_event_id(event_id)?;
        let db_id = id.db_id().map_err(|_| not_found(id))?;

        self.repo.delete_template(event_id, db_id).await?;
        tracing::info!(event_id, template_id = db_id, "Badge template deleted");
        Ok(())
    }

    /// Make `id` the event's template.
    ///
    /// Step one marks the template default, creating it first when `id`
    /// names a ready-made template with no persisted copy. Step two points
    /// the event at the resulting backend id. The steps hit different
    /// resources and are not atomic: if step two fails the error is
    /// [`ServiceError::Consistency`], and only [`Self::repair_pointer`]
    /// needs to be retried.
    ///
    /// An id that is neither a backend id nor a ready-made id is rejected
    /// before any request is made.
    pub async fn select_as_default(
        &self,
        event_id: &str,
        id: &TemplateId,
    ) -> Result<DefaultSelection, ServiceError> {
        validate_event_id(event_id)?;
        if !is_ready_made_id(id) {
            id.db_id()?;
        }

        let template = self.mark_default(event_id, id).await?;
        let db_id = match &template.id {
            Some(persisted) => persisted.db_id()?,
            None => return Err(not_found(id).into()),
        };

        let event = match self.repo.set_active_template(event_id, db_id).await {
            Ok(event) => decode_event(&event),
            Err(source) => {
                tracing::error!(
                    event_id,
                    template_id = db_id,
                    error = %source,
                    "Template marked default but event pointer update failed",
                );
                return Err(ServiceError::Consistency {
                    event_id: event_id.to_string(),
                    template_id: db_id,
                    source,
                });
            }
        };

        tracing::info!(event_id, template_id = db_id, "Default badge template selected");
        Ok(DefaultSelection { template, event })
    }

    /// Point the event at `template_id`. Idempotent; this is the only step
    /// to retry after a [`ServiceError::Consistency`] failure.
    pub async fn repair_pointer(
        &self,
        event_id: &str,
        template_id: DbId,
    ) -> Result<EventBadgeSelection, ServiceError> {
        validate_event_id(event_id)?;

        let event = self.repo.set_active_template(event_id, template_id).await?;
        tracing::info!(event_id, template_id, "Event badge pointer repaired");
        Ok(decode_event(&event))
    }

    /// Re-list until the resolved selection is `expected`.
    ///
    /// Gives up with [`ServiceError::NotObserved`] once
    /// [`PollConfig::max_attempts`] reads have missed.
    pub async fn wait_for_selection(
        &self,
        event_id: &str,
        expected: &TemplateId,
        legacy_cached_id: Option<&TemplateId>,
        config: &PollConfig,
    ) -> Result<Listing, ServiceError> {
        let mut delay = config.initial_delay;

        for attempt in 1..=config.max_attempts {
            let listing = self.list(event_id, legacy_cached_id).await?;
            if listing.selected_id() == Some(expected) {
                return Ok(listing);
            }

            tracing::debug!(
                event_id,
                attempt,
                expected = %expected,
                observed = ?listing.selected_id(),
                "Selection not yet visible",
            );

            if attempt < config.max_attempts {
                tokio::time::sleep(delay).await;
                delay = next_delay(delay, config);
            }
        }

        Err(ServiceError::NotObserved {
            expected: expected.clone(),
            attempts: config.max_attempts,
        })
    }

    // ---- private helpers ----

    /// Step one of [`Self::select_as_default`].
    async fn mark_default(
        &self,
        event_id: &str,
        id: &TemplateId,
    ) -> Result<TemplateModel, ServiceError> {
        let records = self.repo.list_templates(event_id).await?;
        let templates: Vec<TemplateModel> = records.iter().map(decode).collect();

        let persisted = templates
            .iter()
            .find(|t| t.id.as_ref() == Some(id))
            .or_else(|| {
                let ready = ready_made_by_id(id)?;
                templates.iter().find(|t| t.name == ready.name)
            });

        if let Some(existing) = persisted {
            let mut template = existing.clone();
            template.is_default = true;
            let existing_id = template.id.clone().ok_or_else(|| not_found(id))?;
            return self.update(event_id, &existing_id, &template).await;
        }

        let Some(mut ready) = ready_made_by_id(id) else {
            return Err(not_found(id).into());
        };
        tracing::debug!(event_id, name = %ready.name, "Persisting ready-made template before selection");
        ready.is_default = true;
        self.create(event_id, &ready).await
    }
}

fn find_record(records: &[BadgeTemplateRecord], db_id: DbId) -> Option<&BadgeTemplateRecord> {
    records.iter().find(|r| r.id == db_id)
}

fn not_found(id: &TemplateId) -> CoreError {
    CoreError::NotFound {
        entity: TEMPLATE_ENTITY,
        id: id.to_string(),
    }
}
