//! Badge template orchestration.
//!
//! [`service::TemplateService`] drives a
//! [`TemplateRepository`](lanyard_core::repository::TemplateRepository):
//! listing with active-template resolution, create/update with image
//! preservation, delete, and the two-step "select as default" write that
//! spans the template and its event.

pub mod error;
pub mod poll;
pub mod service;
