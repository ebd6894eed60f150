//! HTTP client for the event badge REST API.
//!
//! [`api::BadgeApi`] implements [`lanyard_core::repository::TemplateRepository`]
//! over `reqwest`; [`config::ClientConfig`] reads its settings from the
//! environment.

pub mod api;
pub mod config;
