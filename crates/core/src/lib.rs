//! Badge-template domain logic.
//!
//! Holds the in-memory template model, unit normalization, the codec
//! between the model and the backend JSON shape, and the resolver that
//! picks the single active template for an event. Nothing in this crate
//! performs I/O; the [`repository::TemplateRepository`] trait is the seam
//! through which the service crate reaches the backend.

pub mod codec;
pub mod error;
pub mod repository;
pub mod selection;
pub mod template;
pub mod types;
pub mod units;
