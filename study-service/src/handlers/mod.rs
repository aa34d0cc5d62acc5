//! HTTP handlers for the study service.

pub mod health;
pub mod study;
