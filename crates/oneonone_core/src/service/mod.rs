//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store, profile and notifier collaborators around the pure
//!   lifecycle rules.
//! - Keep UI/FFI layers decoupled from collaborator details.

pub mod dashboard_service;
