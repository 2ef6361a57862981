//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate tagging logic and repository calls into use-case APIs.
//! - Keep callers decoupled from storage details.

pub mod picture_service;
pub mod queue;
pub mod tagging_service;
