//! Pure tagging logic: rule checks and physique resolution.
//!
//! # Responsibility
//! - Validate candidate selections before anything is persisted.
//! - Derive physique fields from validated atom selections.
//! - Hold the read-only reference catalog used by both.
//!
//! # Invariants
//! - Nothing in this module touches storage or logging.
//! - Validation failures never reach the resolver.

pub mod catalog;
pub mod resolver;
pub mod rules;
pub mod validator;
