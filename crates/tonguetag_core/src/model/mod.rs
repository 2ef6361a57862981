//! Domain model for tongue photograph tagging.
//!
//! # Responsibility
//! - Define reference data shapes (features, physiques) and tagging records.
//! - Keep storage-agnostic types shared by tagging logic and repositories.
//!
//! # Invariants
//! - Reference data is immutable at runtime.
//! - Annotations are created once per picture and never updated.

pub mod annotation;
pub mod feature;
pub mod physique;
pub mod picture;
