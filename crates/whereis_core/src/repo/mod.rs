//! Repository layer over the key-value store.
//!
//! # Responsibility
//! - Own the catalog read-modify-write cycle.
//! - Translate store and codec failures into semantic repository errors.
//!
//! # Invariants
//! - Writes validate fully before touching storage.
//! - Mutations on one repository instance never interleave.

pub mod item_repo;
