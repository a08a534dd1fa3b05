//! Name search over the catalog.
//!
//! # Responsibility
//! - Filter items by case-insensitive substring match on `name`.
//! - Keep a derived, recomputed view for list screens.
//!
//! # Invariants
//! - Results are never persisted.
//! - Result order is catalog order; there is no ranking.

pub mod filter;
pub mod view;
