//! Domain model for cataloged belongings.
//!
//! # Responsibility
//! - Define the item record persisted in the catalog.
//! - Define create/update inputs (`ItemDraft`, `ItemPatch`) and their
//!   validation rules.
//!
//! # Invariants
//! - Every item is identified by an `ItemId` assigned once by the repository.
//! - `name` and `description` are trimmed and never blank once persisted.

pub mod item;
