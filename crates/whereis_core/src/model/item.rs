//! Item domain model.
//!
//! # Responsibility
//! - Define the canonical record for one cataloged belonging.
//! - Normalize and validate user-provided text before it reaches storage.
//!
//! # Invariants
//! - `id` is stable and never reused for another item.
//! - `name` and `description` are trimmed and non-empty.
//! - `photo_uri` and `location` are opaque; only presence is meaningful.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;
use uuid::Uuid;

/// Stable identifier for a cataloged item.
///
/// Newly created items get a UUIDv7 string. Catalogs written by older builds
/// used millisecond timestamps, so any non-empty string is accepted on load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Generates a fresh, creation-time ordered id.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// GPS coordinate pair in floating-point degrees.
///
/// No range checks are applied; the location collaborator is trusted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Validation errors for item text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ItemValidationError {
    #[error("item name must not be blank")]
    BlankName,
    #[error("item description must not be blank")]
    BlankDescription,
}

/// One cataloged belonging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    /// Opaque reference to image data owned by the photo collaborator.
    #[serde(default)]
    pub photo_uri: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
}

impl Item {
    /// Builds an item from a validated draft under a caller-provided id.
    ///
    /// # Errors
    /// - Returns `ItemValidationError` when name or description is blank.
    pub fn from_draft(id: ItemId, draft: ItemDraft) -> Result<Self, ItemValidationError> {
        let name = normalize_required(&draft.name).ok_or(ItemValidationError::BlankName)?;
        let description =
            normalize_required(&draft.description).ok_or(ItemValidationError::BlankDescription)?;

        Ok(Self {
            id,
            name,
            description,
            photo_uri: normalize_photo_uri(draft.photo_uri),
            location: draft.location,
        })
    }

    /// Checks persisted-state invariants for this item.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.name.trim().is_empty() {
            return Err(ItemValidationError::BlankName);
        }
        if self.description.trim().is_empty() {
            return Err(ItemValidationError::BlankDescription);
        }
        Ok(())
    }

    /// Returns a copy with `patch` applied.
    ///
    /// `id` is never touched. Fields the patch leaves as `None`/`Keep` keep
    /// their current value.
    ///
    /// # Errors
    /// - Returns `ItemValidationError` when a supplied name or description is
    ///   blank; `self` is not modified in that case.
    pub fn patched(&self, patch: ItemPatch) -> Result<Self, ItemValidationError> {
        let mut next = self.clone();

        if let Some(name) = patch.name {
            next.name = normalize_required(&name).ok_or(ItemValidationError::BlankName)?;
        }
        if let Some(description) = patch.description {
            next.description =
                normalize_required(&description).ok_or(ItemValidationError::BlankDescription)?;
        }
        next.photo_uri = match patch.photo_uri {
            PatchField::Keep => next.photo_uri,
            PatchField::Clear => None,
            PatchField::Set(uri) => normalize_photo_uri(Some(uri)),
        };
        next.location = patch.location.apply(next.location);

        Ok(next)
    }

    pub fn has_photo(&self) -> bool {
        self.photo_uri.is_some()
    }

    pub fn has_location(&self) -> bool {
        self.location.is_some()
    }
}

/// Input payload for creating an item. Carries no id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemDraft {
    pub name: String,
    pub description: String,
    pub photo_uri: Option<String>,
    pub location: Option<Location>,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            photo_uri: None,
            location: None,
        }
    }

    pub fn with_photo(mut self, photo_uri: impl Into<String>) -> Self {
        self.photo_uri = Some(photo_uri.into());
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

/// Tri-state value for optional fields in an `ItemPatch`.
///
/// `Clear` removes the value and is distinct from `Keep`, which means the
/// caller did not supply the field at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PatchField<T> {
    #[default]
    Keep,
    Clear,
    Set(T),
}

impl<T> PatchField<T> {
    /// Resolves the patch against the current value.
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            Self::Keep => current,
            Self::Clear => None,
            Self::Set(value) => Some(value),
        }
    }

    pub fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }
}

impl<T> From<Option<T>> for PatchField<T> {
    /// `Some` sets the value, `None` clears it.
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Set(value),
            None => Self::Clear,
        }
    }
}

/// Partial update for an existing item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub photo_uri: PatchField<String>,
    pub location: PatchField<Location>,
}

impl ItemPatch {
    /// Returns whether the patch would leave every field untouched.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.photo_uri.is_keep()
            && self.location.is_keep()
    }
}

fn normalize_required(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// Empty uri strings come from cancelled captures on some platforms.
fn normalize_photo_uri(value: Option<String>) -> Option<String> {
    value.filter(|uri| !uri.is_empty())
}
