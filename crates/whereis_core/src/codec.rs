//! Catalog <-> text codec.
//!
//! # Responsibility
//! - Serialize the ordered item list into the stored JSON array layout.
//! - Turn any unreadable blob into an empty catalog instead of an error.
//!
//! # Invariants
//! - `decode(&encode(items)?) == items` for every valid catalog.
//! - `decode` never fails and never panics.
//! - A decoded catalog satisfies unique ids and non-blank text fields.
//!   Malformed JSON decodes to an empty catalog; well-formed catalogs only
//!   lose the individual entries that break a rule.
//!
//! The layout is a JSON array of
//! `{"id","name","description","photoUri","location":{"latitude","longitude"}}`
//! objects, with `null` for absent optionals.

use crate::model::item::{Item, ItemId, ItemValidationError};
use log::warn;
use std::collections::HashSet;
use thiserror::Error;

/// Encoding or strict-decoding failure.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("catalog json is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog contains duplicate item id `{0}`")]
    DuplicateId(ItemId),
    #[error("catalog item `{id}` is invalid: {source}")]
    InvalidItem {
        id: ItemId,
        source: ItemValidationError,
    },
    /// JSON has no NaN/infinity; writing one would corrupt the blob.
    #[error("catalog item `{0}` has a non-finite coordinate")]
    NonFiniteCoordinate(ItemId),
}

/// Serializes the catalog in order.
///
/// # Errors
/// - `CodecError::NonFiniteCoordinate` when a location holds NaN or infinity.
pub fn encode(items: &[Item]) -> Result<String, CodecError> {
    if let Some(item) = items.iter().find(|item| {
        item.location
            .is_some_and(|loc| !loc.latitude.is_finite() || !loc.longitude.is_finite())
    }) {
        return Err(CodecError::NonFiniteCoordinate(item.id.clone()));
    }
    Ok(serde_json::to_string(items)?)
}

/// Parses a stored blob.
///
/// Malformed JSON yields an empty catalog. Entries with blank text or a
/// repeated id are skipped (first occurrence wins) and the rest are kept.
pub fn decode(blob: &str) -> Vec<Item> {
    let items: Vec<Item> = match serde_json::from_str(blob) {
        Ok(items) => items,
        Err(err) => {
            warn!(
                "event=catalog_decode module=codec status=corrupt blob_len={} error={}",
                blob.len(),
                err
            );
            return Vec::new();
        }
    };

    let total = items.len();
    let mut seen = HashSet::with_capacity(total);
    let mut kept = Vec::with_capacity(total);
    for item in items {
        if let Err(err) = item.validate() {
            warn!(
                "event=catalog_decode module=codec status=skipped item_id={} reason={err}",
                item.id
            );
            continue;
        }
        if !seen.insert(item.id.clone()) {
            warn!(
                "event=catalog_decode module=codec status=skipped item_id={} reason=duplicate_id",
                item.id
            );
            continue;
        }
        kept.push(item);
    }

    if kept.len() != total {
        warn!(
            "event=catalog_decode module=codec status=partial total={} kept={} skipped={}",
            total,
            kept.len(),
            total - kept.len()
        );
    }
    kept
}

/// Parses a stored blob and reports why it is not fully usable.
///
/// # Errors
/// - `CodecError::Json` for syntax or shape errors.
/// - `CodecError::DuplicateId` / `CodecError::InvalidItem` for blobs that
///   parse but break catalog invariants.
pub fn decode_strict(blob: &str) -> Result<Vec<Item>, CodecError> {
    let items: Vec<Item> = serde_json::from_str(blob)?;
    check_catalog(&items)?;
    Ok(items)
}

/// Verifies unique ids and non-blank text fields across a catalog.
pub fn check_catalog(items: &[Item]) -> Result<(), CodecError> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        item.validate().map_err(|source| CodecError::InvalidItem {
            id: item.id.clone(),
            source,
        })?;
        if !seen.insert(&item.id) {
            return Err(CodecError::DuplicateId(item.id.clone()));
        }
    }
    Ok(())
}
