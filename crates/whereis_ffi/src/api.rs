//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose item catalog use-cases to Dart via FRB.
//! - Map repository errors to envelopes the UI can branch on.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - One repository instance serves every call in the process.
//! - `error_kind` is one of `validation|not_found|storage|codec|config`.

use log::error;
use once_cell::sync::OnceCell;
use whereis_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    CoreConfig, Item, ItemDraft, ItemId, ItemPatch, ItemRepository, KeyValueStore, Location,
    PatchField, RepoError,
};

type SharedRepository = ItemRepository<Box<dyn KeyValueStore>>;

static REPOSITORY: OnceCell<SharedRepository> = OnceCell::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// GPS pair as handed over by the location plugin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationDto {
    pub latitude: f64,
    pub longitude: f64,
}

/// Item shape returned to Dart.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub photo_uri: Option<String>,
    pub location: Option<LocationDto>,
}

/// Envelope for single-item operations.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Created/updated/loaded item; `None` for removals and failures.
    pub item: Option<ItemDto>,
    /// Failure category; `None` on success.
    pub error_kind: Option<String>,
    /// Human-readable message for dialogs.
    pub message: String,
}

impl ItemActionResponse {
    fn success(message: impl Into<String>, item: Option<Item>) -> Self {
        Self {
            ok: true,
            item: item.map(to_item_dto),
            error_kind: None,
            message: message.into(),
        }
    }

    fn failure(kind: &str, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            item: None,
            error_kind: Some(kind.to_string()),
            message: message.into(),
        }
    }

    fn from_repo_error(operation: &str, err: RepoError) -> Self {
        if err.is_hard_failure() {
            error!("event={operation} module=ffi status=error error_kind={} error={err}", err.kind());
        }
        Self::failure(err.kind(), user_message(&err))
    }
}

/// Envelope for list and search screens.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemListResponse {
    /// Whether the catalog could be consulted at all.
    pub ok: bool,
    /// Items in catalog order.
    pub items: Vec<ItemDto>,
    /// Normalized query applied (empty for plain listing).
    pub query: String,
    /// Failure category; `None` on success.
    pub error_kind: Option<String>,
    pub message: String,
}

impl ItemListResponse {
    fn failure(query: String, response: ItemActionResponse) -> Self {
        Self {
            ok: false,
            items: Vec::new(),
            query,
            error_kind: response.error_kind,
            message: response.message,
        }
    }
}

/// Creates an item from the add-item form.
///
/// # FFI contract
/// - `photo_uri`/`location` are `None` when the user skipped capture.
/// - Never panics; validation failures return `error_kind = "validation"`.
pub async fn item_create(
    name: String,
    description: String,
    photo_uri: Option<String>,
    location: Option<LocationDto>,
) -> ItemActionResponse {
    let repo = match repository() {
        Ok(repo) => repo,
        Err(response) => return response,
    };
    let draft = ItemDraft {
        name,
        description,
        photo_uri,
        location: location.map(to_location),
    };
    match repo.create(draft).await {
        Ok(item) => ItemActionResponse::success("Item saved.", Some(item)),
        Err(err) => ItemActionResponse::from_repo_error("item_create", err),
    }
}

/// Lists the whole catalog; call whenever the list screen regains focus.
pub async fn item_list() -> ItemListResponse {
    match repository() {
        Ok(repo) => list_response(repo.reload().await, String::new()),
        Err(response) => ItemListResponse::failure(String::new(), response),
    }
}

/// Filters the catalog by name (trimmed, case-insensitive substring).
pub async fn item_search(query: String) -> ItemListResponse {
    let normalized = whereis_core::NameQuery::new(&query).needle().to_string();
    match repository() {
        Ok(repo) => list_response(repo.search(&query).await, normalized),
        Err(response) => ItemListResponse::failure(normalized, response),
    }
}

/// Loads one item for the detail screen.
pub async fn item_get(id: String) -> ItemActionResponse {
    let repo = match repository() {
        Ok(repo) => repo,
        Err(response) => return response,
    };
    match repo.get(&ItemId::from(id)).await {
        Ok(item) => ItemActionResponse::success("", Some(item)),
        Err(err) => ItemActionResponse::from_repo_error("item_get", err),
    }
}

/// Saves detail-screen edits.
///
/// `None` text fields are left unchanged. `clear_photo`/`clear_location`
/// remove the value and win over a supplied replacement.
pub async fn item_update(
    id: String,
    name: Option<String>,
    description: Option<String>,
    photo_uri: Option<String>,
    clear_photo: bool,
    location: Option<LocationDto>,
    clear_location: bool,
) -> ItemActionResponse {
    let repo = match repository() {
        Ok(repo) => repo,
        Err(response) => return response,
    };
    let patch = ItemPatch {
        name,
        description,
        photo_uri: patch_field(photo_uri, clear_photo),
        location: patch_field(location.map(to_location), clear_location),
    };
    match repo.update(&ItemId::from(id), patch).await {
        Ok(item) => ItemActionResponse::success("Item updated.", Some(item)),
        Err(err) => ItemActionResponse::from_repo_error("item_update", err),
    }
}

/// Deletes an item. The UI confirms intent before calling.
pub async fn item_remove(id: String) -> ItemActionResponse {
    let repo = match repository() {
        Ok(repo) => repo,
        Err(response) => return response,
    };
    match repo.remove(&ItemId::from(id)).await {
        Ok(()) => ItemActionResponse::success("Item has been deleted.", None),
        Err(err) => ItemActionResponse::from_repo_error("item_remove", err),
    }
}

fn repository() -> Result<&'static SharedRepository, ItemActionResponse> {
    REPOSITORY
        .get_or_try_init(|| {
            let config = CoreConfig::from_env().map_err(|err| err.to_string())?;
            config.validate().map_err(|err| err.to_string())?;
            config
                .open_repository()
                .map_err(|err| format!("opening {} store failed: {err}", config.storage.label()))
        })
        .map_err(|message| {
            error!("event=repository_open module=ffi status=error error={message}");
            ItemActionResponse::failure("config", message)
        })
}

fn patch_field<T>(value: Option<T>, clear: bool) -> PatchField<T> {
    match (clear, value) {
        (true, _) => PatchField::Clear,
        (false, Some(value)) => PatchField::Set(value),
        (false, None) => PatchField::Keep,
    }
}

fn user_message(err: &RepoError) -> String {
    match err {
        RepoError::Validation(_) => "Name and Description are required.".to_string(),
        RepoError::NotFound(_) => "This item no longer exists.".to_string(),
        RepoError::Storage(_) | RepoError::Codec(_) => format!("Failed to save item: {err}"),
    }
}

fn list_response(items: Vec<Item>, query: String) -> ItemListResponse {
    let message = if items.is_empty() {
        "No items.".to_string()
    } else {
        format!("Found {} item(s).", items.len())
    };
    ItemListResponse {
        ok: true,
        items: items.into_iter().map(to_item_dto).collect(),
        query,
        error_kind: None,
        message,
    }
}

fn to_location(dto: LocationDto) -> Location {
    Location::new(dto.latitude, dto.longitude)
}

fn to_item_dto(item: Item) -> ItemDto {
    ItemDto {
        id: item.id.to_string(),
        name: item.name,
        description: item.description,
        photo_uri: item.photo_uri,
        location: item.location.map(|loc| LocationDto {
            latitude: loc.latitude,
            longitude: loc.longitude,
        }),
    }
}
