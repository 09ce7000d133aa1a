//! Command router for the timemark request/response protocol.
//!
//! Requests are a closed tagged-variant type keyed by an `action` field, so
//! every operation kind is handled exhaustively at compile time. Each dispatched
//! call runs to completion against the store before a response envelope is
//! produced; an unrecognized action answers `unknown_action` instead of failing
//! the connection.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::app::App;
use crate::managers::bookmark_store::{BookmarkStore, BookmarkStoreTrait};
use crate::services::interchange;
use crate::types::bookmark::{BookmarkPatch, NewBookmark};

/// The operation catalogue. Action names match the records the viewer surfaces
/// already send (`addBookmark`, `getAllBookmarks`, ...).
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action")]
pub enum Command {
    #[serde(rename = "addBookmark", rename_all = "camelCase")]
    AddBookmark { data: NewBookmark },
    #[serde(rename = "getAllBookmarks", rename_all = "camelCase")]
    GetAllBookmarks {
        #[serde(default)]
        subject_id: Option<String>,
    },
    #[serde(rename = "updateBookmark", rename_all = "camelCase")]
    UpdateBookmark {
        id: i64,
        #[serde(default)]
        patch: BookmarkPatch,
    },
    #[serde(rename = "deleteBookmark", rename_all = "camelCase")]
    DeleteBookmark { id: i64 },
    #[serde(rename = "clearBookmarks")]
    ClearBookmarks,
    #[serde(rename = "importBookmarks", rename_all = "camelCase")]
    ImportBookmarks { items: Vec<Value> },
}

/// Action names recognized by [`Command`]. Used to tell an unknown action apart
/// from a malformed payload of a known one.
pub const ACTIONS: [&str; 6] = [
    "addBookmark",
    "getAllBookmarks",
    "updateBookmark",
    "deleteBookmark",
    "clearBookmarks",
    "importBookmarks",
];

/// Uniform result envelope: success with optional data, or failure with an
/// error description.
#[derive(Debug, Clone, Serialize)]
pub struct CommandResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandResponse {
    pub fn success() -> Self {
        Self {
            ok: true,
            data: None,
            error: None,
        }
    }

    pub fn with_data(data: Value) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Parses a raw request value and dispatches it.
///
/// An unrecognized `action` answers `{ok:false, error:"unknown_action"}`; a
/// known action with a malformed payload answers with the parse error.
pub fn dispatch(app: &Mutex<App>, request: &Value) -> CommandResponse {
    match Command::deserialize(request) {
        Ok(command) => handle_command(app, command),
        Err(err) => {
            let known = request
                .get("action")
                .and_then(|v| v.as_str())
                .map(|action| ACTIONS.contains(&action))
                .unwrap_or(false);
            if known {
                CommandResponse::failure(format!("invalid request: {}", err))
            } else {
                CommandResponse::failure("unknown_action")
            }
        }
    }
}

/// Invokes the store operation for one command and wraps the outcome in the
/// response envelope. Store failures become failure envelopes; they are never
/// retried here.
pub fn handle_command(app: &Mutex<App>, command: Command) -> CommandResponse {
    let app = match app.lock() {
        Ok(app) => app,
        Err(err) => return CommandResponse::failure(err.to_string()),
    };
    let mut store = BookmarkStore::new(app.db.connection());

    match command {
        Command::AddBookmark { data } => match store.add(&data) {
            Ok(id) => CommandResponse::with_data(serde_json::json!({ "id": id })),
            Err(err) => CommandResponse::failure(err.to_string()),
        },
        Command::GetAllBookmarks { subject_id } => {
            let result = match subject_id.as_deref() {
                Some(subject) => store.get_by_subject(subject),
                None => store.get_all(),
            };
            match result.and_then(|records| {
                serde_json::to_value(records)
                    .map_err(|e| crate::types::errors::StoreError::DatabaseError(e.to_string()))
            }) {
                Ok(data) => CommandResponse::with_data(data),
                Err(err) => CommandResponse::failure(err.to_string()),
            }
        }
        Command::UpdateBookmark { id, patch } => match store.update(id, &patch) {
            // Absence is not an error; report it as a flag.
            Ok(updated) => CommandResponse::with_data(serde_json::json!({ "updated": updated })),
            Err(err) => CommandResponse::failure(err.to_string()),
        },
        Command::DeleteBookmark { id } => match store.delete(id) {
            Ok(()) => CommandResponse::success(),
            Err(err) => CommandResponse::failure(err.to_string()),
        },
        Command::ClearBookmarks => match store.clear() {
            Ok(()) => CommandResponse::success(),
            Err(err) => CommandResponse::failure(err.to_string()),
        },
        Command::ImportBookmarks { items } => {
            let records = match interchange::from_values(&items) {
                Ok(records) => records,
                Err(err) => return CommandResponse::failure(err.to_string()),
            };
            match store.bulk_import(&records) {
                Ok(count) => {
                    CommandResponse::with_data(serde_json::json!({ "imported": count }))
                }
                Err(err) => CommandResponse::failure(err.to_string()),
            }
        }
    }
}
