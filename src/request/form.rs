//! Form data handoff through session storage.
//!
//! A simulated POST is a fragment change to the marker, so the form that
//! was submitted may no longer be in the document by the time the route
//! runs. Its fields are stashed as a JSON object and consumed once.

use std::collections::HashMap;

use crate::dispatch::types::{DispatchError, DispatchResult};
use crate::host::{FormSnapshot, SessionStore};
use crate::observability::metrics;

/// Copy a form's fields into a map. Later duplicates win.
pub fn fields_of(form: &FormSnapshot) -> HashMap<String, String> {
    form.fields.iter().cloned().collect()
}

/// Store `fields` under `key` for the next marker navigation.
pub fn stash(store: &dyn SessionStore, key: &str, fields: &HashMap<String, String>) {
    match serde_json::to_string(fields) {
        Ok(json) => {
            store.set(key, json);
            metrics::record_stash_event("store");
        }
        Err(e) => tracing::error!(error = %e, "Failed to serialize form data"),
    }
}

/// Read and remove the stashed snapshot.
///
/// The snapshot is removed even when it is not a JSON object of strings.
pub fn take_stash(store: &dyn SessionStore, key: &str) -> DispatchResult<HashMap<String, String>> {
    let Some(raw) = store.remove(key) else {
        return Ok(HashMap::new());
    };

    match serde_json::from_str(&raw) {
        Ok(fields) => {
            metrics::record_stash_event("consume");
            Ok(fields)
        }
        Err(e) => {
            metrics::record_stash_event("parse_failure");
            Err(DispatchError::ParseFailure(e.to_string()))
        }
    }
}
