//! Request data extraction.
//!
//! # Data Flow
//! ```text
//! Location.search + fragment query
//!     → query.rs (split, percent-decode)     → RequestData.query
//!
//! fragment == post marker?
//!     yes → form.rs (take stashed snapshot)   → RequestData.form
//!     no  → Document form with action == fragment
//!           → form.rs (copy fields, stash)    → RequestData.form
//! ```
//!
//! # Design Decisions
//! - Built fresh for every dispatch, never cached
//! - A malformed stash never fails the dispatch; it yields an empty map

pub mod form;
pub mod query;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::host::{Document, Location, SessionStore};

pub use query::{decode_component, parse_query};

/// Input handed to route handlers alongside the route parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestData {
    pub query: HashMap<String, String>,
    pub form: HashMap<String, String>,
}

/// Builds [`RequestData`] from the host environment.
#[derive(Debug, Clone)]
pub struct RequestExtractor {
    post_marker: String,
    stash_key: String,
}

impl RequestExtractor {
    pub fn new(post_marker: impl Into<String>, stash_key: impl Into<String>) -> Self {
        Self {
            post_marker: post_marker.into(),
            stash_key: stash_key.into(),
        }
    }

    pub fn stash_key(&self) -> &str {
        &self.stash_key
    }

    pub fn extract(
        &self,
        location: &Location,
        document: &dyn Document,
        store: &dyn SessionStore,
    ) -> RequestData {
        let mut data = RequestData::default();

        query::parse_query_into(&location.search, &mut data.query);
        if let Some(fragment_query) = location.fragment_query() {
            query::parse_query_into(fragment_query, &mut data.query);
        }

        if location.hash == self.post_marker {
            data.form = form::take_stash(store, &self.stash_key).unwrap_or_else(|e| {
                tracing::error!(error = %e, key = %self.stash_key, "Discarding stashed form data");
                HashMap::new()
            });
        } else if let Some(live) = document.form_for_action(&location.hash) {
            data.form = form::fields_of(&live);
            form::stash(store, &self.stash_key, &data.form);
        }

        data
    }
}
