//! Navigation source: the current location and its change events.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tokio::sync::mpsc;

/// Snapshot of the page address that routing depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// Query component including the leading `?`, or empty.
    pub search: String,
    /// Fragment including the leading `#`, or empty.
    pub hash: String,
}

impl Location {
    /// Parse an address such as `index.html?lang=en#user/42`.
    ///
    /// Only the search and fragment components are kept.
    pub fn parse(address: &str) -> Self {
        let (before_hash, hash) = match address.find('#') {
            Some(idx) => (&address[..idx], &address[idx..]),
            None => (address, ""),
        };
        let search = before_hash.find('?').map(|idx| &before_hash[idx..]).unwrap_or("");

        Self {
            search: search.to_string(),
            hash: hash.to_string(),
        }
    }

    /// Location with only a fragment. A missing `#` is added.
    pub fn from_hash(hash: &str) -> Self {
        Self {
            search: String::new(),
            hash: normalize_hash(hash),
        }
    }

    /// Fragment with the `#` and any embedded `?query` removed.
    pub fn fragment_path(&self) -> &str {
        let fragment = self.hash.strip_prefix('#').unwrap_or(&self.hash);
        fragment.split_once('?').map(|(path, _)| path).unwrap_or(fragment)
    }

    /// Query string embedded in the fragment (`#search?q=x` → `q=x`).
    pub fn fragment_query(&self) -> Option<&str> {
        self.hash.split_once('?').map(|(_, query)| query)
    }
}

pub(crate) fn normalize_hash(hash: &str) -> String {
    if hash.is_empty() || hash.starts_with('#') {
        hash.to_string()
    } else {
        format!("#{hash}")
    }
}

/// Why a dispatch was triggered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    /// Initial page load.
    Load,
    /// The fragment changed.
    HashChange { old: String, new: String },
}

/// Yields the current location on demand and accepts fragment changes.
pub trait NavigationSource: Send + Sync {
    fn location(&self) -> Location;

    /// Change the fragment. Returns false when it was already current.
    fn navigate(&self, hash: &str) -> bool;
}

/// In-process navigation source.
///
/// `navigate` updates the location and emits a `HashChange` event on the
/// channel returned by [`MemoryLocation::new`], the way a browser fires
/// `hashchange`. Setting the same fragment again emits nothing.
#[derive(Debug)]
pub struct MemoryLocation {
    current: ArcSwap<Location>,
    events: mpsc::UnboundedSender<NavigationEvent>,
}

impl MemoryLocation {
    /// Create a location and the receiver for its navigation events.
    pub fn new(initial: Location) -> (Arc<Self>, mpsc::UnboundedReceiver<NavigationEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                current: ArcSwap::from_pointee(initial),
                events,
            }),
            rx,
        )
    }

    /// Signal the initial page load.
    pub fn load(&self) {
        let _ = self.events.send(NavigationEvent::Load);
    }

    /// Replace the query component without emitting an event.
    pub fn set_search(&self, search: &str) {
        let current = self.current.load();
        self.current.store(Arc::new(Location {
            search: search.to_string(),
            hash: current.hash.clone(),
        }));
    }
}

impl NavigationSource for MemoryLocation {
    fn location(&self) -> Location {
        self.current.load().as_ref().clone()
    }

    fn navigate(&self, hash: &str) -> bool {
        let new = normalize_hash(hash);
        let old = self.current.load();
        if old.hash == new {
            return false;
        }

        let old_hash = old.hash.clone();
        self.current.store(Arc::new(Location {
            search: old.search.clone(),
            hash: new.clone(),
        }));
        tracing::debug!(old = %old_hash, new = %new, "Fragment changed");
        let _ = self.events.send(NavigationEvent::HashChange { old: old_hash, new });
        true
    }
}
