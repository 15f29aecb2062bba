//! Host environment capabilities.
//!
//! # Data Flow
//! ```text
//! location.rs  → current fragment/query, change events  → dispatcher
//! document.rs  → forms (verb override, field values)    → dispatcher, request
//!              → element lookup by id                   → render target
//! storage.rs   → stashed form snapshot                  → request
//! render.rs    ← final HTML                             ← dispatcher
//! ```
//!
//! # Design Decisions
//! - Every capability is a trait object held by the dispatcher
//! - In-memory implementations live next to the traits

pub mod document;
pub mod location;
pub mod render;
pub mod storage;

pub use document::{Document, FormSnapshot, MemoryDocument};
pub use location::{Location, MemoryLocation, NavigationEvent, NavigationSource};
pub use render::{MemoryTarget, RenderTarget};
pub use storage::{MemorySessionStore, SessionStore};

use std::sync::Arc;

/// The capabilities a dispatcher reads from and writes to.
#[derive(Clone)]
pub struct Host {
    pub navigation: Arc<dyn NavigationSource>,
    pub document: Arc<dyn Document>,
    pub storage: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("location", &self.navigation.location())
            .finish_non_exhaustive()
    }
}
