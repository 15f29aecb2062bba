//! View (template) loading subsystem.
//!
//! # Data Flow
//! ```text
//! handler asks for "user-profile"
//!     → loader.rs (timeout, logging, metrics)
//!     → source.rs (HTTP GET views/user-profile.html, or disk, or memory)
//!     → Ok(content) for 2xx-3xx, Err(ViewError) otherwise
//! ```
//!
//! # Design Decisions
//! - Transport is a trait object: HTTP, disk or in-memory
//! - Any non 2xx-3xx status is a failure, same as a transport error

pub mod loader;
pub mod source;
pub mod types;

pub use loader::ViewLoader;
pub use source::{FileViewSource, HttpViewSource, StaticViews, ViewSource};
pub use types::{ViewError, ViewResult};
