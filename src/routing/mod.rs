//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (at startup):
//!     (verb, "user/:id", handler)
//!     → pattern.rs (compile into literal/param tokens)
//!     → registry.rs (store under verb, keep registration order)
//!     → frozen behind Arc
//!
//! Lookup (per navigation):
//!     (verb, path)
//!     → registry.rs (exact key, then ordered pattern scan)
//!     → Return: RouteMatch { handler, params } or None
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in the matcher
//! - Deterministic: same input always matches same route
//! - Exact match first, then first registered pattern wins

pub mod pattern;
pub mod registry;
pub mod verb;

pub use pattern::{compile, CompiledPattern, Params, PatternError};
pub use registry::{RouteEntry, RouteMatch, RouteRegistry};
pub use verb::Verb;
