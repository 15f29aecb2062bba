//! Dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! NavigationEvent (load / hashchange)
//!     → dispatcher.rs: resolve verb + path
//!         "#post"            → POST post
//!         form action match  → form method
//!         otherwise          → GET fragment path ("" → "/")
//!     → RouteRegistry::find
//!     → RequestExtractor::extract (query + form / stash)
//!     → handler.rs: Literal | Deferred | ContinuationStyle
//!     → RenderTarget::render(html)
//!
//! Any failure along the way:
//!     → not-found view → RenderTarget (fallback text if that fails too)
//! ```

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::{Dispatcher, PendingRender};
pub use handler::{
    deferred, handler, with_continuation, Continuation, Handler, HandlerError, HandlerFuture,
    HandlerOutput,
};
pub use types::{DispatchError, DispatchOutcome, DispatchResult};
