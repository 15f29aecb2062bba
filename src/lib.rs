//! Hash-fragment router.
//!
//! Maps the fragment of the current location (`#user/42`) to a handler,
//! gathers query and form data for it, and writes the HTML it produces
//! into a render target. A `#post` fragment replays the last submitted
//! form as a `POST`.
//!
//! # Architecture Overview
//!
//! ```text
//!   NavigationSource ──event──▶ dispatch ──▶ routing (verb, pattern → handler)
//!                                   │
//!                                   ├──▶ request (query, live form / stash)
//!                                   ├──▶ handler: Literal | Deferred | ContinuationStyle
//!                                   │        └──▶ view (template fetch)
//!                                   ▼
//!                              RenderTarget  (not-found view on failure)
//!
//!   Cross-cutting: config, observability, lifecycle
//! ```

// Core subsystems
pub mod dispatch;
pub mod host;
pub mod request;
pub mod routing;
pub mod view;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub mod site;

pub use config::RouterConfig;
pub use dispatch::{Dispatcher, DispatchError, DispatchOutcome, Handler, HandlerOutput};
pub use host::Host;
pub use lifecycle::Shutdown;
pub use routing::{RouteRegistry, Verb};
pub use view::ViewLoader;
