//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     trigger() → every subscribed loop stops after its current event
//!
//! Signals (signals.rs):
//!     Ctrl+C / SIGTERM → Shutdown::trigger
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::wait_for_signal;
