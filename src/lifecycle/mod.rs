//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Load config → Build registry → Router::spawn (worker task)
//!
//! Shutdown (shutdown.rs):
//!     trigger() → worker finishes in-flight transition → exit
//!     → queued callers receive QueueClosed
//! ```
//!
//! # Design Decisions
//! - In-flight transitions are never cancelled
//! - Dropping every router handle also stops the worker

pub mod shutdown;

pub use shutdown::Shutdown;
