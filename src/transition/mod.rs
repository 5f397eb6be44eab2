//! Transition subsystem.
//!
//! # Data Flow
//! ```text
//! Router::transition(path, context, options)
//!     → queue.rs (FIFO, one in flight)
//!     → engine.rs:
//!         resolve (registry) → validate → one-shot hooks
//!         → before hooks (root → leaf)
//!         → render (leaf → root, child threaded upward)
//!         → after hooks (leaf → root)
//!         → commit
//!     → result back to the caller via oneshot
//! ```
//!
//! # Design Decisions
//! - Routes compared by id, never by path
//! - Leaving fires before entering on the way down; entered before left on the way up
//! - Failed or rejected transitions never commit

pub mod engine;
pub mod hooks;
pub mod queue;
pub mod state;
pub mod types;

pub use engine::TransitionEngine;
pub use hooks::{hook_fn, HookFn, HookKind, RouteHooks, TransitionHook};
pub use queue::{Target, TransitionQueue, TransitionWorker};
pub use state::TransitionState;
pub use types::{ActiveRoute, TransitionError, TransitionOptions, TransitionResult};
